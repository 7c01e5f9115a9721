//! Encrypted remote configuration
//!
//! Deployments without local files can pull configuration from a remote
//! URL. The document is a two-line payload: a base64 nonce followed by the
//! base64 AES-256-GCM ciphertext of a JSON object. The object carries a
//! `commonAll` section plus optional per-binary sections; the section named
//! after the current executable overrides the common keys.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use arc_swap::ArcSwap;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mfd_domain::{Error, Result};
use serde_json::{Value, json};
use std::env;
use std::sync::Arc;
use tracing::info;

/// Environment variable holding the hex-encoded 32-byte decryption key
pub const CONFIG_KEY_ENV: &str = "MFD_CONFIG_KEY";

/// AES-256-GCM key size in bytes
const KEY_SIZE: usize = 32;
/// AES-GCM nonce size in bytes
const NONCE_SIZE: usize = 12;

/// Remote configuration document with lock-free reads.
#[derive(Debug)]
pub struct RemoteConfig {
    current: ArcSwap<Value>,
    source: String,
}

impl RemoteConfig {
    /// Download and decrypt remote configuration, taking the key from
    /// [`CONFIG_KEY_ENV`].
    pub async fn load(url: &str) -> Result<Self> {
        let key_hex = env::var(CONFIG_KEY_ENV)
            .map_err(|_| Error::config(format!("Missing {CONFIG_KEY_ENV}")))?;
        let key = hex::decode(key_hex.trim()).map_err(|_| Error::config("Invalid key hex"))?;
        Self::load_with_key(url, &key).await
    }

    /// Download and decrypt remote configuration with an explicit key.
    pub async fn load_with_key(url: &str, key: &[u8]) -> Result<Self> {
        let client = reqwest::Client::new();
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::config(format!("Network error: {e}")))?;

        let content = response
            .text()
            .await
            .map_err(|e| Error::config(format!("Read error: {e}")))?;

        let full = decrypt_payload(&content, key)?;

        let binary = env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
            .unwrap_or_else(|| "default".to_string());

        let merged = merge_for_binary(&full, &binary);

        info!(url, binary, "remote configuration loaded");

        Ok(Self {
            current: ArcSwap::from_pointee(merged),
            source: format!("remote:{url}"),
        })
    }

    /// The current configuration document
    pub fn get(&self) -> Arc<Value> {
        self.current.load_full()
    }

    /// Replace the configuration document
    pub fn replace(&self, value: Value) {
        self.current.store(Arc::new(value));
    }

    /// Where this configuration came from
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Decrypt a two-line payload (base64 nonce, base64 ciphertext) into JSON.
pub fn decrypt_payload(content: &str, key: &[u8]) -> Result<Value> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 2 {
        return Err(Error::config(
            "Invalid remote payload: expected nonce and ciphertext lines",
        ));
    }

    let nonce = BASE64
        .decode(lines[0])
        .map_err(|_| Error::config("Invalid nonce"))?;
    let ciphertext = BASE64
        .decode(lines[1])
        .map_err(|_| Error::config("Invalid ciphertext"))?;

    if key.len() != KEY_SIZE {
        return Err(Error::config(format!(
            "Invalid key size: expected {KEY_SIZE} bytes, got {}",
            key.len()
        )));
    }
    if nonce.len() != NONCE_SIZE {
        return Err(Error::config(format!(
            "Invalid nonce size: expected {NONCE_SIZE} bytes, got {}",
            nonce.len()
        )));
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
        .map_err(|e| Error::config(format!("Decryption failed: {e}")))?;

    serde_json::from_slice(&plaintext).map_err(|e| Error::config(e.to_string()))
}

/// Merge the `commonAll` section with the section for the given binary.
///
/// Specific keys override common keys; both sections are optional.
pub fn merge_for_binary(full: &Value, binary: &str) -> Value {
    let common = full.get("commonAll").cloned().unwrap_or_else(|| json!({}));
    let specific = full.get(binary).cloned().unwrap_or_else(|| json!({}));

    let mut merged = common;
    if let (Some(m), Some(s)) = (merged.as_object_mut(), specific.as_object()) {
        for (k, v) in s {
            m.insert(k.clone(), v.clone());
        }
    }
    merged
}
