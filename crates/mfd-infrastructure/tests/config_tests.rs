//! Integration tests for configuration loading: local files, environment
//! overrides, and the encrypted remote document.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Key, KeyInit};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mfd_domain::Error;
use mfd_infrastructure::config::{ConfigLoader, RemoteConfig};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn load_without_file_uses_defaults() {
    let config = ConfigLoader::new()
        .with_env_prefix("MFD_TEST_NONE")
        .load()
        .unwrap();
    assert_eq!(config.http.retry, 2);
    assert_eq!(config.logging.level, "info");
    assert!(config.feeds.nasdaq_base_url.contains("nasdaq.com"));
}

#[test]
fn toml_file_overrides_defaults() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    writeln!(
        file,
        r#"
[http]
retry = 6
timeout_secs = 30

[logging]
level = "debug"
"#
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("MFD_TEST_NONE")
        .load()
        .unwrap();

    assert_eq!(config.http.retry, 6);
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.logging.level, "debug");
    // untouched sections keep their defaults
    assert_eq!(config.http.limit, 2);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let err = ConfigLoader::new()
        .with_config_path("/definitely/not/here.toml")
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn environment_overrides_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "mfd.toml",
            r#"
[http]
retry = 3
"#,
        )?;
        jail.set_env("MFD_HTTP__RETRY", "9");

        let config = ConfigLoader::new()
            .with_config_path(jail.directory().join("mfd.toml"))
            .load()
            .expect("load should succeed");

        assert_eq!(config.http.retry, 9);
        Ok(())
    });
}

#[test]
fn zero_timeout_fails_validation() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    writeln!(
        file,
        r#"
[http]
timeout_secs = 0
"#
    )
    .unwrap();

    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("MFD_TEST_NONE")
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn saved_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.toml");

    let loader = ConfigLoader::new().with_env_prefix("MFD_TEST_NONE");
    let mut config = loader.load().unwrap();
    config.http.retry = 7;
    config.logging.level = "warn".to_string();

    loader.save_to_file(&config, &path).unwrap();

    let reloaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("MFD_TEST_NONE")
        .load()
        .unwrap();
    assert_eq!(reloaded.http.retry, 7);
    assert_eq!(reloaded.logging.level, "warn");
}

/// Encrypt a JSON document into the two-line remote payload format.
fn encrypt_document(doc: &serde_json::Value, key: &[u8]) -> String {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher.encrypt(&nonce, doc.to_string().as_bytes()).unwrap();
    format!("{}\n{}\n", BASE64.encode(nonce), BASE64.encode(ciphertext))
}

#[tokio::test]
async fn remote_config_downloads_and_merges() {
    let server = MockServer::start().await;

    let mut key = vec![0u8; 32];
    OsRng.fill_bytes(&mut key);

    let doc = json!({
        "commonAll": { "region": "us-east-1", "poll_secs": 60 },
        "some-other-binary": { "poll_secs": 5 }
    });

    Mock::given(method("GET"))
        .and(path("/config/current"))
        .respond_with(ResponseTemplate::new(200).set_body_string(encrypt_document(&doc, &key)))
        .mount(&server)
        .await;

    let remote = RemoteConfig::load_with_key(&format!("{}/config/current", server.uri()), &key)
        .await
        .unwrap();

    let current = remote.get();
    // the test binary has no section of its own, so commonAll wins
    assert_eq!(current["region"], "us-east-1");
    assert_eq!(current["poll_secs"], 60);
    assert!(remote.source().starts_with("remote:"));
}

#[tokio::test]
async fn remote_config_rejects_garbage_payload() {
    let server = MockServer::start().await;

    let mut key = vec![0u8; 32];
    OsRng.fill_bytes(&mut key);

    Mock::given(method("GET"))
        .and(path("/config/current"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not base64 at all"))
        .mount(&server)
        .await;

    let err = RemoteConfig::load_with_key(&format!("{}/config/current", server.uri()), &key)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}
