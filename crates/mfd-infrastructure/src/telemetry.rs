//! System telemetry snapshots
//!
//! Point-in-time host metrics attached to diagnostic output: CPU usage,
//! memory, load averages, and uptime.

use serde::{Deserialize, Serialize};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

/// A point-in-time snapshot of host metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// Global CPU usage percentage
    pub cpu_usage: f32,
    /// Used memory in kibibytes
    pub mem_used_kb: u64,
    /// 1/5/15-minute load averages
    pub load_avg: [f64; 3],
    /// Host uptime in seconds
    pub uptime_secs: u64,
}

/// Reusable probe that refreshes and samples host metrics.
///
/// CPU usage needs two refreshes with time in between; keeping one probe
/// alive across snapshots gives meaningful values from the second snapshot
/// onwards.
pub struct SystemProbe {
    sys: System,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    /// Create a probe refreshing only CPU and memory state
    pub fn new() -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        sys.refresh_cpu_all();
        sys.refresh_memory();
        Self { sys }
    }

    /// Refresh and capture a snapshot
    pub fn snapshot(&mut self) -> SystemSnapshot {
        self.sys.refresh_cpu_all();
        self.sys.refresh_memory();

        let load = System::load_average();

        SystemSnapshot {
            cpu_usage: self.sys.global_cpu_usage(),
            mem_used_kb: self.sys.used_memory() / 1024,
            load_avg: [load.one, load.five, load.fifteen],
            uptime_secs: System::uptime(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_plausible_values() {
        let mut probe = SystemProbe::new();
        let snap = probe.snapshot();
        assert!(snap.cpu_usage >= 0.0);
        assert!(snap.load_avg[0] >= 0.0);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snap = SystemSnapshot {
            cpu_usage: 12.5,
            mem_used_kb: 2048,
            load_avg: [0.5, 0.4, 0.3],
            uptime_secs: 3600,
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["mem_used_kb"], 2048);
        assert_eq!(json["load_avg"][2], 0.3);
    }
}
