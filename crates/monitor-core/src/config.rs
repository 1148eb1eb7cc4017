// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Monitor configuration loaded from TOML files or constructed programmatically.
//!
//! Every section and field is optional; omitted values take the defaults
//! shown here.
//!
//! # TOML Format
//! ```toml
//! [reachability]
//! host = "8.8.8.8"
//! port = 53
//! timeout_secs = 3
//!
//! [latency]
//! host = "8.8.8.8"
//! program = "ping"
//! timeout_secs = 5
//! interval_secs = 30
//! high_latency_threshold_ms = 80.0
//!
//! [bandwidth]
//! program = "speedtest-net"
//! args = []
//! timeout_secs = 180
//! interval_secs = 600
//! offload = true
//!
//! [band]
//! enabled = false
//! interface = "wlan0"
//! timeout_secs = 3
//!
//! [schedule]
//! tick_secs = 1
//!
//! [recorder]
//! log_dir = "."
//! ```

use crate::{MonitorError, ProbeSet, ScheduleConfig};
use probe_client::{PingLatency, SpeedTestBandwidth, TcpReachability, WifiBandProbe};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration of a monitor run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub reachability: ReachabilityConfig,
    pub latency: LatencyConfig,
    pub bandwidth: BandwidthConfig,
    pub band: BandConfig,
    pub schedule: TickConfig,
    pub recorder: RecorderConfig,
}

/// TCP-connect reachability target.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReachabilityConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            host: "8.8.8.8".to_string(),
            port: 53,
            timeout_secs: 3,
        }
    }
}

/// Ping-based latency probe and its adaptive cadence.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub host: String,
    pub program: String,
    pub timeout_secs: u64,
    /// Probe interval while latency is healthy.
    pub interval_secs: u64,
    /// Latency above this degrades the cadence to every tick.
    pub high_latency_threshold_ms: f64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            host: "8.8.8.8".to_string(),
            program: "ping".to_string(),
            timeout_secs: 5,
            interval_secs: 30,
            high_latency_threshold_ms: 80.0,
        }
    }
}

/// Speed-test command and its fixed cadence.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BandwidthConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
    pub interval_secs: u64,
    /// Run the speed test on a worker thread instead of inside the tick.
    pub offload: bool,
}

impl Default for BandwidthConfig {
    fn default() -> Self {
        Self {
            program: "speedtest-net".to_string(),
            args: Vec::new(),
            timeout_secs: 180,
            interval_secs: 600,
            offload: true,
        }
    }
}

/// Optional Wi-Fi band annotation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub enabled: bool,
    pub interface: String,
    pub timeout_secs: u64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interface: probe_client::DEFAULT_INTERFACE.to_string(),
            timeout_secs: 3,
        }
    }
}

/// Base tick of the scheduler.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub tick_secs: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { tick_secs: 1 }
    }
}

/// Where the per-run log file is created.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub log_dir: PathBuf,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
        }
    }
}

impl MonitorConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, MonitorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, MonitorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| MonitorError::ConfigError(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, MonitorError> {
        toml::to_string_pretty(self)
            .map_err(|e| MonitorError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Rejects values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), MonitorError> {
        let fail = |msg: &str| Err(MonitorError::ConfigError(msg.to_string()));

        if self.reachability.host.trim().is_empty() {
            return fail("reachability.host must not be empty");
        }
        if self.latency.host.trim().is_empty() {
            return fail("latency.host must not be empty");
        }
        if self.bandwidth.program.trim().is_empty() {
            return fail("bandwidth.program must not be empty");
        }
        if self.schedule.tick_secs == 0 {
            return fail("schedule.tick_secs must be at least 1");
        }
        if self.latency.interval_secs < self.schedule.tick_secs {
            return fail("latency.interval_secs must be at least one tick");
        }
        if self.bandwidth.interval_secs < self.schedule.tick_secs {
            return fail("bandwidth.interval_secs must be at least one tick");
        }
        if !(self.latency.high_latency_threshold_ms.is_finite()
            && self.latency.high_latency_threshold_ms > 0.0)
        {
            return fail("latency.high_latency_threshold_ms must be a positive number");
        }
        if self.reachability.timeout_secs == 0
            || self.latency.timeout_secs == 0
            || self.bandwidth.timeout_secs == 0
        {
            return fail("probe timeouts must be at least 1 second");
        }
        Ok(())
    }

    /// Derives the scheduler timing from this config.
    pub fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            tick: Duration::from_secs(self.schedule.tick_secs),
            latency_interval: Duration::from_secs(self.latency.interval_secs),
            bandwidth_interval: Duration::from_secs(self.bandwidth.interval_secs),
            high_latency_threshold_ms: self.latency.high_latency_threshold_ms,
            offload_bandwidth: self.bandwidth.offload,
        }
    }

    /// Builds the concrete probe clients described by this config.
    pub fn build_probes(&self) -> ProbeSet {
        let band = self.band.enabled.then(|| {
            Box::new(WifiBandProbe::new(
                self.band.interface.clone(),
                Duration::from_secs(self.band.timeout_secs),
            )) as Box<dyn probe_client::BandProbe>
        });

        ProbeSet {
            reachability: Box::new(TcpReachability::new(
                self.reachability.host.clone(),
                self.reachability.port,
                Duration::from_secs(self.reachability.timeout_secs),
            )),
            latency: Box::new(
                PingLatency::new(
                    self.latency.host.clone(),
                    Duration::from_secs(self.latency.timeout_secs),
                )
                .with_program(self.latency.program.clone()),
            ),
            bandwidth: Box::new(SpeedTestBandwidth::new(
                self.bandwidth.program.clone(),
                self.bandwidth.args.clone(),
                Duration::from_secs(self.bandwidth.timeout_secs),
            )),
            band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = MonitorConfig::default();
        assert_eq!(c.reachability.host, "8.8.8.8");
        assert_eq!(c.reachability.port, 53);
        assert_eq!(c.latency.interval_secs, 30);
        assert_eq!(c.latency.high_latency_threshold_ms, 80.0);
        assert_eq!(c.bandwidth.interval_secs, 600);
        assert!(c.bandwidth.offload);
        assert!(!c.band.enabled);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_schedule_from_defaults() {
        let s = MonitorConfig::default().schedule();
        assert_eq!(s, ScheduleConfig::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let toml = r#"
[reachability]
host = "1.1.1.1"

[latency]
interval_secs = 10
high_latency_threshold_ms = 150.0

[bandwidth]
program = "speedtest"
args = ["--format=human-readable"]
offload = false

[recorder]
log_dir = "/var/log/netwatch"
"#;
        let c = MonitorConfig::from_toml(toml).unwrap();
        assert_eq!(c.reachability.host, "1.1.1.1");
        assert_eq!(c.reachability.port, 53);
        assert_eq!(c.latency.interval_secs, 10);
        assert_eq!(c.latency.host, "8.8.8.8");
        assert_eq!(c.bandwidth.args, vec!["--format=human-readable".to_string()]);
        assert!(!c.schedule().offload_bandwidth);
        assert_eq!(c.recorder.log_dir, PathBuf::from("/var/log/netwatch"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(MonitorConfig::from_toml("").unwrap(), MonitorConfig::default());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut c = MonitorConfig::default();
        c.band.enabled = true;
        let toml = c.to_toml().unwrap();
        let back = MonitorConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_rejects_zero_tick() {
        let err = MonitorConfig::from_toml("[schedule]\ntick_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("tick_secs"));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let mut c = MonitorConfig::default();
        c.latency.high_latency_threshold_ms = -1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_interval_shorter_than_tick() {
        let mut c = MonitorConfig::default();
        c.schedule.tick_secs = 5;
        c.latency.interval_secs = 2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = MonitorConfig::from_toml("[reachability\nhost = ").unwrap_err();
        assert!(matches!(err, MonitorError::ConfigError(_)));
    }

    #[test]
    fn test_build_probes_band_toggle() {
        let mut c = MonitorConfig::default();
        assert!(c.build_probes().band.is_none());
        c.band.enabled = true;
        assert!(c.build_probes().band.is_some());
    }
}
