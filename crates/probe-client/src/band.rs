// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Wi-Fi band inspection.
//!
//! - Linux: `iw dev <iface> link` reports `freq: <MHz>`.
//! - Windows: `netsh wlan show interfaces` reports `Channel : <n>`.
//!
//! A wired or disconnected host reports [`WifiBand::Unknown`]; a tool that
//! cannot be run reports [`WifiBand::Error`].

use crate::process::run_with_timeout;
use crate::{BandProbe, ProbeError};
use std::fmt;
use std::time::Duration;

/// Default wireless interface inspected on Linux.
pub const DEFAULT_INTERFACE: &str = "wlan0";

/// Band of the active Wi-Fi link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WifiBand {
    TwoPointFourGhz,
    FiveGhz,
    Unknown,
    Error,
}

impl fmt::Display for WifiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TwoPointFourGhz => "2.4 GHz",
            Self::FiveGhz => "5 GHz",
            Self::Unknown => "Unknown",
            Self::Error => "Error",
        };
        f.write_str(s)
    }
}

/// Classifies a centre frequency in MHz.
pub fn band_from_frequency(mhz: f64) -> WifiBand {
    if (2400.0..=2500.0).contains(&mhz) {
        WifiBand::TwoPointFourGhz
    } else if (4900.0..=5900.0).contains(&mhz) {
        WifiBand::FiveGhz
    } else {
        WifiBand::Unknown
    }
}

/// Classifies an 802.11 channel number.
pub fn band_from_channel(channel: u32) -> WifiBand {
    match channel {
        1..=14 => WifiBand::TwoPointFourGhz,
        32..=196 => WifiBand::FiveGhz,
        _ => WifiBand::Unknown,
    }
}

/// Reads the band from `iw dev <iface> link` output.
fn parse_iw_link(output: &str) -> WifiBand {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("freq:"))
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .map(band_from_frequency)
        .next()
        .unwrap_or(WifiBand::Unknown)
}

/// Reads the band from `netsh wlan show interfaces` output.
fn parse_netsh(output: &str) -> WifiBand {
    output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(key, _)| key.trim().eq_ignore_ascii_case("channel"))
        .filter_map(|(_, v)| v.trim().parse::<u32>().ok())
        .map(band_from_channel)
        .next()
        .unwrap_or(WifiBand::Unknown)
}

/// Band client backed by the platform's wireless tooling.
#[derive(Debug, Clone)]
pub struct WifiBandProbe {
    interface: String,
    timeout: Duration,
}

impl WifiBandProbe {
    pub fn new(interface: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interface: interface.into(),
            timeout,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn try_read(&self) -> Result<WifiBand, ProbeError> {
        if cfg!(windows) {
            let args = ["wlan", "show", "interfaces"].map(String::from);
            let out = run_with_timeout("band", "netsh", &args, self.timeout)?;
            Ok(parse_netsh(&out.stdout))
        } else {
            let args = vec!["dev".to_string(), self.interface.clone(), "link".to_string()];
            let out = run_with_timeout("band", "iw", &args, self.timeout)?;
            if !out.success {
                return Err(ProbeError::ProcessFailure {
                    probe: "band",
                    detail: format!("iw could not inspect '{}'", self.interface),
                });
            }
            Ok(parse_iw_link(&out.stdout))
        }
    }
}

impl BandProbe for WifiBandProbe {
    fn probe(&mut self) -> WifiBand {
        self.try_read().unwrap_or_else(|e| {
            tracing::debug!("band lookup failed: {e}");
            WifiBand::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_from_frequency() {
        assert_eq!(band_from_frequency(2412.0), WifiBand::TwoPointFourGhz);
        assert_eq!(band_from_frequency(5180.0), WifiBand::FiveGhz);
        assert_eq!(band_from_frequency(5955.0), WifiBand::Unknown);
        assert_eq!(band_from_frequency(0.0), WifiBand::Unknown);
    }

    #[test]
    fn test_band_from_channel() {
        assert_eq!(band_from_channel(6), WifiBand::TwoPointFourGhz);
        assert_eq!(band_from_channel(36), WifiBand::FiveGhz);
        assert_eq!(band_from_channel(149), WifiBand::FiveGhz);
        assert_eq!(band_from_channel(0), WifiBand::Unknown);
    }

    #[test]
    fn test_parse_iw_link() {
        let out = "Connected to aa:bb:cc:dd:ee:ff (on wlan0)\n\
                   \tSSID: home\n\
                   \tfreq: 5180.0\n\
                   \tsignal: -52 dBm\n";
        assert_eq!(parse_iw_link(out), WifiBand::FiveGhz);
        assert_eq!(parse_iw_link("\tfreq: 2437\n"), WifiBand::TwoPointFourGhz);
        assert_eq!(parse_iw_link("Not connected."), WifiBand::Unknown);
    }

    #[test]
    fn test_parse_netsh() {
        let out = "    Name                   : Wi-Fi\r\n\
                   \x20   Radio type             : 802.11ac\r\n\
                   \x20   Channel                : 44\r\n";
        assert_eq!(parse_netsh(out), WifiBand::FiveGhz);
        assert_eq!(parse_netsh("    Channel : 11\r\n"), WifiBand::TwoPointFourGhz);
        assert_eq!(parse_netsh("There is no wireless interface on the system."), WifiBand::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(WifiBand::TwoPointFourGhz.to_string(), "2.4 GHz");
        assert_eq!(WifiBand::FiveGhz.to_string(), "5 GHz");
        assert_eq!(WifiBand::Unknown.to_string(), "Unknown");
        assert_eq!(WifiBand::Error.to_string(), "Error");
    }
}
