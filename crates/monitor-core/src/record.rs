// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The log record and its text line format.
//!
//! ```text
//! 2025-03-01 12:00:00 - Connected - Latency: 23.4 ms - Speed: N/A
//! 2025-03-01 12:10:00 - Connected - Latency: N/A - Ping: 12.3 ms, Download: 45.6 Mbps, Upload: 7.8 Mbps - Band: 5 GHz
//! ```

use crate::ConnectivityState;
use chrono::{DateTime, Local};
use probe_client::{BandwidthSample, WifiBand};
use std::fmt;

/// Separator between fields of a record line.
pub const FIELD_SEPARATOR: &str = " - ";

/// `strftime` pattern for the timestamp field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the column header line for a log file.
pub fn header(with_band: bool) -> String {
    let mut cols = vec!["Timestamp", "Status", "Latency", "Speed"];
    if with_band {
        cols.push("Band");
    }
    cols.join(FIELD_SEPARATOR)
}

/// One emission of the monitor.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub connectivity: ConnectivityState,
    /// Latency measured on this tick, if any.
    pub latency: Option<f64>,
    /// Bandwidth measured (or completed) on this tick, if any.
    pub bandwidth: Option<BandwidthSample>,
    /// Wi-Fi band at emission time, when a band probe is wired.
    pub band: Option<WifiBand>,
    /// Set when `latency` exceeded the high-latency threshold.
    pub high_latency: bool,
}

impl LogRecord {
    pub fn latency_field(&self) -> String {
        match self.latency {
            Some(ms) => format!("Latency: {ms:?} ms"),
            None => "Latency: N/A".to_string(),
        }
    }

    pub fn bandwidth_field(&self) -> String {
        match &self.bandwidth {
            Some(sample) => sample.to_string(),
            None => "Speed: N/A".to_string(),
        }
    }

    /// The console notice accompanying a high-latency sample.
    pub fn high_latency_notice(&self) -> Option<String> {
        match self.latency {
            Some(ms) if self.high_latency => Some(format!("High latency detected: {ms:?} ms")),
            _ => None,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.connectivity,
            self.latency_field(),
            self.bandwidth_field(),
            sep = FIELD_SEPARATOR,
        )?;
        if let Some(band) = self.band {
            write!(f, "{FIELD_SEPARATOR}Band: {band}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> LogRecord {
        LogRecord {
            timestamp: Local.with_ymd_and_hms(2025, 3, 1, 12, 0, 5).unwrap(),
            connectivity: ConnectivityState::Connected,
            latency: None,
            bandwidth: None,
            band: None,
            high_latency: false,
        }
    }

    #[test]
    fn test_all_absent() {
        assert_eq!(
            record().to_string(),
            "2025-03-01 12:00:05 - Connected - Latency: N/A - Speed: N/A"
        );
    }

    #[test]
    fn test_full_line_with_band() {
        let r = LogRecord {
            latency: Some(23.4),
            bandwidth: Some(BandwidthSample {
                ping_ms: 12.3,
                download_mbps: 45.6,
                upload_mbps: 7.8,
            }),
            band: Some(WifiBand::FiveGhz),
            ..record()
        };
        assert_eq!(
            r.to_string(),
            "2025-03-01 12:00:05 - Connected - Latency: 23.4 ms - \
             Ping: 12.3 ms, Download: 45.6 Mbps, Upload: 7.8 Mbps - Band: 5 GHz"
        );
    }

    #[test]
    fn test_whole_millisecond_latency_keeps_decimal_point() {
        let r = LogRecord {
            latency: Some(20.0),
            high_latency: true,
            ..record()
        };
        assert_eq!(r.latency_field(), "Latency: 20.0 ms");
        assert_eq!(r.high_latency_notice().as_deref(), Some("High latency detected: 20.0 ms"));
    }

    #[test]
    fn test_disconnected() {
        let r = LogRecord {
            connectivity: ConnectivityState::Disconnected,
            ..record()
        };
        assert!(r.to_string().contains(" - Disconnected - "));
    }

    #[test]
    fn test_header() {
        assert_eq!(header(false), "Timestamp - Status - Latency - Speed");
        assert_eq!(header(true), "Timestamp - Status - Latency - Speed - Band");
    }

    #[test]
    fn test_high_latency_notice() {
        assert_eq!(record().high_latency_notice(), None);
        let r = LogRecord {
            latency: Some(150.5),
            high_latency: true,
            ..record()
        };
        assert_eq!(r.high_latency_notice().as_deref(), Some("High latency detected: 150.5 ms"));
    }
}
