// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bandwidth via an external speed-test executable.
//!
//! The tool (by default `speedtest-net`) renders a live progress display
//! and finishes with a summary row of the form
//!
//! ```text
//! 12.3 ms   45.6 Mbps   7.8 Mbps
//! ```
//!
//! Its stdout is full of ANSI cursor and colour sequences, so they are
//! stripped before matching. The last matching row is the final result.

use crate::process::run_with_timeout;
use crate::{BandwidthProbe, ProbeError};
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

fn ansi_escape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B[@-_][0-?]*[ -/]*[@-~]").expect("valid regex"))
}

fn summary_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([\d.]+)\s*ms\s+([\d.]+)\s*Mbps\s+([\d.]+)\s*Mbps").expect("valid regex")
    })
}

/// One completed bandwidth measurement.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BandwidthSample {
    /// Ping to the speed-test server in milliseconds.
    pub ping_ms: f64,
    /// Download throughput in megabits per second.
    pub download_mbps: f64,
    /// Upload throughput in megabits per second.
    pub upload_mbps: f64,
}

impl fmt::Display for BandwidthSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ping: {:?} ms, Download: {:?} Mbps, Upload: {:?} Mbps",
            self.ping_ms, self.download_mbps, self.upload_mbps
        )
    }
}

/// Removes ANSI escape sequences (CSI and two-byte escapes) from `s`.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    ansi_escape().replace_all(s, "")
}

/// Extracts the ping/download/upload triple from raw speed-test output.
pub fn parse_speedtest_output(output: &str) -> Option<BandwidthSample> {
    let clean = strip_ansi(output);
    let caps = summary_row().captures_iter(&clean).last()?;
    let field = |i: usize| caps.get(i)?.as_str().parse::<f64>().ok();
    Some(BandwidthSample {
        ping_ms: field(1)?,
        download_mbps: field(2)?,
        upload_mbps: field(3)?,
    })
}

/// Bandwidth client that runs a speed-test command to completion.
#[derive(Debug, Clone)]
pub struct SpeedTestBandwidth {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SpeedTestBandwidth {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Returns the command line as it would be typed.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the tool once and parses its summary row.
    pub fn try_measure(&self) -> Result<BandwidthSample, ProbeError> {
        let out = run_with_timeout("bandwidth", &self.program, &self.args, self.timeout)?;
        match parse_speedtest_output(&out.stdout) {
            Some(sample) => Ok(sample),
            None if !out.success => Err(ProbeError::ProcessFailure {
                probe: "bandwidth",
                detail: format!("'{}' exited unsuccessfully", self.command_line()),
            }),
            None => Err(ProbeError::Unparsable {
                probe: "bandwidth",
                detail: "no ping/download/upload row found".to_string(),
            }),
        }
    }
}

impl BandwidthProbe for SpeedTestBandwidth {
    fn probe(&mut self) -> Option<BandwidthSample> {
        match self.try_measure() {
            Ok(sample) => Some(sample),
            Err(e @ ProbeError::Unparsable { .. }) => {
                tracing::warn!("{e}; check the speed-test output manually");
                None
            }
            Err(e) => {
                tracing::warn!("speed test failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_ansi_codes() {
        let raw = "\x1b[2K\x1b[1G\x1b[32m12.3\x1b[0m ms   \x1b[36m45.6\x1b[0m Mbps   \x1b[35m7.8\x1b[0m Mbps\n";
        let sample = parse_speedtest_output(raw).unwrap();
        assert_eq!(
            sample,
            BandwidthSample {
                ping_ms: 12.3,
                download_mbps: 45.6,
                upload_mbps: 7.8,
            }
        );
    }

    #[test]
    fn test_parse_plain_row() {
        let sample = parse_speedtest_output("12.3 ms   45.6 Mbps   7.8 Mbps").unwrap();
        assert_eq!(sample.ping_ms, 12.3);
        assert_eq!(sample.download_mbps, 45.6);
        assert_eq!(sample.upload_mbps, 7.8);
    }

    #[test]
    fn test_last_row_wins() {
        let raw = "20 ms 1.0 Mbps 0.5 Mbps\n\x1b[1A\x1b[2K18 ms 90.1 Mbps 11.2 Mbps\n";
        let sample = parse_speedtest_output(raw).unwrap();
        assert_eq!(sample.download_mbps, 90.1);
        assert_eq!(sample.upload_mbps, 11.2);
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(parse_speedtest_output(""), None);
        assert_eq!(parse_speedtest_output("Speed test failed: ECONNRESET"), None);
        assert_eq!(parse_speedtest_output("12.3 ms 45.6 Mbps"), None);
    }

    #[test]
    fn test_parse_rejects_bare_dots() {
        assert_eq!(parse_speedtest_output(". ms . Mbps . Mbps"), None);
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m plain"), "red plain");
        assert_eq!(strip_ansi("no escapes"), "no escapes");
    }

    #[test]
    fn test_display() {
        let s = BandwidthSample {
            ping_ms: 12.3,
            download_mbps: 45.6,
            upload_mbps: 7.8,
        };
        assert_eq!(s.to_string(), "Ping: 12.3 ms, Download: 45.6 Mbps, Upload: 7.8 Mbps");
    }

    #[test]
    fn test_display_keeps_decimal_point() {
        let s = BandwidthSample {
            ping_ms: 20.0,
            download_mbps: 100.0,
            upload_mbps: 9.5,
        };
        assert_eq!(s.to_string(), "Ping: 20.0 ms, Download: 100.0 Mbps, Upload: 9.5 Mbps");
    }

    #[cfg(unix)]
    #[test]
    fn test_measure_from_command() {
        let probe = SpeedTestBandwidth::new(
            "sh",
            vec![
                "-c".into(),
                r"printf '\033[32m9.5\033[0m ms  100.2 Mbps  20.4 Mbps\n'".into(),
            ],
            Duration::from_secs(5),
        );
        let sample = probe.try_measure().unwrap();
        assert_eq!(sample.ping_ms, 9.5);
        assert_eq!(sample.download_mbps, 100.2);
        assert_eq!(sample.upload_mbps, 20.4);
    }

    #[cfg(unix)]
    #[test]
    fn test_unparsable_command_output() {
        let mut probe = SpeedTestBandwidth::new(
            "sh",
            vec!["-c".into(), "echo garbage".into()],
            Duration::from_secs(5),
        );
        assert!(matches!(probe.try_measure(), Err(ProbeError::Unparsable { .. })));
        assert_eq!(probe.probe(), None);
    }

    #[test]
    fn test_command_line() {
        let probe = SpeedTestBandwidth::new("speedtest-net", vec!["--verbose".into()], Duration::from_secs(1));
        assert_eq!(probe.command_line(), "speedtest-net --verbose");
    }
}
