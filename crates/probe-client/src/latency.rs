// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Round-trip latency via the OS `ping` utility.
//!
//! Every mainstream `ping` prints a per-reply line carrying a
//! `time=<n> ms` (Linux, macOS) or `time=<n>ms` (Windows) token. The last
//! such token in the output is taken as the sample.

use crate::process::run_with_timeout;
use crate::{LatencyProbe, ProbeError};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Extra time granted to the child beyond ping's own reply timeout, so the
/// utility gets to report before it is killed.
const PROCESS_SLACK: Duration = Duration::from_secs(1);

fn time_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"time=\s*([0-9]+(?:\.[0-9]+)?)\s*ms").expect("valid regex"))
}

/// Extracts the round-trip time in milliseconds from raw `ping` output.
///
/// Returns `None` when no `time=` token is present or it does not parse.
pub fn parse_ping_output(output: &str) -> Option<f64> {
    time_token()
        .captures_iter(output)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Latency client that shells out to `ping` for a single echo request.
#[derive(Debug, Clone)]
pub struct PingLatency {
    program: String,
    host: String,
    timeout: Duration,
}

impl PingLatency {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: "ping".to_string(),
            host: host.into(),
            timeout,
        }
    }

    /// Overrides the ping executable (e.g. an absolute path).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Builds the platform-specific arguments for a single echo request.
    fn args(&self) -> Vec<String> {
        if cfg!(windows) {
            vec![
                "-n".into(),
                "1".into(),
                "-w".into(),
                self.timeout.as_millis().max(1).to_string(),
                self.host.clone(),
            ]
        } else if cfg!(target_os = "macos") {
            vec![
                "-c".into(),
                "1".into(),
                "-t".into(),
                whole_seconds(self.timeout).to_string(),
                self.host.clone(),
            ]
        } else {
            vec![
                "-c".into(),
                "1".into(),
                "-W".into(),
                whole_seconds(self.timeout).to_string(),
                self.host.clone(),
            ]
        }
    }

    /// Runs one ping and returns the parsed latency in milliseconds.
    pub fn try_measure(&self) -> Result<f64, ProbeError> {
        let out = run_with_timeout(
            "latency",
            &self.program,
            &self.args(),
            self.timeout + PROCESS_SLACK,
        )?;

        match parse_ping_output(&out.stdout) {
            Some(ms) => Ok(ms),
            None if !out.success => Err(ProbeError::ProcessFailure {
                probe: "latency",
                detail: format!("{} reported no reply from {}", self.program, self.host),
            }),
            None => Err(ProbeError::Unparsable {
                probe: "latency",
                detail: "no time= token in ping output".to_string(),
            }),
        }
    }
}

/// Rounds a timeout up to whole seconds, at least one.
fn whole_seconds(d: Duration) -> u64 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    secs.max(1)
}

impl LatencyProbe for PingLatency {
    fn probe(&mut self) -> Option<f64> {
        match self.try_measure() {
            Ok(ms) => Some(ms),
            Err(e) => {
                tracing::debug!("latency sample absent: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_token() {
        assert_eq!(parse_ping_output("Reply from 8.8.8.8: bytes=32 time=23.4ms TTL=117"), Some(23.4));
    }

    #[test]
    fn test_parse_linux_output() {
        let out = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.\n\
                   64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=14.2 ms\n\
                   \n\
                   --- 8.8.8.8 ping statistics ---\n\
                   1 packets transmitted, 1 received, 0% packet loss, time 0ms\n\
                   rtt min/avg/max/mdev = 14.2/14.2/14.2/0.000 ms\n";
        assert_eq!(parse_ping_output(out), Some(14.2));
    }

    #[test]
    fn test_parse_integer_token() {
        assert_eq!(parse_ping_output("time=7ms"), Some(7.0));
    }

    #[test]
    fn test_last_token_wins() {
        assert_eq!(parse_ping_output("time=10.0ms\ntime=30.5ms"), Some(30.5));
    }

    #[test]
    fn test_parse_missing_token() {
        assert_eq!(parse_ping_output("Request timed out."), None);
        assert_eq!(parse_ping_output(""), None);
    }

    #[test]
    fn test_sub_millisecond_reply_is_absent() {
        // Windows prints `time<1ms` for very fast replies; there is no
        // `time=` field to read.
        assert_eq!(parse_ping_output("Reply from 127.0.0.1: bytes=32 time<1ms TTL=128"), None);
    }

    #[test]
    fn test_whole_seconds() {
        assert_eq!(whole_seconds(Duration::from_millis(0)), 1);
        assert_eq!(whole_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(whole_seconds(Duration::from_secs(3)), 3);
    }

    #[test]
    fn test_missing_program_is_absent() {
        let mut probe = PingLatency::new("127.0.0.1", Duration::from_millis(200))
            .with_program("/nonexistent/ping");
        assert!(matches!(probe.try_measure(), Err(ProbeError::ProcessFailure { .. })));
        assert_eq!(probe.probe(), None);
    }
}
