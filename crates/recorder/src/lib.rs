// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # recorder
//!
//! Persists [`LogRecord`]s emitted by the monitor.
//!
//! - [`LogFile`]: one fresh, timestamp-named text file per run, header
//!   first, one flushed line per record.
//! - [`Console`]: the same line on stdout, plus a notice for high latency.
//!
//! [`Recorder`] combines both and implements
//! [`monitor_core::RecordSink`].

mod console;
mod error;
mod log_file;

pub use console::Console;
pub use error::RecorderError;
pub use log_file::LogFile;

use monitor_core::{LogRecord, RecordSink};
use std::io::Write;

/// File plus console output.
#[derive(Debug)]
pub struct Recorder<W: Write + Send = std::io::Stdout> {
    file: Option<LogFile>,
    console: Option<Console<W>>,
}

impl<W: Write + Send> Recorder<W> {
    pub fn new(file: Option<LogFile>, console: Option<Console<W>>) -> Self {
        Self { file, console }
    }

    pub fn log_file(&self) -> Option<&LogFile> {
        self.file.as_ref()
    }

    pub fn console(&self) -> Option<&Console<W>> {
        self.console.as_ref()
    }

    pub fn into_parts(self) -> (Option<LogFile>, Option<Console<W>>) {
        (self.file, self.console)
    }
}

impl<W: Write + Send> RecordSink for Recorder<W> {
    /// Writes the file first so a broken console never costs a log line.
    /// The first error is returned after both outputs were attempted.
    fn record(&mut self, record: &LogRecord) -> std::io::Result<()> {
        let file_result = match self.file.as_mut() {
            Some(file) => file.append(record),
            None => Ok(()),
        };
        let console_result = match self.console.as_mut() {
            Some(console) => console.print(record),
            None => Ok(()),
        };
        file_result.and(console_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use monitor_core::ConnectivityState;
    use probe_client::{BandwidthSample, WifiBand};

    fn record(latency: Option<f64>, high_latency: bool) -> LogRecord {
        LogRecord {
            timestamp: Local.with_ymd_and_hms(2025, 6, 1, 9, 10, 0).unwrap(),
            connectivity: ConnectivityState::Connected,
            latency,
            bandwidth: None,
            band: None,
            high_latency,
        }
    }

    #[test]
    fn test_console_prints_line() {
        let mut console = Console::new(Vec::new());
        console.print(&record(Some(12.0), false)).unwrap();
        let out = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(out, "2025-06-01 09:10:00 - Connected - Latency: 12.0 ms - Speed: N/A\n");
    }

    #[test]
    fn test_console_high_latency_notice() {
        let mut console = Console::new(Vec::new());
        console.print(&record(Some(140.2), true)).unwrap();
        let out = String::from_utf8(console.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "High latency detected: 140.2 ms");
    }

    #[test]
    fn test_recorder_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let started = Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let file = LogFile::create(dir.path(), started, true).unwrap();
        let mut recorder = Recorder::new(Some(file), Some(Console::new(Vec::new())));

        let r = LogRecord {
            bandwidth: Some(BandwidthSample {
                ping_ms: 12.3,
                download_mbps: 45.6,
                upload_mbps: 7.8,
            }),
            band: Some(WifiBand::TwoPointFourGhz),
            ..record(None, false)
        };
        recorder.record(&r).unwrap();

        let expected = "2025-06-01 09:10:00 - Connected - Latency: N/A - \
                        Ping: 12.3 ms, Download: 45.6 Mbps, Upload: 7.8 Mbps - Band: 2.4 GHz";
        let (file, console) = recorder.into_parts();
        let file = file.unwrap();
        assert_eq!(file.lines(), 1);
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.lines().nth(1), Some(expected));
        let out = String::from_utf8(console.unwrap().into_inner()).unwrap();
        assert_eq!(out.trim_end(), expected);
    }

    #[test]
    fn test_recorder_without_outputs() {
        let mut recorder: Recorder<Vec<u8>> = Recorder::new(None, None);
        assert!(recorder.record(&record(None, false)).is_ok());
        assert!(recorder.log_file().is_none());
        assert!(recorder.console().is_none());
    }
}
