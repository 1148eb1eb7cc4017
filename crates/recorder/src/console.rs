// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Live console stream.

use monitor_core::LogRecord;
use std::io::Write;

/// Mirrors each record line to a writer (stdout by default), followed by
/// a notice line when the record carries a high-latency sample.
#[derive(Debug)]
pub struct Console<W: Write + Send> {
    out: W,
}

impl Console<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print(&mut self, record: &LogRecord) -> std::io::Result<()> {
        writeln!(self.out, "{record}")?;
        if let Some(notice) = record.high_latency_notice() {
            writeln!(self.out, "{notice}")?;
        }
        self.out.flush()
    }
}
