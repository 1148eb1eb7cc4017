// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Destination for emitted records.

use crate::LogRecord;

/// Receives each emitted [`LogRecord`] exactly once.
pub trait RecordSink: Send {
    fn record(&mut self, record: &LogRecord) -> std::io::Result<()>;
}

/// Collects records in memory.
impl RecordSink for Vec<LogRecord> {
    fn record(&mut self, record: &LogRecord) -> std::io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl<T: RecordSink + ?Sized> RecordSink for Box<T> {
    fn record(&mut self, record: &LogRecord) -> std::io::Result<()> {
        (**self).record(record)
    }
}
