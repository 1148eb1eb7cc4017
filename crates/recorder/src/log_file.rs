// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The per-run log file.
//!
//! Each run gets its own file, named after the time the run started:
//!
//! ```text
//! connection_log_20250601_090000.txt
//! connection_log_20250601_090000_1.txt   (second run in the same second)
//! ```
//!
//! Files are opened with `create_new`, so an existing log is never
//! truncated. Every line is flushed as soon as it is written.

use crate::RecorderError;
use chrono::{DateTime, Local};
use monitor_core::{header, LogRecord};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name prefix of every log.
const FILE_PREFIX: &str = "connection_log";

/// Collision suffixes tried before giving up.
const MAX_SUFFIX: u32 = 100;

/// An open, append-only log file for one run.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: File,
    lines: u64,
}

impl LogFile {
    /// Creates a fresh log in `dir` for a run started at `started`, and
    /// writes the column header.
    pub fn create(dir: &Path, started: DateTime<Local>, with_band: bool) -> Result<Self, RecorderError> {
        std::fs::create_dir_all(dir).map_err(|e| RecorderError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let stem = format!("{FILE_PREFIX}_{}", started.format("%Y%m%d_%H%M%S"));
        let (path, mut file) = open_unique(dir, &stem)?;

        writeln!(file, "{}", header(with_band))
            .and_then(|()| file.flush())
            .map_err(|e| RecorderError::CreateFile {
                path: path.clone(),
                source: e,
            })?;

        tracing::info!("logging to {}", path.display());
        Ok(Self {
            path,
            file,
            lines: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended so far, excluding the header.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Appends one record line and flushes it.
    pub fn append(&mut self, record: &LogRecord) -> std::io::Result<()> {
        writeln!(self.file, "{record}")?;
        self.file.flush()?;
        self.lines += 1;
        Ok(())
    }
}

fn open_unique(dir: &Path, stem: &str) -> Result<(PathBuf, File), RecorderError> {
    for n in 0..MAX_SUFFIX {
        let name = if n == 0 {
            format!("{stem}.txt")
        } else {
            format!("{stem}_{n}.txt")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(RecorderError::CreateFile { path, source: e }),
        }
    }
    Err(RecorderError::NameExhausted {
        dir: dir.to_path_buf(),
        stem: stem.to_string(),
    })
}
