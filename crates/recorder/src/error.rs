// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for record persistence.

use std::path::PathBuf;

/// Errors that can occur while setting up the log file.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// The log directory could not be created.
    #[error("cannot create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The log file could not be created or its header written.
    #[error("cannot create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Every candidate file name for this run was already taken.
    #[error("no free log file name in {dir} for stem '{stem}'")]
    NameExhausted { dir: PathBuf, stem: String },
}
