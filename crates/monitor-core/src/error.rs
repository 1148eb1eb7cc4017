// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the monitor core.
//!
//! Probe failures never appear here: they are absent values by the time
//! they reach the scheduler.

/// Errors that can occur while configuring or running the monitor.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Configuration could not be read, parsed or validated.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The bandwidth worker thread could not be started.
    #[error("failed to start bandwidth worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}
