// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for probe clients.

use std::time::Duration;

/// Reasons a probe failed to produce a value.
///
/// These never cross the probe trait boundary; they exist so the concrete
/// clients can be tested and logged precisely.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The probe did not finish within its bounded duration.
    #[error("{probe} probe timed out after {after:?}")]
    Timeout { probe: &'static str, after: Duration },

    /// The probe ran but its output held no usable measurement.
    #[error("{probe} output could not be parsed: {detail}")]
    Unparsable { probe: &'static str, detail: String },

    /// The external program could not be started or exited unsuccessfully.
    #[error("{probe} process failed: {detail}")]
    ProcessFailure { probe: &'static str, detail: String },

    /// The TCP connection was refused or reset.
    #[error("connect to {target} failed: {detail}")]
    Connect { target: String, detail: String },

    /// The target host name did not resolve to any address.
    #[error("cannot resolve {target}: {detail}")]
    Resolve { target: String, detail: String },
}
