// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # probe-client
//!
//! Blocking, timeout-bounded probes of the local internet connection.
//!
//! # Probe Classes
//! - **Reachability**: raw TCP connect to a well-known `host:port`.
//! - **Latency**: one round trip through the OS `ping` utility.
//! - **Bandwidth**: a third-party speed-test executable, parsed from its
//!   text output after stripping ANSI escape sequences.
//! - **Wi-Fi band**: optional inspection of the active wireless link.
//!
//! # Value-Level Failure
//! Every concrete client exposes a fallible `try_*` method returning a
//! [`ProbeError`], but the probe traits collapse all failures to an
//! *absent* value (`false`, `None`, [`WifiBand::Error`]). Nothing past
//! this crate ever sees a probe error.
//!
//! # Example
//! ```no_run
//! use probe_client::{LatencyProbe, PingLatency, ReachabilityProbe, TcpReachability};
//! use std::time::Duration;
//!
//! let mut reach = TcpReachability::new("8.8.8.8", 53, Duration::from_secs(3));
//! let mut ping = PingLatency::new("8.8.8.8", Duration::from_secs(5));
//! if reach.probe() {
//!     println!("latency: {:?}", ping.probe());
//! }
//! ```

mod band;
mod bandwidth;
mod error;
mod latency;
pub(crate) mod process;
mod reachability;

pub use band::{band_from_channel, band_from_frequency, WifiBand, WifiBandProbe, DEFAULT_INTERFACE};
pub use bandwidth::{parse_speedtest_output, strip_ansi, BandwidthSample, SpeedTestBandwidth};
pub use error::ProbeError;
pub use latency::{parse_ping_output, PingLatency};
pub use reachability::TcpReachability;

/// Answers "is the internet reachable right now?".
///
/// Implementations must never panic or block past their own timeout;
/// every failure is reported as `false`.
pub trait ReachabilityProbe: Send {
    fn probe(&mut self) -> bool;
}

/// Measures one round-trip latency in milliseconds.
///
/// `None` means the probe produced no parsable timing, which is distinct
/// from a zero reading.
pub trait LatencyProbe: Send {
    fn probe(&mut self) -> Option<f64>;
}

/// Measures ping, download and upload in one long-running call.
pub trait BandwidthProbe: Send {
    fn probe(&mut self) -> Option<BandwidthSample>;
}

/// Reports which band the active Wi-Fi link is on.
pub trait BandProbe: Send {
    fn probe(&mut self) -> WifiBand;
}
