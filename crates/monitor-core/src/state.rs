// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Connectivity state and the scheduler's long-lived memory.

use std::fmt;
use std::time::Duration;

/// Result of the most recent reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConnectivityState {
    Connected,
    Disconnected,
}

impl ConnectivityState {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl From<bool> for ConnectivityState {
    fn from(reachable: bool) -> Self {
        if reachable {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => f.write_str("Connected"),
            Self::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// Everything the scheduler remembers between ticks.
///
/// Created once by the seed probe and owned by the running scheduler for
/// the rest of the process. Probe times are offsets on the scheduler's
/// monotonic clock.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorState {
    /// Connectivity as of the last emitted record.
    pub last_connectivity: ConnectivityState,
    /// Most recent latency sample that actually carried a value.
    pub last_latency: Option<f64>,
    /// When the latency cadence last fired.
    pub last_latency_probe_time: Duration,
    /// When the bandwidth cadence last fired.
    pub last_bandwidth_probe_time: Duration,
}

impl MonitorState {
    /// Builds the state left behind by the seed probe at time `at`.
    pub fn seeded(connectivity: ConnectivityState, latency: Option<f64>, at: Duration) -> Self {
        Self {
            last_connectivity: connectivity,
            last_latency: latency,
            last_latency_probe_time: at,
            last_bandwidth_probe_time: at,
        }
    }

    /// Records that the latency cadence fired at `at`. Never moves backwards.
    pub fn mark_latency_probe(&mut self, at: Duration) {
        self.last_latency_probe_time = self.last_latency_probe_time.max(at);
    }

    /// Records that the bandwidth cadence fired at `at`. Never moves backwards.
    pub fn mark_bandwidth_probe(&mut self, at: Duration) {
        self.last_bandwidth_probe_time = self.last_bandwidth_probe_time.max(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(ConnectivityState::from(true), ConnectivityState::Connected);
        assert_eq!(ConnectivityState::from(false), ConnectivityState::Disconnected);
        assert!(ConnectivityState::Connected.is_connected());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectivityState::Connected.to_string(), "Connected");
        assert_eq!(ConnectivityState::Disconnected.to_string(), "Disconnected");
    }

    #[test]
    fn test_probe_times_never_decrease() {
        let mut state = MonitorState::seeded(
            ConnectivityState::Connected,
            None,
            Duration::from_secs(100),
        );
        state.mark_latency_probe(Duration::from_secs(50));
        state.mark_bandwidth_probe(Duration::from_secs(20));
        assert_eq!(state.last_latency_probe_time, Duration::from_secs(100));
        assert_eq!(state.last_bandwidth_probe_time, Duration::from_secs(100));

        state.mark_latency_probe(Duration::from_secs(130));
        assert_eq!(state.last_latency_probe_time, Duration::from_secs(130));
        assert_eq!(state.last_bandwidth_probe_time, Duration::from_secs(100));
    }
}
