// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Merges one tick's probe outcomes into at most one [`LogRecord`].
//!
//! A record is emitted iff connectivity flipped, or a latency sample is
//! present, or a bandwidth sample is present. Quiet ticks leave the state
//! untouched so the log only grows when something was observed.

use crate::{ConnectivityState, LogRecord, MonitorState};
use chrono::{DateTime, Local};
use probe_client::{BandwidthSample, WifiBand};

/// What the probes produced on a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub connectivity: ConnectivityState,
    pub latency: Option<f64>,
    pub bandwidth: Option<BandwidthSample>,
}

/// Decides emission and keeps [`MonitorState`] in step with the log.
#[derive(Debug, Clone)]
pub struct EventAggregator {
    high_latency_threshold_ms: f64,
}

impl EventAggregator {
    pub fn new(high_latency_threshold_ms: f64) -> Self {
        Self {
            high_latency_threshold_ms,
        }
    }

    /// Returns `true` if `outcome` is log-worthy given `state`.
    pub fn should_emit(&self, state: &MonitorState, outcome: &TickOutcome) -> bool {
        outcome.connectivity != state.last_connectivity
            || outcome.latency.is_some()
            || outcome.bandwidth.is_some()
    }

    /// Merges `outcome` into `state` and returns the record to emit, if any.
    ///
    /// `band` is only consulted when a record is actually emitted.
    pub fn merge(
        &self,
        state: &mut MonitorState,
        outcome: TickOutcome,
        timestamp: DateTime<Local>,
        band: impl FnOnce() -> Option<WifiBand>,
    ) -> Option<LogRecord> {
        if !self.should_emit(state, &outcome) {
            return None;
        }

        if outcome.connectivity != state.last_connectivity {
            tracing::info!(
                "connectivity changed: {} -> {}",
                state.last_connectivity,
                outcome.connectivity
            );
        }
        state.last_connectivity = outcome.connectivity;
        if let Some(ms) = outcome.latency {
            state.last_latency = Some(ms);
        }

        Some(self.record(outcome, timestamp, band()))
    }

    /// Builds the record for `outcome` without consulting any prior state.
    pub fn record(
        &self,
        outcome: TickOutcome,
        timestamp: DateTime<Local>,
        band: Option<WifiBand>,
    ) -> LogRecord {
        let high_latency = outcome
            .latency
            .is_some_and(|ms| ms > self.high_latency_threshold_ms);
        if high_latency {
            tracing::warn!(
                "high latency: {} ms exceeds {} ms",
                outcome.latency.unwrap_or_default(),
                self.high_latency_threshold_ms
            );
        }

        LogRecord {
            timestamp,
            connectivity: outcome.connectivity,
            latency: outcome.latency,
            bandwidth: outcome.bandwidth,
            band,
            high_latency,
        }
    }
}
