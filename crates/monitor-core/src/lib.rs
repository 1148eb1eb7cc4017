// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # monitor-core
//!
//! The adaptive sampling loop of the connectivity monitor.
//!
//! Each base tick the [`SampleScheduler`] decides which probes fire:
//! reachability always, latency on an adaptive cadence, bandwidth on a
//! fixed one. The [`EventAggregator`] then folds the tick's outcomes into
//! [`MonitorState`] and emits at most one [`LogRecord`].
//!
//! ```text
//!   Clock ──▶ SampleScheduler ──probes──▶ probe-client
//!                  │
//!                  ▼
//!            EventAggregator ──▶ LogRecord ──▶ RecordSink
//! ```
//!
//! # Determinism
//! Time and probes are injected. With a [`ManualClock`] and fake probes
//! the whole schedule can be driven tick by tick without sleeping.

pub mod aggregator;
pub mod cadence;
mod clock;
mod config;
mod error;
mod record;
mod runner;
mod scheduler;
mod sink;
mod state;
mod worker;

pub use aggregator::{EventAggregator, TickOutcome};
pub use cadence::{CadenceMode, LatencyCadence};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    BandConfig, BandwidthConfig, LatencyConfig, MonitorConfig, ReachabilityConfig,
    RecorderConfig, TickConfig,
};
pub use error::MonitorError;
pub use record::{header, LogRecord, FIELD_SEPARATOR, TIMESTAMP_FORMAT};
pub use runner::{Monitor, RunSummary};
pub use scheduler::{ProbeSet, SampleScheduler, ScheduleConfig, SchedulerState, Unseeded};
pub use sink::RecordSink;
pub use state::{ConnectivityState, MonitorState};
pub use worker::{BandwidthPoll, BandwidthWorker};
