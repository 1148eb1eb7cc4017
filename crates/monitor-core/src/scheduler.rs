// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The sample scheduler with a type-state enforced seed.
//!
//! ```text
//! SampleScheduler<Unseeded>
//!     │  .seed()      all probes, unconditionally, one record
//!     ▼
//! SampleScheduler<MonitorState>
//!     │  .tick()      once per base tick, zero or one record
//!     ▼
//!   Option<LogRecord>
//! ```
//!
//! `tick()` does not exist until the seed has run, so there is no code
//! path that observes an uninitialised [`MonitorState`].
//!
//! # Per-tick rules
//! 1. Reachability always runs.
//! 2. Latency runs when its adaptive cadence is due *and* the link is up.
//! 3. Bandwidth runs when its fixed cadence is due *and* the link is up.
//! 4. A due cadence resets its timestamp even if the probe was gated off
//!    or failed.
//! 5. A disconnected tick carries no samples, including an offloaded
//!    measurement that happens to finish on it.

use crate::cadence::{is_due_on_tick, CadenceMode, LatencyCadence};
use crate::{
    BandwidthPoll, BandwidthWorker, Clock, ConnectivityState, EventAggregator, LogRecord,
    MonitorError, MonitorState, TickOutcome,
};
use probe_client::{BandProbe, BandwidthProbe, BandwidthSample, LatencyProbe, ReachabilityProbe};
use std::time::Duration;

/// Timing parameters of the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    /// Base tick; also the latency interval while degraded.
    pub tick: Duration,
    /// Latency interval while healthy.
    pub latency_interval: Duration,
    /// Fixed bandwidth interval.
    pub bandwidth_interval: Duration,
    /// Latency above this many milliseconds degrades the cadence.
    pub high_latency_threshold_ms: f64,
    /// Run the bandwidth probe on its own thread.
    pub offload_bandwidth: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            latency_interval: Duration::from_secs(30),
            bandwidth_interval: Duration::from_secs(600),
            high_latency_threshold_ms: 80.0,
            offload_bandwidth: true,
        }
    }
}

/// The probe clients a scheduler drives.
pub struct ProbeSet {
    pub reachability: Box<dyn ReachabilityProbe>,
    pub latency: Box<dyn LatencyProbe>,
    pub bandwidth: Box<dyn BandwidthProbe>,
    /// Optional Wi-Fi band annotation.
    pub band: Option<Box<dyn BandProbe>>,
}

/// Where bandwidth measurements run.
enum BandwidthRunner {
    Inline(Box<dyn BandwidthProbe>),
    Offloaded(BandwidthWorker),
}

impl BandwidthRunner {
    /// Runs a measurement to completion, whichever way it is hosted.
    fn measure_blocking(&mut self) -> Option<BandwidthSample> {
        match self {
            Self::Inline(probe) => probe.probe(),
            Self::Offloaded(worker) => {
                if !worker.dispatch() {
                    return None;
                }
                match worker.wait() {
                    BandwidthPoll::Completed(sample) => sample,
                    BandwidthPoll::Idle | BandwidthPoll::InFlight => None,
                }
            }
        }
    }
}

// ── Type-state markers ─────────────────────────────────────────

/// The seed probe has not run yet.
#[derive(Debug)]
pub struct Unseeded;

/// Sealed trait for scheduler states.
pub trait SchedulerState: std::fmt::Debug {}
impl SchedulerState for Unseeded {}
impl SchedulerState for MonitorState {}

// ── Scheduler ──────────────────────────────────────────────────

/// Owns the probes, the cadences and the monitor state.
///
/// # Example
/// ```no_run
/// use monitor_core::{MonitorConfig, SampleScheduler, SystemClock};
///
/// # fn example() -> Result<(), monitor_core::MonitorError> {
/// let config = MonitorConfig::default();
/// let scheduler = SampleScheduler::new(
///     config.schedule(),
///     config.build_probes(),
///     Box::new(SystemClock::new()),
/// )?;
/// let (mut scheduler, seed) = scheduler.seed();
/// println!("{seed}");
/// if let Some(record) = scheduler.tick() {
///     println!("{record}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct SampleScheduler<S: SchedulerState = Unseeded> {
    schedule: ScheduleConfig,
    reachability: Box<dyn ReachabilityProbe>,
    latency: Box<dyn LatencyProbe>,
    bandwidth: BandwidthRunner,
    band: Option<Box<dyn BandProbe>>,
    clock: Box<dyn Clock>,
    cadence: LatencyCadence,
    aggregator: EventAggregator,
    state: S,
}

impl<S: SchedulerState> SampleScheduler<S> {
    pub fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    pub fn cadence_mode(&self) -> CadenceMode {
        self.cadence.mode()
    }

    /// Interval the latency probe currently has to respect.
    pub fn latency_interval(&self) -> Duration {
        self.cadence.interval()
    }

    pub fn has_band_probe(&self) -> bool {
        self.band.is_some()
    }
}

// ── Unseeded → Seeded ──────────────────────────────────────────

impl SampleScheduler<Unseeded> {
    /// Creates a scheduler. Spawns the bandwidth worker when offloading.
    pub fn new(
        schedule: ScheduleConfig,
        probes: ProbeSet,
        clock: Box<dyn Clock>,
    ) -> Result<Self, MonitorError> {
        let bandwidth = if schedule.offload_bandwidth {
            BandwidthRunner::Offloaded(BandwidthWorker::spawn(probes.bandwidth)?)
        } else {
            BandwidthRunner::Inline(probes.bandwidth)
        };
        let cadence = LatencyCadence::new(
            schedule.latency_interval,
            schedule.tick,
            schedule.high_latency_threshold_ms,
        );
        let aggregator = EventAggregator::new(schedule.high_latency_threshold_ms);

        tracing::info!(
            "scheduler created: tick {:?}, latency every {:?}, bandwidth every {:?} ({})",
            schedule.tick,
            schedule.latency_interval,
            schedule.bandwidth_interval,
            if schedule.offload_bandwidth { "offloaded" } else { "inline" },
        );

        Ok(Self {
            schedule,
            reachability: probes.reachability,
            latency: probes.latency,
            bandwidth,
            band: probes.band,
            clock,
            cadence,
            aggregator,
            state: Unseeded,
        })
    }

    /// Fires every probe once, regardless of cadence or connectivity, and
    /// returns the running scheduler with its seed record.
    ///
    /// Blocks for the full bandwidth measurement even when offloading, so
    /// the seed record is complete.
    pub fn seed(mut self) -> (SampleScheduler<MonitorState>, LogRecord) {
        let connectivity = ConnectivityState::from(self.reachability.probe());
        let latency = self.latency.probe();
        let bandwidth = self.bandwidth.measure_blocking();
        let band = self.band.as_mut().map(|p| p.probe());
        // Cadences start once the seed is over, however long it took.
        let now = self.clock.elapsed();

        self.cadence.observe(latency);
        let state = MonitorState::seeded(connectivity, latency, now);
        let record = self.aggregator.record(
            TickOutcome {
                connectivity,
                latency,
                bandwidth,
            },
            self.clock.wall(),
            band,
        );
        tracing::info!("seeded: {record}");

        let scheduler = SampleScheduler {
            schedule: self.schedule,
            reachability: self.reachability,
            latency: self.latency,
            bandwidth: self.bandwidth,
            band: self.band,
            clock: self.clock,
            cadence: self.cadence,
            aggregator: self.aggregator,
            state,
        };
        (scheduler, record)
    }
}

// ── Seeded: ticking ────────────────────────────────────────────

impl SampleScheduler<MonitorState> {
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Runs one base tick and returns the record to emit, if any.
    pub fn tick(&mut self) -> Option<LogRecord> {
        let now = self.clock.elapsed();
        let connectivity = ConnectivityState::from(self.reachability.probe());
        let connected = connectivity.is_connected();

        let latency = self.latency_for_tick(now, connected);
        let bandwidth = self.bandwidth_for_tick(now, connected);
        tracing::trace!(
            "tick at {now:?}: {connectivity}, latency {latency:?}, bandwidth {bandwidth:?}"
        );

        let outcome = TickOutcome {
            connectivity,
            latency,
            bandwidth,
        };
        let timestamp = self.clock.wall();
        let band = &mut self.band;
        let record = self
            .aggregator
            .merge(&mut self.state, outcome, timestamp, || {
                band.as_mut().map(|p| p.probe())
            });

        self.cadence.observe(latency);
        record
    }

    fn latency_for_tick(&mut self, now: Duration, connected: bool) -> Option<f64> {
        if !self.cadence.is_due(now, self.state.last_latency_probe_time) {
            return None;
        }
        self.state.mark_latency_probe(now);
        if connected {
            self.latency.probe()
        } else {
            tracing::debug!("latency due but link is down; skipped");
            None
        }
    }

    fn bandwidth_for_tick(&mut self, now: Duration, connected: bool) -> Option<BandwidthSample> {
        let due = is_due_on_tick(
            now,
            self.state.last_bandwidth_probe_time,
            self.schedule.bandwidth_interval,
            self.schedule.tick,
        );

        match &mut self.bandwidth {
            BandwidthRunner::Inline(probe) => {
                if !due {
                    return None;
                }
                self.state.mark_bandwidth_probe(now);
                if connected {
                    probe.probe()
                } else {
                    tracing::debug!("bandwidth due but link is down; skipped");
                    None
                }
            }
            BandwidthRunner::Offloaded(worker) => {
                let completed = match worker.poll() {
                    BandwidthPoll::Completed(Some(_)) if !connected => {
                        tracing::debug!("bandwidth result arrived while link is down; dropped");
                        None
                    }
                    BandwidthPoll::Completed(sample) => sample,
                    BandwidthPoll::Idle | BandwidthPoll::InFlight => None,
                };
                if due {
                    self.state.mark_bandwidth_probe(now);
                    if !connected {
                        tracing::debug!("bandwidth due but link is down; skipped");
                    } else if !worker.dispatch() {
                        tracing::debug!("previous bandwidth measurement still running");
                    }
                }
                completed
            }
        }
    }
}
