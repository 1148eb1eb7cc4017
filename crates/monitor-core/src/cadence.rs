// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Probe cadences.
//!
//! Bandwidth runs on a fixed interval. Latency runs on a two-state
//! controller:
//!
//! ```text
//!            sample > threshold
//!   Normal ─────────────────────▶ Degraded
//! (interval)                    (every tick)
//!      ▲                              │
//!      └──────────────────────────────┘
//!            sample <= threshold
//! ```
//!
//! Absent samples never cause a transition in either direction.

use std::time::Duration;

/// Returns `true` once at least `interval` has passed since `last`.
pub fn is_due(now: Duration, last: Duration, interval: Duration) -> bool {
    now.saturating_sub(last) >= interval
}

/// [`is_due`] for times read at the start of a paced tick.
///
/// Tick wake-ups jitter around their deadlines, so an interval of `n`
/// ticks can measure a hair under `n * tick`. Elapsed time is rounded to
/// the nearest tick before comparing.
pub fn is_due_on_tick(now: Duration, last: Duration, interval: Duration, tick: Duration) -> bool {
    is_due(now + tick / 2, last, interval)
}

/// Current state of the latency cadence controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceMode {
    /// Latency is healthy; probe on the configured interval.
    Normal,
    /// Latency exceeded the threshold; probe on every tick.
    Degraded,
}

/// Adaptive latency cadence.
#[derive(Debug, Clone)]
pub struct LatencyCadence {
    normal_interval: Duration,
    degraded_interval: Duration,
    threshold_ms: f64,
    mode: CadenceMode,
}

impl LatencyCadence {
    /// Creates a controller in [`CadenceMode::Normal`].
    ///
    /// `degraded_interval` is the base tick: once degraded, every tick
    /// probes.
    pub fn new(normal_interval: Duration, degraded_interval: Duration, threshold_ms: f64) -> Self {
        Self {
            normal_interval,
            degraded_interval,
            threshold_ms,
            mode: CadenceMode::Normal,
        }
    }

    pub fn mode(&self) -> CadenceMode {
        self.mode
    }

    pub fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }

    /// Interval the latency probe must currently respect.
    pub fn interval(&self) -> Duration {
        match self.mode {
            CadenceMode::Normal => self.normal_interval,
            CadenceMode::Degraded => self.degraded_interval,
        }
    }

    /// Returns `true` if the latency probe should run on the tick starting
    /// at `now`. While degraded that is every tick, whatever the clock says.
    pub fn is_due(&self, now: Duration, last: Duration) -> bool {
        match self.mode {
            CadenceMode::Normal => {
                is_due_on_tick(now, last, self.normal_interval, self.degraded_interval)
            }
            CadenceMode::Degraded => true,
        }
    }

    /// Returns `true` if `latency_ms` is above the high-latency threshold.
    pub fn is_high(&self, latency_ms: f64) -> bool {
        latency_ms > self.threshold_ms
    }

    /// Feeds a sample to the controller. Returns the new mode if it changed.
    pub fn observe(&mut self, sample: Option<f64>) -> Option<CadenceMode> {
        let ms = sample?;
        let next = if self.is_high(ms) {
            CadenceMode::Degraded
        } else {
            CadenceMode::Normal
        };
        if next == self.mode {
            return None;
        }

        self.mode = next;
        match next {
            CadenceMode::Degraded => tracing::info!(
                "latency {ms} ms above {} ms; probing every {:?}",
                self.threshold_ms,
                self.degraded_interval
            ),
            CadenceMode::Normal => tracing::info!(
                "latency {ms} ms back within {} ms; probing every {:?}",
                self.threshold_ms,
                self.normal_interval
            ),
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cadence() -> LatencyCadence {
        LatencyCadence::new(Duration::from_secs(30), Duration::from_secs(1), 80.0)
    }

    #[test]
    fn test_is_due() {
        let last = Duration::from_secs(10);
        assert!(!is_due(Duration::from_secs(39), last, Duration::from_secs(30)));
        assert!(is_due(Duration::from_secs(40), last, Duration::from_secs(30)));
        assert!(is_due(Duration::from_secs(41), last, Duration::from_secs(30)));
    }

    #[test]
    fn test_is_due_clock_behind_last() {
        assert!(!is_due(Duration::from_secs(5), Duration::from_secs(10), Duration::from_secs(1)));
    }

    #[test]
    fn test_is_due_on_tick_absorbs_early_wakeup() {
        let tick = Duration::from_secs(1);
        let interval = Duration::from_secs(30);
        // Thirty ticks that woke 20 ms early still count as thirty.
        assert!(is_due_on_tick(Duration::from_millis(29_980), Duration::ZERO, interval, tick));
        assert!(!is_due_on_tick(Duration::from_millis(29_020), Duration::ZERO, interval, tick));
    }

    #[test]
    fn test_degraded_is_due_every_tick() {
        let mut c = cadence();
        c.observe(Some(150.0));
        let last = Duration::from_millis(10_000);
        // The next tick woke slightly earlier relative to its deadline.
        assert!(c.is_due(Duration::from_millis(10_990), last));
        assert!(c.is_due(last, last));

        c.observe(Some(40.0));
        assert!(!c.is_due(Duration::from_millis(10_990), last));
        assert!(c.is_due(Duration::from_millis(39_990), last));
    }

    #[test]
    fn test_starts_normal() {
        let c = cadence();
        assert_eq!(c.mode(), CadenceMode::Normal);
        assert_eq!(c.interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_high_sample_degrades() {
        let mut c = cadence();
        assert_eq!(c.observe(Some(120.0)), Some(CadenceMode::Degraded));
        assert_eq!(c.interval(), Duration::from_secs(1));
        // Still high: no transition.
        assert_eq!(c.observe(Some(95.0)), None);
        assert_eq!(c.mode(), CadenceMode::Degraded);
    }

    #[test]
    fn test_threshold_itself_is_normal() {
        let mut c = cadence();
        assert_eq!(c.observe(Some(80.0)), None);
        assert_eq!(c.mode(), CadenceMode::Normal);
        assert!(!c.is_high(80.0));
        assert!(c.is_high(80.1));
    }

    #[test]
    fn test_recovery_requires_sample() {
        let mut c = cadence();
        c.observe(Some(200.0));
        assert_eq!(c.observe(None), None);
        assert_eq!(c.mode(), CadenceMode::Degraded);

        assert_eq!(c.observe(Some(80.0)), Some(CadenceMode::Normal));
        assert_eq!(c.interval(), Duration::from_secs(30));
    }
}
