// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Injectable time source.
//!
//! The scheduler reads two kinds of time: a monotonic offset used for
//! cadence arithmetic, and a wall-clock timestamp stamped onto records.
//! [`ManualClock`] keeps both in lock-step so tests can step through
//! hours of schedule without sleeping.

use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source consulted once per tick.
pub trait Clock: Send {
    /// Monotonic time since the clock's origin.
    fn elapsed(&self) -> Duration;

    /// Current local wall-clock time.
    fn wall(&self) -> DateTime<Local>;
}

/// Real time: [`Instant`] for cadences, [`Local::now`] for timestamps.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying offset, so a test can keep one handle
/// and give another to the scheduler.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: DateTime<Local>,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            start,
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }

    fn offset(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.offset()
    }

    fn wall(&self) -> DateTime<Local> {
        chrono::Duration::from_std(self.offset())
            .ok()
            .and_then(|d| self.start.checked_add_signed(d))
            .unwrap_or(self.start)
    }
}
