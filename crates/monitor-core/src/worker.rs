// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Off-loop bandwidth measurement.
//!
//! A speed test takes tens of seconds; running it inline stalls the
//! one-second reachability tick. [`BandwidthWorker`] owns the probe on a
//! dedicated thread and talks to the scheduler over a single-producer,
//! single-consumer channel pair:
//!
//! ```text
//!  scheduler ──dispatch()──▶ requests ──▶ worker thread
//!      ▲                                     │ probe()
//!      └────────poll()──── results ◀─────────┘
//! ```
//!
//! At most one measurement is in flight. The scheduler never blocks on it
//! except during the seed probe.

use crate::MonitorError;
use probe_client::{BandwidthProbe, BandwidthSample};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Outcome of checking the worker on a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandwidthPoll {
    /// Nothing was requested.
    Idle,
    /// A measurement is running.
    InFlight,
    /// A measurement finished; `None` if it produced no value.
    Completed(Option<BandwidthSample>),
}

/// Handle to the bandwidth worker thread.
#[derive(Debug)]
pub struct BandwidthWorker {
    requests: Sender<()>,
    results: Receiver<Option<BandwidthSample>>,
    in_flight: bool,
}

impl BandwidthWorker {
    /// Moves `probe` onto a new thread and returns the handle.
    ///
    /// The thread exits once the handle is dropped and any running
    /// measurement has finished.
    pub fn spawn(mut probe: Box<dyn BandwidthProbe>) -> Result<Self, MonitorError> {
        let (req_tx, req_rx) = mpsc::channel::<()>();
        let (res_tx, res_rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("bandwidth-probe".to_string())
            .spawn(move || {
                while req_rx.recv().is_ok() {
                    let sample = probe.probe();
                    if res_tx.send(sample).is_err() {
                        break;
                    }
                }
                tracing::debug!("bandwidth worker exiting");
            })
            .map_err(MonitorError::WorkerSpawn)?;

        Ok(Self {
            requests: req_tx,
            results: res_rx,
            in_flight: false,
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Starts a measurement. Returns `false` if one is already running or
    /// the worker is gone.
    pub fn dispatch(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        if self.requests.send(()).is_err() {
            tracing::warn!("bandwidth worker has stopped; measurement skipped");
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Checks for a finished measurement without blocking.
    pub fn poll(&mut self) -> BandwidthPoll {
        if !self.in_flight {
            return BandwidthPoll::Idle;
        }
        match self.results.try_recv() {
            Ok(sample) => {
                self.in_flight = false;
                BandwidthPoll::Completed(sample)
            }
            Err(TryRecvError::Empty) => BandwidthPoll::InFlight,
            Err(TryRecvError::Disconnected) => self.lost(),
        }
    }

    /// Blocks until the in-flight measurement finishes.
    pub fn wait(&mut self) -> BandwidthPoll {
        if !self.in_flight {
            return BandwidthPoll::Idle;
        }
        match self.results.recv() {
            Ok(sample) => {
                self.in_flight = false;
                BandwidthPoll::Completed(sample)
            }
            Err(_) => self.lost(),
        }
    }

    fn lost(&mut self) -> BandwidthPoll {
        tracing::warn!("bandwidth worker terminated mid-measurement");
        self.in_flight = false;
        BandwidthPoll::Completed(None)
    }
}
