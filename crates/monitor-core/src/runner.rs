// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The long-running monitor loop.
//!
//! Paces [`SampleScheduler::tick`] with a `tokio` interval and stops when
//! the shutdown future resolves (Ctrl-C in the binary). Probe calls block,
//! so each tick runs under `block_in_place` on a multi-threaded runtime.
//! A record is handed to the sink within the tick that produced it, so
//! stopping between ticks never leaves a partial record behind.

use crate::{LogRecord, RecordSink, SampleScheduler, Unseeded};
use std::future::Future;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::time::MissedTickBehavior;

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed after the seed.
    pub ticks: u64,
    /// Records handed to the sink, seed included.
    pub records: u64,
    /// Records the sink failed to persist.
    pub sink_errors: u64,
}

/// Pairs a scheduler with the sink that receives its records.
pub struct Monitor<K: RecordSink> {
    scheduler: SampleScheduler<Unseeded>,
    sink: K,
}

impl<K: RecordSink> Monitor<K> {
    pub fn new(scheduler: SampleScheduler<Unseeded>, sink: K) -> Self {
        Self { scheduler, sink }
    }

    /// Seeds, then ticks until `shutdown` resolves. Returns the sink and a
    /// summary of the run.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> (K, RunSummary) {
        let Self { scheduler, mut sink } = self;
        let mut summary = RunSummary::default();
        let tick = scheduler.schedule().tick;

        let (mut scheduler, seed) = blocking(|| scheduler.seed());
        deliver(&mut sink, &seed, &mut summary);

        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the seed already covered it.
        ticker.tick().await;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested after {} ticks", summary.ticks);
                    break;
                }
                _ = ticker.tick() => {
                    let record = blocking(|| scheduler.tick());
                    summary.ticks += 1;
                    if let Some(record) = record {
                        deliver(&mut sink, &record, &mut summary);
                    }
                }
            }
        }

        (sink, summary)
    }
}

fn deliver<K: RecordSink>(sink: &mut K, record: &LogRecord, summary: &mut RunSummary) {
    summary.records += 1;
    if let Err(e) = sink.record(record) {
        summary.sink_errors += 1;
        tracing::error!("failed to record entry: {e}");
    }
}

/// Runs blocking probe work without stalling other tasks where possible.
fn blocking<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current().map(|h| h.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(f),
        _ => f(),
    }
}
