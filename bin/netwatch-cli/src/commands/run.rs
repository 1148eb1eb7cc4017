// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `netwatch run` command: monitor until Ctrl-C.
//!
//! ```text
//! MonitorConfig ─▶ ProbeSet + ScheduleConfig ─▶ SampleScheduler
//!                                                    │
//!                         Recorder (file + stdout) ◀─┘ Monitor::run
//! ```

use chrono::Local;
use monitor_core::{Monitor, MonitorConfig, SampleScheduler, SystemClock};
use recorder::{Console, LogFile, Recorder};
use std::path::PathBuf;

/// Overrides applied on top of the loaded configuration.
#[derive(Debug, Default, clap::Args)]
pub struct RunArgs {
    /// Reachability and latency target host (e.g. 1.1.1.1).
    #[arg(long)]
    pub host: Option<String>,

    /// Reachability TCP port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for the per-run log file.
    #[arg(short, long)]
    pub log_dir: Option<PathBuf>,

    /// Run the bandwidth test inside the tick instead of on a worker.
    #[arg(long)]
    pub inline_bandwidth: bool,

    /// Annotate records with the Wi-Fi band.
    #[arg(long)]
    pub band: bool,

    /// Console only; do not create a log file.
    #[arg(long)]
    pub no_file: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(host) = &self.host {
            config.reachability.host = host.clone();
            config.latency.host = host.clone();
        }
        if let Some(port) = self.port {
            config.reachability.port = port;
        }
        if let Some(dir) = &self.log_dir {
            config.recorder.log_dir = dir.clone();
        }
        if self.inline_bandwidth {
            config.bandwidth.offload = false;
        }
        if self.band {
            config.band.enabled = true;
        }
    }
}

pub async fn execute(mut config: MonitorConfig, args: RunArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let file = if args.no_file {
        None
    } else {
        Some(LogFile::create(
            &config.recorder.log_dir,
            Local::now(),
            config.band.enabled,
        )?)
    };
    if let Some(file) = &file {
        eprintln!("Logging to {}", file.path().display());
    }
    let recorder = Recorder::new(file, Some(Console::stdout()));

    tracing::info!(
        "monitoring {}:{} (latency via {}, bandwidth via {})",
        config.reachability.host,
        config.reachability.port,
        config.latency.program,
        config.bandwidth.program,
    );

    let scheduler = SampleScheduler::new(
        config.schedule(),
        config.build_probes(),
        Box::new(SystemClock::new()),
    )?;
    let (_recorder, summary) = Monitor::new(scheduler, recorder)
        .run(shutdown_signal())
        .await;

    println!();
    println!("Monitoring stopped.");
    tracing::info!(
        "{} ticks, {} records, {} write failures",
        summary.ticks,
        summary.records,
        summary.sink_errors
    );
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the monitor
/// runs until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let mut config = MonitorConfig::default();
        let args = RunArgs {
            host: Some("1.1.1.1".into()),
            port: Some(443),
            log_dir: Some(PathBuf::from("/tmp/netwatch")),
            inline_bandwidth: true,
            band: true,
            no_file: false,
        };
        args.apply(&mut config);
        assert_eq!(config.reachability.host, "1.1.1.1");
        assert_eq!(config.latency.host, "1.1.1.1");
        assert_eq!(config.reachability.port, 443);
        assert_eq!(config.recorder.log_dir, PathBuf::from("/tmp/netwatch"));
        assert!(!config.bandwidth.offload);
        assert!(config.band.enabled);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = MonitorConfig::default();
        RunArgs::default().apply(&mut config);
        assert_eq!(config, MonitorConfig::default());
    }
}
