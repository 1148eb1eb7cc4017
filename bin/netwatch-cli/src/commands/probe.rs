// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `netwatch probe` command: run every probe once and report.

use monitor_core::{ConnectivityState, MonitorConfig};
use probe_client::{
    BandwidthSample, PingLatency, SpeedTestBandwidth, TcpReachability, WifiBand, WifiBandProbe,
};
use std::time::Duration;

/// Result of a single pass over every configured probe.
#[derive(Debug, serde::Serialize)]
pub struct ProbeReport {
    pub target: String,
    pub connectivity: ConnectivityState,
    pub latency_ms: Option<f64>,
    pub bandwidth: Option<BandwidthSample>,
    pub band: Option<WifiBand>,
    /// One entry per probe that failed, e.g. `latency: ping timed out`.
    pub errors: Vec<String>,
}

pub fn execute(config: MonitorConfig, json: bool, skip_bandwidth: bool) -> anyhow::Result<()> {
    let report = collect(&config, skip_bandwidth);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              netwatch · One-shot Probe              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Target:        {}", report.target);
    println!("  Connectivity:  {}", report.connectivity);
    println!(
        "  Latency:       {}",
        report
            .latency_ms
            .map_or_else(|| "N/A".to_string(), |ms| format!("{ms:?} ms"))
    );
    if !skip_bandwidth {
        println!(
            "  Bandwidth:     {}",
            report
                .bandwidth
                .map_or_else(|| "N/A".to_string(), |s| s.to_string())
        );
    }
    if let Some(band) = report.band {
        println!("  Wi-Fi band:    {band}");
    }
    if !report.errors.is_empty() {
        println!();
        println!("  Errors:");
        for error in &report.errors {
            println!("    - {error}");
        }
    }
    println!();
    Ok(())
}

fn collect(config: &MonitorConfig, skip_bandwidth: bool) -> ProbeReport {
    let mut errors = Vec::new();

    let reachability = TcpReachability::new(
        config.reachability.host.clone(),
        config.reachability.port,
        Duration::from_secs(config.reachability.timeout_secs),
    );
    let connected = match reachability.try_connect() {
        Ok(addr) => {
            tracing::info!("connected to {addr}");
            true
        }
        Err(e) => {
            errors.push(format!("reachability: {e}"));
            false
        }
    };

    let latency = PingLatency::new(
        config.latency.host.clone(),
        Duration::from_secs(config.latency.timeout_secs),
    )
    .with_program(config.latency.program.clone());
    let latency_ms = latency
        .try_measure()
        .map_err(|e| errors.push(format!("latency: {e}")))
        .ok();

    let bandwidth = if skip_bandwidth || !connected {
        None
    } else {
        let speed = SpeedTestBandwidth::new(
            config.bandwidth.program.clone(),
            config.bandwidth.args.clone(),
            Duration::from_secs(config.bandwidth.timeout_secs),
        );
        eprintln!("Running '{}'...", speed.command_line());
        speed
            .try_measure()
            .map_err(|e| errors.push(format!("bandwidth: {e}")))
            .ok()
    };

    let band = config.band.enabled.then(|| {
        let probe = WifiBandProbe::new(
            config.band.interface.clone(),
            Duration::from_secs(config.band.timeout_secs),
        );
        probe.try_read().unwrap_or_else(|e| {
            errors.push(format!("band: {e}"));
            WifiBand::Error
        })
    });

    ProbeReport {
        target: reachability.target(),
        connectivity: ConnectivityState::from(connected),
        latency_ms,
        bandwidth,
        band,
        errors,
    }
}
