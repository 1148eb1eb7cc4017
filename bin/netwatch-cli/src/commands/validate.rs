// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `netwatch validate` command: parse and check a configuration file.

use monitor_core::MonitorConfig;
use std::path::Path;

pub fn execute(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        anyhow::bail!("validate needs a configuration file: netwatch -c <FILE> validate");
    };

    let config = MonitorConfig::from_file(path)?;
    let schedule = config.schedule();

    println!("Configuration '{}' is valid.", path.display());
    println!(
        "   Reachability: {}:{} ({} s timeout)",
        config.reachability.host, config.reachability.port, config.reachability.timeout_secs
    );
    println!(
        "   Latency:      {} every {:?}, every tick above {} ms",
        config.latency.host, schedule.latency_interval, schedule.high_latency_threshold_ms
    );
    println!(
        "   Bandwidth:    '{}' every {:?} ({})",
        config.bandwidth.program,
        schedule.bandwidth_interval,
        if schedule.offload_bandwidth { "worker thread" } else { "inline" }
    );
    if config.band.enabled {
        println!("   Wi-Fi band:   {}", config.band.interface);
    }
    println!("   Log dir:      {}", config.recorder.log_dir.display());
    Ok(())
}
