// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI plumbing.

pub mod probe;
pub mod run;
pub mod validate;

use monitor_core::MonitorConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the level from `warn`.
/// Stdout is reserved for records.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file if one was given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MonitorConfig> {
    match path {
        Some(path) => {
            let config = MonitorConfig::from_file(path)?;
            tracing::info!("loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(MonitorConfig::default()),
    }
}

/// `netwatch config`: prints the default configuration.
pub fn print_default_config() -> anyhow::Result<()> {
    print!("{}", MonitorConfig::default().to_toml()?);
    Ok(())
}
