// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # netwatch
//!
//! Command-line interface for the connectivity monitor.
//!
//! ## Usage
//! ```bash
//! # Monitor until Ctrl-C, logging to ./connection_log_<start>.txt
//! netwatch run
//!
//! # Use a config file and a different log directory
//! netwatch -c netwatch.toml run --log-dir /var/log/netwatch
//!
//! # Run every probe once and print the results
//! netwatch probe --json
//!
//! # Print the default configuration
//! netwatch config > netwatch.toml
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "netwatch",
    about = "Adaptive internet connectivity, latency and bandwidth monitor",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Monitor the connection until interrupted (default).
    Run(commands::run::RunArgs),

    /// Run every probe once and print the results.
    Probe {
        /// Print a JSON report instead of a table.
        #[arg(long)]
        json: bool,

        /// Skip the (slow) bandwidth test.
        #[arg(long)]
        skip_bandwidth: bool,
    },

    /// Check a configuration file without running anything.
    Validate,

    /// Print the default configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Run(Default::default())) {
        Commands::Run(args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::run::execute(config, args).await
        }
        Commands::Probe {
            json,
            skip_bandwidth,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::probe::execute(config, json, skip_bandwidth)
        }
        Commands::Validate => commands::validate::execute(cli.config.as_deref()),
        Commands::Config => commands::print_default_config(),
    }
}
