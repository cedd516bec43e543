// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Triage - support ticket tracker with automatic classification.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod print_config;
mod seed;
mod serve;
mod status;
mod wiring;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Triage - support ticket tracker with automatic classification.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Classify one ticket and print the outcome as JSON.
    Classify {
        /// Ticket id.
        ticket_id: String,
    },
    /// Show the state of a running server.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Insert the default categories.
    Seed,
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => triage_config::load_and_validate_path(path),
        None => triage_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            triage_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Classify { ticket_id }) => classify::run_classify(&config, &ticket_id).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        Some(Commands::Seed) => seed::run_seed(&config).await,
        Some(Commands::Config) => print_config::run_config(&config),
        None => {
            println!("triage: use --help for available commands");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn classify_takes_ticket_id() {
        let cli = Cli::try_parse_from(["triage", "classify", "abc-123"]).unwrap();
        match cli.command {
            Some(Commands::Classify { ticket_id }) => assert_eq!(ticket_id, "abc-123"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["triage", "seed", "--config", "/tmp/triage.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/triage.toml")));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = triage_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.app.name, "triage");
    }
}
