// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `lp`: push local changes to a container on a development device.

mod color;
mod commands;
mod env;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lp",
    version,
    about = "Push local changes to a container on a development device",
    styles = color::styles()
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild or sync the project into its container on the device
    Push(commands::push::PushArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Push(args) => {
            init_tracing(args.verbose);
            commands::push::handle(args).await
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", color::error("error:"));
            ExitCode::FAILURE
        }
    }
}

/// `LP_LOG` wins; otherwise `info`, or `debug` for the workspace crates with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = match env::log_filter() {
        Some(directives) => EnvFilter::try_new(directives),
        None => EnvFilter::try_new(default_directives(verbose)),
    }
    .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color::stderr_enabled())
        .with_target(verbose)
        .without_time()
        .init();
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,lp=debug,lp_core=debug,lp_adapters=debug,lp_engine=debug"
    } else {
        "info"
    }
}
