// Copyright © 2024 Menagerie. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Menagerie CLI
//!
//! Entry point for the `menagerie` binary. Initializes the logger, displays
//! the banner and dispatches to [`menagerie::cli::execute`].

use anyhow::Context;
use log::info;
use menagerie::cli;

fn run() -> anyhow::Result<()> {
    info!("Starting Menagerie v{}", cli::VERSION);
    cli::execute().context("Menagerie command failed")?;
    info!("Menagerie completed successfully");
    Ok(())
}

/// The main entry point for the Menagerie CLI.
fn main() {
    env_logger::init();
    cli::print_banner();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
