// Copyright © 2024 Menagerie. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for Menagerie
//!
//! Two subcommands:
//!
//! - `build` writes the pig and rabbit pages and their assets to the output
//!   directory
//! - `serve` serves an output directory over HTTP
//!
//! Both read an optional TOML configuration file and `MENAGERIE_*`
//! environment variables; command-line flags take precedence over both.
//!
//! # Examples
//!
//! ```
//! use menagerie::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "menagerie",
//!     "build",
//!     "--env",
//!     "production",
//! ]);
//!
//! let build_cmd = matches.subcommand_matches("build").unwrap();
//! assert_eq!(build_cmd.get_one::<String>("env").unwrap(), "production");
//! ```

use crate::core::config::{Config, ConfigBuilder};
use crate::core::error::{MenagerieError, Result};
use crate::server::StaticServer;
use crate::Menagerie;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};
use std::path::PathBuf;

/// The current version of Menagerie, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the environment variables read into the configuration.
pub const ENV_PREFIX: &str = "MENAGERIE_";
/// Default port for the static server.
pub const DEFAULT_PORT: u16 = 3000;

/// Builds and configures the Menagerie command-line interface.
pub fn build() -> Command {
    debug!("Building CLI command structure");

    let config_arg = Arg::new("config")
        .short('c')
        .long("config")
        .help("TOML configuration file")
        .value_parser(value_parser!(PathBuf));

    Command::new("menagerie")
        .author("Menagerie Contributors")
        .about("Builds and serves the pig and rabbit pages.")
        .version(VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("build")
                .about("Build the pages and their assets")
                .arg(config_arg.clone())
                .arg(
                    Arg::new("env")
                        .short('e')
                        .long("env")
                        .help("Build profile")
                        .value_parser(["development", "production"]),
                )
                .arg(
                    Arg::new("assets")
                        .short('a')
                        .long("assets")
                        .help("Asset directory")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output directory")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("templates")
                        .short('t')
                        .long("templates")
                        .help("Directory of page templates")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("minify")
                        .short('m')
                        .long("minify")
                        .help("Minify HTML, CSS and script output")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-clean")
                        .long("no-clean")
                        .help("Keep existing files in the output directory")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve a built output directory")
                .arg(config_arg)
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Address to bind"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to serve on")
                        .value_parser(value_parser!(u16)),
                )
                .arg(
                    Arg::new("dist")
                        .short('d')
                        .long("dist")
                        .help("Directory to serve")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .after_help(
            "\x1b[1;4mEnvironment:\x1b[0m\n\n  MENAGERIE_PROFILE, MENAGERIE_OUTPUT_DIR, \
             MENAGERIE_SERVER__PORT, ...\n  RUST_LOG controls log output.",
        )
}

/// Executes the command-line interface by matching the subcommand and
/// arguments.
pub fn execute() -> Result<()> {
    execute_from(build().get_matches())
}

/// Executes already parsed arguments.
pub fn execute_from(matches: ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("build", sub_matches)) => {
            let config = load_config(sub_matches, build_overrides)?;
            build_site(config)
        }
        Some(("serve", sub_matches)) => {
            let config = load_config(sub_matches, serve_overrides)?;
            serve_site(&config)
        }
        _ => Err(MenagerieError::internal_error("Unknown command")),
    }
}

/// Loads the configuration for a subcommand: file, then environment, then
/// the subcommand's flags.
fn load_config(
    matches: &ArgMatches,
    overrides: fn(ConfigBuilder, &ArgMatches) -> ConfigBuilder,
) -> Result<Config> {
    let mut builder = ConfigBuilder::new().with_env_prefix(ENV_PREFIX);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        builder = builder.with_file(path);
    }
    let config = overrides(builder, matches).build()?;
    let config = config.read().clone();
    Ok(config)
}

fn build_overrides(
    mut builder: ConfigBuilder,
    matches: &ArgMatches,
) -> ConfigBuilder {
    if let Some(env) = matches.get_one::<String>("env") {
        builder = builder.with_override("profile", env.as_str());
    }
    for (arg, key) in [
        ("assets", "asset_dir"),
        ("output", "output_dir"),
        ("templates", "template_dir"),
    ] {
        if let Some(path) = matches.get_one::<PathBuf>(arg) {
            builder =
                builder.with_override(key, path.display().to_string());
        }
    }
    if matches.get_flag("minify") {
        builder = builder.with_override("output.minify", true);
    }
    if matches.get_flag("no-clean") {
        builder = builder.with_override("output.clean", false);
    }
    builder
}

fn serve_overrides(
    mut builder: ConfigBuilder,
    matches: &ArgMatches,
) -> ConfigBuilder {
    if let Some(host) = matches.get_one::<String>("host") {
        builder = builder.with_override("server.host", host.as_str());
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        builder = builder.with_override("server.port", i64::from(*port));
    }
    if let Some(dist) = matches.get_one::<PathBuf>("dist") {
        builder =
            builder.with_override("output_dir", dist.display().to_string());
    }
    builder
}

/// Builds every page into the configured output directory.
fn build_site(config: Config) -> Result<()> {
    info!(
        "Building {} pages from '{}' into '{}'",
        config.profile,
        config.asset_dir.display(),
        config.output_dir.display()
    );

    let report = Menagerie::new(config).build()?;
    for page in &report.pages {
        info!("Wrote {}", page.html.display());
    }
    info!("Copied {} image(s)", report.images.len());
    Ok(())
}

/// Serves the configured output directory until the process is stopped.
fn serve_site(config: &Config) -> Result<()> {
    let addr = config.server_addr();
    info!(
        "Serving '{}' on {}",
        config.output_dir.display(),
        addr
    );
    StaticServer::from_config(config).serve(&addr)
}

/// Displays the Menagerie banner with version and description information.
pub fn print_banner() {
    info!("Displaying Menagerie banner");

    let title = format!("Menagerie 🐷 v{}", VERSION);
    let description = "Component-composed pages for pigs and rabbits.";

    let width = title.len().max(description.len()) + 4;
    let horizontal_line = "─".repeat(width - 2);

    println!("\n┌{}┐", horizontal_line);
    println!("│{:^width$}│", title, width = width - 2);
    println!("├{}┤", horizontal_line);
    println!("│{:^width$}│", description, width = width - 2);
    println!("└{}┘\n", horizontal_line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Profile;
    use std::fs;
    use tempfile::TempDir;

    fn get_matches(args: Vec<&str>) -> ArgMatches {
        build().get_matches_from(args)
    }

    #[test]
    fn test_build_command() {
        let matches = get_matches(vec![
            "menagerie",
            "build",
            "--env",
            "production",
            "--output",
            "public",
            "--minify",
        ]);
        let build_cmd = matches.subcommand_matches("build").unwrap();

        assert_eq!(
            build_cmd.get_one::<String>("env").unwrap(),
            "production"
        );
        assert_eq!(
            build_cmd.get_one::<PathBuf>("output").unwrap(),
            &PathBuf::from("public")
        );
        assert!(build_cmd.get_flag("minify"));
    }

    #[test]
    fn test_rejects_unknown_env() {
        assert!(build()
            .try_get_matches_from(vec!["menagerie", "build", "--env", "qa"])
            .is_err());
    }

    #[test]
    fn test_serve_command() {
        let matches =
            get_matches(vec!["menagerie", "serve", "--port", "8080"]);
        let serve_cmd = matches.subcommand_matches("serve").unwrap();

        assert_eq!(serve_cmd.get_one::<u16>("port").unwrap(), &8080);
        assert!(serve_cmd.get_one::<PathBuf>("dist").is_none());
    }

    #[test]
    fn test_flags_override_config_file() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("menagerie.toml");
        fs::write(
            &file,
            "profile = \"development\"\noutput_dir = \"from-file\"\n",
        )?;
        let file = file.display().to_string();

        let matches = get_matches(vec![
            "menagerie",
            "build",
            "--config",
            &file,
            "--env",
            "production",
            "--output",
            "from-flag",
        ]);
        let sub = matches.subcommand_matches("build").unwrap();
        let config = load_config(sub, build_overrides)?;

        assert_eq!(config.profile, Profile::Production);
        assert_eq!(config.output_dir, PathBuf::from("from-flag"));
        Ok(())
    }

    #[test]
    fn test_no_clean_flag() -> Result<()> {
        let matches = get_matches(vec!["menagerie", "build", "--no-clean"]);
        let sub = matches.subcommand_matches("build").unwrap();
        assert!(!load_config(sub, build_overrides)?.output.clean);

        let matches = get_matches(vec!["menagerie", "build"]);
        let sub = matches.subcommand_matches("build").unwrap();
        assert!(load_config(sub, build_overrides)?.output.clean);
        Ok(())
    }

    #[test]
    fn test_serve_overrides() -> Result<()> {
        let matches = get_matches(vec![
            "menagerie",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8081",
            "--dist",
            "out",
        ]);
        let sub = matches.subcommand_matches("serve").unwrap();
        let config = load_config(sub, serve_overrides)?;

        assert_eq!(config.server_addr(), "0.0.0.0:8081");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        Ok(())
    }
}
