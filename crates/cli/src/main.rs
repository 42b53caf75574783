// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aeolus - CI pipeline compiler

mod commands;
mod completions;
mod config;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, merge, translate, validate};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::error::AeolusError;

#[derive(Parser)]
#[command(
    name = "aeolus",
    version,
    about = "Aeolus - one pipeline definition for every CI system"
)]
struct Cli {
    /// Log progress and dump merged windfiles
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log debug details
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (default: $XDG_CONFIG_HOME/aeolus/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a windfile or action file
    Validate(validate::ValidateArgs),
    /// Resolve all referenced actions and print the merged windfile
    Merge(merge::MergeArgs),
    /// Generate a pipeline for a CI system
    Generate(generate::GenerateArgs),
    /// Translate a Bamboo plan into a windfile
    Translate(translate::TranslateArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.debug);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprint!("{}", render_error(err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Completions need neither config nor documents
    let config = match &cli.command {
        Commands::Completions(_) => Config::default(),
        _ => Config::load(cli.config.as_deref()).map_err(|e| {
            AeolusError::new("failed to load configuration")
                .with_context(e.to_string())
                .with_source(e)
        })?,
    };

    match cli.command {
        Commands::Validate(args) => return validate::validate_document(args),
        Commands::Merge(args) => merge::merge(args, cli.verbose)?,
        Commands::Generate(args) => generate::generate(args, &config, cli.verbose)?,
        Commands::Translate(args) => translate::translate(args, &config)?,
        Commands::Completions(args) => completions::generate_completions::<Cli>(args.shell),
    }

    Ok(ExitCode::SUCCESS)
}

/// Errors without their own presentation get one context line per cause
fn render_error(err: anyhow::Error) -> AeolusError {
    match err.downcast::<AeolusError>() {
        Ok(err) => err,
        Err(err) => err
            .chain()
            .skip(1)
            .fold(AeolusError::new(err.to_string()), |acc, cause| {
                acc.with_context(cause.to_string())
            }),
    }
}
