// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aeolus validate <file>` - Check a windfile or action file

use super::read;
use aeolus_core::{validate, DocumentKind};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
pub struct ValidateArgs {
    /// Document to validate
    pub file: PathBuf,

    /// Validate as an action file instead of a windfile
    #[arg(long)]
    pub actionfile: bool,
}

/// Prints `valid`, or one line per violation and fails
pub fn validate_document(args: ValidateArgs) -> Result<ExitCode> {
    let kind = if args.actionfile {
        DocumentKind::ActionFile
    } else {
        DocumentKind::Windfile
    };
    let content = read(&args.file)?;

    match validate(&content, kind) {
        Ok(_) => {
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::info!(file = %args.file.display(), violations = err.violations.len(), "document is invalid");
            println!("invalid: {}", args.file.display());
            for violation in &err.violations {
                println!("  {}", violation);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
