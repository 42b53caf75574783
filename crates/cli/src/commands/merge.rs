// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aeolus merge <file>` - Resolve every referenced action into one windfile

use super::load_merged;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct MergeArgs {
    /// Windfile to merge
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn merge(args: MergeArgs, verbose: bool) -> Result<()> {
    let windfile = load_merged(&args.file, verbose)?;
    output::emit(&output::render(&windfile, args.format)?, None)
}
