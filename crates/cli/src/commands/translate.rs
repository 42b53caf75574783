// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aeolus translate --key <plan>` - Rebuild a windfile from a Bamboo plan

use crate::config::Config;
use crate::error::AeolusError;
use crate::output::{self, OutputFormat};
use aeolus_adapters::{BambooRestFetcher, TracedPlanGraphFetcher};
use aeolus_core::Target;
use aeolus_translator::Translator;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct TranslateArgs {
    /// Plan key, e.g. PROJ-BUILD
    #[arg(long)]
    pub key: String,

    /// Base URL of the Bamboo server
    #[arg(long)]
    pub url: String,

    /// Personal access token
    #[arg(long)]
    pub token: String,

    /// Username; switches to basic authentication with the token as password
    #[arg(long)]
    pub user: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn translate(args: TranslateArgs, config: &Config) -> Result<()> {
    let mut fetcher = BambooRestFetcher::new(&args.url, &args.token);
    if let Some(user) = &args.user {
        fetcher = fetcher.with_username(user);
    }

    let windfile = Translator::new(TracedPlanGraphFetcher::new(fetcher))
        .with_environment(config.environment_table(Target::Bamboo))
        .translate(&args.key)
        .map_err(|e| AeolusError::translate_failed(&args.key, e))?;

    output::emit(&output::render(&windfile, args.format)?, None)
}
