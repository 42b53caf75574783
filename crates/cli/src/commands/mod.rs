// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod generate;
pub mod merge;
pub mod translate;
pub mod validate;

use crate::error::AeolusError;
use aeolus_core::{validate_windfile, Merger, Windfile};
use anyhow::Result;
use std::path::{Path, PathBuf};

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        AeolusError::new(format!("failed to read {}", path.display()))
            .with_context(e.to_string())
            .with_source(e)
            .into()
    })
}

/// Directory relative references of `path` resolve against
fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Read, validate and merge the windfile at `path`
pub fn load_merged(path: &Path, verbose: bool) -> Result<Windfile> {
    let windfile = validate_windfile(&read(path)?)
        .map_err(|e| AeolusError::invalid_document(path, e))?;
    let merged = Merger::new(base_dir(path))
        .verbose(verbose)
        .merge(windfile)
        .map_err(|e| AeolusError::merge_failed(path, e))?;
    Ok(merged)
}
