// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration.
//!
//! Layered as: TOML file, then environment variables, then command line flags
//! (applied by the commands themselves).

use aeolus_core::{EnvironmentTable, Target};
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const IMAGE_ENV: &str = "BAMBOO_GENERATOR_IMAGE";
pub const JAR_ENV: &str = "BAMBOO_GENERATOR_JAR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown target '{0}' in [environment]")]
    UnknownTarget(String),
}

/// How Bamboo plan specs are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProducerKind {
    #[default]
    Docker,
    Jar,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BambooConfig {
    pub producer: ProducerKind,
    pub image: Option<String>,
    pub jar: Option<PathBuf>,
    pub java: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bamboo: BambooConfig,
    /// Per-target canonical -> native overrides
    pub environment: HashMap<String, IndexMap<String, String>>,
}

impl Config {
    /// Load from `path`, or from the default location when it exists
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.check_targets()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Environment variables override the file; a jar selects the jar producer
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(image) = var(IMAGE_ENV).filter(|v| !v.is_empty()) {
            self.bamboo.image = Some(image);
        }
        if let Some(jar) = var(JAR_ENV).filter(|v| !v.is_empty()) {
            self.bamboo.jar = Some(PathBuf::from(jar));
            self.bamboo.producer = ProducerKind::Jar;
        }
    }

    /// Built-in table for `target` with the configured overrides applied
    pub fn environment_table(&self, target: Target) -> EnvironmentTable {
        let mut table = EnvironmentTable::for_target(target);
        if let Some(overrides) = self.environment.get(target.as_str()) {
            for (canonical, native) in overrides {
                table.set(canonical.clone(), native.clone());
            }
        }
        table
    }

    fn check_targets(&self) -> Result<(), ConfigError> {
        for name in self.environment.keys() {
            name.parse::<Target>()
                .map_err(|_| ConfigError::UnknownTarget(name.clone()))?;
        }
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/aeolus/config.toml`, falling back to the platform config dir
pub fn default_path() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => dirs::config_dir()?,
    };
    Some(base.join("aeolus").join("config.toml"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
