// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CI targets and lifecycle phases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported output CI system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Local bash runner
    Cli,
    Jenkins,
    Bamboo,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Cli, Target::Jenkins, Target::Bamboo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Cli => "cli",
            Target::Jenkins => "jenkins",
            Target::Bamboo => "bamboo",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown target '{}'", s))
    }
}

/// Phase of an exercise's timeline during which a job may be excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Preparation,
    WorkingTime,
    PostDeadline,
    Evaluation,
    Always,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 5] = [
        Lifecycle::Preparation,
        Lifecycle::WorkingTime,
        Lifecycle::PostDeadline,
        Lifecycle::Evaluation,
        Lifecycle::Always,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Preparation => "preparation",
            Lifecycle::WorkingTime => "working_time",
            Lifecycle::PostDeadline => "post_deadline",
            Lifecycle::Evaluation => "evaluation",
            Lifecycle::Always => "always",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lifecycle::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown lifecycle phase '{}'", s))
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
