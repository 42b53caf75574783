// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reverse translation of Bamboo plans into windfiles

mod consolidate;
mod parser;
mod plan;
mod translator;

pub use consolidate::{clean_up, consolidate_docker};
pub use parser::parse_plan;
pub use plan::{
    Artifact, CheckoutTask, Condition, DockerConfig, Job, Plan, PlanGraph, PlanRepository, ScriptTask,
    SpecialTask, Stage, Task,
};
pub use translator::{TranslateError, Translator};
