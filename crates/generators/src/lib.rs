// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Code generators for the supported CI targets

mod bamboo;
mod base;
mod cli;
mod jenkins;

pub use bamboo::BambooGenerator;
pub use base::{GenerateError, Generator, Lines};
pub use cli::CliGenerator;
pub use jenkins::JenkinsGenerator;
