// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external tools and services behind the core capabilities

pub mod bamboo;
pub mod checker;
pub mod producer;
pub mod traced;

pub use bamboo::BambooRestFetcher;
pub use checker::BashSyntaxChecker;
pub use producer::{DockerPlanSpecProducer, JarPlanSpecProducer, DEFAULT_GENERATOR_IMAGE};
pub use traced::{TracedPlanGraphFetcher, TracedPlanSpecProducer};
