// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! aeolus-core: the windfile model and the passes that run before generation
//!
//! This crate provides:
//! - The windfile, action file, and action data model
//! - Schema validation with field-path diagnostics
//! - Merging of file, external, and platform actions into internal ones
//! - Per-target environment variable substitution
//! - Capability traits for external tools, with fakes for tests

pub mod action;
pub mod adapters;
pub mod environment;
pub mod merger;
pub mod target;
pub mod validator;
pub mod windfile;

/// Document version written by this toolchain
pub const API_VERSION: &str = "v0.0.1";

pub use action::{
    Action, ActionKind, Docker, EnvValue, Environment, ExternalAction, FileAction,
    InternalAction, JobResult, Parameters, PlatformAction,
};
pub use adapters::{
    CheckError, CheckOutcome, FetchError, PlanGraphFetcher, PlanSpecProducer, ProducerError,
    ProducerOutput, SyntaxChecker,
};
pub use environment::{substitute, Direction, EnvironmentTable};
pub use merger::{merge, MergeError, Merger};
pub use target::{Lifecycle, Target};
pub use validator::{
    validate, validate_actionfile, validate_windfile, Document, DocumentKind, FieldPath,
    ValidationError, Violation, ViolationKind,
};
pub use windfile::{ActionFile, Metadata, Repository, Windfile};
