// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capabilities the pipeline needs from the outside world

pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use traits::{
    CheckError, CheckOutcome, FetchError, PlanGraphFetcher, PlanSpecProducer, ProducerError,
    ProducerOutput, SyntaxChecker,
};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{CapabilityCall, FakeCapabilities, FakeChecker, FakeFetcher, FakeProducer};
