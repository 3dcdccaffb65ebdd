// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Success hook invoked after a job's success is durable

mod noop;

pub use noop::NoOpHook;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHook, HookCall};

use async_trait::async_trait;
use cis_core::{Job, PipelineId};
use thiserror::Error;

/// Errors from hook delivery
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HookError {
    #[error("hook failed: {0}")]
    Failed(String),
    /// The downstream receiver could not be reached
    #[error("hook unavailable: {0}")]
    Unavailable(String),
}

/// Receiver of the success notification for a pipeline.
///
/// Called once per delivery attempt after a success is committed; failed
/// attempts are retried per the engine's hook policy. A returned error never
/// rolls the job back.
#[async_trait]
pub trait TransitionHook: Clone + Send + Sync + 'static {
    async fn on_success(&self, pipeline_id: &PipelineId, job: &Job) -> Result<(), HookError>;
}
