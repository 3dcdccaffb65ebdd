// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op hook for deployments without pipeline post-processing.

use super::{HookError, TransitionHook};
use async_trait::async_trait;
use cis_core::{Job, PipelineId};

/// Hook that accepts every notification and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpHook;

impl NoOpHook {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransitionHook for NoOpHook {
    async fn on_success(&self, _pipeline_id: &PipelineId, _job: &Job) -> Result<(), HookError> {
        Ok(())
    }
}
