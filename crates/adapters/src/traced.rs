// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::hook::{HookError, TransitionHook};
use async_trait::async_trait;
use cis_core::{Job, PipelineId, Status};
use tracing::Instrument;

/// Wrapper that adds tracing to any TransitionHook
#[derive(Clone)]
pub struct TracedHook<H> {
    inner: H,
}

impl<H> TracedHook<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: TransitionHook> TransitionHook for TracedHook<H> {
    async fn on_success(&self, pipeline_id: &PipelineId, job: &Job) -> Result<(), HookError> {
        let span = tracing::info_span!(
            "hook.on_success",
            pipeline_id = %pipeline_id,
            job_id = %job.id,
            job_name = %job.name,
        );

        async {
            // Precondition: only successful jobs are reported
            if job.status != Status::Success {
                tracing::error!(status = %job.status, "job is not successful");
                return Err(HookError::Failed(format!(
                    "job {} is {}, not success",
                    job.id, job.status
                )));
            }

            tracing::info!("notifying");
            let start = std::time::Instant::now();
            let result = self.inner.on_success(pipeline_id, job).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "hook completed"),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "hook failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
