// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake success hook for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HookError, TransitionHook};
use async_trait::async_trait;
use cis_core::{Job, JobId, PipelineId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded hook invocation, including failed attempts
#[derive(Debug, Clone, PartialEq)]
pub struct HookCall {
    pub pipeline_id: PipelineId,
    pub job_id: JobId,
    pub job_name: String,
}

#[derive(Clone, Copy)]
enum Failure {
    Failed,
    Unavailable,
}

#[derive(Default)]
struct FakeHookState {
    calls: Vec<HookCall>,
    failures: VecDeque<Failure>,
}

/// Fake hook that records calls and can fail on demand
#[derive(Clone, Default)]
pub struct FakeHook {
    inner: Arc<Mutex<FakeHookState>>,
}

impl FakeHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` invocations with [`HookError::Failed`]
    pub fn fail_next(&self, count: usize) {
        self.queue(Failure::Failed, count);
    }

    /// Report the receiver as unreachable for the next `count` invocations
    pub fn unavailable_next(&self, count: usize) {
        self.queue(Failure::Unavailable, count);
    }

    fn queue(&self, failure: Failure, count: usize) {
        self.lock()
            .failures
            .extend(std::iter::repeat_n(failure, count));
    }

    /// Get all recorded invocations
    pub fn calls(&self) -> Vec<HookCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeHookState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TransitionHook for FakeHook {
    async fn on_success(&self, pipeline_id: &PipelineId, job: &Job) -> Result<(), HookError> {
        let mut state = self.lock();
        state.calls.push(HookCall {
            pipeline_id: pipeline_id.clone(),
            job_id: job.id,
            job_name: job.name.clone(),
        });
        match state.failures.pop_front() {
            Some(Failure::Failed) => Err(HookError::Failed(format!(
                "injected failure for job {}",
                job.id
            ))),
            Some(Failure::Unavailable) => Err(HookError::Unavailable(format!(
                "receiver for pipeline {pipeline_id} is down"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
