// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status machine wired to the store and the success hook
//!
//! Every change follows the same path: the pure transition on a job
//! snapshot produces effects, the executor commits the `Persist` effect
//! conditionally on the snapshot's status, and only then emits events and
//! schedules the hook.

use crate::config::HookConfig;
use crate::error::EngineError;
use crate::executor::Executor;
use crate::view::PipelineStatusView;
use chrono::TimeDelta;
use cis_adapters::TransitionHook;
use cis_core::{Clock, Effect, Event, Job, JobEvent, JobId, NewJob, Pipeline, UserId};
use cis_storage::JobStore;
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct StatusMachine<S, H, C> {
    executor: Executor<S, H>,
    clock: C,
}

impl<S, H, C> StatusMachine<S, H, C>
where
    S: JobStore,
    H: TransitionHook,
    C: Clock,
{
    pub fn new(store: Arc<S>, hook: H, clock: C, hook_config: HookConfig) -> Self {
        Self {
            executor: Executor::new(store, hook, hook_config),
            clock,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        self.executor.store()
    }

    /// Read-only aggregation over the same store
    pub fn view(&self) -> PipelineStatusView<S> {
        PipelineStatusView::new(Arc::clone(self.store()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.executor.subscribe()
    }

    /// Wait for outstanding success hooks, e.g. before shutdown
    pub async fn flush_hooks(&self) {
        self.executor.flush_hooks().await;
    }

    pub fn create_pipeline(&self, pipeline: Pipeline) -> Result<(), EngineError> {
        let id = pipeline.id.clone();
        self.store().create_pipeline(pipeline)?;
        tracing::info!(pipeline_id = %id, "pipeline created");
        Ok(())
    }

    /// Validate and insert a new pending job
    pub async fn create_job(&self, job: NewJob) -> Result<Job, EngineError> {
        let job = self.store().insert(job, self.clock.now())?;
        self.executor
            .execute(Effect::Emit {
                event: Event::JobCreated {
                    id: job.id,
                    pipeline_id: job.pipeline_id.clone(),
                    name: job.name.clone(),
                },
            })
            .await?;
        Ok(job)
    }

    pub fn job(&self, id: JobId) -> Result<Job, EngineError> {
        Ok(self.store().job(id)?)
    }

    /// Read the current job and apply `event` to it
    pub async fn transition(&self, id: JobId, event: JobEvent) -> Result<Job, EngineError> {
        let job = self.job(id)?;
        self.apply(&job, event).await
    }

    /// Apply `event` to a snapshot the caller already holds.
    ///
    /// Fails with [`EngineError::StaleState`] if the stored job moved on since
    /// the snapshot was read, and with [`EngineError::InvalidTransition`] if
    /// the event is not allowed from the snapshot's status. Either way
    /// nothing was written.
    pub async fn apply(&self, snapshot: &Job, event: JobEvent) -> Result<Job, EngineError> {
        let (next, effects) = snapshot.transition(event, &self.clock).inspect_err(|e| {
            tracing::debug!(error = %e, "transition rejected");
        })?;
        let stored = self.executor.execute_all(effects).await?;
        Ok(stored.unwrap_or(next))
    }

    pub async fn run(&self, id: JobId) -> Result<Job, EngineError> {
        self.transition(id, JobEvent::Run).await
    }

    pub async fn succeed(&self, id: JobId) -> Result<Job, EngineError> {
        self.transition(id, JobEvent::Success).await
    }

    /// The `drop` event: the job failed
    pub async fn fail(&self, id: JobId) -> Result<Job, EngineError> {
        self.transition(id, JobEvent::Drop).await
    }

    pub async fn cancel(&self, id: JobId) -> Result<Job, EngineError> {
        self.transition(id, JobEvent::Cancel).await
    }

    /// Mark a finished job's output as purged
    pub async fn erase(&self, id: JobId, erased_by: Option<UserId>) -> Result<Job, EngineError> {
        let job = self.job(id)?;
        let (next, effects) = job.erase(erased_by, &self.clock)?;
        let stored = self.executor.execute_all(effects).await?;
        Ok(stored.unwrap_or(next))
    }

    pub fn duration(&self, id: JobId) -> Result<Option<TimeDelta>, EngineError> {
        Ok(self.job(id)?.duration(&self.clock))
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
