// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::config::HookConfig;
use crate::error::EngineError;
use cis_adapters::TransitionHook;
use cis_core::{Effect, Event, Job, PipelineId, TracedEffect};
use cis_storage::JobStore;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Buffered events per subscriber before slow receivers start lagging
const EVENT_CAPACITY: usize = 256;

/// Executes effects against the store and the success hook
pub(crate) struct Executor<S, H> {
    store: Arc<S>,
    hook: H,
    hook_config: HookConfig,
    events: broadcast::Sender<Event>,
    hook_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<S, H> Executor<S, H>
where
    S: JobStore,
    H: TransitionHook,
{
    pub fn new(store: Arc<S>, hook: H, hook_config: HookConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            hook,
            hook_config,
            events,
            hook_tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Receive every event emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Execute effects in order, stopping at the first failure.
    ///
    /// Returns the job as stored by the `Persist` effect, if there was one.
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Result<Option<Job>, EngineError> {
        let mut committed = None;
        for effect in effects {
            if let Some(job) = self.execute(effect).await? {
                committed = Some(job);
            }
        }
        Ok(committed)
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Result<Option<Job>, EngineError> {
        let span = tracing::info_span!("effect", effect = effect.name());

        async move {
            tracing::info!(fields = ?effect.fields(), "executing");

            let start = std::time::Instant::now();
            let result = self.execute_inner(effect);
            let elapsed = start.elapsed();

            match &result {
                Ok(job) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    committed = job.is_some(),
                    "completed"
                ),
                // Lost races are routine; keep them out of the error log
                Err(e) if e.is_rejected_transition() => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "rejected"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn execute_inner(&self, effect: Effect) -> Result<Option<Job>, EngineError> {
        match effect {
            Effect::Persist { operation } => {
                let job = self.store.commit(&operation)?;
                Ok(Some(job))
            }

            Effect::Emit { event } => {
                tracing::info!(event = event.name(), job_id = %event.job_id(), "event");
                // Err only means nobody is subscribed
                let _ = self.events.send(event);
                Ok(None)
            }

            Effect::NotifySuccess { pipeline_id, job } => {
                self.spawn_hook(pipeline_id, *job);
                Ok(None)
            }
        }
    }

    /// Deliver the success hook on its own task so the caller never waits on it
    fn spawn_hook(&self, pipeline_id: PipelineId, job: Job) {
        let span = tracing::info_span!("hook", pipeline_id = %pipeline_id, job_id = %job.id);
        let task = tokio::spawn(
            deliver(self.hook.clone(), self.hook_config.clone(), pipeline_id, job)
                .instrument(span),
        );

        let mut tasks = self.hook_tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);
    }

    /// Wait for every hook delivery started so far, including retries
    pub async fn flush_hooks(&self) {
        loop {
            let tasks = {
                let mut tasks = self.hook_tasks.lock().unwrap_or_else(|e| e.into_inner());
                std::mem::take(&mut *tasks)
            };
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    tracing::error!(error = %e, "hook task did not complete");
                }
            }
        }
    }
}

async fn deliver<H: TransitionHook>(
    hook: H,
    config: HookConfig,
    pipeline_id: PipelineId,
    job: Job,
) {
    let max_attempts = config.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match hook.on_success(&pipeline_id, &job).await {
            Ok(()) => {
                tracing::debug!(attempt, "hook delivered");
                return;
            }
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    "hook attempt failed, retrying"
                );
                tokio::time::sleep(config.backoff).await;
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "hook failed, giving up");
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
