// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup for the behavioral specs

pub use cis_adapters::{FakeHook, TracedHook};
pub use cis_core::{
    Clock, FakeClock, Job, JobEvent, JobId, NewJob, Pipeline, PipelineId, Status,
};
pub use cis_engine::{EngineError, HookConfig, PipelineStatusView, StatusMachine};
pub use cis_storage::{JobStore, WalStore};
pub use std::sync::Arc;
pub use std::time::Duration;

pub type Machine = StatusMachine<WalStore, TracedHook<FakeHook>, FakeClock>;

/// A status machine over one pipeline, with handles to its fakes
pub struct World {
    pub machine: Arc<Machine>,
    pub hook: FakeHook,
    pub clock: FakeClock,
    pub pipeline: PipelineId,
}

impl World {
    pub fn new() -> Self {
        Self::with_store(WalStore::in_memory())
    }

    pub fn with_store(store: WalStore) -> Self {
        let hook = FakeHook::new();
        let clock = FakeClock::new();
        let machine = StatusMachine::new(
            Arc::new(store),
            TracedHook::new(hook.clone()),
            clock.clone(),
            HookConfig {
                max_attempts: 3,
                backoff: Duration::ZERO,
            },
        );
        let pipeline = PipelineId::from("pipeline-42");
        if machine.view().pipeline(&pipeline).is_err() {
            machine
                .create_pipeline(Pipeline::new(pipeline.clone(), "a".repeat(40), clock.now()))
                .unwrap();
        }
        Self {
            machine: Arc::new(machine),
            hook,
            clock,
            pipeline,
        }
    }

    pub fn view(&self) -> PipelineStatusView<WalStore> {
        self.machine.view()
    }

    /// Create a job in `stage` at `stage_idx`
    pub async fn job(&self, name: &str, stage: &str, stage_idx: i32) -> Job {
        self.machine
            .create_job(NewJob::new(self.pipeline.clone(), name).with_stage(stage, stage_idx))
            .await
            .unwrap()
    }

    pub async fn allowed_to_fail(&self, name: &str, stage: &str, stage_idx: i32) -> Job {
        self.machine
            .create_job(
                NewJob::new(self.pipeline.clone(), name)
                    .with_stage(stage, stage_idx)
                    .allow_failure(true),
            )
            .await
            .unwrap()
    }

    /// Stage names with their composite status, in display order
    pub fn stage_statuses(&self) -> Vec<(String, Status)> {
        self.view()
            .stages_status(&self.pipeline)
            .unwrap()
            .into_iter()
            .map(|stage| (stage.name, stage.status))
            .collect()
    }
}
