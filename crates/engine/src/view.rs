// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline status aggregation over store snapshots

use crate::error::EngineError;
use cis_core::{Job, Pipeline, PipelineId, StageStatus, Status};
use cis_storage::JobStore;
use std::sync::Arc;

/// Answers which stages a pipeline has, in what order, and how each is doing.
///
/// Every query reads a fresh snapshot and keeps only the latest attempt of
/// each job name before aggregating. Nothing is locked across calls, so two
/// queries may observe different snapshots.
pub struct PipelineStatusView<S> {
    store: Arc<S>,
}

impl<S: JobStore> PipelineStatusView<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn pipeline(&self, id: &PipelineId) -> Result<Pipeline, EngineError> {
        Ok(self.store.pipeline(id)?)
    }

    /// Latest attempt per job name, sorted by name
    pub fn latest(&self, id: &PipelineId) -> Result<Vec<Job>, EngineError> {
        let jobs = self.store.jobs_for_pipeline(id)?;
        let latest = cis_core::latest(&jobs);
        tracing::trace!(
            pipeline_id = %id,
            jobs = jobs.len(),
            latest = latest.len(),
            "selected latest"
        );
        Ok(latest)
    }

    pub fn stages(&self, id: &PipelineId) -> Result<Vec<String>, EngineError> {
        Ok(cis_core::stages(&self.latest(id)?))
    }

    pub fn stages_status(&self, id: &PipelineId) -> Result<Vec<StageStatus>, EngineError> {
        Ok(cis_core::stages_status(&self.latest(id)?))
    }

    pub fn overall_status(&self, id: &PipelineId) -> Result<Status, EngineError> {
        Ok(cis_core::overall_status(&self.stages_status(id)?))
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
