// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use cis_core::{Job, JobId, Operation, Pipeline, PipelineId};
use std::collections::{BTreeMap, HashMap};

/// Materialized state built from WAL operations.
///
/// The store checks preconditions before logging, but `apply` checks them
/// again: a transition whose `expected` status no longer matches, or a second
/// erase, is skipped so replay can never move a job off its lifecycle.
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub pipelines: HashMap<PipelineId, Pipeline>,
    pub jobs: BTreeMap<JobId, Job>,
    pub last_job_id: u64,
}

impl MaterializedState {
    /// Next id to hand out; ids never repeat
    pub fn next_job_id(&self) -> JobId {
        JobId(self.last_job_id + 1)
    }

    /// Jobs of one pipeline in creation order
    pub fn jobs_for_pipeline(&self, pipeline_id: &PipelineId) -> Vec<Job> {
        self.jobs
            .values()
            .filter(|job| &job.pipeline_id == pipeline_id)
            .cloned()
            .collect()
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::PipelineCreate { pipeline } => {
                self.pipelines
                    .insert(pipeline.id.clone(), pipeline.clone());
            }

            Operation::JobInsert { job } => {
                self.last_job_id = self.last_job_id.max(job.id.0);
                self.jobs.insert(job.id, job.clone());
            }

            Operation::JobTransition {
                id,
                expected,
                status,
                started_at,
                finished_at,
            } => {
                if let Some(job) = self.jobs.get_mut(id) {
                    if job.status != *expected {
                        tracing::warn!(
                            job_id = %id,
                            expected = %expected,
                            actual = %job.status,
                            to = %status,
                            "skipping stale transition"
                        );
                        return;
                    }
                    job.status = *status;
                    job.started_at = *started_at;
                    job.finished_at = *finished_at;

                    // A finished job touches its pipeline
                    if let (Some(finished_at), Some(pipeline)) =
                        (finished_at, self.pipelines.get_mut(&job.pipeline_id))
                    {
                        pipeline.updated_at = pipeline.updated_at.max(*finished_at);
                    }
                }
            }

            Operation::JobErase {
                id,
                erased_by,
                erased_at,
            } => {
                if let Some(job) = self.jobs.get_mut(id) {
                    if job.erased_at.is_some() {
                        tracing::warn!(job_id = %id, "skipping repeated erase");
                        return;
                    }
                    job.erased_at = Some(*erased_at);
                    job.erased_by_id = *erased_by;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
