// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job persistence contract and the WAL-backed store
//!
//! Job mutations are conditional: a status change only lands if the stored
//! status still matches the status the caller read. Losing writers get
//! [`StoreError::StaleState`] and must re-read before deciding again.

use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use chrono::{DateTime, Utc};
use cis_core::{
    Job, JobEvent, JobId, NewJob, Operation, Pipeline, PipelineId, Status, ValidationError,
};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {id} is {actual}, expected {expected}")]
    StaleState {
        id: JobId,
        expected: Status,
        actual: Status,
    },
    #[error("job {0} was already erased")]
    AlreadyErased(JobId),
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("pipeline not found: {0}")]
    PipelineNotFound(PipelineId),
    #[error("pipeline already exists: {0}")]
    DuplicatePipeline(PipelineId),
    #[error("invalid job: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid job update: {0}")]
    InvalidOperation(&'static str),
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
}

/// Operations the status core needs from persistence
pub trait JobStore: Send + Sync {
    /// Register a pipeline so jobs can reference it
    fn create_pipeline(&self, pipeline: Pipeline) -> Result<(), StoreError>;

    fn pipeline(&self, id: &PipelineId) -> Result<Pipeline, StoreError>;

    /// Insert a pending job, assigning the next monotonic id
    fn insert(&self, job: NewJob, created_at: DateTime<Utc>) -> Result<Job, StoreError>;

    fn job(&self, id: JobId) -> Result<Job, StoreError>;

    /// Snapshot of every job (all attempts) of a pipeline, in id order
    fn jobs_for_pipeline(&self, pipeline_id: &PipelineId) -> Result<Vec<Job>, StoreError>;

    /// Conditionally apply a job update and return the stored job.
    ///
    /// `JobTransition` requires the stored status to equal `expected`, a
    /// `(expected, status)` pair from the status table, and timestamps that
    /// match it. `JobErase` requires the job not to be erased yet.
    fn commit(&self, operation: &Operation) -> Result<Job, StoreError>;
}

/// Store backed by an append-only WAL, or purely in memory
pub struct WalStore {
    inner: Mutex<Inner>,
}

struct Inner {
    wal: Option<Wal>,
    state: MaterializedState,
}

impl Inner {
    /// Log first, then apply, so state never runs ahead of the log
    fn write(&mut self, op: Operation) -> Result<(), StoreError> {
        if let Some(wal) = self.wal.as_mut() {
            wal.append(&op)?;
        }
        self.state.apply(&op);
        Ok(())
    }

    fn job(&self, id: JobId) -> Result<&Job, StoreError> {
        self.state.jobs.get(&id).ok_or(StoreError::JobNotFound(id))
    }
}

impl WalStore {
    /// Open the WAL at `path`, replaying any existing entries
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let (wal, ops) = Wal::open(path)?;
        let mut state = MaterializedState::default();
        for op in &ops {
            state.apply(op);
        }

        tracing::info!(
            path = %path.display(),
            sequence = wal.sequence(),
            jobs = state.jobs.len(),
            "opened job store"
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                wal: Some(wal),
                state,
            }),
        })
    }

    /// Store without durability, for tests and embedding
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner {
                wal: None,
                state: MaterializedState::default(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl JobStore for WalStore {
    fn create_pipeline(&self, pipeline: Pipeline) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.state.pipelines.contains_key(&pipeline.id) {
            return Err(StoreError::DuplicatePipeline(pipeline.id));
        }
        inner.write(Operation::PipelineCreate { pipeline })
    }

    fn pipeline(&self, id: &PipelineId) -> Result<Pipeline, StoreError> {
        self.lock()
            .state
            .pipelines
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::PipelineNotFound(id.clone()))
    }

    fn insert(&self, job: NewJob, created_at: DateTime<Utc>) -> Result<Job, StoreError> {
        job.validate()?;

        let mut inner = self.lock();
        if !inner.state.pipelines.contains_key(&job.pipeline_id) {
            return Err(ValidationError::UnknownPipeline(job.pipeline_id).into());
        }

        let job = job.into_job(inner.state.next_job_id(), created_at);
        inner.write(Operation::JobInsert { job: job.clone() })?;
        Ok(job)
    }

    fn job(&self, id: JobId) -> Result<Job, StoreError> {
        self.lock().job(id).cloned()
    }

    fn jobs_for_pipeline(&self, pipeline_id: &PipelineId) -> Result<Vec<Job>, StoreError> {
        let inner = self.lock();
        if !inner.state.pipelines.contains_key(pipeline_id) {
            return Err(StoreError::PipelineNotFound(pipeline_id.clone()));
        }
        Ok(inner.state.jobs_for_pipeline(pipeline_id))
    }

    fn commit(&self, operation: &Operation) -> Result<Job, StoreError> {
        let mut inner = self.lock();
        let id = match operation {
            Operation::JobTransition {
                id,
                expected,
                status,
                started_at,
                finished_at,
            } => {
                if JobEvent::between(*expected, *status).is_none() {
                    return Err(StoreError::InvalidOperation(
                        "transition is not in the status table",
                    ));
                }
                let stored = inner.job(*id)?;
                if stored.status != *expected {
                    return Err(StoreError::StaleState {
                        id: *id,
                        expected: *expected,
                        actual: stored.status,
                    });
                }
                if finished_at.is_some() != status.is_terminal() {
                    return Err(StoreError::InvalidOperation(
                        "finished_at must be set exactly for terminal statuses",
                    ));
                }
                let started_ok = match status {
                    Status::Running => started_at.is_some(),
                    // Only `run` may set started_at
                    _ => *started_at == stored.started_at,
                };
                if !started_ok {
                    return Err(StoreError::InvalidOperation(
                        "started_at is only set when the job starts running",
                    ));
                }
                *id
            }
            Operation::JobErase { id, .. } => {
                if inner.job(*id)?.erased_at.is_some() {
                    return Err(StoreError::AlreadyErased(*id));
                }
                *id
            }
            Operation::PipelineCreate { .. } => {
                return Err(StoreError::InvalidOperation("pipeline create"))
            }
            Operation::JobInsert { .. } => return Err(StoreError::InvalidOperation("job insert")),
        };

        inner.write(operation.clone())?;
        inner.job(id).cloned()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
