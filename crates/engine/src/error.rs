// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the status engine

use cis_core::{JobId, PipelineId, Status, TransitionError, ValidationError};
use cis_storage::StoreError;
use thiserror::Error;

/// Errors returned by engine operations
///
/// `InvalidTransition` and `StaleState` are expected outcomes: the job was
/// left untouched and the caller may re-read and decide again.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid job: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),
    #[error("stale state for job {id}: expected {expected}, found {actual}")]
    StaleState {
        id: JobId,
        expected: Status,
        actual: Status,
    },
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("pipeline not found: {0}")]
    PipelineNotFound(PipelineId),
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl EngineError {
    /// True for the outcomes where the job was left unmodified by a race or
    /// a disallowed event
    pub fn is_rejected_transition(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidTransition(_) | EngineError::StaleState { .. }
        )
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StaleState {
                id,
                expected,
                actual,
            } => EngineError::StaleState {
                id,
                expected,
                actual,
            },
            StoreError::JobNotFound(id) => EngineError::JobNotFound(id),
            StoreError::PipelineNotFound(id) => EngineError::PipelineNotFound(id),
            StoreError::Validation(e) => EngineError::Validation(e),
            other => EngineError::Storage(other),
        }
    }
}
