// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain error types

use crate::id::{JobId, PipelineId};
use crate::status::Status;
use thiserror::Error;

/// A job creation request (or persisted value) that cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("job name must not be blank")]
    MissingName,
    #[error("job must reference a pipeline")]
    MissingPipeline,
    #[error("unknown pipeline: {0}")]
    UnknownPipeline(PipelineId),
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

/// The requested event is not allowed from the job's current status.
///
/// The job is left untouched; callers inspect `status` and decide what to do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {event} job {id} in status {status}")]
pub struct TransitionError {
    pub id: JobId,
    pub status: Status,
    pub event: &'static str,
}
