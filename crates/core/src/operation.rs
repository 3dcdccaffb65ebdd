// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log

use crate::id::{JobId, UserId};
use crate::job::Job;
use crate::pipeline::Pipeline;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Register a pipeline that jobs may reference
    PipelineCreate { pipeline: Pipeline },

    /// Insert a newly created job (id already assigned)
    JobInsert { job: Job },

    /// Move a job to a new status.
    ///
    /// Only valid while the stored status still equals `expected`.
    JobTransition {
        id: JobId,
        expected: Status,
        status: Status,
        started_at: Option<DateTime<Utc>>,
        finished_at: Option<DateTime<Utc>>,
    },

    /// Mark a job's trace and artifacts as purged
    JobErase {
        id: JobId,
        erased_by: Option<UserId>,
        erased_at: DateTime<Utc>,
    },
}

impl Operation {
    /// Job touched by this operation, if any
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Operation::PipelineCreate { .. } => None,
            Operation::JobInsert { job } => Some(job.id),
            Operation::JobTransition { id, .. } | Operation::JobErase { id, .. } => Some(*id),
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
