// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by job transitions

use crate::id::{JobId, PipelineId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    JobCreated {
        id: JobId,
        pipeline_id: PipelineId,
        name: String,
    },
    JobStarted {
        id: JobId,
        pipeline_id: PipelineId,
    },
    JobSucceeded {
        id: JobId,
        pipeline_id: PipelineId,
    },
    JobFailed {
        id: JobId,
        pipeline_id: PipelineId,
    },
    JobCanceled {
        id: JobId,
        pipeline_id: PipelineId,
    },
    JobErased {
        id: JobId,
        pipeline_id: PipelineId,
    },
}

impl Event {
    /// Event name in `noun:verb` form, used for log fields
    pub fn name(&self) -> &'static str {
        match self {
            Event::JobCreated { .. } => "job:created",
            Event::JobStarted { .. } => "job:running",
            Event::JobSucceeded { .. } => "job:success",
            Event::JobFailed { .. } => "job:failed",
            Event::JobCanceled { .. } => "job:canceled",
            Event::JobErased { .. } => "job:erased",
        }
    }

    pub fn job_id(&self) -> JobId {
        match self {
            Event::JobCreated { id, .. }
            | Event::JobStarted { id, .. }
            | Event::JobSucceeded { id, .. }
            | Event::JobFailed { id, .. }
            | Event::JobCanceled { id, .. }
            | Event::JobErased { id, .. } => *id,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
