// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects requested by the job state machine

use crate::event::Event;
use crate::id::PipelineId;
use crate::job::Job;
use crate::operation::Operation;
use crate::traced::TracedEffect;

/// Side effects that a transition asks the caller to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Conditionally write the change to the store
    Persist { operation: Operation },
    /// Emit an event for other components to observe
    Emit { event: Event },
    /// Run the success hook once the transition is durable
    NotifySuccess {
        pipeline_id: PipelineId,
        job: Box<Job>,
    },
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Persist { .. } => "persist",
            Effect::Emit { .. } => "emit",
            Effect::NotifySuccess { .. } => "notify_success",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Persist { operation } => {
                let mut fields = vec![("operation", operation_name(operation).to_string())];
                if let Some(id) = operation.job_id() {
                    fields.push(("job_id", id.to_string()));
                }
                if let Operation::JobTransition {
                    expected, status, ..
                } = operation
                {
                    fields.push(("from", expected.to_string()));
                    fields.push(("to", status.to_string()));
                }
                fields
            }
            Effect::Emit { event } => vec![
                ("event", event.name().to_string()),
                ("job_id", event.job_id().to_string()),
            ],
            Effect::NotifySuccess { pipeline_id, job } => vec![
                ("pipeline_id", pipeline_id.to_string()),
                ("job_id", job.id.to_string()),
                ("job_name", job.name.clone()),
            ],
        }
    }
}

fn operation_name(operation: &Operation) -> &'static str {
    match operation {
        Operation::PipelineCreate { .. } => "pipeline_create",
        Operation::JobInsert { .. } => "job_insert",
        Operation::JobTransition { .. } => "job_transition",
        Operation::JobErase { .. } => "job_erase",
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
