// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status state machine
//!
//! A job is one CI status record inside a pipeline. Its status only moves
//! through [`Job::transition`], which is pure: it returns the updated job and
//! the effects the caller must carry out (persist first, then emit/notify).
//!
//! ```text
//! pending --run--> running
//! pending|running --success--> success
//! pending|running --drop-----> failed
//! pending|running --cancel---> canceled
//! ```

use crate::clock::Clock;
use crate::effect::Effect;
use crate::error::{TransitionError, ValidationError};
use crate::event::Event;
use crate::id::{JobId, PipelineId, ProjectId, UserId};
use crate::operation::Operation;
use crate::status::Status;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_STAGE: &str = "test";

/// Events that can change job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobEvent {
    /// A runner picked the job up
    Run,
    /// The job finished successfully
    Success,
    /// The job failed
    Drop,
    /// The job was canceled
    Cancel,
}

impl JobEvent {
    pub const ALL: [JobEvent; 4] = [
        JobEvent::Run,
        JobEvent::Success,
        JobEvent::Drop,
        JobEvent::Cancel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JobEvent::Run => "run",
            JobEvent::Success => "success",
            JobEvent::Drop => "drop",
            JobEvent::Cancel => "cancel",
        }
    }

    /// Statuses this event may be applied from
    pub fn allowed_from(&self) -> &'static [Status] {
        match self {
            JobEvent::Run => &[Status::Pending],
            JobEvent::Success | JobEvent::Drop | JobEvent::Cancel => {
                &[Status::Pending, Status::Running]
            }
        }
    }

    /// Status the job ends in after this event
    pub fn target(&self) -> Status {
        match self {
            JobEvent::Run => Status::Running,
            JobEvent::Success => Status::Success,
            JobEvent::Drop => Status::Failed,
            JobEvent::Cancel => Status::Canceled,
        }
    }

    /// The event that moves a job from `from` to `to`, if the table has one
    pub fn between(from: Status, to: Status) -> Option<JobEvent> {
        JobEvent::ALL
            .into_iter()
            .find(|event| event.target() == to && event.allowed_from().contains(&from))
    }
}

/// A request to create a job. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub pipeline_id: PipelineId,
    pub name: String,
    pub stage: String,
    pub stage_idx: i32,
    pub allow_failure: bool,
    pub git_ref: Option<String>,
    pub author_id: Option<UserId>,
    pub project_id: Option<ProjectId>,
    pub trigger_request_id: Option<u64>,
    pub description: Option<String>,
    pub target_url: Option<String>,
}

impl NewJob {
    pub fn new(pipeline_id: impl Into<PipelineId>, name: impl Into<String>) -> Self {
        Self {
            pipeline_id: pipeline_id.into(),
            name: name.into(),
            stage: DEFAULT_STAGE.to_string(),
            stage_idx: 0,
            allow_failure: false,
            git_ref: None,
            author_id: None,
            project_id: None,
            trigger_request_id: None,
            description: None,
            target_url: None,
        }
    }

    pub fn with_stage(self, stage: impl Into<String>, stage_idx: i32) -> Self {
        Self {
            stage: stage.into(),
            stage_idx,
            ..self
        }
    }

    pub fn allow_failure(self, allow_failure: bool) -> Self {
        Self {
            allow_failure,
            ..self
        }
    }

    pub fn with_ref(self, git_ref: impl Into<String>) -> Self {
        Self {
            git_ref: Some(git_ref.into()),
            ..self
        }
    }

    pub fn with_author(self, author_id: UserId) -> Self {
        Self {
            author_id: Some(author_id),
            ..self
        }
    }

    pub fn with_project(self, project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..self
        }
    }

    pub fn with_trigger_request(self, trigger_request_id: u64) -> Self {
        Self {
            trigger_request_id: Some(trigger_request_id),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn with_target_url(self, target_url: impl Into<String>) -> Self {
        Self {
            target_url: Some(target_url.into()),
            ..self
        }
    }

    /// Check required fields. Pipeline existence is checked by the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.pipeline_id.as_str().trim().is_empty() {
            return Err(ValidationError::MissingPipeline);
        }
        Ok(())
    }

    /// Build the pending job once the store has assigned an id
    pub fn into_job(self, id: JobId, created_at: DateTime<Utc>) -> Job {
        Job {
            id,
            pipeline_id: self.pipeline_id,
            name: self.name,
            stage: self.stage,
            stage_idx: self.stage_idx,
            status: Status::Pending,
            allow_failure: self.allow_failure,
            created_at,
            started_at: None,
            finished_at: None,
            git_ref: self.git_ref,
            author_id: self.author_id,
            project_id: self.project_id,
            trigger_request_id: self.trigger_request_id,
            description: self.description,
            target_url: self.target_url,
            erased_at: None,
            erased_by_id: None,
        }
    }
}

/// A single CI status record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub pipeline_id: PipelineId,
    pub name: String,
    pub stage: String,
    pub stage_idx: i32,
    pub status: Status,
    pub allow_failure: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub git_ref: Option<String>,
    pub author_id: Option<UserId>,
    pub project_id: Option<ProjectId>,
    pub trigger_request_id: Option<u64>,
    pub description: Option<String>,
    pub target_url: Option<String>,
    pub erased_at: Option<DateTime<Utc>>,
    pub erased_by_id: Option<UserId>,
}

impl Job {
    /// Pure transition function - returns the new job and the effects to run.
    ///
    /// The first effect is always the conditional `Persist`; the rest must
    /// only run once it has committed.
    pub fn transition(
        &self,
        event: JobEvent,
        clock: &impl Clock,
    ) -> Result<(Job, Vec<Effect>), TransitionError> {
        if !event.allowed_from().contains(&self.status) {
            return Err(TransitionError {
                id: self.id,
                status: self.status,
                event: event.name(),
            });
        }

        let now = clock.now();
        let status = event.target();
        let mut job = Job {
            status,
            ..self.clone()
        };
        if self.status == Status::Pending && status == Status::Running {
            job.started_at = Some(now);
        }
        if status.is_terminal() {
            job.finished_at = Some(now);
        }

        let id = self.id;
        let pipeline_id = self.pipeline_id.clone();
        let emitted = match event {
            JobEvent::Run => Event::JobStarted { id, pipeline_id },
            JobEvent::Success => Event::JobSucceeded { id, pipeline_id },
            JobEvent::Drop => Event::JobFailed { id, pipeline_id },
            JobEvent::Cancel => Event::JobCanceled { id, pipeline_id },
        };

        let mut effects = vec![
            Effect::Persist {
                operation: Operation::JobTransition {
                    id,
                    expected: self.status,
                    status,
                    started_at: job.started_at,
                    finished_at: job.finished_at,
                },
            },
            Effect::Emit { event: emitted },
        ];
        if status == Status::Success {
            effects.push(Effect::NotifySuccess {
                pipeline_id: self.pipeline_id.clone(),
                job: Box::new(job.clone()),
            });
        }

        Ok((job, effects))
    }

    /// Mark the job's trace and artifacts as purged.
    ///
    /// Only finished jobs can be erased, and only once. Status is untouched.
    pub fn erase(
        &self,
        erased_by: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<(Job, Vec<Effect>), TransitionError> {
        if !self.status.is_terminal() || self.is_erased() {
            return Err(TransitionError {
                id: self.id,
                status: self.status,
                event: "erase",
            });
        }

        let now = clock.now();
        let job = Job {
            erased_at: Some(now),
            erased_by_id: erased_by,
            ..self.clone()
        };
        let effects = vec![
            Effect::Persist {
                operation: Operation::JobErase {
                    id: self.id,
                    erased_by,
                    erased_at: now,
                },
            },
            Effect::Emit {
                event: Event::JobErased {
                    id: self.id,
                    pipeline_id: self.pipeline_id.clone(),
                },
            },
        ];
        Ok((job, effects))
    }

    /// Time spent running.
    ///
    /// Finished jobs report a fixed value; running jobs report the time so far,
    /// which changes with every call. Jobs that never started have none.
    pub fn duration(&self, clock: &impl Clock) -> Option<TimeDelta> {
        let started_at = self.started_at?;
        match self.finished_at {
            Some(finished_at) => Some(finished_at - started_at),
            None => Some(clock.now() - started_at),
        }
    }

    /// A failure that does not count against aggregate health
    pub fn is_ignored(&self) -> bool {
        self.allow_failure && self.status.is_failure()
    }

    /// Stuck detection needs runner state that lives outside this crate.
    pub fn is_stuck(&self) -> bool {
        false
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_erased(&self) -> bool {
        self.erased_at.is_some()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
