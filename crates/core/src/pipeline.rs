// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline (commit) entity as seen by the status core
//!
//! Only the identifiers and commit fields the core reads are modelled here.
//! The store bumps `updated_at` when a job of the pipeline finishes.

use crate::id::{PipelineId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel reported when a pipeline has no parent commit
pub const BLANK_SHA: &str = "0000000000000000000000000000000000000000";

const SHORT_SHA_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: PipelineId,
    pub project_id: Option<ProjectId>,
    pub sha: String,
    pub before_sha: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Pipeline {
    pub fn new(id: impl Into<PipelineId>, sha: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            sha: sha.into(),
            before_sha: None,
            updated_at: now,
        }
    }

    pub fn with_project(self, project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..self
        }
    }

    pub fn with_before_sha(self, before_sha: impl Into<String>) -> Self {
        Self {
            before_sha: Some(before_sha.into()),
            ..self
        }
    }

    /// Parent commit sha, or [`BLANK_SHA`] when there is none
    pub fn before_sha(&self) -> &str {
        self.before_sha.as_deref().unwrap_or(BLANK_SHA)
    }

    pub fn short_sha(&self) -> &str {
        self.sha
            .char_indices()
            .nth(SHORT_SHA_LEN)
            .map(|(i, _)| &self.sha[..i])
            .unwrap_or(&self.sha)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
