// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage ordering and per-stage composite status
//!
//! Jobs are grouped by their `stage` label. A stage sorts by the largest
//! `stage_idx` seen among its jobs, then by name, so the order does not
//! depend on the order rows arrive in.

use crate::job::Job;
use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One stage of a pipeline with its composite status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatus {
    pub name: String,
    /// Resolved sort key (max `stage_idx` of the stage's jobs)
    pub index: i32,
    pub status: Status,
}

/// Stage names in pipeline order
pub fn stages(jobs: &[Job]) -> Vec<String> {
    stages_status(jobs).into_iter().map(|s| s.name).collect()
}

/// Stages in pipeline order, each with its composite status.
///
/// Ignored jobs (allowed failures) do not contribute; a stage made only of
/// ignored jobs is `Success`.
pub fn stages_status(jobs: &[Job]) -> Vec<StageStatus> {
    let mut groups: HashMap<&str, (i32, Vec<Status>)> = HashMap::new();
    for job in jobs {
        let (index, statuses) = groups
            .entry(job.stage.as_str())
            .or_insert((job.stage_idx, Vec::new()));
        *index = (*index).max(job.stage_idx);
        if !job.is_ignored() {
            statuses.push(job.status);
        }
    }

    let mut stages: Vec<StageStatus> = groups
        .into_iter()
        .map(|(name, (index, statuses))| StageStatus {
            name: name.to_string(),
            index,
            status: Status::composite(statuses),
        })
        .collect();
    stages.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)));
    stages
}

/// Pipeline-level status from its stage statuses
pub fn overall_status(stages: &[StageStatus]) -> Status {
    Status::composite(stages.iter().map(|s| s.status))
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
