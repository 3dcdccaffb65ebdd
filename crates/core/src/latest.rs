// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Latest attempt per job name

use crate::id::PipelineId;
use crate::job::Job;
use std::collections::HashMap;

/// Keep only the most recent attempt (highest id) of each job name.
///
/// Attempts are keyed by `(pipeline_id, name)`. The result is ordered by
/// name, then pipeline.
pub fn latest(jobs: &[Job]) -> Vec<Job> {
    let mut by_name: HashMap<(&PipelineId, &str), &Job> = HashMap::new();
    for job in jobs {
        by_name
            .entry((&job.pipeline_id, job.name.as_str()))
            .and_modify(|current| {
                if job.id > current.id {
                    *current = job;
                }
            })
            .or_insert(job);
    }

    let mut latest: Vec<Job> = by_name.into_values().cloned().collect();
    latest.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.pipeline_id.cmp(&b.pipeline_id))
    });
    latest
}

#[cfg(test)]
#[path = "latest_tests.rs"]
mod tests;
