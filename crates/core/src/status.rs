// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status and the composite-status reduction

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The status of a single job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::Running,
        Status::Success,
        Status::Failed,
        Status::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Running => "running",
            Status::Success => "success",
            Status::Failed => "failed",
            Status::Canceled => "canceled",
        }
    }

    /// Check if this status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Success | Status::Failed | Status::Canceled)
    }

    /// Whether an `allow_failure` job in this status is ignored by aggregation
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed | Status::Canceled)
    }

    /// Rank used when reducing many statuses to one; higher wins.
    fn precedence(&self) -> u8 {
        match self {
            Status::Running => 4,
            Status::Pending => 3,
            Status::Failed => 2,
            Status::Canceled => 1,
            Status::Success => 0,
        }
    }

    /// Reduce statuses to one composite status.
    ///
    /// Running beats pending beats failed beats canceled beats success.
    /// An empty input is `Success`.
    pub fn composite<I>(statuses: I) -> Status
    where
        I: IntoIterator<Item = Status>,
    {
        statuses
            .into_iter()
            .max_by_key(Status::precedence)
            .unwrap_or(Status::Success)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
