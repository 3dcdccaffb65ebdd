// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cis-core: CI job status domain
//!
//! This crate provides:
//! - The pure job status state machine and the effects it requests
//! - Stage ordering and composite status aggregation
//! - Latest-attempt selection across retried jobs
//! - WAL operations and an injectable clock

pub mod clock;
pub mod error;
pub mod id;
pub mod status;

pub mod effect;
pub mod event;
pub mod job;
pub mod latest;
pub mod operation;
pub mod pipeline;
pub mod stage;
pub mod traced;

pub use clock::{Clock, FakeClock, SystemClock};
pub use effect::Effect;
pub use error::{TransitionError, ValidationError};
pub use event::Event;
pub use id::{JobId, PipelineId, ProjectId, UserId};
pub use job::{Job, JobEvent, NewJob};
pub use latest::latest;
pub use operation::Operation;
pub use pipeline::{Pipeline, BLANK_SHA};
pub use stage::{overall_status, stages, stages_status, StageStatus};
pub use status::Status;
pub use traced::TracedEffect;
