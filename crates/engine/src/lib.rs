// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! CI status engine: transition orchestration and pipeline aggregation

mod config;
mod error;
mod executor;
mod machine;
mod view;

pub use config::{ConfigError, EngineConfig, HookConfig};
pub use error::EngineError;
pub use machine::StatusMachine;
pub use view::PipelineStatusView;
