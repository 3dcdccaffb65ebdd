// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle: allowed transitions, timestamps and the success hook

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn job_moves_from_pending_through_running_to_success() {
    let world = World::new();
    let job = world.job("rspec", "test", 1).await;
    assert_eq!(job.status, Status::Pending);
    assert_eq!(job.started_at, None);

    world.clock.advance(Duration::from_secs(10));
    let running = world.machine.run(job.id).await.unwrap();
    assert_eq!(running.started_at, Some(world.clock.now()));
    assert_eq!(running.finished_at, None);

    world.clock.advance(Duration::from_secs(50));
    let done = world.machine.succeed(job.id).await.unwrap();
    assert_eq!(done.status, Status::Success);
    assert_eq!(done.finished_at, Some(world.clock.now()));
    assert_eq!(
        world.machine.duration(job.id).unwrap(),
        Some(chrono::TimeDelta::seconds(50))
    );
}

#[tokio::test]
async fn pending_job_can_finish_without_running() {
    let world = World::new();
    let job = world.job("rspec", "test", 1).await;

    let failed = world.machine.fail(job.id).await.unwrap();

    assert_eq!(failed.status, Status::Failed);
    assert_eq!(failed.started_at, None);
    assert!(failed.finished_at.is_some());
    assert_eq!(world.machine.duration(job.id).unwrap(), None);
}

#[tokio::test]
async fn terminal_jobs_reject_every_event() {
    let world = World::new();

    for finish in [JobEvent::Success, JobEvent::Drop, JobEvent::Cancel] {
        let job = world.job("rspec", "test", 1).await;
        let finished = world.machine.transition(job.id, finish).await.unwrap();

        for event in JobEvent::ALL {
            let err = world.machine.transition(job.id, event).await.unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidTransition(_)),
                "{event:?} after {finish:?} should be invalid, got {err:?}"
            );
        }
        assert_eq!(world.machine.job(job.id).unwrap(), finished);
    }
}

#[tokio::test]
async fn running_job_cannot_run_again() {
    let world = World::new();
    let job = world.job("rspec", "test", 1).await;
    let running = world.machine.run(job.id).await.unwrap();

    world.clock.advance(Duration::from_secs(5));
    let err = world.machine.run(job.id).await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidTransition(_)), "got {err:?}");
    assert_eq!(world.machine.job(job.id).unwrap(), running);
}

#[tokio::test]
async fn cancel_twice_is_rejected_without_changes() {
    let world = World::new();
    let job = world.job("rspec", "test", 1).await;
    let canceled = world.machine.cancel(job.id).await.unwrap();

    world.clock.advance(Duration::from_secs(5));
    let err = world.machine.cancel(job.id).await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidTransition(_)), "got {err:?}");
    assert_eq!(world.machine.job(job.id).unwrap(), canceled);
}

#[tokio::test]
async fn success_notifies_hook_after_commit() {
    let world = World::new();
    let job = world.job("deploy", "deploy", 2).await;

    world.machine.run(job.id).await.unwrap();
    world.machine.flush_hooks().await;
    assert!(world.hook.calls().is_empty(), "running is not success");

    world.machine.succeed(job.id).await.unwrap();
    world.machine.flush_hooks().await;

    let calls = world.hook.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].pipeline_id, world.pipeline);
    assert_eq!(calls[0].job_name, "deploy");
}

#[tokio::test]
async fn failing_hook_is_retried_and_never_rolls_back() {
    let world = World::new();
    world.hook.fail_next(100);
    let job = world.job("deploy", "deploy", 2).await;

    let done = world.machine.succeed(job.id).await.unwrap();
    world.machine.flush_hooks().await;

    assert_eq!(done.status, Status::Success);
    assert_eq!(world.machine.job(job.id).unwrap().status, Status::Success);
    assert_eq!(world.hook.calls().len(), 3, "one call per configured attempt");
}
