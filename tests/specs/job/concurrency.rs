// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent writers racing on the same job

use crate::prelude::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn run_and_cancel_race_has_exactly_one_winner() {
    for _ in 0..20 {
        let world = World::new();
        let job = world.job("rspec", "test", 1).await;

        let tasks: Vec<_> = [JobEvent::Run, JobEvent::Cancel]
            .into_iter()
            .map(|event| {
                let machine = Arc::clone(&world.machine);
                let snapshot = job.clone();
                tokio::spawn(async move { machine.apply(&snapshot, event).await })
            })
            .collect();

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }

        let winners: Vec<&Job> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1, "results: {results:?}");
        for loser in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                matches!(
                    loser,
                    EngineError::StaleState { .. } | EngineError::InvalidTransition(_)
                ),
                "loser got {loser:?}"
            );
        }

        let stored = world.machine.job(job.id).unwrap();
        assert_eq!(stored.status, winners[0].status);
        assert!(matches!(stored.status, Status::Running | Status::Canceled));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_successes_notify_once() {
    let world = World::new();
    let job = world.job("deploy", "deploy", 2).await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let machine = Arc::clone(&world.machine);
            let snapshot = job.clone();
            tokio::spawn(async move { machine.apply(&snapshot, JobEvent::Success).await })
        })
        .collect();

    let mut succeeded = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }
    world.machine.flush_hooks().await;

    assert_eq!(succeeded, 1);
    assert_eq!(world.hook.calls().len(), 1);
}

#[tokio::test]
async fn stale_snapshot_can_be_refreshed_and_retried() {
    let world = World::new();
    let job = world.job("rspec", "test", 1).await;
    world.machine.run(job.id).await.unwrap();

    let err = world
        .machine
        .apply(&job, JobEvent::Cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StaleState { .. }), "got {err:?}");

    let fresh = world.machine.job(job.id).unwrap();
    let canceled = world.machine.apply(&fresh, JobEvent::Cancel).await.unwrap();
    assert_eq!(canceled.status, Status::Canceled);
    assert!(canceled.started_at.is_some());
}
