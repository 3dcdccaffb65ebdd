// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Committed state survives a restart of the store

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn jobs_and_stages_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let wal = dir.path().join("jobs.wal");

    let (before, rspec_id) = {
        let world = World::with_store(WalStore::open(&wal).unwrap());
        let build = world.job("compile", "build", 0).await;
        let rspec = world.job("rspec", "test", 1).await;
        world.machine.succeed(build.id).await.unwrap();
        world.machine.run(rspec.id).await.unwrap();
        world.machine.flush_hooks().await;
        (world.stage_statuses(), rspec.id)
    };

    let world = World::with_store(WalStore::open(&wal).unwrap());
    assert_eq!(world.stage_statuses(), before);

    // Restarted engine picks up where the old one stopped
    let done = world.machine.fail(rspec_id).await.unwrap();
    assert_eq!(done.status, Status::Failed);
    assert!(done.started_at.is_some());

    let next = world.job("deploy", "deploy", 2).await;
    assert!(next.id > rspec_id, "ids keep increasing after replay");
}

#[tokio::test]
async fn rejected_transitions_are_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let wal = dir.path().join("jobs.wal");

    let job_id = {
        let world = World::with_store(WalStore::open(&wal).unwrap());
        let job = world.job("rspec", "test", 1).await;
        world.machine.cancel(job.id).await.unwrap();
        assert!(world.machine.succeed(job.id).await.is_err());
        assert!(world.machine.run(job.id).await.is_err());
        job.id
    };

    let store = WalStore::open(&wal).unwrap();
    assert_eq!(store.job(job_id).unwrap().status, Status::Canceled);
}
