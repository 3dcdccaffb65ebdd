// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage ordering, composite status and latest-attempt selection

use crate::prelude::*;
use similar_asserts::assert_eq;

fn stage(name: &str, status: Status) -> (String, Status) {
    (name.to_string(), status)
}

#[tokio::test]
async fn allowed_failure_does_not_fail_its_stage() {
    let world = World::new();
    let build = world.job("compile", "build", 0).await;
    let rspec = world.job("rspec", "test", 1).await;
    let lint = world.allowed_to_fail("lint", "test", 1).await;

    world.machine.succeed(build.id).await.unwrap();
    world.machine.fail(rspec.id).await.unwrap();
    world.machine.fail(lint.id).await.unwrap();

    let view = world.view();
    assert_eq!(view.stages(&world.pipeline).unwrap(), vec!["build", "test"]);
    assert_eq!(
        world.stage_statuses(),
        vec![stage("build", Status::Success), stage("test", Status::Failed)]
    );
    assert_eq!(view.overall_status(&world.pipeline).unwrap(), Status::Failed);
}

#[tokio::test]
async fn stage_of_only_allowed_failures_is_success() {
    let world = World::new();
    let lint = world.allowed_to_fail("lint", "test", 1).await;
    let audit = world.allowed_to_fail("audit", "test", 1).await;

    world.machine.fail(lint.id).await.unwrap();
    world.machine.cancel(audit.id).await.unwrap();

    assert_eq!(world.stage_statuses(), vec![stage("test", Status::Success)]);
    assert_eq!(
        world.view().overall_status(&world.pipeline).unwrap(),
        Status::Success
    );
}

#[tokio::test]
async fn retried_deploy_reports_only_latest_attempt() {
    let world = World::new();
    let first = world.job("deploy", "deploy", 2).await;
    world.machine.fail(first.id).await.unwrap();
    let retry = world.job("deploy", "deploy", 2).await;
    world.machine.succeed(retry.id).await.unwrap();

    let latest = world.view().latest(&world.pipeline).unwrap();
    let ids: Vec<JobId> = latest.iter().map(|job| job.id).collect();
    assert_eq!(ids, vec![retry.id]);
    assert_eq!(world.stage_statuses(), vec![stage("deploy", Status::Success)]);
}

#[tokio::test]
async fn stages_follow_highest_index_then_name() {
    let world = World::new();
    world.job("package", "release", 3).await;
    world.job("rspec", "test", 1).await;
    world.job("compile", "build", 0).await;
    world.job("audit", "security", 1).await;
    // A late job in `build` pulls the whole stage after `test`
    world.job("docs", "build", 2).await;

    assert_eq!(
        world.view().stages(&world.pipeline).unwrap(),
        vec!["security", "test", "build", "release"]
    );
}

#[tokio::test]
async fn overall_status_prefers_running_then_pending() {
    let world = World::new();
    let build = world.job("compile", "build", 0).await;
    let rspec = world.job("rspec", "test", 1).await;
    world.job("deploy", "deploy", 2).await;
    let view = world.view();

    world.machine.fail(build.id).await.unwrap();
    assert_eq!(view.overall_status(&world.pipeline).unwrap(), Status::Pending);

    world.machine.run(rspec.id).await.unwrap();
    assert_eq!(view.overall_status(&world.pipeline).unwrap(), Status::Running);
    assert_eq!(
        world.stage_statuses(),
        vec![
            stage("build", Status::Failed),
            stage("test", Status::Running),
            stage("deploy", Status::Pending),
        ]
    );
}

#[tokio::test]
async fn failed_outranks_canceled_when_nothing_is_active() {
    let world = World::new();
    let rspec = world.job("rspec", "test", 1).await;
    let deploy = world.job("deploy", "deploy", 2).await;

    world.machine.cancel(rspec.id).await.unwrap();
    assert_eq!(
        world.view().overall_status(&world.pipeline).unwrap(),
        Status::Pending
    );

    world.machine.fail(deploy.id).await.unwrap();
    assert_eq!(
        world.view().overall_status(&world.pipeline).unwrap(),
        Status::Failed
    );
}

#[tokio::test]
async fn empty_and_unknown_pipelines() {
    let world = World::new();
    let view = world.view();

    assert!(view.stages(&world.pipeline).unwrap().is_empty());
    assert_eq!(view.overall_status(&world.pipeline).unwrap(), Status::Success);

    let err = view.overall_status(&"pipeline-404".into()).unwrap_err();
    assert!(matches!(err, EngineError::PipelineNotFound(_)), "got {err:?}");
}
