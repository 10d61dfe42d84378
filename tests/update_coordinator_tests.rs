//! Update checks, skip-version suppression and the snapshot channel.

mod common;

use coco_desk::coordinator::UpdateTrigger;
use coco_desk::platform::{AdapterCall, AdapterOp, RecordingAdapter};
use coco_desk::{DeskApp, DeskOptions, NotificationLevel};
use coco_desk_update::{UpdateChannel, UpdateCheckResult, UpdateError, UpdateInfo};
use common::{TestDesk, settle};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_skipped_version_refreshes_info_but_stays_hidden() {
    let desk = TestDesk::new();
    let updates = desk.app.updates();

    desk.adapter.push_update(Ok(Some(UpdateInfo::new("1.2.0"))));
    updates.check(UpdateTrigger::Manual).await;
    assert!(updates.skip_version());

    desk.adapter
        .push_update(Ok(Some(UpdateInfo::new("1.2.0").with_notes("rebuilt"))));
    let result = updates.check(UpdateTrigger::Manual).await;
    assert!(matches!(result, UpdateCheckResult::SkippedVersion(_)));

    let state = updates.state();
    assert!(!state.visible);
    assert_eq!(
        state.update_info.as_ref().and_then(|i| i.notes.as_deref()),
        Some("rebuilt")
    );

    desk.adapter.push_update(Ok(Some(UpdateInfo::new("1.3.0"))));
    let result = updates.check(UpdateTrigger::Manual).await;
    assert!(matches!(result, UpdateCheckResult::UpdateAvailable(_)));
    let state = updates.state();
    assert!(state.visible);
    assert_eq!(
        state.update_info.as_ref().map(|i| i.version.as_str()),
        Some("1.3.0")
    );
    assert_eq!(state.skip_version(), Some("1.2.0"));
}

#[tokio::test]
async fn test_up_to_date_keeps_previous_info() {
    let desk = TestDesk::new();
    let updates = desk.app.updates();

    desk.adapter.push_update(Ok(Some(UpdateInfo::new("4.0.0"))));
    updates.check(UpdateTrigger::Manual).await;
    desk.adapter.push_update(Ok(None));
    assert_eq!(
        updates.check(UpdateTrigger::Manual).await,
        UpdateCheckResult::UpToDate
    );
    assert_eq!(
        updates.state().update_info.map(|i| i.version),
        Some("4.0.0".to_string())
    );
}

#[tokio::test]
async fn test_failed_check_only_adds_notification() {
    let desk = TestDesk::new();
    let updates = desk.app.updates();
    desk.adapter.push_update(Err(UpdateError::network(
        "https://release.infinilabs.com/coco/app/.latest.json",
        "connection refused",
    )));

    let before = updates.state();
    updates.check(UpdateTrigger::Manual).await;
    assert_eq!(updates.state(), before);

    let list = desk.app.notifications().list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].level, NotificationLevel::Error);
    assert!(list[0].message.contains("connection refused"));

    // A retry is just another check
    desk.adapter.push_update(Ok(Some(UpdateInfo::new("5.0.0"))));
    updates.check(UpdateTrigger::Manual).await;
    assert!(updates.state().visible);
}

#[tokio::test]
async fn test_overlapping_checks_call_adapter_once() {
    let desk = TestDesk::new();
    desk.adapter.set_check_delay(Some(Duration::from_millis(30)));
    let updates = Arc::clone(desk.app.updates());

    let first = tokio::spawn({
        let updates = Arc::clone(&updates);
        async move { updates.check(UpdateTrigger::Manual).await }
    });
    while !updates.is_checking() {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        updates.check(UpdateTrigger::Scheduled).await,
        UpdateCheckResult::InProgress
    );
    first.await.unwrap();
    assert_eq!(desk.adapter.count(AdapterOp::CheckUpdate), 1);
    assert!(!updates.is_checking());
}

#[tokio::test]
async fn test_relaunch_only_on_request() {
    let desk = TestDesk::new();
    desk.adapter.push_update(Ok(Some(UpdateInfo::new("6.0.0"))));
    desk.app.updates().check(UpdateTrigger::Manual).await;
    assert_eq!(desk.adapter.count(AdapterOp::RelaunchApp), 0);

    desk.app.updates().relaunch().await.unwrap();
    assert_eq!(desk.adapter.count(AdapterOp::RelaunchApp), 1);
}

#[tokio::test]
async fn test_snapshot_on_at_startup_triggers_check() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("appearance.yaml"), "snapshot_update: true\n").unwrap();

    let adapter = Arc::new(RecordingAdapter::new());
    let app = DeskApp::with_options(
        adapter.clone(),
        Arc::new(coco_desk::platform::HeadlessView::new()),
        Arc::new(coco_desk::platform::RecordingResources::new()),
        dir.path(),
        DeskOptions {
            background_update_checks: true,
            update_schedule: coco_desk_update::UpdateSchedule::with_poll_interval(
                Duration::from_secs(3600),
            ),
        },
    );
    settle().await;

    // The scheduler's immediate tick checks too, on the same channel
    let calls = adapter.calls();
    assert!(!calls.is_empty());
    assert!(
        calls
            .iter()
            .all(|c| *c == AdapterCall::CheckUpdate(UpdateChannel::Snapshot))
    );
    drop(app);
}

#[tokio::test]
async fn test_background_failure_is_a_warning() {
    let desk = TestDesk::new();
    desk.adapter
        .push_update(Err(UpdateError::Malformed("missing version".into())));
    desk.app.updates().check(UpdateTrigger::ChannelSwitch).await;
    assert_eq!(
        desk.app.notifications().list()[0].level,
        NotificationLevel::Warning
    );
}
