mod common;

use common::{create_test_store, seed_catalog, FlakyStore, LAB};
use labtrack_core::{
    models::{StepPatch, StepStatus, ViewMode, WorkstationTypeRef, CUSTOM_WORKSTATION_TYPE_ID},
    DraftTarget, OperationState, StepOrigin, StepTracker, TrackerError, TrackerRow, UploadStatus,
};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Store with a seeded catalog and one case holding its system step.
async fn tracker_for_new_case(view: ViewMode) -> (TempDir, StepTracker<FlakyStore>) {
    let (temp_dir, store) = create_test_store().await;
    seed_catalog(&store).await;
    let case = store
        .create_case(LAB, "C-1042")
        .await
        .expect("Failed to create case");

    let mut tracker = StepTracker::new(FlakyStore::new(store), LAB, case.id, view);
    tracker.load().await.expect("Failed to load tracker");
    (temp_dir, tracker)
}

fn crown_milling() -> StepPatch {
    StepPatch {
        status: Some(StepStatus::InProgress),
        workstation_type_id: Some("t-123".to_string()),
        technician_id: Some(Some("tech-7".to_string())),
        ..Default::default()
    }
}

fn step_ids<S>(tracker: &StepTracker<S>) -> Vec<u64> {
    tracker.steps().iter().map(|s| s.id).collect()
}

#[tokio::test]
async fn create_step_scenario() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    assert_eq!(tracker.steps().len(), 1);
    let origin = &tracker.steps()[0];
    assert_eq!(origin.origin, StepOrigin::SystemGenerated);
    assert_eq!(origin.status, StepStatus::InProgress);
    assert_eq!(origin.technician_name(), Some("System"));
    assert!(origin.workstation_type.is_none());

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();
    let index = tracker
        .stage_attachment(DraftTarget::New, "x.png", b"png bytes".to_vec())
        .unwrap();
    let url = tracker
        .upload_attachment(DraftTarget::New, index)
        .await
        .expect("Failed to upload attachment");
    assert!(url.starts_with("https://files/workstation/"));
    assert!(url.ends_with("-x.png"));

    let created = tracker.submit_new_step().await.expect("Failed to submit step");

    let creates = tracker.store().creates.lock().unwrap().clone();
    assert_eq!(creates.len(), 1);
    let payload: Value = serde_json::to_value(&creates[0]).unwrap();
    assert_eq!(payload["status"], json!("in_progress"));
    assert_eq!(payload["workstation_type_id"], json!("t-123"));
    assert_eq!(payload["technician_id"], json!("tech-7"));
    assert_eq!(payload["started_notes"], json!(""));
    assert_eq!(payload["completed_at"], Value::Null);
    assert_eq!(payload["issue_reported_at"], Value::Null);
    assert_eq!(payload["attachements"], json!([url]));

    assert_eq!(tracker.steps().len(), 2);
    assert!(tracker.new_step().is_none());
    assert_eq!(tracker.create_state(), &OperationState::Succeeded);

    let stored = tracker.step(created.id).expect("created step should be listed");
    assert_eq!(
        stored.workstation_type,
        Some(WorkstationTypeRef::Catalog {
            id: "t-123".to_string(),
            name: "Crown Milling".to_string(),
        })
    );
    assert_eq!(stored.technician_name(), Some("Dana Ortiz"));
    assert_eq!(stored.attachment_urls, vec![url]);
}

#[tokio::test]
async fn begin_edit_keeps_a_single_focus() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;
    let system_id = tracker.steps()[0].id;

    let mut user_ids = Vec::new();
    for _ in 0..2 {
        tracker.begin_new_step();
        tracker.update_new_draft(crown_milling()).unwrap();
        user_ids.push(tracker.submit_new_step().await.unwrap().id);
    }

    let focused = |t: &StepTracker<FlakyStore>| {
        t.rows()
            .iter()
            .filter(|r| matches!(r, TrackerRow::Persisted { editing: true, .. }))
            .count()
    };

    tracker.begin_edit(user_ids[0]).unwrap();
    assert_eq!(focused(&tracker), 1);
    assert_eq!(tracker.editing_step_id(), Some(user_ids[0]));

    tracker.begin_edit(user_ids[1]).unwrap();
    assert_eq!(focused(&tracker), 1);
    assert_eq!(tracker.editing_step_id(), Some(user_ids[1]));

    assert!(matches!(
        tracker.begin_edit(9_999),
        Err(TrackerError::StepNotFound { .. })
    ));
    assert_eq!(focused(&tracker), 0);

    tracker.begin_edit(user_ids[0]).unwrap();
    assert!(matches!(
        tracker.begin_edit(system_id),
        Err(TrackerError::StepNotEditable { .. })
    ));
    assert_eq!(focused(&tracker), 0);
}

#[tokio::test]
async fn cancelled_draft_leaves_collection_untouched() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;
    let before = step_ids(&tracker);

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();
    assert!(matches!(tracker.rows().last(), Some(TrackerRow::Draft { .. })));
    tracker.cancel_new_step();
    tracker.refresh().await.unwrap();

    assert_eq!(step_ids(&tracker), before);
    assert!(tracker.new_step().is_none());
    assert_eq!(tracker.store().create_calls(), 0);
}

#[tokio::test]
async fn begin_new_step_twice_keeps_the_draft() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();
    tracker.begin_new_step();

    let draft = &tracker.new_step().unwrap().draft;
    assert_eq!(draft.workstation_type_id.as_deref(), Some("t-123"));
    let drafts = tracker
        .rows()
        .iter()
        .filter(|r| matches!(r, TrackerRow::Draft { .. }))
        .count();
    assert_eq!(drafts, 1);
}

#[tokio::test]
async fn missing_type_never_reaches_the_store() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;
    let before = step_ids(&tracker);

    tracker.begin_new_step();
    tracker
        .update_new_draft(StepPatch {
            status: Some(StepStatus::Completed),
            ..Default::default()
        })
        .unwrap();

    let err = tracker.submit_new_step().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(tracker.store().create_calls(), 0);
    assert_eq!(step_ids(&tracker), before);
    assert!(tracker.new_step().is_some());
}

#[tokio::test]
async fn blank_custom_type_fails_like_missing_type() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    let missing = tracker.submit_new_step().await.unwrap_err();

    tracker
        .update_new_draft(StepPatch {
            workstation_type_id: Some(CUSTOM_WORKSTATION_TYPE_ID.to_string()),
            custom_workstation_type_name: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();
    let blank_custom = tracker.submit_new_step().await.unwrap_err();

    assert_eq!(missing.to_string(), blank_custom.to_string());
    assert!(matches!(
        blank_custom,
        TrackerError::Validation { ref field, .. } if field == "workstation_type"
    ));
    assert_eq!(tracker.store().create_calls(), 0);
}

#[tokio::test]
async fn custom_type_is_stored_as_free_text() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker
        .update_new_draft(StepPatch {
            workstation_type_id: Some(CUSTOM_WORKSTATION_TYPE_ID.to_string()),
            custom_workstation_type_name: Some("Hand polish".to_string()),
            ..Default::default()
        })
        .unwrap();
    let created = tracker.submit_new_step().await.unwrap();

    assert_eq!(
        created.workstation_type,
        Some(WorkstationTypeRef::Custom {
            name: "Hand polish".to_string()
        })
    );
    assert!(created.technician.is_none());
}

#[tokio::test]
async fn failed_uploads_are_excluded_from_payload() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();
    tracker
        .stage_attachment(DraftTarget::New, "good.png", vec![1])
        .unwrap();
    tracker
        .upload_pending_attachments(DraftTarget::New)
        .await
        .unwrap();

    FlakyStore::set(&tracker.store().fail_upload, true);
    tracker
        .stage_attachment(DraftTarget::New, "bad.png", vec![2])
        .unwrap();
    tracker
        .stage_attachment(DraftTarget::New, "later.png", vec![3])
        .unwrap();
    let failures = tracker
        .upload_attachment(DraftTarget::New, 1)
        .await
        .unwrap_err();
    assert!(matches!(failures, TrackerError::Upload { .. }));

    let statuses: Vec<UploadStatus> = tracker
        .attachments(DraftTarget::New)
        .unwrap()
        .entries()
        .iter()
        .map(|e| e.status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            UploadStatus::Completed,
            UploadStatus::Failed,
            UploadStatus::Pending
        ]
    );

    let created = tracker.submit_new_step().await.unwrap();
    assert_eq!(created.attachment_urls.len(), 1);
    assert!(created.attachment_urls[0].ends_with("-good.png"));
}

#[tokio::test]
async fn storage_failure_keeps_draft_for_retry() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;
    let before = step_ids(&tracker);

    FlakyStore::set(&tracker.store().fail_create, true);
    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();

    let err = tracker.submit_new_step().await.unwrap_err();
    assert!(matches!(err, TrackerError::Storage { .. }));
    assert!(matches!(tracker.create_state(), OperationState::Failed(_)));
    assert!(tracker.new_step().is_some());
    assert_eq!(step_ids(&tracker), before);

    FlakyStore::set(&tracker.store().fail_create, false);
    tracker.submit_new_step().await.expect("retry should succeed");
    assert_eq!(tracker.steps().len(), 2);
    assert_eq!(tracker.create_state(), &OperationState::Succeeded);
}

#[tokio::test]
async fn edit_completes_step_and_keeps_other_notes() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker
        .update_new_draft(StepPatch {
            started_notes: Some(Some("Blank loaded".to_string())),
            ..crown_milling()
        })
        .unwrap();
    let created = tracker.submit_new_step().await.unwrap();
    let started_at = created.started_at;

    tracker.begin_edit(created.id).unwrap();
    assert_eq!(
        tracker.editing().unwrap().draft.started_notes.as_deref(),
        Some("Blank loaded")
    );
    tracker
        .update_edit_draft(StepPatch {
            status: Some(StepStatus::Completed),
            completed_notes: Some(Some("Milled, ready for staining".to_string())),
            technician_id: Some(Some("admin-1".to_string())),
            ..Default::default()
        })
        .unwrap();
    tracker.submit_edited_step().await.unwrap();

    assert_eq!(tracker.editing_step_id(), None);
    assert_eq!(tracker.update_state(), &OperationState::Succeeded);

    let step = tracker.step(created.id).unwrap();
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.current_notes(), Some("Milled, ready for staining"));
    assert_eq!(step.started_notes.as_deref(), Some("Blank loaded"));
    assert_eq!(step.started_at, started_at);
    assert!(step.completed_at.is_some());
    assert!(step.issue_reported_at.is_none());
    assert_eq!(step.technician_name(), Some("Sam Reyes"));
}

#[tokio::test]
async fn edit_removes_attachment_from_step() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();
    for name in ["a.png", "b.png"] {
        tracker
            .stage_attachment(DraftTarget::New, name, vec![0])
            .unwrap();
    }
    assert!(tracker
        .upload_pending_attachments(DraftTarget::New)
        .await
        .unwrap()
        .is_empty());
    let created = tracker.submit_new_step().await.unwrap();
    assert_eq!(created.attachment_urls.len(), 2);

    tracker.begin_edit(created.id).unwrap();
    let removed = tracker.remove_attachment(DraftTarget::Edit, 0).unwrap();
    assert!(removed.file_name.ends_with("-a.png"));
    tracker.submit_edited_step().await.unwrap();

    let step = tracker.step(created.id).unwrap();
    assert_eq!(step.attachment_urls.len(), 1);
    assert!(step.attachment_urls[0].ends_with("-b.png"));
}

#[tokio::test]
async fn failed_update_keeps_edit_focus() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();
    let created = tracker.submit_new_step().await.unwrap();

    FlakyStore::set(&tracker.store().fail_update, true);
    tracker.begin_edit(created.id).unwrap();
    tracker
        .update_edit_draft(StepPatch {
            status: Some(StepStatus::IssueReported),
            issue_reported_notes: Some(Some("Cracked".to_string())),
            ..Default::default()
        })
        .unwrap();

    assert!(tracker.submit_edited_step().await.is_err());
    assert_eq!(tracker.editing_step_id(), Some(created.id));
    assert!(matches!(tracker.update_state(), OperationState::Failed(_)));
    assert_eq!(
        tracker.step(created.id).unwrap().status,
        StepStatus::InProgress
    );
}

#[tokio::test]
async fn on_hold_is_offered_only_in_client_view() {
    let (_temp_dir, mut admin) = tracker_for_new_case(ViewMode::Admin).await;
    admin.begin_new_step();
    admin
        .update_new_draft(StepPatch {
            status: Some(StepStatus::OnHold),
            ..crown_milling()
        })
        .unwrap();
    assert!(admin.submit_new_step().await.unwrap_err().is_validation());

    let (_temp_dir, mut client) = tracker_for_new_case(ViewMode::Client).await;
    client.begin_new_step();
    client
        .update_new_draft(StepPatch {
            status: Some(StepStatus::OnHold),
            started_notes: Some(Some("Waiting on shade".to_string())),
            ..crown_milling()
        })
        .unwrap();
    let created = client.submit_new_step().await.unwrap();

    assert_eq!(created.status, StepStatus::OnHold);
    assert!(created.started_at.is_some());
    assert_eq!(created.current_notes(), Some("Waiting on shade"));
}

#[tokio::test]
async fn catalog_failure_falls_back_to_empty_lists() {
    let (_temp_dir, store) = create_test_store().await;
    seed_catalog(&store).await;
    let case = store.create_case(LAB, "C-7").await.unwrap();

    let flaky = FlakyStore::new(store);
    FlakyStore::set(&flaky.fail_catalog, true);
    let mut tracker = StepTracker::new(flaky, LAB, case.id, ViewMode::Admin);
    tracker.load().await.expect("step fetch should still succeed");

    assert!(tracker.technicians().is_empty());
    assert!(tracker.workstation_types().is_empty());
    assert_eq!(tracker.steps().len(), 1);
}

#[tokio::test]
async fn load_lists_only_technicians() {
    let (_temp_dir, tracker) = tracker_for_new_case(ViewMode::Admin).await;

    let names: Vec<&str> = tracker
        .technicians()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["Dana Ortiz"]);
    assert_eq!(tracker.workstation_types().len(), 2);
}

#[tokio::test]
async fn load_returns_step_fetch_error() {
    let (_temp_dir, store) = create_test_store().await;
    seed_catalog(&store).await;
    let case = store.create_case(LAB, "C-8").await.unwrap();

    let flaky = FlakyStore::new(store);
    FlakyStore::set(&flaky.fail_list, true);
    let mut tracker = StepTracker::new(flaky, LAB, case.id, ViewMode::Admin);

    let err = tracker.load().await.unwrap_err();
    assert!(matches!(err, TrackerError::Storage { .. }));
    assert!(matches!(tracker.refresh_state(), OperationState::Failed(_)));
    assert!(tracker.steps().is_empty());
    assert_eq!(tracker.technicians().len(), 1);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_steps() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;
    let before = step_ids(&tracker);

    FlakyStore::set(&tracker.store().fail_list, true);
    assert!(tracker.refresh().await.is_err());

    assert_eq!(step_ids(&tracker), before);
    assert!(matches!(tracker.refresh_state(), OperationState::Failed(m) if m.contains("step list unavailable")));

    FlakyStore::set(&tracker.store().fail_list, false);
    tracker.refresh().await.unwrap();
    assert_eq!(tracker.refresh_state(), &OperationState::Succeeded);
}

#[tokio::test]
async fn stored_step_is_not_reported_as_failed_when_refresh_fails() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();
    FlakyStore::set(&tracker.store().fail_list, true);

    let created = tracker
        .submit_new_step()
        .await
        .expect("a stored step is a successful submit");
    assert_eq!(tracker.create_state(), &OperationState::Succeeded);
    assert!(matches!(tracker.refresh_state(), OperationState::Failed(_)));
    assert!(tracker.new_step().is_none());
    assert_eq!(tracker.steps().len(), 1);
    assert_eq!(tracker.store().create_calls(), 1);

    FlakyStore::set(&tracker.store().fail_list, false);
    tracker.refresh().await.unwrap();
    assert!(tracker.step(created.id).is_some());

    tracker.begin_edit(created.id).unwrap();
    tracker
        .update_edit_draft(StepPatch {
            status: Some(StepStatus::Completed),
            ..Default::default()
        })
        .unwrap();
    FlakyStore::set(&tracker.store().fail_list, true);
    tracker
        .submit_edited_step()
        .await
        .expect("a stored update is a successful submit");
    assert_eq!(tracker.update_state(), &OperationState::Succeeded);
    assert_eq!(tracker.editing_step_id(), None);

    let stored = tracker.store().inner().get_step(created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, StepStatus::Completed);
}

#[tokio::test]
async fn admin_can_edit_a_step_put_on_hold_by_the_client() {
    let (_temp_dir, mut client) = tracker_for_new_case(ViewMode::Client).await;
    client.begin_new_step();
    client
        .update_new_draft(StepPatch {
            status: Some(StepStatus::OnHold),
            ..crown_milling()
        })
        .unwrap();
    let held = client.submit_new_step().await.unwrap();

    let store = FlakyStore::new(client.store().inner().clone());
    let mut admin = StepTracker::new(store, LAB, client.case_id(), ViewMode::Admin);
    admin.load().await.unwrap();

    admin.begin_edit(held.id).unwrap();
    admin
        .update_edit_draft(StepPatch {
            technician_id: Some(None),
            started_notes: Some(Some("Shade confirmed by phone".to_string())),
            ..Default::default()
        })
        .unwrap();
    admin
        .submit_edited_step()
        .await
        .expect("the stored status stays valid in the admin view");

    let step = admin.step(held.id).unwrap();
    assert_eq!(step.status, StepStatus::OnHold);
    assert!(step.technician.is_none());
    assert_eq!(step.current_notes(), Some("Shade confirmed by phone"));
}

#[tokio::test]
async fn draft_row_resolves_catalog_names() {
    let (_temp_dir, mut tracker) = tracker_for_new_case(ViewMode::Admin).await;

    tracker.begin_new_step();
    tracker.update_new_draft(crown_milling()).unwrap();

    match tracker.rows().last() {
        Some(TrackerRow::Draft {
            workstation_type,
            technician,
            ..
        }) => {
            assert_eq!(
                workstation_type.as_ref().map(|t| t.name()),
                Some("Crown Milling")
            );
            assert_eq!(*technician, Some("Dana Ortiz"));
        }
        other => panic!("Expected draft row, got {other:?}"),
    }
}
