//! Payloads sent to the data store when steps are created or updated.
//!
//! Field names follow the store's column names, including the historical
//! `attachements` spelling.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{StatusSlot, StepDraft, StepStatus, ValidatedDraft};

/// Record sent to create a workstation step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewStepRecord {
    pub case_id: u64,
    pub status: StepStatus,
    pub workstation_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_workstation_type_name: Option<String>,
    pub technician_id: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub issue_reported_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_reported_notes: Option<String>,
    #[serde(rename = "attachements", default)]
    pub attachment_urls: Vec<String>,
}

impl NewStepRecord {
    /// Build the create payload for a validated draft.
    ///
    /// Only the note/timestamp pair of the selected status is populated; the
    /// timestamp is `now` and the note is the draft's text for that status
    /// (empty string when the user left it blank).
    pub fn new(
        case_id: u64,
        valid: &ValidatedDraft,
        draft: &StepDraft,
        attachment_urls: Vec<String>,
        now: Timestamp,
    ) -> Self {
        let slot = valid.status.slot();
        let at = |s: StatusSlot| (slot == s).then_some(now);
        let notes = |s: StatusSlot| (slot == s).then(|| draft.notes_for(s));

        Self {
            case_id,
            status: valid.status,
            workstation_type_id: valid.workstation_type_id.clone(),
            custom_workstation_type_name: valid.custom_workstation_type_name.clone(),
            technician_id: valid.technician_id.clone(),
            started_at: at(StatusSlot::Started),
            completed_at: at(StatusSlot::Completed),
            issue_reported_at: at(StatusSlot::IssueReported),
            started_notes: notes(StatusSlot::Started),
            completed_notes: notes(StatusSlot::Completed),
            issue_reported_notes: notes(StatusSlot::IssueReported),
            attachment_urls,
        }
    }
}

/// Partial update sent when an edited step is saved.
///
/// All three note fields travel with every update so notes for a status
/// the step has not reached yet can be filled in ahead of time.
/// `completed_at` and `issue_reported_at` are recomputed from the new
/// status; `started_at` is never touched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepUpdate {
    pub status: StepStatus,
    pub technician_id: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub issue_reported_at: Option<Timestamp>,
    pub workstation_type_id: Option<String>,
    pub custom_workstation_type_name: Option<String>,
    pub started_notes: Option<String>,
    pub completed_notes: Option<String>,
    pub issue_reported_notes: Option<String>,
    #[serde(rename = "attachements", default)]
    pub attachment_urls: Vec<String>,
}

impl StepUpdate {
    pub fn new(
        valid: &ValidatedDraft,
        draft: &StepDraft,
        attachment_urls: Vec<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            status: valid.status,
            technician_id: valid.technician_id.clone(),
            completed_at: (valid.status == StepStatus::Completed).then_some(now),
            issue_reported_at: (valid.status == StepStatus::IssueReported).then_some(now),
            workstation_type_id: valid.workstation_type_id.clone(),
            custom_workstation_type_name: valid.custom_workstation_type_name.clone(),
            started_notes: draft.started_notes.clone(),
            completed_notes: draft.completed_notes.clone(),
            issue_reported_notes: draft.issue_reported_notes.clone(),
            attachment_urls,
        }
    }
}
