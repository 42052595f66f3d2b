//! Editable field sets for creating and editing steps.

use serde::{Deserialize, Serialize};

use super::{StatusSlot, StepStatus, ViewMode, WorkstationStep, WorkstationType, WorkstationTypeRef};
use crate::error::{Result, TrackerError};

/// Sentinel catalog id selecting a free-text workstation type.
pub const CUSTOM_WORKSTATION_TYPE_ID: &str = "custom-id";

/// The fields a user fills in while creating or editing a step.
///
/// A draft is detached from the persisted step: edits accumulate here and
/// only reach storage on submit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepDraft {
    pub status: Option<StepStatus>,
    /// Catalog id, or [`CUSTOM_WORKSTATION_TYPE_ID`] for free text
    pub workstation_type_id: Option<String>,
    pub custom_workstation_type_name: Option<String>,
    pub technician_id: Option<String>,
    pub started_notes: Option<String>,
    pub completed_notes: Option<String>,
    pub issue_reported_notes: Option<String>,
}

/// Partial update merged into a [`StepDraft`].
///
/// `None` leaves a field as is. The optional fields take `Some(None)` to
/// clear the value.
#[derive(Debug, Clone, Default)]
pub struct StepPatch {
    pub status: Option<StepStatus>,
    pub workstation_type_id: Option<String>,
    pub custom_workstation_type_name: Option<String>,
    pub technician_id: Option<Option<String>>,
    pub started_notes: Option<Option<String>>,
    pub completed_notes: Option<Option<String>>,
    pub issue_reported_notes: Option<Option<String>>,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub status: StepStatus,
    pub workstation_type_id: Option<String>,
    pub custom_workstation_type_name: Option<String>,
    pub technician_id: Option<String>,
}

impl StepDraft {
    /// A blank creation draft: `in_progress` with every other field empty.
    pub fn new_step() -> Self {
        Self {
            status: Some(StepStatus::InProgress),
            ..Default::default()
        }
    }

    /// Seed an edit draft from a persisted step.
    pub fn from_step(step: &WorkstationStep) -> Self {
        let (workstation_type_id, custom_workstation_type_name) = match &step.workstation_type {
            Some(WorkstationTypeRef::Catalog { id, .. }) => (Some(id.clone()), None),
            Some(WorkstationTypeRef::Custom { name }) => (
                Some(CUSTOM_WORKSTATION_TYPE_ID.to_string()),
                Some(name.clone()),
            ),
            None => (None, None),
        };

        Self {
            status: Some(step.status),
            workstation_type_id,
            custom_workstation_type_name,
            technician_id: step.technician.as_ref().map(|t| t.id.clone()),
            started_notes: step.started_notes.clone(),
            completed_notes: step.completed_notes.clone(),
            issue_reported_notes: step.issue_reported_notes.clone(),
        }
    }

    /// Merge a patch without validating anything.
    pub fn apply(&mut self, patch: StepPatch) {
        let StepPatch {
            status,
            workstation_type_id,
            custom_workstation_type_name,
            technician_id,
            started_notes,
            completed_notes,
            issue_reported_notes,
        } = patch;

        if status.is_some() {
            self.status = status;
        }
        if workstation_type_id.is_some() {
            self.workstation_type_id = workstation_type_id;
        }
        if custom_workstation_type_name.is_some() {
            self.custom_workstation_type_name = custom_workstation_type_name;
        }
        if let Some(technician_id) = technician_id {
            self.technician_id = technician_id;
        }
        if let Some(notes) = started_notes {
            self.started_notes = notes;
        }
        if let Some(notes) = completed_notes {
            self.completed_notes = notes;
        }
        if let Some(notes) = issue_reported_notes {
            self.issue_reported_notes = notes;
        }
    }

    /// Resolve the selected workstation type against a catalog, falling
    /// back to the id itself when the catalog has no matching entry.
    pub fn workstation_type_ref(&self, catalog: &[WorkstationType]) -> Option<WorkstationTypeRef> {
        let id = non_blank(self.workstation_type_id.as_deref())?;
        if id == CUSTOM_WORKSTATION_TYPE_ID {
            return non_blank(self.custom_workstation_type_name.as_deref())
                .map(|name| WorkstationTypeRef::Custom { name: name.to_string() });
        }

        let name = catalog
            .iter()
            .find(|t| t.id == id)
            .map_or(id, |t| t.name.as_str());
        Some(WorkstationTypeRef::Catalog {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Notes for the given slot, empty when unset.
    pub fn notes_for(&self, slot: StatusSlot) -> String {
        match slot {
            StatusSlot::Started => self.started_notes.clone(),
            StatusSlot::Completed => self.completed_notes.clone(),
            StatusSlot::IssueReported => self.issue_reported_notes.clone(),
        }
        .unwrap_or_default()
    }

    /// Check a creation draft before anything is sent to storage.
    ///
    /// A status offered by `view` must be selected and a workstation type
    /// must be chosen. Choosing [`CUSTOM_WORKSTATION_TYPE_ID`] requires
    /// non-blank custom text; an empty custom text is reported exactly like
    /// a missing type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use labtrack_core::models::{StepDraft, ViewMode};
    ///
    /// let mut draft = StepDraft::new_step();
    /// assert!(draft.validate(ViewMode::Admin).is_err());
    ///
    /// draft.workstation_type_id = Some("t-123".to_string());
    /// let valid = draft.validate(ViewMode::Admin)?;
    /// assert_eq!(valid.workstation_type_id.as_deref(), Some("t-123"));
    /// # labtrack_core::Result::<()>::Ok(())
    /// ```
    pub fn validate(&self, view: ViewMode) -> Result<ValidatedDraft> {
        self.validate_against(view, None)
    }

    /// Check an edit draft of a step currently stored with `stored_status`.
    ///
    /// Same rules as [`StepDraft::validate`], except that the stored status
    /// is always accepted, even when `view` does not offer it.
    pub fn validate_edit(&self, view: ViewMode, stored_status: StepStatus) -> Result<ValidatedDraft> {
        self.validate_against(view, Some(stored_status))
    }

    fn validate_against(
        &self,
        view: ViewMode,
        stored_status: Option<StepStatus>,
    ) -> Result<ValidatedDraft> {
        let status = self
            .status
            .ok_or_else(|| TrackerError::validation("status").with_reason("Status is required"))?;

        if !view.offers(status) && stored_status != Some(status) {
            return Err(TrackerError::validation("status").with_reason(format!(
                "Status '{}' is not available in the {} view",
                status.as_str(),
                view.as_str()
            )));
        }

        let missing_type = || {
            TrackerError::validation("workstation_type")
                .with_reason("A workstation type is required")
        };

        let type_id = non_blank(self.workstation_type_id.as_deref()).ok_or_else(missing_type)?;

        let (workstation_type_id, custom_workstation_type_name) =
            if type_id == CUSTOM_WORKSTATION_TYPE_ID {
                let custom = non_blank(self.custom_workstation_type_name.as_deref())
                    .ok_or_else(missing_type)?;
                (None, Some(custom.to_string()))
            } else {
                (Some(type_id.to_string()), None)
            };

        Ok(ValidatedDraft {
            status,
            workstation_type_id,
            custom_workstation_type_name,
            technician_id: non_blank(self.technician_id.as_deref()).map(String::from),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
