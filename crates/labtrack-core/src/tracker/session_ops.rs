//! Draft and edit-focus operations. None of these touch storage except the
//! attachment uploads.

use log::debug;

use super::{EditSession, NewStepSession, StepTracker};
use crate::{
    attachments::{AttachmentEntry, AttachmentSession},
    error::{Result, TrackerError},
    models::{StepDraft, StepPatch},
    store::DataStore,
};

/// Which draft an attachment operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    /// The creation draft
    New,
    /// The step in edit focus
    Edit,
}

impl DraftTarget {
    fn missing(self) -> TrackerError {
        TrackerError::NoActiveDraft {
            kind: match self {
                DraftTarget::New => "new workstation step",
                DraftTarget::Edit => "workstation step edit",
            },
        }
    }
}

fn attachments_mut<'a>(
    new_step: &'a mut Option<NewStepSession>,
    editing: &'a mut Option<EditSession>,
    target: DraftTarget,
) -> Result<&'a mut AttachmentSession> {
    match target {
        DraftTarget::New => new_step.as_mut().map(|s| &mut s.attachments),
        DraftTarget::Edit => editing.as_mut().map(|s| &mut s.attachments),
    }
    .ok_or_else(|| target.missing())
}

impl<S> StepTracker<S> {
    /// Start a creation draft with status `in_progress` and blank fields.
    ///
    /// Calling this while a draft exists keeps the existing draft.
    pub fn begin_new_step(&mut self) {
        if self.new_step.is_some() {
            debug!("case {}: creation draft already open", self.case_id);
            return;
        }
        self.new_step = Some(NewStepSession {
            draft: StepDraft::new_step(),
            attachments: AttachmentSession::new(),
        });
    }

    /// Discard the creation draft and its attachment working set.
    pub fn cancel_new_step(&mut self) {
        self.new_step = None;
    }

    /// Put a persisted step into edit focus.
    ///
    /// Any previous focus is cleared first, so on error no step is in edit
    /// focus. System-generated steps cannot be edited.
    pub fn begin_edit(&mut self, step_id: u64) -> Result<()> {
        self.editing = None;

        let step = self
            .steps
            .iter()
            .find(|s| s.id == step_id)
            .ok_or(TrackerError::StepNotFound { id: step_id })?;

        if step.is_system_generated() {
            return Err(TrackerError::StepNotEditable { id: step_id });
        }

        self.editing = Some(EditSession {
            step_id,
            draft: StepDraft::from_step(step),
            attachments: AttachmentSession::from_urls(&step.attachment_urls),
        });
        Ok(())
    }

    /// Leave edit focus without saving.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Merge a patch into the edit draft. Nothing is validated here.
    pub fn update_edit_draft(&mut self, patch: StepPatch) -> Result<()> {
        let session = self
            .editing
            .as_mut()
            .ok_or_else(|| DraftTarget::Edit.missing())?;
        session.draft.apply(patch);
        Ok(())
    }

    /// Merge a patch into the creation draft. Nothing is validated here.
    pub fn update_new_draft(&mut self, patch: StepPatch) -> Result<()> {
        let session = self
            .new_step
            .as_mut()
            .ok_or_else(|| DraftTarget::New.missing())?;
        session.draft.apply(patch);
        Ok(())
    }

    /// Attachment working set of a draft.
    pub fn attachments(&self, target: DraftTarget) -> Option<&AttachmentSession> {
        match target {
            DraftTarget::New => self.new_step.as_ref().map(|s| &s.attachments),
            DraftTarget::Edit => self.editing.as_ref().map(|s| &s.attachments),
        }
    }

    /// Add a file to a draft's working set as a pending entry.
    pub fn stage_attachment(
        &mut self,
        target: DraftTarget,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<usize> {
        let session = attachments_mut(&mut self.new_step, &mut self.editing, target)?;
        Ok(session.stage(file_name, bytes))
    }

    /// Remove an entry from a draft's working set. The uploaded object, if
    /// any, stays in storage.
    pub fn remove_attachment(&mut self, target: DraftTarget, index: usize) -> Result<AttachmentEntry> {
        let session = attachments_mut(&mut self.new_step, &mut self.editing, target)?;
        session.remove(index).ok_or_else(|| {
            TrackerError::validation("attachment")
                .with_reason(format!("No attachment at position {index}"))
        })
    }
}

impl<S: DataStore> StepTracker<S> {
    /// Upload one staged entry of a draft.
    pub async fn upload_attachment(&mut self, target: DraftTarget, index: usize) -> Result<String> {
        let case_id = self.case_id;
        let session = attachments_mut(&mut self.new_step, &mut self.editing, target)?;
        session.upload(index, &self.store, case_id).await
    }

    /// Upload every pending entry of a draft, returning per-file failures.
    pub async fn upload_pending_attachments(
        &mut self,
        target: DraftTarget,
    ) -> Result<Vec<TrackerError>> {
        let case_id = self.case_id;
        let session = attachments_mut(&mut self.new_step, &mut self.editing, target)?;
        Ok(session.upload_pending(&self.store, case_id).await)
    }
}
