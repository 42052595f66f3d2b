//! Storage-facing tracker operations.

use jiff::Timestamp;
use log::{debug, info, warn};

use super::{OperationState, StepTracker};
use crate::{
    error::{Result, TrackerError},
    models::{NewStepRecord, StepUpdate, WorkstationStep},
    store::DataStore,
};

impl<S: DataStore> StepTracker<S> {
    /// Fetch the lab catalogs and the case's steps.
    ///
    /// A catalog that fails to load is logged and left empty so the rest of
    /// the tracker stays usable. A failed step fetch is returned.
    pub async fn load(&mut self) -> Result<()> {
        self.technicians = match self.store.list_technicians(&self.lab_id).await {
            Ok(technicians) => technicians,
            Err(e) => {
                warn!("Failed to load technicians for lab {}: {e}", self.lab_id);
                Vec::new()
            }
        };

        self.workstation_types = match self.store.list_workstation_types(&self.lab_id).await {
            Ok(types) => types,
            Err(e) => {
                warn!("Failed to load workstation types for lab {}: {e}", self.lab_id);
                Vec::new()
            }
        };

        self.refresh().await
    }

    /// Replace the collection with the case's steps as currently stored.
    ///
    /// On failure the previous collection is kept. An edit focus whose step
    /// no longer exists is dropped.
    pub async fn refresh(&mut self) -> Result<()> {
        self.refresh_state = OperationState::Pending;

        match self.store.list_steps(self.case_id).await {
            Ok(steps) => {
                debug!("case {}: fetched {} steps", self.case_id, steps.len());
                self.steps = steps;
                self.refresh_state = OperationState::Succeeded;

                if let Some(id) = self.editing_step_id() {
                    if self.step(id).is_none() {
                        warn!("step {id} disappeared while in edit focus");
                        self.editing = None;
                    }
                }
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch steps for case {}: {e}", self.case_id);
                self.refresh_state = OperationState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Validate and persist the creation draft, then refresh.
    ///
    /// A draft that fails validation never reaches the store. On a storage
    /// error the draft and its attachments are kept for another attempt.
    /// Once the step is stored the submit succeeds; a failed re-fetch only
    /// shows in [`StepTracker::refresh_state`].
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NoActiveDraft` if no creation draft is open
    /// Returns `TrackerError::Validation` if the draft is incomplete
    pub async fn submit_new_step(&mut self) -> Result<WorkstationStep> {
        let session = self.new_step.as_ref().ok_or(TrackerError::NoActiveDraft {
            kind: "new workstation step",
        })?;

        let valid = session.draft.validate(self.view)?;
        let record = NewStepRecord::new(
            self.case_id,
            &valid,
            &session.draft,
            session.attachments.completed_urls(),
            Timestamp::now(),
        );

        self.create_state = OperationState::Pending;
        let step = match self.store.create_workstation_step(&record).await {
            Ok(step) => step,
            Err(e) => {
                warn!("Failed to create step for case {}: {e}", self.case_id);
                self.create_state = OperationState::Failed(e.to_string());
                return Err(e);
            }
        };

        info!(
            "case {}: created step {} ({})",
            self.case_id,
            step.id,
            step.status.as_str()
        );
        self.create_state = OperationState::Succeeded;
        self.new_step = None;
        self.refresh_after_write().await;

        Ok(step)
    }

    /// Validate and persist the edit draft, then refresh.
    ///
    /// The step's stored status passes validation even when the view does
    /// not offer it, so a client-set `on_hold` step stays editable in the
    /// admin view.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NoActiveDraft` if no step is in edit focus
    /// Returns `TrackerError::Validation` if the draft is incomplete
    pub async fn submit_edited_step(&mut self) -> Result<()> {
        let session = self.editing.as_ref().ok_or(TrackerError::NoActiveDraft {
            kind: "workstation step edit",
        })?;

        let step_id = session.step_id;
        let stored_status = self
            .step(step_id)
            .map(|s| s.status)
            .ok_or(TrackerError::StepNotFound { id: step_id })?;
        let valid = session.draft.validate_edit(self.view, stored_status)?;
        let update = StepUpdate::new(
            &valid,
            &session.draft,
            session.attachments.completed_urls(),
            Timestamp::now(),
        );

        self.update_state = OperationState::Pending;
        if let Err(e) = self.store.update_workstation_step(step_id, &update).await {
            warn!("Failed to update step {step_id}: {e}");
            self.update_state = OperationState::Failed(e.to_string());
            return Err(e);
        }

        info!("updated step {step_id} ({})", valid.status.as_str());
        self.update_state = OperationState::Succeeded;
        self.editing = None;
        self.refresh_after_write().await;

        Ok(())
    }

    /// Re-fetch after a stored write. A failure is recorded in
    /// `refresh_state` and the previous collection stays in place.
    async fn refresh_after_write(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("case {}: write stored but re-fetch failed: {e}", self.case_id);
        }
    }
}
