//! Command handlers.
//!
//! Each invocation drives a [`StepTracker`] for a single case, the same way
//! an interactive front end would: load, open a draft or edit focus, apply
//! the user's fields, upload attachments, submit.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use labtrack_core::{
    display::{
        Cases, CreateResult, OperationStatus, Rows, Steps, Technicians, UpdateResult,
        WorkstationTypes,
    },
    models::{Case, StepPatch, ViewMode},
    DataStore, DraftTarget, OperationState, SqliteStore, StepTracker, TrackerError,
};
use log::{debug, warn};

use crate::{
    args::{
        AddStepArgs, CaseCommands, StepCommands, TechnicianCommands, TypeCommands,
        UpdateStepArgs,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    store: SqliteStore,
    renderer: TerminalRenderer,
    lab: String,
    view: ViewMode,
}

impl Cli {
    pub fn new(store: SqliteStore, renderer: TerminalRenderer, lab: String, view: ViewMode) -> Self {
        Self {
            store,
            renderer,
            lab,
            view,
        }
    }

    pub async fn handle_technician_command(&self, command: TechnicianCommands) -> Result<()> {
        match command {
            TechnicianCommands::Add(args) => {
                let technician = self
                    .store
                    .add_technician(&self.lab, &args.id, &args.name, &args.role)
                    .await
                    .context("Failed to add technician")?;
                self.renderer.render(&CreateResult::new(technician).to_string())
            }
            TechnicianCommands::List => {
                let technicians = self
                    .store
                    .list_technicians(&self.lab)
                    .await
                    .context("Failed to list technicians")?;
                self.renderer.render(&Technicians(technicians).to_string())
            }
        }
    }

    pub async fn handle_type_command(&self, command: TypeCommands) -> Result<()> {
        match command {
            TypeCommands::Add(args) => {
                let kind = self
                    .store
                    .add_workstation_type(&self.lab, &args.id, &args.name)
                    .await
                    .context("Failed to add workstation type")?;
                self.renderer.render(&CreateResult::new(kind).to_string())
            }
            TypeCommands::List => {
                let types = self
                    .store
                    .list_workstation_types(&self.lab)
                    .await
                    .context("Failed to list workstation types")?;
                self.renderer.render(&WorkstationTypes(types).to_string())
            }
        }
    }

    pub async fn handle_case_command(&self, command: CaseCommands) -> Result<()> {
        match command {
            CaseCommands::Create(args) => {
                let case = self
                    .store
                    .create_case(&self.lab, &args.case_number)
                    .await
                    .context("Failed to create case")?;
                let steps = self.store.list_steps(case.id).await?;

                let output = format!("{}\n{}", CreateResult::new(case), Steps(steps));
                self.renderer.render(&output)
            }
            CaseCommands::Show(args) => {
                let case = self.case(args.id).await?;
                let tracker = self.tracker(args.id).await?;

                let output = format!("{case}\n## Steps\n\n{}", Rows(tracker.rows()));
                self.renderer.render(&output)
            }
            CaseCommands::List => self.list_cases().await,
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Add(args) => self.add_step(args).await,
            StepCommands::Update(args) => self.update_step(args).await,
        }
    }

    pub async fn list_cases(&self) -> Result<()> {
        let cases = self
            .store
            .list_cases(&self.lab)
            .await
            .context("Failed to list cases")?;
        self.renderer.render(&Cases(cases).to_string())
    }

    async fn add_step(&self, args: AddStepArgs) -> Result<()> {
        let mut tracker = self.tracker(args.case_id).await?;

        tracker.begin_new_step();
        tracker.update_new_draft(StepPatch::from(&args.fields))?;
        self.attach_files(&mut tracker, DraftTarget::New, &args.fields.attachments)
            .await?;

        let step = tracker
            .submit_new_step()
            .await
            .context("Failed to create step")?;
        self.renderer.render(&CreateResult::new(step).to_string())?;
        self.report_refresh_failure(&tracker)
    }

    async fn update_step(&self, args: UpdateStepArgs) -> Result<()> {
        let step = self
            .store
            .get_step(args.id)
            .await?
            .ok_or(TrackerError::StepNotFound { id: args.id })?;
        let mut tracker = self.tracker(step.case_id).await?;

        tracker.begin_edit(args.id)?;

        let patch = StepPatch::from(&args.fields);
        let mut changes = describe_patch(&patch);
        tracker.update_edit_draft(patch)?;

        let mut removals = args.remove_attachments.clone();
        removals.sort_unstable();
        removals.dedup();
        for index in removals.into_iter().rev() {
            let removed = tracker.remove_attachment(DraftTarget::Edit, index)?;
            changes.push(format!("Removed attachment {}", removed.file_name));
        }

        let attached = self
            .attach_files(&mut tracker, DraftTarget::Edit, &args.fields.attachments)
            .await?;
        if attached > 0 {
            changes.push(format!("Attached {attached} file(s)"));
        }

        tracker
            .submit_edited_step()
            .await
            .context("Failed to update step")?;

        if matches!(tracker.refresh_state(), OperationState::Failed(_)) {
            // The listed step is stale; confirm without it
            self.renderer.render(
                &OperationStatus::success(format!("Updated step with ID: {}", args.id)).to_string(),
            )?;
            return self.report_refresh_failure(&tracker);
        }

        let updated = tracker
            .step(args.id)
            .cloned()
            .ok_or(TrackerError::StepNotFound { id: args.id })?;
        self.renderer
            .render(&UpdateResult::with_changes(updated, changes).to_string())
    }

    /// Show a failed re-fetch after a stored write. The write itself stands.
    fn report_refresh_failure(&self, tracker: &StepTracker<SqliteStore>) -> Result<()> {
        if let Some(status) = OperationStatus::from_state("Refreshing steps", tracker.refresh_state())
            .filter(|status| !status.success)
        {
            warn!("{}", status.message);
            self.renderer.render(&status.to_string())?;
        }
        Ok(())
    }

    async fn case(&self, case_id: u64) -> Result<Case> {
        let case = self
            .store
            .get_case(case_id)
            .await?
            .ok_or(TrackerError::CaseNotFound { id: case_id })?;
        Ok(case)
    }

    /// Load a tracker for a case, scoped to the case's own lab.
    async fn tracker(&self, case_id: u64) -> Result<StepTracker<SqliteStore>> {
        let case = self.case(case_id).await?;
        let mut tracker = StepTracker::new(self.store.clone(), case.lab_id, case_id, self.view);
        tracker
            .load()
            .await
            .with_context(|| format!("Failed to load steps of case {case_id}"))?;
        Ok(tracker)
    }

    /// Stage and upload files into a draft. Failed uploads are reported and
    /// left out of the step; returns how many files were uploaded.
    async fn attach_files(
        &self,
        tracker: &mut StepTracker<SqliteStore>,
        target: DraftTarget,
        paths: &[PathBuf],
    ) -> Result<usize> {
        if paths.is_empty() {
            return Ok(0);
        }

        for path in paths {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            debug!("staging {} ({} bytes)", path.display(), bytes.len());
            tracker.stage_attachment(target, file_name(path), bytes)?;
        }

        let failures = tracker.upload_pending_attachments(target).await?;
        for failure in &failures {
            warn!("{failure}");
            self.renderer
                .render(&OperationStatus::failure(failure.to_string()).to_string())?;
        }

        Ok(paths.len() - failures.len())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}

/// Human readable summary of the fields a patch sets.
fn describe_patch(patch: &StepPatch) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(status) = patch.status {
        changes.push(format!("Status set to {}", status.label()));
    }
    if let Some(name) = &patch.custom_workstation_type_name {
        changes.push(format!("Workstation type set to {name}"));
    } else if let Some(id) = &patch.workstation_type_id {
        changes.push(format!("Workstation type set to {id}"));
    }
    match &patch.technician_id {
        Some(Some(technician)) => changes.push(format!("Technician set to {technician}")),
        Some(None) => changes.push("Technician cleared".to_string()),
        None => {}
    }
    for (label, notes) in [
        ("Started", &patch.started_notes),
        ("Completed", &patch.completed_notes),
        ("Issue", &patch.issue_reported_notes),
    ] {
        match notes {
            Some(Some(_)) => changes.push(format!("{label} notes updated")),
            Some(None) => changes.push(format!("{label} notes cleared")),
            None => {}
        }
    }
    changes
}
