//! Step collection controller for one case.
//!
//! [`StepTracker`] owns the in-memory list of a case's workstation steps and
//! coordinates which step, if any, is being created or edited. It is the
//! only writer of that list: the collection is always the result of the
//! last successful fetch from the [`DataStore`](crate::store::DataStore),
//! never patched by hand.
//!
//! # Sessions
//!
//! ```text
//!             begin_new_step                  submit_new_step (ok)
//!   (none) ─────────────────▶ NewStepSession ─────────────────────▶ (none) + refresh
//!      ▲                           │
//!      └──────── cancel_new_step ──┘
//!
//!             begin_edit(id)                  submit_edited_step (ok)
//!   (none) ─────────────────▶ EditSession   ─────────────────────▶ (none) + refresh
//!      ▲                           │
//!      └──────── cancel_edit ──────┘
//! ```
//!
//! At most one creation draft and one edit focus exist at a time. Both
//! carry a detached [`StepDraft`] and an [`AttachmentSession`], so nothing a
//! user types touches the displayed steps until it has been saved and
//! re-fetched.
//!
//! # Request state
//!
//! Create, update and refresh each track an [`OperationState`]. A failed
//! storage call leaves the session in place so the user can retry; nothing
//! is rolled back and nothing is retried automatically.
//!
//! # Examples
//!
//! ```rust,no_run
//! use labtrack_core::{models::{StepPatch, ViewMode}, StepTracker, StoreBuilder};
//!
//! # async fn example() -> labtrack_core::Result<()> {
//! let store = StoreBuilder::new().build().await?;
//! let case = store.create_case("lab-1", "C-1042").await?;
//!
//! let mut tracker = StepTracker::new(store, "lab-1", case.id, ViewMode::Admin);
//! tracker.load().await?;
//!
//! tracker.begin_new_step();
//! tracker.update_new_draft(StepPatch {
//!     workstation_type_id: Some("t-123".to_string()),
//!     technician_id: Some(Some("tech-7".to_string())),
//!     ..Default::default()
//! })?;
//! let step = tracker.submit_new_step().await?;
//! println!("created step {}", step.id);
//! # Ok(())
//! # }
//! ```

use crate::{
    attachments::AttachmentSession,
    models::{StepDraft, Technician, ViewMode, WorkstationStep, WorkstationType, WorkstationTypeRef},
};

pub mod session_ops;
pub mod submit_ops;

pub use session_ops::DraftTarget;

/// Progress of one storage-facing operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    /// The operation failed with the given message
    Failed(String),
}

/// A creation draft awaiting submission.
#[derive(Debug, Clone)]
pub struct NewStepSession {
    pub draft: StepDraft,
    pub attachments: AttachmentSession,
}

/// The step in edit focus and its detached draft.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub step_id: u64,
    pub draft: StepDraft,
    pub attachments: AttachmentSession,
}

/// One row of the tracker as a presentation layer lists it.
#[derive(Debug, Clone)]
pub enum TrackerRow<'a> {
    /// A persisted step; `editing` marks the step in edit focus
    Persisted {
        step: &'a WorkstationStep,
        editing: bool,
    },
    /// The pending creation draft, always last
    Draft {
        draft: &'a StepDraft,
        /// Selected type resolved against the loaded catalog
        workstation_type: Option<WorkstationTypeRef>,
        /// Technician name, or the raw id when it is not in the catalog
        technician: Option<&'a str>,
    },
}

/// Controller for the workstation steps of one case.
pub struct StepTracker<S> {
    pub(crate) store: S,
    pub(crate) lab_id: String,
    pub(crate) case_id: u64,
    pub(crate) view: ViewMode,
    pub(crate) steps: Vec<WorkstationStep>,
    pub(crate) technicians: Vec<Technician>,
    pub(crate) workstation_types: Vec<WorkstationType>,
    pub(crate) new_step: Option<NewStepSession>,
    pub(crate) editing: Option<EditSession>,
    pub(crate) create_state: OperationState,
    pub(crate) update_state: OperationState,
    pub(crate) refresh_state: OperationState,
}

impl<S> StepTracker<S> {
    /// Creates a tracker for one case. Nothing is fetched until
    /// [`StepTracker::load`] or [`StepTracker::refresh`] is called.
    pub fn new(store: S, lab_id: impl Into<String>, case_id: u64, view: ViewMode) -> Self {
        Self {
            store,
            lab_id: lab_id.into(),
            case_id,
            view,
            steps: Vec::new(),
            technicians: Vec::new(),
            workstation_types: Vec::new(),
            new_step: None,
            editing: None,
            create_state: OperationState::Idle,
            update_state: OperationState::Idle,
            refresh_state: OperationState::Idle,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn case_id(&self) -> u64 {
        self.case_id
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Steps from the last successful fetch, in insertion order.
    pub fn steps(&self) -> &[WorkstationStep] {
        &self.steps
    }

    pub fn step(&self, step_id: u64) -> Option<&WorkstationStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn technicians(&self) -> &[Technician] {
        &self.technicians
    }

    pub fn workstation_types(&self) -> &[WorkstationType] {
        &self.workstation_types
    }

    pub fn new_step(&self) -> Option<&NewStepSession> {
        self.new_step.as_ref()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Id of the step in edit focus.
    pub fn editing_step_id(&self) -> Option<u64> {
        self.editing.as_ref().map(|e| e.step_id)
    }

    pub fn create_state(&self) -> &OperationState {
        &self.create_state
    }

    pub fn update_state(&self) -> &OperationState {
        &self.update_state
    }

    pub fn refresh_state(&self) -> &OperationState {
        &self.refresh_state
    }

    /// Persisted steps in natural order, followed by the creation draft.
    pub fn rows(&self) -> Vec<TrackerRow<'_>> {
        let editing_id = self.editing_step_id();
        let mut rows: Vec<TrackerRow<'_>> = self
            .steps
            .iter()
            .map(|step| TrackerRow::Persisted {
                step,
                editing: Some(step.id) == editing_id,
            })
            .collect();

        if let Some(session) = &self.new_step {
            let draft = &session.draft;
            let technician = draft.technician_id.as_deref().map(|id| {
                self.technicians
                    .iter()
                    .find(|t| t.id == id)
                    .map_or(id, |t| t.name.as_str())
            });
            rows.push(TrackerRow::Draft {
                draft,
                workstation_type: draft.workstation_type_ref(&self.workstation_types),
                technician,
            });
        }

        rows
    }
}
