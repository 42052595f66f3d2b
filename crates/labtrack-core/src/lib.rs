//! Core library for the labtrack dental lab case tracker.
//!
//! A case moves through a series of workstation steps (milling, staining,
//! finishing, ...). Each step records who worked on it, its status, notes and
//! timestamps for that status, and attached files. This crate holds the
//! models, the SQLite-backed data store and the [`StepTracker`] controller
//! that coordinates creating and editing the steps of one case.
//!
//! - [`models`]: cases, steps, drafts, status policy and store payloads
//! - [`store`]: the [`DataStore`] trait and its SQLite implementation
//! - [`tracker`]: per-case step collection controller
//! - [`attachments`]: attachment working sets and uploads
//! - [`display`]: markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use labtrack_core::{models::{StepPatch, ViewMode}, StepTracker, StoreBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreBuilder::new()
//!     .with_database_path(Some("lab.db"))
//!     .build()
//!     .await?;
//!
//! store.add_workstation_type("lab-1", "t-123", "Crown Milling").await?;
//! let case = store.create_case("lab-1", "C-1042").await?;
//!
//! let mut tracker = StepTracker::new(store, "lab-1", case.id, ViewMode::Admin);
//! tracker.load().await?;
//! tracker.begin_new_step();
//! tracker.update_new_draft(StepPatch {
//!     workstation_type_id: Some("t-123".to_string()),
//!     ..Default::default()
//! })?;
//! tracker.submit_new_step().await?;
//!
//! for step in tracker.steps() {
//!     println!("{step}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod attachments;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use attachments::{AttachmentEntry, AttachmentSession, UploadStatus};
pub use db::Database;
pub use display::{
    Cases, CreateResult, LocalDateTime, OperationStatus, Rows, Steps, Technicians, UpdateResult,
    WorkstationTypes,
};
pub use error::{Result, TrackerError};
pub use models::{
    Case, StepDraft, StepOrigin, StepPatch, StepStatus, Technician, ViewMode, WorkstationStep,
    WorkstationType, WorkstationTypeRef,
};
pub use store::{DataStore, SqliteStore, StoreBuilder};
pub use tracker::{DraftTarget, OperationState, StepTracker, TrackerRow};
