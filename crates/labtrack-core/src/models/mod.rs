//! Data models for cases and their workstation steps.
//!
//! This module contains the domain models of the tracker. Display
//! implementations live in [`crate::display::models`] so presentation stays
//! separate from the data structures.
//!
//! # Overview
//!
//! - [`WorkstationStep`]: one unit of work on a case, with a status and one
//!   note/timestamp pair per status
//! - [`StepStatus`]: the shared status enum and its display policy
//! - [`StepDraft`] / [`StepPatch`]: detached field sets edited before submit
//! - [`NewStepRecord`] / [`StepUpdate`]: payloads sent to the data store
//! - [`Case`], [`Technician`], [`WorkstationType`]: supporting records
//!
//! # Examples
//!
//! ```rust
//! use labtrack_core::models::{StepOrigin, StepStatus, WorkstationStep};
//! use jiff::Timestamp;
//!
//! let step = WorkstationStep {
//!     id: 1,
//!     case_id: 7,
//!     workstation_type: None,
//!     status: StepStatus::Completed,
//!     technician: None,
//!     origin: StepOrigin::UserCreated,
//!     started_at: None,
//!     completed_at: Some(Timestamp::now()),
//!     issue_reported_at: None,
//!     started_notes: Some("scan received".to_string()),
//!     completed_notes: Some("milled and polished".to_string()),
//!     issue_reported_notes: None,
//!     attachment_urls: vec![],
//!     created_at: Timestamp::now(),
//! };
//! assert_eq!(step.current_notes(), Some("milled and polished"));
//! ```

pub mod case;
pub mod draft;
pub mod requests;
pub mod status;
pub mod step;


pub use case::{Case, Technician, WorkstationType};
pub use draft::{StepDraft, StepPatch, ValidatedDraft, CUSTOM_WORKSTATION_TYPE_ID};
pub use requests::{NewStepRecord, StepUpdate};
pub use status::{Affordance, StatusSlot, StepStatus, ViewMode};
pub use step::{StepOrigin, WorkstationStep, WorkstationTypeRef, SYSTEM_TECHNICIAN_NAME};
