//! Display formatting for cases, steps and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes go through the newtype wrappers in this
//! module. Everything renders as markdown, which the CLI feeds to its
//! terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers and    │    │   Markdown      │
//! │ (Case, Step)    │───▶│ result types    │───▶│    output       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: `Steps`, `Cases`, `Technicians`, `WorkstationTypes`,
//!   `Rows`
//! - [`results`]: `CreateResult`, `UpdateResult`
//! - [`status`]: `OperationStatus`
//! - [`datetime`]: `LocalDateTime`
//!
//! # Examples
//!
//! ```rust
//! use labtrack_core::{display::CreateResult, models::Case};
//! use jiff::Timestamp;
//!
//! let case = Case {
//!     id: 1,
//!     lab_id: "lab-1".to_string(),
//!     case_number: "C-1042".to_string(),
//!     created_at: Timestamp::now(),
//! };
//!
//! let output = CreateResult::new(case).to_string();
//! assert!(output.contains("Created case with ID: 1"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Cases, Rows, Steps, Technicians, WorkstationTypes};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, UpdateResult};
pub use status::OperationStatus;
