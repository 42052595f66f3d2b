//! Case and catalog models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A dental lab work order tracked through workstation steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    /// Unique identifier for the case
    pub id: u64,

    /// Lab tenant that owns the case
    pub lab_id: String,

    /// Lab-facing case number
    pub case_number: String,

    /// Timestamp when the case was created (UTC)
    pub created_at: Timestamp,
}

/// A user who performs work at workstations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Technician {
    pub id: String,
    pub name: String,
}

/// An entry of a lab's workstation type catalog (milling, staining, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkstationType {
    pub id: String,
    pub name: String,
}
