//! Workstation step model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{StatusSlot, StepStatus, Technician};

/// Display name used for the technician of system-generated steps.
pub const SYSTEM_TECHNICIAN_NAME: &str = "System";

/// Where a step came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepOrigin {
    /// Recorded automatically when the case was created; never editable
    SystemGenerated,
    /// Entered by a user
    #[default]
    UserCreated,
}

impl StepOrigin {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOrigin::SystemGenerated => "system",
            StepOrigin::UserCreated => "user",
        }
    }
}

impl std::str::FromStr for StepOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(StepOrigin::SystemGenerated),
            "user" => Ok(StepOrigin::UserCreated),
            _ => Err(format!("Invalid step origin: {s}")),
        }
    }
}

/// Reference to the kind of work performed at a workstation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum WorkstationTypeRef {
    /// An entry of the lab's workstation type catalog
    Catalog { id: String, name: String },
    /// Free text entered when no catalog entry applies
    Custom { name: String },
}

impl WorkstationTypeRef {
    /// Name shown to users.
    pub fn name(&self) -> &str {
        match self {
            WorkstationTypeRef::Catalog { name, .. } | WorkstationTypeRef::Custom { name } => name,
        }
    }
}

/// One unit of work performed on a case at a particular workstation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkstationStep {
    /// Storage-assigned identifier
    pub id: u64,

    /// Case the step belongs to
    pub case_id: u64,

    /// Kind of work; absent only on the system-generated origin step
    pub workstation_type: Option<WorkstationTypeRef>,

    pub status: StepStatus,

    /// Technician who performed the work
    pub technician: Option<Technician>,

    pub origin: StepOrigin,

    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub issue_reported_at: Option<Timestamp>,

    pub started_notes: Option<String>,
    pub completed_notes: Option<String>,
    pub issue_reported_notes: Option<String>,

    /// Public URLs of uploaded files, in upload order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_urls: Vec<String>,

    /// Timestamp when the step was recorded (UTC)
    pub created_at: Timestamp,
}

impl WorkstationStep {
    /// Whether the step is the automatically generated case-creation step.
    pub fn is_system_generated(&self) -> bool {
        self.origin == StepOrigin::SystemGenerated
    }

    /// Name of the technician as it should be displayed.
    pub fn technician_name(&self) -> Option<&str> {
        if self.is_system_generated() {
            return Some(SYSTEM_TECHNICIAN_NAME);
        }
        self.technician.as_ref().map(|t| t.name.as_str())
    }

    /// Notes belonging to the current status.
    pub fn current_notes(&self) -> Option<&str> {
        self.notes_for(self.status.slot())
    }

    /// Timestamp belonging to the current status.
    pub fn current_timestamp(&self) -> Option<&Timestamp> {
        match self.status.slot() {
            StatusSlot::Started => self.started_at.as_ref(),
            StatusSlot::Completed => self.completed_at.as_ref(),
            StatusSlot::IssueReported => self.issue_reported_at.as_ref(),
        }
    }

    /// Notes stored for the given slot, regardless of the current status.
    pub fn notes_for(&self, slot: StatusSlot) -> Option<&str> {
        match slot {
            StatusSlot::Started => self.started_notes.as_deref(),
            StatusSlot::Completed => self.completed_notes.as_deref(),
            StatusSlot::IssueReported => self.issue_reported_notes.as_deref(),
        }
    }
}
