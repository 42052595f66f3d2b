//! Display implementations for domain models.
//!
//! Output is markdown: a heading per case or step, a metadata list, and the
//! notes belonging to the step's current status as a paragraph.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{
        Case, StatusSlot, StepStatus, Technician, ViewMode, WorkstationStep, WorkstationType,
        WorkstationTypeRef,
    },
    tracker::TrackerRow,
};

const UNASSIGNED_WORKSTATION: &str = "Case intake";

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StatusSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusSlot::Started => "Started",
            StatusSlot::Completed => "Completed",
            StatusSlot::IssueReported => "Issue reported",
        };
        write!(f, "{label}")
    }
}

impl fmt::Display for WorkstationTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkstationTypeRef::Catalog { name, .. } => write!(f, "{name}"),
            WorkstationTypeRef::Custom { name } => write!(f, "{name} (custom)"),
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. Case {}", self.id, self.case_number)?;
        writeln!(f)?;
        writeln!(f, "- Lab: {}", self.lab_id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))
    }
}

impl fmt::Display for Technician {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- **{}** ({})", self.name, self.id)
    }
}

impl fmt::Display for WorkstationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- **{}** ({})", self.name, self.id)
    }
}

impl fmt::Display for WorkstationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.workstation_type {
            Some(kind) => writeln!(f, "### {}. {} ({})", self.id, kind, self.status.with_icon())?,
            None => writeln!(
                f,
                "### {}. {} ({})",
                self.id,
                UNASSIGNED_WORKSTATION,
                self.status.with_icon()
            )?,
        }
        writeln!(f)?;

        if let Some(name) = self.technician_name() {
            writeln!(f, "- Technician: {name}")?;
        }
        if let Some(at) = self.current_timestamp() {
            writeln!(f, "- {}: {}", self.status.slot(), LocalDateTime(at))?;
        }
        if !self.attachment_urls.is_empty() {
            writeln!(f, "- Attachments:")?;
            for url in &self.attachment_urls {
                writeln!(f, "  - {url}")?;
            }
        }
        writeln!(f)?;

        if let Some(notes) = self.current_notes().filter(|n| !n.trim().is_empty()) {
            writeln!(f, "{notes}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for TrackerRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerRow::Persisted { step, editing } => {
                if *editing {
                    writeln!(f, "> Editing step {}", step.id)?;
                    writeln!(f)?;
                }
                write!(f, "{step}")
            }
            TrackerRow::Draft {
                draft,
                workstation_type,
                technician,
            } => {
                let status = draft.status.map_or("(no status)", |s| s.with_icon());
                match workstation_type {
                    Some(kind) => writeln!(f, "### New step: {kind} ({status})")?,
                    None => writeln!(f, "### New step: (no workstation type) ({status})")?,
                }
                writeln!(f)?;
                if let Some(name) = technician {
                    writeln!(f, "- Technician: {name}")?;
                }
                if let Some(status) = draft.status {
                    let notes = draft.notes_for(status.slot());
                    if !notes.is_empty() {
                        writeln!(f)?;
                        writeln!(f, "{notes}")?;
                    }
                }
                writeln!(f)
            }
        }
    }
}
