//! Workstation step statuses and the display/transition policy attached to
//! them.
//!
//! The policy is a pure mapping: every status names the label shown to
//! users, the affordance a presentation layer should use, and which of the
//! three note/timestamp pairs on a step belongs to it. Transitions are
//! unrestricted; any status may follow any other.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a workstation step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Work at the workstation has started
    #[default]
    InProgress,

    /// Work at the workstation is finished
    Completed,

    /// A problem was found and reported
    IssueReported,

    /// Work is paused; offered in the client view only
    OnHold,
}

/// Which of the three note/timestamp pairs on a step a status reads and
/// writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSlot {
    /// `started_notes` / `started_at`
    Started,
    /// `completed_notes` / `completed_at`
    Completed,
    /// `issue_reported_notes` / `issue_reported_at`
    IssueReported,
}

/// Visual treatment a presentation layer should give a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Neutral, actively being worked
    Neutral,
    /// Finished successfully
    Success,
    /// Needs attention
    Warning,
    /// Waiting on someone else
    Paused,
}

/// Audience of a tracker instance.
///
/// Both audiences share one status enum; they differ only in which statuses
/// are offered for selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Lab staff
    #[default]
    Admin,
    /// The dental practice that sent the case
    Client,
}

const ADMIN_STATUSES: &[StepStatus] = &[
    StepStatus::InProgress,
    StepStatus::Completed,
    StepStatus::IssueReported,
];

const CLIENT_STATUSES: &[StepStatus] = &[
    StepStatus::InProgress,
    StepStatus::Completed,
    StepStatus::IssueReported,
    StepStatus::OnHold,
];

impl ViewMode {
    /// Statuses a user of this view may select.
    pub fn selectable_statuses(&self) -> &'static [StepStatus] {
        match self {
            ViewMode::Admin => ADMIN_STATUSES,
            ViewMode::Client => CLIENT_STATUSES,
        }
    }

    /// Whether `status` is offered in this view.
    pub fn offers(&self, status: StepStatus) -> bool {
        self.selectable_statuses().contains(&status)
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Admin => "admin",
            ViewMode::Client => "client",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(ViewMode::Admin),
            "client" => Ok(ViewMode::Client),
            _ => Err(format!("Invalid view mode: {s}")),
        }
    }
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "issue_reported" | "issuereported" => Ok(StepStatus::IssueReported),
            "on_hold" | "onhold" => Ok(StepStatus::OnHold),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Every status, in display order.
    pub const ALL: [StepStatus; 4] = [
        StepStatus::InProgress,
        StepStatus::Completed,
        StepStatus::IssueReported,
        StepStatus::OnHold,
    ];

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::IssueReported => "issue_reported",
            StepStatus::OnHold => "on_hold",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::InProgress => "In Progress",
            StepStatus::Completed => "Completed",
            StepStatus::IssueReported => "Issue Reported",
            StepStatus::OnHold => "On Hold",
        }
    }

    /// Visual treatment of the status, independent of any terminal or UI.
    pub fn affordance(&self) -> Affordance {
        match self {
            StepStatus::InProgress => Affordance::Neutral,
            StepStatus::Completed => Affordance::Success,
            StepStatus::IssueReported => Affordance::Warning,
            StepStatus::OnHold => Affordance::Paused,
        }
    }

    /// The note/timestamp pair this status reads and writes.
    ///
    /// `OnHold` has no pair of its own and shares the started pair.
    pub fn slot(&self) -> StatusSlot {
        match self {
            StepStatus::InProgress | StepStatus::OnHold => StatusSlot::Started,
            StepStatus::Completed => StatusSlot::Completed,
            StepStatus::IssueReported => StatusSlot::IssueReported,
        }
    }

    /// Label prefixed with an icon for terminal output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use labtrack_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::IssueReported.with_icon(), "⚠ Issue Reported");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Completed => "✓ Completed",
            StepStatus::IssueReported => "⚠ Issue Reported",
            StepStatus::OnHold => "‖ On Hold",
        }
    }

    /// Whether moving from `self` to `next` is permitted. Always true.
    pub fn can_transition_to(&self, _next: StepStatus) -> bool {
        true
    }
}
