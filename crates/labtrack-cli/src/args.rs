//! Command-line argument definitions using clap.
//!
//! Argument structs stay on the CLI side and convert into core types
//! (`StepPatch`, `StepStatus`, `ViewMode`) through `From`, so the core crate
//! carries no clap attributes.
//!
//! ```text
//! User Input → CLI Args (clap) → Core types → StepTracker
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use labtrack_core::models::{StepPatch, StepStatus, ViewMode, CUSTOM_WORKSTATION_TYPE_ID};

/// Track dental lab cases through their workstation steps
///
/// Every case starts with a system-generated intake step. Technicians then
/// add a step per workstation the case passes through, update its status,
/// and attach scans or photos.
#[derive(Parser)]
#[command(version, about, name = "labtrack")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/labtrack/labtrack.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Directory attachments are stored under. Defaults to `objects/` next
    /// to the database file
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// URL prefix attachments are served under. Defaults to a file:// URL
    /// of the storage directory
    #[arg(long, global = true)]
    pub public_url: Option<String>,

    /// Lab tenant to operate on
    #[arg(long, global = true, default_value = "default")]
    pub lab: String,

    /// Which status set is offered when creating or editing steps
    #[arg(long, global = true, value_enum, default_value_t = ViewModeArg::Admin)]
    pub view: ViewModeArg,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the lab's technicians
    #[command(alias = "t")]
    Technician {
        #[command(subcommand)]
        command: TechnicianCommands,
    },
    /// Manage the workstation type catalog
    #[command(name = "type", alias = "w")]
    WorkstationType {
        #[command(subcommand)]
        command: TypeCommands,
    },
    /// Manage cases
    #[command(alias = "c")]
    Case {
        #[command(subcommand)]
        command: CaseCommands,
    },
    /// Record and update workstation steps
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
}

/// Register a lab user
#[derive(ClapArgs)]
pub struct AddTechnicianArgs {
    /// Unique identifier of the user
    pub id: String,
    /// Display name
    pub name: String,
    /// Role of the user; only `technician` users are offered on steps
    #[arg(long, default_value = "technician")]
    pub role: String,
}

#[derive(Subcommand)]
pub enum TechnicianCommands {
    /// Register a lab user
    #[command(alias = "a")]
    Add(AddTechnicianArgs),
    /// List the lab's technicians
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Add an entry to the workstation type catalog
#[derive(ClapArgs)]
pub struct AddTypeArgs {
    /// Unique identifier of the workstation type
    pub id: String,
    /// Display name, e.g. "Crown Milling"
    pub name: String,
}

#[derive(Subcommand)]
pub enum TypeCommands {
    /// Add an entry to the workstation type catalog
    #[command(alias = "a")]
    Add(AddTypeArgs),
    /// List the workstation type catalog
    #[command(aliases = ["l", "ls"])]
    List,
}

#[derive(ClapArgs)]
pub struct CreateCaseArgs {
    /// Lab-facing case number
    pub case_number: String,
}

#[derive(ClapArgs)]
pub struct ShowCaseArgs {
    /// ID of the case to display
    pub id: u64,
}

#[derive(Subcommand)]
pub enum CaseCommands {
    /// Open a case; its intake step is recorded automatically
    #[command(alias = "c")]
    Create(CreateCaseArgs),
    /// Show a case and its workstation steps
    #[command(alias = "s")]
    Show(ShowCaseArgs),
    /// List the lab's cases
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Fields shared by step creation and update
#[derive(ClapArgs)]
pub struct StepFieldArgs {
    /// Status of the step
    #[arg(short, long, value_enum)]
    pub status: Option<StepStatusArg>,
    /// Catalog id of the workstation type
    #[arg(short = 't', long = "type", conflicts_with = "custom_type")]
    pub workstation_type: Option<String>,
    /// Free-text workstation type, for work the catalog does not cover
    #[arg(long)]
    pub custom_type: Option<String>,
    /// ID of the technician performing the work; an empty value clears it
    #[arg(short = 'T', long)]
    pub technician: Option<String>,
    /// Notes for the in-progress (or on-hold) status; an empty value clears them
    #[arg(long)]
    pub started_notes: Option<String>,
    /// Notes for the completed status; an empty value clears them
    #[arg(long)]
    pub completed_notes: Option<String>,
    /// Notes for the issue-reported status; an empty value clears them
    #[arg(long)]
    pub issue_notes: Option<String>,
    /// Files to upload and attach to the step
    #[arg(short, long = "attach", value_name = "FILE")]
    pub attachments: Vec<PathBuf>,
}

impl From<&StepFieldArgs> for StepPatch {
    fn from(val: &StepFieldArgs) -> Self {
        let workstation_type_id = match (&val.workstation_type, &val.custom_type) {
            (_, Some(_)) => Some(CUSTOM_WORKSTATION_TYPE_ID.to_string()),
            (Some(id), None) => Some(id.clone()),
            (None, None) => None,
        };

        StepPatch {
            status: val.status.map(StepStatus::from),
            workstation_type_id,
            custom_workstation_type_name: val.custom_type.clone(),
            technician_id: clearable(&val.technician),
            started_notes: clearable(&val.started_notes),
            completed_notes: clearable(&val.completed_notes),
            issue_reported_notes: clearable(&val.issue_notes),
        }
    }
}

/// A flag that was passed blank clears the field.
fn clearable(value: &Option<String>) -> Option<Option<String>> {
    value
        .as_ref()
        .map(|v| Some(v.clone()).filter(|v| !v.trim().is_empty()))
}

/// Record a new workstation step on a case
#[derive(ClapArgs)]
pub struct AddStepArgs {
    /// ID of the case the step belongs to
    pub case_id: u64,
    #[command(flatten)]
    pub fields: StepFieldArgs,
}

/// Update a workstation step
///
/// Completing a step or reporting an issue stamps the matching timestamp.
/// Notes for every status can be set regardless of the current status.
#[derive(ClapArgs)]
pub struct UpdateStepArgs {
    /// ID of the step to update
    pub id: u64,
    #[command(flatten)]
    pub fields: StepFieldArgs,
    /// Positions (0-based) of existing attachments to drop from the step
    #[arg(long = "remove-attachment", value_name = "INDEX", value_delimiter = ',')]
    pub remove_attachments: Vec<usize>,
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Record a new workstation step on a case
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// Update a workstation step
    #[command(alias = "u")]
    Update(UpdateStepArgs),
}

/// Command-line representation of step statuses
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StepStatusArg {
    InProgress,
    Completed,
    IssueReported,
    /// Only accepted with `--view client`
    OnHold,
}

impl From<StepStatusArg> for StepStatus {
    fn from(val: StepStatusArg) -> Self {
        match val {
            StepStatusArg::InProgress => StepStatus::InProgress,
            StepStatusArg::Completed => StepStatus::Completed,
            StepStatusArg::IssueReported => StepStatus::IssueReported,
            StepStatusArg::OnHold => StepStatus::OnHold,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ViewModeArg {
    Admin,
    Client,
}

impl From<ViewModeArg> for ViewMode {
    fn from(val: ViewModeArg) -> Self {
        match val {
            ViewModeArg::Admin => ViewMode::Admin,
            ViewModeArg::Client => ViewMode::Client,
        }
    }
}
