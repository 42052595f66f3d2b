//! Workstation step queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{
        NewStepRecord, StepOrigin, StepStatus, StepUpdate, Technician, WorkstationStep,
        WorkstationTypeRef,
    },
};

const CHECK_CASE_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM cases WHERE id = ?1)";
const INSERT_STEP_SQL: &str = "INSERT INTO workstation_log (case_id, workstation_type_id, custom_workstation_type_name, technician_id, origin, status, started_at, completed_at, issue_reported_at, started_notes, completed_notes, issue_reported_notes, attachements, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";
const UPDATE_STEP_SQL: &str = "UPDATE workstation_log SET status = ?1, technician_id = ?2, completed_at = ?3, issue_reported_at = ?4, workstation_type_id = ?5, custom_workstation_type_name = ?6, started_notes = ?7, completed_notes = ?8, issue_reported_notes = ?9, attachements = ?10, updated_at = ?11 WHERE id = ?12";
const SELECT_STEP_COLUMNS: &str = "SELECT l.id, l.case_id, l.workstation_type_id, wt.name, l.custom_workstation_type_name, l.technician_id, t.name, l.origin, l.status, l.started_at, l.completed_at, l.issue_reported_at, l.started_notes, l.completed_notes, l.issue_reported_notes, l.attachements, l.created_at FROM workstation_log l LEFT JOIN workstation_types wt ON wt.id = l.workstation_type_id LEFT JOIN technicians t ON t.id = l.technician_id";

fn select_steps_by_case_sql() -> String {
    format!("{SELECT_STEP_COLUMNS} WHERE l.case_id = ?1 ORDER BY l.id")
}

fn select_step_by_id_sql() -> String {
    format!("{SELECT_STEP_COLUMNS} WHERE l.id = ?1")
}

fn conversion_error(
    column: usize,
    error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, error.into())
}

fn optional_timestamp(row: &Row, column: usize) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(column)?
        .map(|s| s.parse::<Timestamp>().map_err(|e| conversion_error(column, e)))
        .transpose()
}

pub(crate) fn encode_timestamp(ts: Option<Timestamp>) -> Option<String> {
    ts.map(|t| t.to_string())
}

impl super::Database {
    /// Helper function to construct a step from a joined row
    fn build_step_from_row(row: &Row) -> rusqlite::Result<WorkstationStep> {
        let type_id: Option<String> = row.get(2)?;
        let type_name: Option<String> = row.get(3)?;
        let custom_name: Option<String> = row.get(4)?;
        let workstation_type = match (type_id, custom_name) {
            (Some(id), _) => Some(WorkstationTypeRef::Catalog {
                name: type_name.unwrap_or_else(|| id.clone()),
                id,
            }),
            (None, Some(name)) => Some(WorkstationTypeRef::Custom { name }),
            (None, None) => None,
        };

        let technician_id: Option<String> = row.get(5)?;
        let technician_name: Option<String> = row.get(6)?;
        let technician = technician_id.map(|id| Technician {
            name: technician_name.unwrap_or_else(|| id.clone()),
            id,
        });

        let origin_str: String = row.get(7)?;
        let origin = origin_str
            .parse::<StepOrigin>()
            .map_err(|e| conversion_error(7, e))?;

        let status_str: String = row.get(8)?;
        let status = status_str
            .parse::<StepStatus>()
            .map_err(|e| conversion_error(8, e))?;

        let attachments_str: String = row.get(15)?;
        let attachment_urls: Vec<String> =
            serde_json::from_str(&attachments_str).map_err(|e| conversion_error(15, e))?;

        Ok(WorkstationStep {
            id: row.get::<_, i64>(0)? as u64,
            case_id: row.get::<_, i64>(1)? as u64,
            workstation_type,
            status,
            technician,
            origin,
            started_at: optional_timestamp(row, 9)?,
            completed_at: optional_timestamp(row, 10)?,
            issue_reported_at: optional_timestamp(row, 11)?,
            started_notes: row.get(12)?,
            completed_notes: row.get(13)?,
            issue_reported_notes: row.get(14)?,
            attachment_urls,
            created_at: row
                .get::<_, String>(16)?
                .parse::<Timestamp>()
                .map_err(|e| conversion_error(16, e))?,
        })
    }

    /// Inserts a workstation step and returns it as stored.
    pub fn insert_step(&mut self, record: &NewStepRecord, origin: StepOrigin) -> Result<WorkstationStep> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let case_exists: bool = tx
            .query_row(CHECK_CASE_EXISTS_SQL, params![record.case_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check case existence")?;

        if !case_exists {
            return Err(TrackerError::CaseNotFound { id: record.case_id });
        }

        let attachments = serde_json::to_string(&record.attachment_urls)?;
        let now_str = Timestamp::now().to_string();

        tx.execute(
            INSERT_STEP_SQL,
            params![
                record.case_id as i64,
                record.workstation_type_id,
                record.custom_workstation_type_name,
                record.technician_id,
                origin.as_str(),
                record.status.as_str(),
                encode_timestamp(record.started_at),
                encode_timestamp(record.completed_at),
                encode_timestamp(record.issue_reported_at),
                record.started_notes,
                record.completed_notes,
                record.issue_reported_notes,
                attachments,
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert workstation step")?;

        let id = tx.last_insert_rowid();

        let step = tx
            .query_row(
                &select_step_by_id_sql(),
                params![id],
                Self::build_step_from_row,
            )
            .db_context("Failed to read back inserted step")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(step)
    }

    /// Applies a partial update to a step.
    pub fn update_step(&mut self, step_id: u64, update: &StepUpdate) -> Result<()> {
        let attachments = serde_json::to_string(&update.attachment_urls)?;
        let now_str = Timestamp::now().to_string();

        let changed = self
            .connection
            .execute(
                UPDATE_STEP_SQL,
                params![
                    update.status.as_str(),
                    update.technician_id,
                    encode_timestamp(update.completed_at),
                    encode_timestamp(update.issue_reported_at),
                    update.workstation_type_id,
                    update.custom_workstation_type_name,
                    update.started_notes,
                    update.completed_notes,
                    update.issue_reported_notes,
                    attachments,
                    &now_str,
                    step_id as i64
                ],
            )
            .db_context("Failed to update workstation step")?;

        if changed == 0 {
            return Err(TrackerError::StepNotFound { id: step_id });
        }

        Ok(())
    }

    /// Retrieves all steps of a case in insertion order.
    pub fn get_steps(&self, case_id: u64) -> Result<Vec<WorkstationStep>> {
        let mut stmt = self
            .connection
            .prepare(&select_steps_by_case_sql())
            .db_context("Failed to prepare query")?;

        let steps = stmt
            .query_map(params![case_id as i64], Self::build_step_from_row)
            .db_context("Failed to query steps")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch steps")?;

        Ok(steps)
    }

    /// Retrieves a single step by its ID.
    pub fn get_step(&self, step_id: u64) -> Result<Option<WorkstationStep>> {
        self.connection
            .query_row(
                &select_step_by_id_sql(),
                params![step_id as i64],
                Self::build_step_from_row,
            )
            .optional()
            .db_context("Failed to get step")
    }
}
