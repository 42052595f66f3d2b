//! Case queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{Case, StepOrigin, StepStatus},
};

use super::step_queries::encode_timestamp;

const INSERT_CASE_SQL: &str =
    "INSERT INTO cases (lab_id, case_number, created_at) VALUES (?1, ?2, ?3)";
const INSERT_ORIGIN_STEP_SQL: &str = "INSERT INTO workstation_log (case_id, origin, status, started_at, started_notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_CASE_BY_ID_SQL: &str =
    "SELECT id, lab_id, case_number, created_at FROM cases WHERE id = ?1";
const SELECT_CASES_BY_LAB_SQL: &str =
    "SELECT id, lab_id, case_number, created_at FROM cases WHERE lab_id = ?1 ORDER BY id";

/// Notes written on the system-generated step of a new case.
pub const CASE_CREATED_NOTES: &str = "Case created";

impl super::Database {
    fn build_case_from_row(row: &rusqlite::Row) -> rusqlite::Result<Case> {
        Ok(Case {
            id: row.get::<_, i64>(0)? as u64,
            lab_id: row.get(1)?,
            case_number: row.get(2)?,
            created_at: row.get::<_, String>(3)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
            })?,
        })
    }

    /// Creates a case together with its system-generated origin step.
    pub fn create_case(&mut self, lab_id: &str, case_number: &str) -> Result<Case> {
        if case_number.trim().is_empty() {
            return Err(TrackerError::validation("case_number")
                .with_reason("Case number cannot be empty"));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(INSERT_CASE_SQL, params![lab_id, case_number, &now_str])
            .db_context("Failed to insert case")?;

        let id = tx.last_insert_rowid();

        tx.execute(
            INSERT_ORIGIN_STEP_SQL,
            params![
                id,
                StepOrigin::SystemGenerated.as_str(),
                StepStatus::InProgress.as_str(),
                encode_timestamp(Some(now)),
                CASE_CREATED_NOTES,
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert case origin step")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Case {
            id: id as u64,
            lab_id: lab_id.to_string(),
            case_number: case_number.to_string(),
            created_at: now,
        })
    }

    /// Retrieves a case by its ID.
    pub fn get_case(&self, case_id: u64) -> Result<Option<Case>> {
        self.connection
            .query_row(
                SELECT_CASE_BY_ID_SQL,
                params![case_id as i64],
                Self::build_case_from_row,
            )
            .optional()
            .db_context("Failed to get case")
    }

    /// Lists the cases of a lab.
    pub fn list_cases(&self, lab_id: &str) -> Result<Vec<Case>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_CASES_BY_LAB_SQL)
            .db_context("Failed to prepare query")?;

        let cases = stmt
            .query_map(params![lab_id], Self::build_case_from_row)
            .db_context("Failed to query cases")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch cases")?;

        Ok(cases)
    }
}
