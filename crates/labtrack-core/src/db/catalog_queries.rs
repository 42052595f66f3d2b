//! Technician and workstation type catalog queries.

use rusqlite::params;

use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{Technician, WorkstationType},
};

/// Role of users offered as technicians on workstation steps.
pub const TECHNICIAN_ROLE: &str = "technician";

const INSERT_TECHNICIAN_SQL: &str =
    "INSERT INTO technicians (id, lab_id, name, role) VALUES (?1, ?2, ?3, ?4)";
const SELECT_TECHNICIANS_SQL: &str =
    "SELECT id, name FROM technicians WHERE lab_id = ?1 AND role = ?2 ORDER BY name, id";
const INSERT_WORKSTATION_TYPE_SQL: &str =
    "INSERT INTO workstation_types (id, lab_id, name) VALUES (?1, ?2, ?3)";
const SELECT_WORKSTATION_TYPES_SQL: &str =
    "SELECT id, name FROM workstation_types WHERE lab_id = ?1 ORDER BY name, id";

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackerError::validation(field).with_reason("Value cannot be empty"));
    }
    Ok(())
}

impl super::Database {
    /// Registers a lab user with the given role.
    pub fn add_technician(&self, lab_id: &str, id: &str, name: &str, role: &str) -> Result<Technician> {
        require("id", id)?;
        require("name", name)?;

        self.connection
            .execute(INSERT_TECHNICIAN_SQL, params![id, lab_id, name, role])
            .db_context("Failed to insert technician")?;

        Ok(Technician {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Lists users with the technician role in a lab.
    pub fn list_technicians(&self, lab_id: &str) -> Result<Vec<Technician>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TECHNICIANS_SQL)
            .db_context("Failed to prepare query")?;

        let technicians = stmt
            .query_map(params![lab_id, TECHNICIAN_ROLE], |row| {
                Ok(Technician {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .db_context("Failed to query technicians")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch technicians")?;

        Ok(technicians)
    }

    /// Adds an entry to a lab's workstation type catalog.
    pub fn add_workstation_type(&self, lab_id: &str, id: &str, name: &str) -> Result<WorkstationType> {
        require("id", id)?;
        require("name", name)?;

        self.connection
            .execute(INSERT_WORKSTATION_TYPE_SQL, params![id, lab_id, name])
            .db_context("Failed to insert workstation type")?;

        Ok(WorkstationType {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Lists a lab's workstation type catalog.
    pub fn list_workstation_types(&self, lab_id: &str) -> Result<Vec<WorkstationType>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_WORKSTATION_TYPES_SQL)
            .db_context("Failed to prepare query")?;

        let types = stmt
            .query_map(params![lab_id], |row| {
                Ok(WorkstationType {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .db_context("Failed to query workstation types")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch workstation types")?;

        Ok(types)
    }
}
