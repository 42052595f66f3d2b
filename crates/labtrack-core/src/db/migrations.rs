//! Database schema initialization.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    ///
    /// Every statement in the schema is `IF NOT EXISTS`, so reopening an
    /// existing database is a no-op.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        Ok(())
    }
}
