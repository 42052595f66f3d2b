//! SQLite persistence for cases, catalogs and workstation steps.
//!
//! This module provides the blocking, connection-level operations behind
//! [`crate::store::SqliteStore`]. Every call opens its own [`Database`]; the
//! store moves that work onto the blocking thread pool.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod case_queries;
pub mod catalog_queries;
pub mod migrations;
pub mod step_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
