//! The data store the tracker persists through.
//!
//! The tracker never talks to a database or object storage directly; it
//! consumes the [`DataStore`] trait. [`SqliteStore`] implements it on top of
//! a local SQLite file and a directory of buckets.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{NewStepRecord, StepUpdate, Technician, WorkstationStep, WorkstationType},
};

pub mod builder;
pub mod objects;
pub mod sqlite;

pub use builder::StoreBuilder;
pub use objects::ObjectStore;
pub use sqlite::SqliteStore;

/// Bucket that holds workstation step attachments.
pub const WORKSTATION_BUCKET: &str = "workstation";

/// An object written to object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path of the object inside its bucket
    pub path: String,
    /// URL the object can be fetched from
    pub public_url: String,
}

/// Persistence and object storage operations the tracker relies on.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Users with the technician role in a lab.
    async fn list_technicians(&self, lab_id: &str) -> Result<Vec<Technician>>;

    /// The lab's workstation type catalog.
    async fn list_workstation_types(&self, lab_id: &str) -> Result<Vec<WorkstationType>>;

    /// Every step of a case in insertion order.
    async fn list_steps(&self, case_id: u64) -> Result<Vec<WorkstationStep>>;

    /// Persist a new step; the store assigns its id.
    async fn create_workstation_step(&self, record: &NewStepRecord) -> Result<WorkstationStep>;

    /// Partial update keyed by step id.
    async fn update_workstation_step(&self, id: u64, update: &StepUpdate) -> Result<()>;

    /// Write an object into a bucket.
    async fn upload_file(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<StoredObject>;

    /// Resolve a stored object to a fetchable URL.
    fn get_public_url(&self, bucket: &str, path: &str) -> String;
}
