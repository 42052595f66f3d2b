//! [`DataStore`] backed by SQLite and a local object directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::task;

use super::{DataStore, ObjectStore, StoredObject};
use crate::{
    db::Database,
    error::{JoinResultExt, Result, TrackerError},
    models::{
        Case, NewStepRecord, StepOrigin, StepUpdate, Technician, WorkstationStep, WorkstationType,
    },
};

/// SQLite-backed data store.
///
/// Each operation opens its own connection on the blocking thread pool, so
/// the store is cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
    objects: ObjectStore,
}

impl SqliteStore {
    pub(crate) fn new(db_path: PathBuf, objects: ObjectStore) -> Self {
        Self { db_path, objects }
    }

    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    /// Run a closure against a fresh connection on the blocking pool.
    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .join_context()?
    }

    /// Opens a case and records its system-generated origin step.
    pub async fn create_case(&self, lab_id: &str, case_number: &str) -> Result<Case> {
        let lab_id = lab_id.to_string();
        let case_number = case_number.to_string();
        self.with_db(move |db| db.create_case(&lab_id, &case_number))
            .await
    }

    /// Retrieves a case by its ID.
    pub async fn get_case(&self, case_id: u64) -> Result<Option<Case>> {
        self.with_db(move |db| db.get_case(case_id)).await
    }

    /// Lists the cases of a lab.
    pub async fn list_cases(&self, lab_id: &str) -> Result<Vec<Case>> {
        let lab_id = lab_id.to_string();
        self.with_db(move |db| db.list_cases(&lab_id)).await
    }

    /// Registers a lab user with the given role.
    pub async fn add_technician(
        &self,
        lab_id: &str,
        id: &str,
        name: &str,
        role: &str,
    ) -> Result<Technician> {
        let (lab_id, id, name, role) = (
            lab_id.to_string(),
            id.to_string(),
            name.to_string(),
            role.to_string(),
        );
        self.with_db(move |db| db.add_technician(&lab_id, &id, &name, &role))
            .await
    }

    /// Adds an entry to a lab's workstation type catalog.
    pub async fn add_workstation_type(
        &self,
        lab_id: &str,
        id: &str,
        name: &str,
    ) -> Result<WorkstationType> {
        let (lab_id, id, name) = (lab_id.to_string(), id.to_string(), name.to_string());
        self.with_db(move |db| db.add_workstation_type(&lab_id, &id, &name))
            .await
    }

    /// Retrieves a single step by its ID.
    pub async fn get_step(&self, step_id: u64) -> Result<Option<WorkstationStep>> {
        self.with_db(move |db| db.get_step(step_id)).await
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn list_technicians(&self, lab_id: &str) -> Result<Vec<Technician>> {
        let lab_id = lab_id.to_string();
        self.with_db(move |db| db.list_technicians(&lab_id)).await
    }

    async fn list_workstation_types(&self, lab_id: &str) -> Result<Vec<WorkstationType>> {
        let lab_id = lab_id.to_string();
        self.with_db(move |db| db.list_workstation_types(&lab_id))
            .await
    }

    async fn list_steps(&self, case_id: u64) -> Result<Vec<WorkstationStep>> {
        self.with_db(move |db| db.get_steps(case_id)).await
    }

    async fn create_workstation_step(&self, record: &NewStepRecord) -> Result<WorkstationStep> {
        debug!("create_workstation_step: {:?}", record);
        let record = record.clone();
        self.with_db(move |db| db.insert_step(&record, StepOrigin::UserCreated))
            .await
    }

    async fn update_workstation_step(&self, id: u64, update: &StepUpdate) -> Result<()> {
        debug!("update_workstation_step {id}: {:?}", update);
        let update = update.clone();
        self.with_db(move |db| db.update_step(id, &update)).await
    }

    async fn upload_file(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<StoredObject> {
        self.objects
            .put(bucket, path, bytes)
            .await
            .map_err(|e| match e {
                upload @ TrackerError::Upload { .. } => upload,
                other => TrackerError::Upload {
                    file_name: path.to_string(),
                    reason: other.to_string(),
                },
            })
    }

    fn get_public_url(&self, bucket: &str, path: &str) -> String {
        self.objects.public_url(bucket, path)
    }
}
