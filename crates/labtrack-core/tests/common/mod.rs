#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use labtrack_core::{
    models::{NewStepRecord, StepUpdate, Technician, WorkstationStep, WorkstationType},
    store::StoredObject,
    DataStore, Result, SqliteStore, StoreBuilder, TrackerError,
};
use tempfile::TempDir;

pub const LAB: &str = "lab-1";
pub const PUBLIC_URL: &str = "https://files";

/// Helper function to create a test store in a temporary directory
pub async fn create_test_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = StoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_public_url(Some(PUBLIC_URL.to_string()))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

/// Adds technician `tech-7` and workstation type `t-123` to [`LAB`].
pub async fn seed_catalog(store: &SqliteStore) {
    store
        .add_technician(LAB, "tech-7", "Dana Ortiz", "technician")
        .await
        .expect("Failed to add technician");
    store
        .add_technician(LAB, "admin-1", "Sam Reyes", "admin")
        .await
        .expect("Failed to add admin");
    store
        .add_workstation_type(LAB, "t-123", "Crown Milling")
        .await
        .expect("Failed to add workstation type");
    store
        .add_workstation_type(LAB, "t-200", "Staining")
        .await
        .expect("Failed to add workstation type");
}

/// Wraps a real store, recording write payloads and failing on demand.
pub struct FlakyStore {
    inner: SqliteStore,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_upload: AtomicBool,
    pub fail_catalog: AtomicBool,
    pub fail_list: AtomicBool,
    pub creates: Mutex<Vec<NewStepRecord>>,
    pub updates: Mutex<Vec<(u64, StepUpdate)>>,
}

impl FlakyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_upload: AtomicBool::new(false),
            fail_catalog: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            creates: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &SqliteStore {
        &self.inner
    }

    pub fn create_calls(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataStore for FlakyStore {
    async fn list_technicians(&self, lab_id: &str) -> Result<Vec<Technician>> {
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(TrackerError::storage("technician list unavailable"));
        }
        self.inner.list_technicians(lab_id).await
    }

    async fn list_workstation_types(&self, lab_id: &str) -> Result<Vec<WorkstationType>> {
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(TrackerError::storage("workstation type list unavailable"));
        }
        self.inner.list_workstation_types(lab_id).await
    }

    async fn list_steps(&self, case_id: u64) -> Result<Vec<WorkstationStep>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(TrackerError::storage("step list unavailable"));
        }
        self.inner.list_steps(case_id).await
    }

    async fn create_workstation_step(&self, record: &NewStepRecord) -> Result<WorkstationStep> {
        self.creates.lock().unwrap().push(record.clone());
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(TrackerError::storage("create rejected"));
        }
        self.inner.create_workstation_step(record).await
    }

    async fn update_workstation_step(&self, id: u64, update: &StepUpdate) -> Result<()> {
        self.updates.lock().unwrap().push((id, update.clone()));
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(TrackerError::storage("update rejected"));
        }
        self.inner.update_workstation_step(id, update).await
    }

    async fn upload_file(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<StoredObject> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(TrackerError::Upload {
                file_name: path.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        self.inner.upload_file(bucket, path, bytes).await
    }

    fn get_public_url(&self, bucket: &str, path: &str) -> String {
        self.inner.get_public_url(bucket, path)
    }
}
