use crate::domain::model::{CommitReceipt, RoadmapRecord};
use crate::domain::ports::{RecordStore, Storage};
use crate::utils::error::{Result, RoadmapError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::fs;
use uuid::Uuid;

/// Writes in progress, keyed by final path. `true` once the write was aborted.
type InFlightWrites = Arc<Mutex<HashMap<PathBuf, bool>>>;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    in_flight: InFlightWrites,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            in_flight: Arc::default(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn lock_writes(writes: &InFlightWrites) -> MutexGuard<'_, HashMap<PathBuf, bool>> {
    writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn write_tmp(tmp_path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = tmp_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Runs on the blocking pool. The commit decision and the rename happen under
/// the in-flight lock, so an abort either prevents the rename or sees its result.
fn commit_new_file(
    writes: &InFlightWrites,
    full_path: &Path,
    tmp_path: &Path,
    data: &[u8],
) -> std::io::Result<()> {
    let written = write_tmp(tmp_path, data);

    let mut writes = lock_writes(writes);
    let aborted = writes.remove(full_path).unwrap_or(false);
    let outcome = match written {
        Err(e) => Err(e),
        Ok(()) if aborted => Err(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            format!("write of {} was aborted", full_path.display()),
        )),
        Ok(()) if full_path.exists() => Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", full_path.display()),
        )),
        Ok(()) => std::fs::rename(tmp_path, full_path),
    };

    if outcome.is_err() {
        let _ = remove_if_present(tmp_path);
    }
    drop(writes);
    outcome
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        Ok(fs::read(full_path).await?)
    }

    /// Writes to a temporary sibling and renames it into place, so readers never
    /// see a half-written file.
    ///
    /// The whole write runs as one blocking job. Dropping the returned future does
    /// not stop it; use `abort_write` to make sure it leaves nothing behind.
    async fn write_new_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = self.base_path.join(path);
        let tmp_path = full_path.with_extension("tmp");

        {
            let mut writes = lock_writes(&self.in_flight);
            if writes.contains_key(&full_path) {
                return Err(RoadmapError::IoError(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("{} is already being written", full_path.display()),
                )));
            }
            writes.insert(full_path.clone(), false);
        }

        let writes = Arc::clone(&self.in_flight);
        let data = data.to_vec();
        let job_path = full_path.clone();
        tokio::task::spawn_blocking(move || commit_new_file(&writes, &job_path, &tmp_path, &data))
            .await
            .map_err(|e| RoadmapError::IoError(std::io::Error::other(e.to_string())))??;

        Ok(full_path.to_string_lossy().into_owned())
    }

    async fn abort_write(&self, path: &str) -> Result<()> {
        let full_path = self.base_path.join(path);
        let tmp_path = full_path.with_extension("tmp");

        let mut writes = lock_writes(&self.in_flight);
        if let Some(aborted) = writes.get_mut(&full_path) {
            // Still running: the job sees the flag and cleans up after itself.
            *aborted = true;
            return Ok(());
        }

        remove_if_present(&full_path)?;
        remove_if_present(&tmp_path)?;
        Ok(())
    }
}

/// One JSON document per record under `records/`.
pub struct FileRecordStore<S: Storage> {
    storage: S,
}

impl<S: Storage> FileRecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn record_path(id: &Uuid) -> String {
        format!("records/{}.json", id)
    }

    pub async fn load(&self, id: &Uuid) -> Result<RoadmapRecord> {
        let data = self.storage.read_file(&Self::record_path(id)).await?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[async_trait]
impl<S: Storage> RecordStore for FileRecordStore<S> {
    async fn append(&self, record: &RoadmapRecord) -> Result<CommitReceipt> {
        let data = serde_json::to_vec_pretty(record)?;
        tracing::debug!("Writing record {} ({} bytes)", record.id, data.len());

        let location = self
            .storage
            .write_new_file(&Self::record_path(&record.id), &data)
            .await
            .map_err(|e| RoadmapError::persistence(e.to_string()))?;

        Ok(CommitReceipt {
            record_id: record.id,
            location,
        })
    }

    async fn abort(&self, id: &Uuid) -> Result<()> {
        self.storage
            .abort_write(&Self::record_path(id))
            .await
            .map_err(|e| RoadmapError::persistence(e.to_string()))
    }
}
