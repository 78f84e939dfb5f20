//! Filesystem store
//!
//! One pretty-printed JSON document per participant at
//! `<data-root>/<participantId>.json`, and one directory of uploaded files per
//! participant at `<upload-root>/<participantId>/`.
//!
//! Saves to the same participant are serialized in-process: the
//! read-merge-write sequence runs under a mutex keyed by participant ID.
//! Different participants never contend.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use survey_common::{id::is_valid_participant_id, Error, ParticipantRecord, Result};
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Participant documents and uploads on disk
#[derive(Debug, Clone)]
pub struct ParticipantStore {
    data_dir: PathBuf,
    upload_dir: PathBuf,
    locks: Arc<Mutex<LockMap>>,
}

impl ParticipantStore {
    pub fn new(data_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            upload_dir: upload_dir.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create both storage roots if missing
    ///
    /// Called once at startup; an error here must stop the server.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.data_dir, &self.upload_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::Io(io::Error::new(
                    e.kind(),
                    format!("failed to create {}: {}", dir.display(), e),
                ))
            })?;
        }
        Ok(())
    }

    /// Path of the JSON document for `id`
    pub fn record_path(&self, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.data_dir.join(format!("{}.json", id)))
    }

    /// Directory holding uploads for `id`
    pub fn upload_dir_for(&self, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.upload_dir.join(id))
    }

    /// Whether a document exists for `id`
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let path = self.record_path(id)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    /// Serialize `record` and write it over `<data-root>/<id>.json`
    pub async fn write_participant(&self, record: &ParticipantRecord) -> Result<()> {
        let path = self.record_path(&record.id)?;
        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&path, json).await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Read and parse the stored record for `id`
    pub async fn read_participant(&self, id: &str) -> Result<ParticipantRecord> {
        let (path, bytes) = self.read_bytes(id).await?;
        serde_json::from_slice(&bytes).map_err(|e| parse_error(&path, e))
    }

    /// Read the stored document for `id` without mapping it onto the record type
    ///
    /// Keys the record type does not know about are kept.
    pub async fn read_document(&self, id: &str) -> Result<Value> {
        let (path, bytes) = self.read_bytes(id).await?;
        serde_json::from_slice(&bytes).map_err(|e| parse_error(&path, e))
    }

    /// Read the current record (if any), build the next one with `update`, write it
    ///
    /// Runs under the per-participant lock.
    pub async fn save_with<F>(&self, id: &str, update: F) -> Result<ParticipantRecord>
    where
        F: FnOnce(Option<&ParticipantRecord>) -> ParticipantRecord,
    {
        check_id(id)?;
        let entry = self.lock_entry(id);
        let _guard = entry.lock.lock().await;
        self.read_merge_write(id, update).await
    }

    async fn read_merge_write<F>(&self, id: &str, update: F) -> Result<ParticipantRecord>
    where
        F: FnOnce(Option<&ParticipantRecord>) -> ParticipantRecord,
    {
        let existing = match self.read_participant(id).await {
            Ok(record) => Some(record),
            Err(Error::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let record = update(existing.as_ref());
        if record.id != id {
            return Err(Error::Internal(format!(
                "record id {} does not match {}",
                record.id, id
            )));
        }

        self.write_participant(&record).await?;
        Ok(record)
    }

    /// Write an uploaded file into the participant's upload directory
    ///
    /// The directory is created on demand. Returns the path written.
    pub async fn store_upload(&self, id: &str, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        if filename.is_empty() || filename.contains(|c: char| c == '/' || c == '\\') || filename.starts_with('.') {
            return Err(Error::InvalidInput(format!("invalid upload filename: {}", filename)));
        }

        let dir = self.upload_dir_for(id)?;
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    async fn read_bytes(&self, id: &str) -> Result<(PathBuf, Vec<u8>)> {
        let path = self.record_path(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok((path, bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn lock_entry(&self, id: &str) -> LockEntry {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(id.to_string()).or_default().clone()
        };
        LockEntry {
            locks: Arc::clone(&self.locks),
            id: id.to_string(),
            lock,
        }
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// A task's share of a participant's save lock
///
/// Dropping it (including when the owning future is cancelled) removes the
/// map entry once no other task holds or waits on the lock.
struct LockEntry {
    locks: Arc<Mutex<LockMap>>,
    id: String,
    lock: Arc<AsyncMutex<()>>,
}

impl Drop for LockEntry {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // one reference in the map, one here
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.id);
        }
    }
}

fn check_id(id: &str) -> Result<()> {
    if is_valid_participant_id(id) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("invalid participant id: {:?}", id)))
    }
}

fn parse_error(path: &Path, e: serde_json::Error) -> Error {
    Error::Parse(format!("{}: {}", path.display(), e))
}
