//! Record Store — durable JSON-file persistence for entity collections.
//!
//! One JSON array file per collection plus one JSON object file for the
//! personal-info singleton. Writes are atomic: serialize to a temp file in
//! the same directory, then rename over the target. Mutating callers take the
//! per-file mutex for the whole read-modify-write cycle, so two concurrent
//! updates against the same collection cannot clobber each other. Reads stay
//! lock-free; they either see the old file or the new one, never a partial
//! write.

pub mod repository;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JsonStore {
            data_dir: data_dir.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates the data directory if it does not exist yet.
    pub async fn init(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    /// Acquires the write lock for one collection file. Held across a full
    /// read-modify-write cycle by every mutating repository operation.
    pub async fn lock(&self, file: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(file.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        mutex.lock_owned().await
    }

    /// Reads a collection file. A missing file reads as an empty collection,
    /// so freshly provisioned data directories need no seed files.
    pub async fn read_array<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, AppError> {
        match tokio::fs::read(self.path(file)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn write_array<T: Serialize>(&self, file: &str, items: &[T]) -> Result<(), AppError> {
        self.write_atomic(file, serde_json::to_vec_pretty(items)?)
            .await
    }

    /// Reads the singleton object file, `None` if it has never been written.
    pub async fn read_object<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, AppError> {
        match tokio::fs::read(self.path(file)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn write_object<T: Serialize>(&self, file: &str, value: &T) -> Result<(), AppError> {
        self.write_atomic(file, serde_json::to_vec_pretty(value)?)
            .await
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Atomic replace: a failed write leaves the target file unchanged.
    async fn write_atomic(&self, file: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let tmp = self.path(&format!(".{}.{}", file, Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, self.path(file)).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        value: i64,
    }

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let (_dir, store) = store();
        let rows: Vec<Row> = store.read_array("rows.json").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let (_dir, store) = store();
        let rows = vec![
            Row {
                id: "a".into(),
                value: 1,
            },
            Row {
                id: "b".into(),
                value: 2,
            },
        ];
        store.write_array("rows.json", &rows).await.unwrap();
        let read: Vec<Row> = store.read_array("rows.json").await.unwrap();
        assert_eq!(read, rows);
    }

    #[tokio::test]
    async fn writes_leave_no_temp_files_behind() {
        let (dir, store) = store();
        let rows = vec![Row {
            id: "a".into(),
            value: 1,
        }];
        store.write_array("rows.json", &rows).await.unwrap();
        store.write_array("rows.json", &rows).await.unwrap();

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["rows.json".to_string()]);
    }

    #[tokio::test]
    async fn singleton_object_round_trips() {
        let (_dir, store) = store();
        let missing: Option<Row> = store.read_object("single.json").await.unwrap();
        assert!(missing.is_none());

        let row = Row {
            id: "only".into(),
            value: 7,
        };
        store.write_object("single.json", &row).await.unwrap();
        let read: Option<Row> = store.read_object("single.json").await.unwrap();
        assert_eq!(read, Some(row));
    }

    #[tokio::test]
    async fn on_disk_format_is_pretty_printed() {
        let (dir, store) = store();
        let rows = vec![Row {
            id: "a".into(),
            value: 1,
        }];
        store.write_array("rows.json", &rows).await.unwrap();
        let raw = tokio::fs::read_to_string(dir.path().join("rows.json"))
            .await
            .unwrap();
        assert!(raw.contains("\n  {"), "expected indented JSON, got: {raw}");
    }
}
