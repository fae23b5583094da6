//! Storage for pipeline task records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use suggestor_common::{Result, SuggestorError, TaskRecord};
use tracing::warn;

use crate::storage::write_json_atomic;

/// Put/get access to task records, keyed by task id.
pub trait TaskStore: Send + Sync {
    fn put(&self, record: &TaskRecord) -> Result<()>;
    fn get(&self, task_id: &str) -> Result<Option<TaskRecord>>;
}

/// In-memory store. Lost on restart.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<HashMap<String, TaskRecord>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TaskStore for MemoryTaskStore {
    fn put(&self, record: &TaskRecord) -> Result<()> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.task_id.clone(), record.clone());
        Ok(())
    }

    fn get(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        Ok(self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task_id)
            .cloned())
    }
}

/// Memory cache mirrored to one JSON file per task, so results survive a restart.
pub struct FileTaskStore {
    dir: PathBuf,
    cache: MemoryTaskStore,
}

impl FileTaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: MemoryTaskStore::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, task_id: &str) -> Option<PathBuf> {
        is_valid_task_id(task_id).then(|| self.dir.join(format!("{task_id}.json")))
    }
}

impl TaskStore for FileTaskStore {
    fn put(&self, record: &TaskRecord) -> Result<()> {
        let path = self.path_for(&record.task_id).ok_or_else(|| {
            SuggestorError::Validation(format!("invalid task id: {}", record.task_id))
        })?;
        self.cache.put(record)?;
        write_json_atomic(&path, record)
    }

    fn get(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        if let Some(record) = self.cache.get(task_id)? {
            return Ok(Some(record));
        }
        let Some(path) = self.path_for(task_id) else {
            return Ok(None);
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SuggestorError::io(&path, e)),
        };
        match serde_json::from_str::<TaskRecord>(&raw) {
            Ok(record) => {
                self.cache.put(&record)?;
                Ok(Some(record))
            }
            Err(e) => {
                warn!(task_id, error = %e, "Task file is unreadable");
                Err(SuggestorError::json(&path, e))
            }
        }
    }
}

/// Task ids become file names: letters, digits, `_` and `-` only.
fn is_valid_task_id(task_id: &str) -> bool {
    !task_id.is_empty()
        && task_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
