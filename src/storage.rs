// Manages local file storage for tasks.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the Task struct serialization require incrementing
// LOCAL_STORAGE_VERSION below. Status is never written: it is derived on read.
use crate::context::AppContext;
use crate::model::Task;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: id, name, description, is_done, priority, date_created, date_updated, deadline
const LOCAL_STORAGE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct LocalStorageData {
    #[serde(default)]
    version: u32,
    tasks: Vec<Task>,
}

pub struct LocalStorage;

impl LocalStorage {
    /// Sidecar lock file path (`tasks.json` -> `tasks.json.lock`).
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on the sidecar lock file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file '{}'", lock_path.display()))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Loads all tasks. A missing file is an empty list.
    pub fn load(ctx: &dyn AppContext) -> Result<Vec<Task>> {
        let path = ctx.get_tasks_path()?;
        Self::load_from_path(&path)
    }

    pub fn save(ctx: &dyn AppContext, tasks: &[Task]) -> Result<()> {
        let path = ctx.get_tasks_path()?;
        Self::save_to_path(&path, tasks)
    }

    fn load_from_path(path: &Path) -> Result<Vec<Task>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(path, || {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            let data: LocalStorageData = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse '{}'", path.display()))?;
            if data.version != LOCAL_STORAGE_VERSION {
                return Err(anyhow::anyhow!(
                    "Unsupported task file version {} in '{}' (expected {})",
                    data.version,
                    path.display(),
                    LOCAL_STORAGE_VERSION
                ));
            }
            log::debug!("Loaded {} tasks from {}", data.tasks.len(), path.display());
            Ok(data.tasks)
        })
    }

    fn save_to_path(path: &Path, tasks: &[Task]) -> Result<()> {
        Self::with_lock(path, || {
            let data = LocalStorageData {
                version: LOCAL_STORAGE_VERSION,
                tasks: tasks.to_vec(),
            };
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(path, json)?;
            log::debug!("Saved {} tasks to {}", tasks.len(), path.display());
            Ok(())
        })
    }
}
