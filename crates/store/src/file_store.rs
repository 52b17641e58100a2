use crate::task::{CREATED_AT_FORMAT, NewTask, Task, TaskUpdate};
use anyhow::{Context, Result};
use extract::Clock;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Task records kept as one pretty-printed JSON array on disk.
///
/// Every call reads the file fresh, so edits made by hand between requests
/// are picked up. Calls are serialized through an async mutex and writes go
/// through a temp file followed by a rename.
pub struct TaskStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl TaskStore {
    pub fn open(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    pub async fn by_date(&self, date: &str) -> Result<Vec<Task>> {
        let _guard = self.lock.lock().await;
        let tasks = self.load().await?;
        Ok(tasks.into_iter().filter(|t| t.date == date).collect())
    }

    pub async fn create(&self, new_task: NewTask) -> Result<Task> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load().await?;

        let id = next_id(&tasks)?;
        let created_at = self.clock.now().format(CREATED_AT_FORMAT).to_string();
        let task = new_task.into_task(id, created_at);

        tasks.push(task.clone());
        self.save(&tasks).await?;

        tracing::info!(id = task.id, date = %task.date, "Task created");
        Ok(task)
    }

    /// Merge `update` into the task. `None` if no task has this id.
    pub async fn update(&self, id: u64, update: TaskUpdate) -> Result<Option<Task>> {
        self.modify(id, |task| task.apply(update)).await
    }

    pub async fn toggle(&self, id: u64) -> Result<Option<Task>> {
        self.modify(id, |task| task.completed = !task.completed).await
    }

    /// Returns whether a task was removed. Removing an unknown id is not an error.
    pub async fn delete(&self, id: u64) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load().await?;

        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = tasks.len() != before;

        self.save(&tasks).await?;
        tracing::debug!(id, removed, "Task delete");
        Ok(removed)
    }

    async fn modify<F>(&self, id: u64, f: F) -> Result<Option<Task>>
    where
        F: FnOnce(&mut Task),
    {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load().await?;

        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        f(task);
        let updated = task.clone();

        self.save(&tasks).await?;
        tracing::debug!(id, "Task updated");
        Ok(Some(updated))
    }

    async fn load(&self) -> Result<Vec<Task>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).context(format!("Failed to read task file: {:?}", self.path));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .context(format!("Failed to parse task file: {:?}", self.path))
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks).context("Failed to serialize tasks")?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create data directory: {:?}", parent))?;
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)
            .await
            .context(format!("Failed to write task file: {:?}", tmp_path))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .context(format!("Failed to replace task file: {:?}", self.path))?;
        Ok(())
    }
}

/// One past the highest id, or 1 for an empty list.
fn next_id(tasks: &[Task]) -> Result<u64> {
    match tasks.iter().map(|t| t.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .context(format!("No task id left after {}", max)),
    }
}
