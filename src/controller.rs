// File: src/controller.rs
//! Central logic controller for Task operations.
//! Every front end (currently the CLI) goes through this controller so that
//! macro extraction, field precedence and status derivation behave the same
//! everywhere. `today` is always passed in by the caller.
use crate::context::SharedContext;
use crate::model::{
    MIN_NAME_LEN, MacroError, Priority, Task, TaskCreateRequest, TaskDetails, TaskFilter,
    TaskImport, extract_directives, resolve,
};
use crate::storage::LocalStorage;
use crate::store::TaskStore;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Macro(#[from] MacroError),

    #[error("task name must not be empty")]
    EmptyName,

    #[error("task name must be at least {min} characters long")]
    NameTooShort { min: usize },

    #[error("task {0} not found")]
    NotFound(u64),

    #[error("nothing to import: the task list is empty")]
    EmptyImport,

    #[error("import entry {index}: {source}")]
    ImportEntry {
        index: usize,
        #[source]
        source: Box<TaskError>,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Validates `raw_name`, strips its macros and resolves them against the
/// explicit fields. The returned task has no id yet.
fn build_task(
    raw_name: &str,
    description: Option<String>,
    priority: Option<Priority>,
    deadline: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Task, TaskError> {
    validate_raw_name(raw_name)?;
    let (name, extracted) = extract_directives(raw_name)?;
    let resolved = resolve(priority, deadline, &extracted);
    Ok(Task {
        id: 0,
        name,
        description,
        is_done: false,
        priority: resolved.priority,
        date_created: today,
        date_updated: None,
        deadline: resolved.deadline,
    })
}

/// Request-level check on the raw name, before any macro is stripped.
fn validate_raw_name(raw: &str) -> Result<(), TaskError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyName);
    }
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(TaskError::NameTooShort { min: MIN_NAME_LEN });
    }
    Ok(())
}

#[derive(Debug)]
pub struct TaskController {
    store: TaskStore,
    // None: nothing is written to disk.
    ctx: Option<SharedContext>,
}

impl TaskController {
    /// Loads persisted tasks for `ctx`; every mutation is saved back.
    pub fn load(ctx: SharedContext) -> anyhow::Result<Self> {
        let tasks = LocalStorage::load(ctx.as_ref())?;
        log::debug!("Controller loaded {} tasks", tasks.len());
        Ok(Self {
            store: TaskStore::from_tasks(tasks),
            ctx: Some(ctx),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            store: TaskStore::new(),
            ctx: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    fn persist(&self) -> Result<(), TaskError> {
        if let Some(ctx) = &self.ctx {
            LocalStorage::save(ctx.as_ref(), &self.store.to_vec())?;
        }
        Ok(())
    }

    /// Create a task from a request.
    ///
    /// Macros are stripped from the name; explicit request fields win over
    /// macro values. The task is removed again if it cannot be saved.
    pub fn create(
        &mut self,
        request: TaskCreateRequest,
        today: NaiveDate,
    ) -> Result<TaskDetails, TaskError> {
        let task = build_task(
            &request.name,
            request.description,
            request.priority,
            request.deadline,
            today,
        )?;
        let id = self.store.insert_new(task);

        if let Err(e) = self.persist() {
            log::warn!("Saving new task {} failed, discarded: {}", id, e);
            self.store.remove(id);
            return Err(e);
        }
        log::info!("Created task {}", id);
        self.get(id, today)
    }

    /// Replaces every stored task with `items`.
    ///
    /// Each entry goes through the same validation and macro extraction as
    /// [`TaskController::create`]. Nothing changes unless every entry is valid
    /// and the result is saved. Ids continue after the ones already handed out.
    pub fn replace_all(
        &mut self,
        items: Vec<TaskImport>,
        today: NaiveDate,
    ) -> Result<Vec<TaskDetails>, TaskError> {
        if items.is_empty() {
            return Err(TaskError::EmptyImport);
        }
        let tasks = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                build_task(&item.name, item.description, item.priority, item.deadline, today)
                    .map(|task| Task {
                        is_done: item.is_done,
                        ..task
                    })
                    .map_err(|e| TaskError::ImportEntry {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let previous = self.store.clone();
        self.store.clear();
        let ids: Vec<u64> = tasks
            .into_iter()
            .map(|task| self.store.insert_new(task))
            .collect();

        if let Err(e) = self.persist() {
            log::warn!("Saving imported tasks failed, previous list kept: {}", e);
            self.store = previous;
            return Err(e);
        }
        log::info!("Imported {} tasks", ids.len());
        Ok(ids
            .into_iter()
            .filter_map(|id| self.store.get(id).map(|t| t.details(today)))
            .collect())
    }

    pub fn get(&self, id: u64, today: NaiveDate) -> Result<TaskDetails, TaskError> {
        self.store
            .get(id)
            .map(|t| t.details(today))
            .ok_or(TaskError::NotFound(id))
    }

    /// Tasks matching `filter`, in ascending id order, with status derived for `today`.
    pub fn list(&self, filter: &TaskFilter, today: NaiveDate) -> Vec<TaskDetails> {
        self.store
            .iter()
            .map(|t| t.details(today))
            .filter(|d| filter.matches(d))
            .collect()
    }

    /// Applies `f`, stamps `date_updated` and saves. Restores the previous
    /// version if saving fails.
    fn mutate<F>(&mut self, id: u64, today: NaiveDate, f: F) -> Result<TaskDetails, TaskError>
    where
        F: FnOnce(&mut Task),
    {
        let task = self.store.get_mut(id).ok_or(TaskError::NotFound(id))?;
        let previous = task.clone();
        f(task);
        task.date_updated = Some(today);

        if let Err(e) = self.persist() {
            log::warn!("Saving task {} failed, change rolled back: {}", id, e);
            self.store.restore(previous);
            return Err(e);
        }
        log::debug!("Updated task {}", id);
        self.get(id, today)
    }

    /// Renames a task. Macros in the new name replace the stored priority / deadline.
    pub fn update_name(
        &mut self,
        id: u64,
        new_name: &str,
        today: NaiveDate,
    ) -> Result<TaskDetails, TaskError> {
        if self.store.get(id).is_none() {
            return Err(TaskError::NotFound(id));
        }
        validate_raw_name(new_name)?;
        let (name, extracted) = extract_directives(new_name)?;
        self.mutate(id, today, |task| {
            task.name = name;
            if let Some(p) = extracted.priority {
                task.priority = p;
            }
            if let Some(d) = extracted.deadline {
                task.deadline = Some(d);
            }
        })
    }

    pub fn update_description(
        &mut self,
        id: u64,
        description: Option<String>,
        today: NaiveDate,
    ) -> Result<TaskDetails, TaskError> {
        self.mutate(id, today, |task| task.description = description)
    }

    pub fn update_priority(
        &mut self,
        id: u64,
        priority: Priority,
        today: NaiveDate,
    ) -> Result<TaskDetails, TaskError> {
        self.mutate(id, today, |task| task.priority = priority)
    }

    pub fn update_deadline(
        &mut self,
        id: u64,
        deadline: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<TaskDetails, TaskError> {
        self.mutate(id, today, |task| task.deadline = deadline)
    }

    pub fn update_done(
        &mut self,
        id: u64,
        is_done: bool,
        today: NaiveDate,
    ) -> Result<TaskDetails, TaskError> {
        self.mutate(id, today, |task| task.is_done = is_done)
    }

    pub fn delete(&mut self, id: u64) -> Result<(), TaskError> {
        let removed = self.store.remove(id).ok_or(TaskError::NotFound(id))?;
        if let Err(e) = self.persist() {
            log::warn!("Saving after delete of task {} failed, task kept: {}", id, e);
            self.store.restore(removed);
            return Err(e);
        }
        log::info!("Deleted task {}", id);
        Ok(())
    }
}
