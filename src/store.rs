// File: src/store.rs
use crate::model::Task;
use std::collections::BTreeMap;

/// In-memory task index keyed by id. Iteration is in ascending id order.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: BTreeMap<u64, Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted tasks; new ids continue after the largest one.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        for task in tasks {
            store.next_id = store.next_id.max(task.id + 1);
            store.tasks.insert(task.id, task);
        }
        store
    }

    /// Assigns the next id to `task`, stores it and returns the id.
    pub fn insert_new(&mut self, mut task: Task) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        task.id = id;
        self.tasks.insert(id, task);
        id
    }

    /// Puts back a task that was previously removed, keeping its id.
    pub fn restore(&mut self, task: Task) {
        self.next_id = self.next_id.max(task.id + 1);
        self.tasks.insert(task.id, task);
    }

    /// Drops every task. Ids already handed out are not reused.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    pub fn remove(&mut self, id: u64) -> Option<Task> {
        self.tasks.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }
}
