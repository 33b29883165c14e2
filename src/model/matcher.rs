// Logic for checking if tasks match list filters.
//
// Every criterion that is set must hold (implicit AND). Statuses are checked
// against the status derived at read time, so a filter on `Overdue` picks up
// tasks whose deadline passed since they were last written.

use crate::model::item::{Priority, Status, TaskDetails};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default)]
    pub priorities: Option<Vec<Priority>>,
    #[serde(default)]
    pub statuses: Option<Vec<Status>>,
    #[serde(default)]
    pub is_done: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &TaskDetails) -> bool {
        if let Some(priorities) = &self.priorities
            && !priorities.contains(&task.priority)
        {
            return false;
        }
        if let Some(statuses) = &self.statuses
            && !statuses.contains(&task.status)
        {
            return false;
        }
        if let Some(done) = self.is_done
            && task.is_done != done
        {
            return false;
        }
        match self.name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                task.name.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => true,
        }
    }

    /// Leaves out finished tasks, unless the filter already constrains
    /// completion or status.
    pub fn hiding_completed(mut self) -> Self {
        if self.is_done.is_none() && self.statuses.is_none() {
            self.is_done = Some(false);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_none()
            && self.statuses.is_none()
            && self.is_done.is_none()
            && self.name.as_deref().is_none_or(|n| n.trim().is_empty())
    }
}
