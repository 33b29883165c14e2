// File: ./src/model/item.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

/// Returned when a priority or status name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}', use one of: {expected}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    fn new<T: IntoEnumIterator>(
        kind: &'static str,
        value: &str,
        name: fn(&T) -> &'static str,
    ) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: T::iter().map(|v| name(&v)).collect::<Vec<_>>().join(", "),
        }
    }
}

/// Task urgency. Declaration order is urgency order: `Critical < High < Medium < Low`.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize, EnumIter,
)]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Maps a macro digit (`!1` .. `!4`) to its priority.
    pub fn from_macro_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::Critical),
            '2' => Some(Self::High),
            '3' => Some(Self::Medium),
            '4' => Some(Self::Low),
            _ => None,
        }
    }

    pub fn macro_digit(&self) -> char {
        match self {
            Self::Critical => '1',
            Self::High => '2',
            Self::Medium => '3',
            Self::Low => '4',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    /// Accepts a priority name (any case) or its macro digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(p) = Self::from_macro_digit(c)
        {
            return Ok(p);
        }
        Self::iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("priority", s, Self::as_str))
    }
}

/// Derived life-cycle label of a task. Never stored; see [`derive_status`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Status {
    Active,
    Completed,
    Overdue,
    Late,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
            Self::Late => "Late",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("status", s, Self::as_str))
    }
}

/// Computes the status of a task from its completion flag and deadline.
///
/// `today` is always supplied by the caller: time passing alone moves a task
/// from `Active` to `Overdue`, so the result must be recomputed on every read.
pub fn derive_status(is_done: bool, deadline: Option<NaiveDate>, today: NaiveDate) -> Status {
    match (is_done, deadline) {
        (true, Some(d)) if today > d => Status::Late,
        (true, _) => Status::Completed,
        (false, Some(d)) if today > d => Status::Overdue,
        (false, _) => Status::Active,
    }
}

/// Stored task record. Carries no status; see [`Task::details`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub priority: Priority,
    pub date_created: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Task {
    pub fn status(&self, today: NaiveDate) -> Status {
        derive_status(self.is_done, self.deadline, today)
    }

    /// Read view of the task with its status computed for `today`.
    pub fn details(&self, today: NaiveDate) -> TaskDetails {
        TaskDetails {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            is_done: self.is_done,
            status: self.status(today),
            priority: self.priority,
            date_created: self.date_created,
            date_updated: self.date_updated,
            deadline: self.deadline,
        }
    }

    /// Rebuilds an editable name carrying the task's priority and deadline as macros
    /// (e.g. "!1 !before 2025-01-01 Buy milk").
    ///
    /// Macros go in front so that extraction, which honours the first match,
    /// reads them before any literal `!2` or `!before` left in the name.
    pub fn to_smart_string(&self) -> String {
        let mut s = format!("!{}", self.priority.macro_digit());
        if let Some(d) = self.deadline {
            s.push_str(&format!(" !before {}", d.format("%Y-%m-%d")));
        }
        s.push(' ');
        s.push_str(&self.name);
        s
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub status: Status,
    pub priority: Priority,
    pub date_created: NaiveDate,
    pub date_updated: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
}

/// Fields of a task creation request, before macro extraction.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TaskCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl TaskCreateRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// One entry of a bulk import. `list --json` output is accepted as is;
/// fields the import does not use (`id`, `status`, dates) are ignored.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TaskImport {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}
