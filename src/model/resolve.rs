// File: ./src/model/resolve.rs
// Merges explicit request fields with values extracted from name macros.
use crate::model::item::Priority;
use crate::model::parser::ExtractedDirectives;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
}

/// An explicit field always wins over its macro; priority falls back to `Medium`.
pub fn resolve(
    explicit_priority: Option<Priority>,
    explicit_deadline: Option<NaiveDate>,
    extracted: &ExtractedDirectives,
) -> Resolved {
    Resolved {
        priority: explicit_priority
            .or(extracted.priority)
            .unwrap_or_default(),
        deadline: explicit_deadline.or(extracted.deadline),
    }
}
