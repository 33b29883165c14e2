// File: src/model/parser.rs
//! Extraction of inline macros from task names.
//!
//! Two directives are recognised anywhere in the text:
//!   `!before <date>` -> deadline (`YYYY-MM-DD`, `DD.MM.YYYY` or `DD-MM-YYYY`)
//!   `!1` .. `!4`     -> priority (Critical, High, Medium, Low)
//!
//! Only the first occurrence of each kind is honoured. Anything else
//! (including `!9`, `!12` or a second `!2`) stays in the name as text.
use crate::model::item::Priority;
use chrono::NaiveDate;
use std::ops::Range;
use thiserror::Error;

/// Minimum length of a name once its macros are stripped.
pub const MIN_NAME_LEN: usize = 4;

const BEFORE_KEYWORD: &str = "!before";

// Tried in this order; the first format that parses AND formats back to the
// exact input wins.
const DEADLINE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d-%m-%Y"];

// Every supported date token is exactly ten ASCII characters.
const DATE_TOKEN_LEN: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractedDirectives {
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
}

impl ExtractedDirectives {
    pub fn is_empty(&self) -> bool {
        self.priority.is_none() && self.deadline.is_none()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MacroError {
    #[error("unsupported date format '{0}', use YYYY-MM-DD, DD.MM.YYYY or DD-MM-YYYY")]
    UnsupportedDateFormat(String),

    #[error("task name must contain at least {min} characters besides macros, got '{name}'")]
    NameTooShortAfterMacros { name: String, min: usize },
}

/// Parses a deadline token in one of the supported literal formats.
///
/// Calendar-invalid dates (`31.02.2025`, `01.13.2025`) are rejected.
pub fn parse_deadline(token: &str) -> Result<NaiveDate, MacroError> {
    for fmt in DEADLINE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(token, fmt)
            && date.format(fmt).to_string() == token
        {
            return Ok(date);
        }
    }
    Err(MacroError::UnsupportedDateFormat(token.to_string()))
}

/// Returns `true` when `s` starts with a date-shaped token that is not
/// immediately followed by another digit.
fn starts_with_date_token(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() < DATE_TOKEN_LEN {
        return false;
    }
    let digits = |r: Range<usize>| b[r].iter().all(u8::is_ascii_digit);

    let iso = digits(0..4) && b[4] == b'-' && digits(5..7) && b[7] == b'-' && digits(8..10);
    let day_first = digits(0..2)
        && (b[2] == b'.' || b[2] == b'-')
        && digits(3..5)
        && b[5] == b[2]
        && digits(6..10);

    (iso || day_first) && !b.get(DATE_TOKEN_LEN).is_some_and(u8::is_ascii_digit)
}

/// Locates the first `!before` and parses the date that follows it.
///
/// The keyword must be followed by whitespace and a date token, otherwise the
/// word after it is reported as unsupported. Later `!before`s are left alone.
fn find_deadline(name: &str) -> Result<Option<(Range<usize>, NaiveDate)>, MacroError> {
    let Some(idx) = name.find(BEFORE_KEYWORD) else {
        return Ok(None);
    };
    let after = &name[idx + BEFORE_KEYWORD.len()..];
    let rest = after.trim_start();
    let gap = after.len() - rest.len();

    if gap == 0 || !starts_with_date_token(rest) {
        let arg = after.split_whitespace().next().unwrap_or_default();
        return Err(MacroError::UnsupportedDateFormat(arg.to_string()));
    }

    let date = parse_deadline(&rest[..DATE_TOKEN_LEN])?;
    let end = idx + BEFORE_KEYWORD.len() + gap + DATE_TOKEN_LEN;
    Ok(Some((idx..end, date)))
}

/// Locates the first `!<digit>` with digit 1-4 that is not followed by another digit.
fn find_priority(name: &str) -> Option<(Range<usize>, Priority)> {
    let b = name.as_bytes();
    for (idx, _) in name.match_indices('!') {
        let Some(&digit) = b.get(idx + 1) else {
            continue;
        };
        if !digit.is_ascii_digit() || b.get(idx + 2).is_some_and(u8::is_ascii_digit) {
            continue;
        }
        if let Some(p) = Priority::from_macro_digit(digit as char) {
            return Some((idx..idx + 2, p));
        }
    }
    None
}

/// Cuts `range` out of `name`, joining both sides with a single space.
fn remove_range(name: &str, range: Range<usize>) -> String {
    let left = name[..range.start].trim_end();
    let right = name[range.end..].trim_start();
    let joined = if left.is_empty() || right.is_empty() {
        format!("{left}{right}")
    } else {
        format!("{left} {right}")
    };
    joined.trim().to_string()
}

/// Strips the deadline and priority macros from `raw`.
///
/// Returns the cleaned name and the extracted values. Fails without partial
/// application when the deadline cannot be parsed, or when fewer than
/// [`MIN_NAME_LEN`] characters remain after a directive was removed.
pub fn extract_directives(raw: &str) -> Result<(String, ExtractedDirectives), MacroError> {
    let mut name = raw.trim().to_string();
    let mut directives = ExtractedDirectives::default();

    if let Some((range, date)) = find_deadline(&name)? {
        directives.deadline = Some(date);
        name = remove_range(&name, range);
    }

    if let Some((range, priority)) = find_priority(&name) {
        directives.priority = Some(priority);
        name = remove_range(&name, range);
    }

    if !directives.is_empty() && name.chars().count() < MIN_NAME_LEN {
        return Err(MacroError::NameTooShortAfterMacros {
            name,
            min: MIN_NAME_LEN,
        });
    }

    Ok((name, directives))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_token_shapes() {
        assert!(starts_with_date_token("2025-01-01"));
        assert!(starts_with_date_token("01.01.2025 rest"));
        assert!(starts_with_date_token("01-01-2025"));
        // Mixed separators are not a supported shape
        assert!(!starts_with_date_token("01.01-2025"));
        assert!(!starts_with_date_token("2025/01/01"));
        assert!(!starts_with_date_token("01.01.20255"));
        assert!(!starts_with_date_token("1.1.2025"));
    }

    #[test]
    fn test_parse_deadline_format_order() {
        assert_eq!(parse_deadline("2024-02-29"), Ok(ymd(2024, 2, 29)));
        assert_eq!(parse_deadline("29.02.2024"), Ok(ymd(2024, 2, 29)));
        assert_eq!(parse_deadline("29-02-2024"), Ok(ymd(2024, 2, 29)));
        assert!(parse_deadline("29.02.2025").is_err());
        assert!(parse_deadline("00.01.2025").is_err());
    }

    #[test]
    fn test_priority_skips_multi_digit_and_out_of_range() {
        assert_eq!(find_priority("a !12 b"), None);
        assert_eq!(find_priority("a !9 !2"), Some((5..7, Priority::High)));
        assert_eq!(find_priority("!!1"), Some((1..3, Priority::Critical)));
        assert_eq!(find_priority("trailing !"), None);
    }

    #[test]
    fn test_remove_range_collapses_seam() {
        assert_eq!(remove_range("Buy  !1   milk", 5..7), "Buy milk");
        assert_eq!(remove_range("!1 Buy milk", 0..2), "Buy milk");
        assert_eq!(remove_range("Buy milk !1", 9..11), "Buy milk");
    }

    #[test]
    fn test_keyword_without_whitespace_is_unsupported() {
        assert_eq!(
            extract_directives("Plan !beforehand"),
            Err(MacroError::UnsupportedDateFormat("hand".to_string()))
        );
    }

    #[test]
    fn test_only_the_first_keyword_is_considered() {
        assert_eq!(
            find_deadline("a !before soon !before 2025-01-01"),
            Err(MacroError::UnsupportedDateFormat("soon".to_string()))
        );
        assert_eq!(
            find_deadline("a !before 2025-01-01 !before soon"),
            Ok(Some((2..20, ymd(2025, 1, 1))))
        );
        assert_eq!(find_deadline("no keyword here"), Ok(None));
    }

    #[test]
    fn test_non_ascii_text_around_macros() {
        let (name, d) = extract_directives("Купить молоко !1 !before 01.05.2025").unwrap();
        assert_eq!(name, "Купить молоко");
        assert_eq!(d.priority, Some(Priority::Critical));
        assert_eq!(d.deadline, Some(ymd(2025, 5, 1)));
    }
}
