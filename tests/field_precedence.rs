// Explicit request fields versus values taken from name macros.
use chrono::NaiveDate;
use rstest::rstest;
use taskmacro::controller::TaskController;
use taskmacro::model::{
    ExtractedDirectives, Priority, TaskCreateRequest, extract_directives, resolve,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn today() -> NaiveDate {
    date("2025-01-01")
}

#[rstest]
#[case("!1", Priority::High)]
#[case("!2", Priority::Critical)]
#[case("!3", Priority::Low)]
#[case("!4", Priority::Medium)]
fn test_field_priority_wins_over_macro(#[case] macro_text: &str, #[case] field: Priority) {
    let (_, extracted) = extract_directives(&format!("Task {}", macro_text)).unwrap();
    assert_eq!(resolve(Some(field), None, &extracted).priority, field);
}

#[rstest]
#[case("2025-06-01", "01.07.2025")]
#[case("2025-01-01", "02.01.2025")]
fn test_field_deadline_wins_over_macro(#[case] field: &str, #[case] macro_date: &str) {
    let mut controller = TaskController::in_memory();
    let request = TaskCreateRequest {
        name: format!("Task !before {}", macro_date),
        description: Some("desc".to_string()),
        priority: None,
        deadline: Some(date(field)),
    };
    let task = controller.create(request, today()).unwrap();
    assert_eq!(task.deadline, Some(date(field)));
    assert_eq!(task.name, "Task");
}

#[test]
fn test_macro_used_when_field_absent() {
    let extracted = ExtractedDirectives {
        priority: Some(Priority::Low),
        deadline: Some(date("2025-03-03")),
    };
    let resolved = resolve(None, None, &extracted);
    assert_eq!(resolved.priority, Priority::Low);
    assert_eq!(resolved.deadline, Some(date("2025-03-03")));
}

#[test]
fn test_defaults_when_nothing_given() {
    let resolved = resolve(None, None, &ExtractedDirectives::default());
    assert_eq!(resolved.priority, Priority::Medium);
    assert_eq!(resolved.deadline, None);
}

#[test]
fn test_priority_only_from_field() {
    let mut controller = TaskController::in_memory();
    let request = TaskCreateRequest {
        priority: Some(Priority::High),
        ..TaskCreateRequest::new("Task")
    };
    let task = controller.create(request, today()).unwrap();
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.deadline, None);
}

#[test]
fn test_deadline_only_from_field() {
    let mut controller = TaskController::in_memory();
    let request = TaskCreateRequest {
        deadline: Some(date("2025-05-01")),
        ..TaskCreateRequest::new("Task")
    };
    let task = controller.create(request, today()).unwrap();
    assert_eq!(task.deadline, Some(date("2025-05-01")));
    assert_eq!(task.priority, Priority::Medium);
}

#[test]
fn test_full_request_from_macros() {
    let mut controller = TaskController::in_memory();
    let request = TaskCreateRequest {
        description: Some("desc".to_string()),
        ..TaskCreateRequest::new("Test !2 !before 01.01.2025")
    };
    let task = controller.create(request, today()).unwrap();
    assert_eq!(task.name, "Test");
    assert_eq!(task.description.as_deref(), Some("desc"));
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.deadline, Some(date("2025-01-01")));
}

#[test]
fn test_priority_parse_accepts_names_and_digits() {
    assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
    assert_eq!("1".parse::<Priority>(), Ok(Priority::Critical));
    let err = "5".parse::<Priority>().unwrap_err();
    assert_eq!(err.kind, "priority");
    assert!(err.to_string().contains("Critical, High, Medium, Low"));
    assert!(Priority::Critical < Priority::Low);
    assert_eq!(Priority::default(), Priority::Medium);
}
