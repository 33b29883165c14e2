// File: ./src/cli.rs
//! Shared command-line interface logic: help text, argument helpers and task formatting.
use crate::model::{TaskDetails, TaskImport};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use std::fmt::Write;
use std::fs;
use std::path::Path;

pub fn print_help(binary_name: &str) {
    println!(
        "Taskmacro v{} - Task list with inline priority and deadline macros",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] <command> [args]", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    add <name...> [--desc <text>] [--priority <p>] [--deadline <date>]");
    println!("    list [--priority <p>]... [--status <s>]... [--done|--open] [--name <text>] [--json]");
    println!("    show <id> [--json]");
    println!("    done <id> | undone <id>");
    println!("    rename <id> <name...>");
    println!("    desc <id> [<text...>]          Empty text clears the description");
    println!("    priority <id> <p>");
    println!("    deadline <id> <date|none>");
    println!("    delete <id>");
    println!("    import <file.json>             Replace all tasks with a JSON task list");
    println!("    config                         Print the config file path");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("NAME MACROS:");
    println!("    !1 .. !4              Priority (1=Critical, 2=High, 3=Medium, 4=Low)");
    println!("    !before <date>        Deadline (YYYY-MM-DD, DD.MM.YYYY or DD-MM-YYYY)");
    println!();
    println!("    Explicit --priority / --deadline win over macros in the name.");
    println!("    At least 4 characters must remain once macros are removed.");
    println!();
    println!("STATUSES: Active, Completed, Overdue, Late (derived from done flag and deadline)");
}

/// Removes the flag from `args`, returning whether it was present.
pub fn take_flag(args: &mut Vec<String>, names: &[&str]) -> bool {
    let before = args.len();
    args.retain(|a| !names.contains(&a.as_str()));
    args.len() != before
}

/// Removes every `<name> <value>` pair from `args` and returns the values in order.
pub fn take_all_options(args: &mut Vec<String>, names: &[&str]) -> Result<Vec<String>> {
    let mut values = Vec::new();
    while let Some(idx) = args.iter().position(|a| names.contains(&a.as_str())) {
        if idx + 1 >= args.len() {
            return Err(anyhow!("Missing value for {}", args[idx]));
        }
        let value = args.remove(idx + 1);
        args.remove(idx);
        values.push(value);
    }
    Ok(values)
}

/// Like [`take_all_options`], keeping only the last value.
pub fn take_option(args: &mut Vec<String>, names: &[&str]) -> Result<Option<String>> {
    Ok(take_all_options(args, names)?.pop())
}

pub fn parse_id(arg: Option<&String>) -> Result<u64> {
    let raw = arg.ok_or_else(|| anyhow!("Missing task id"))?;
    raw.parse::<u64>()
        .map_err(|_| anyhow!("Invalid task id '{}'", raw))
}

/// Reads a JSON array of tasks for `import`. An empty file is an error; an
/// empty array is left for the controller to reject.
pub fn read_import_file(path: &Path) -> Result<Vec<TaskImport>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file '{}'", path.display()))?;
    if json.trim().is_empty() {
        return Err(anyhow!("Import file '{}' is empty", path.display()));
    }
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse import file '{}'", path.display()))
}

/// Formats a date with a user supplied chrono format, falling back to ISO
/// when the format string is invalid.
pub fn format_date(date: NaiveDate, fmt: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(fmt)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

pub fn format_task_row(task: &TaskDetails, date_format: &str) -> String {
    let deadline = task
        .deadline
        .map(|d| format_date(d, date_format))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>4}  {:<9}  {:<8}  {:<10}  {}",
        task.id,
        task.status.as_str(),
        task.priority.as_str(),
        deadline,
        task.name
    )
}

pub fn format_task_details(task: &TaskDetails, date_format: &str) -> String {
    let mut out = String::new();
    let fmt_opt = |d: Option<NaiveDate>| {
        d.map(|d| format_date(d, date_format))
            .unwrap_or_else(|| "-".to_string())
    };
    let _ = writeln!(out, "Task #{}", task.id);
    let _ = writeln!(out, "  Name:        {}", task.name);
    let _ = writeln!(
        out,
        "  Description: {}",
        task.description.as_deref().unwrap_or("-")
    );
    let _ = writeln!(out, "  Status:      {}", task.status);
    let _ = writeln!(out, "  Priority:    {}", task.priority);
    let _ = writeln!(out, "  Deadline:    {}", fmt_opt(task.deadline));
    let _ = writeln!(out, "  Created:     {}", format_date(task.date_created, date_format));
    let _ = write!(out, "  Updated:     {}", fmt_opt(task.date_updated));
    out
}
