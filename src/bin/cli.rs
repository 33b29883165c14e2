use anyhow::{Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskmacro::cli::{
    format_task_details, format_task_row, parse_id, print_help, read_import_file,
    take_all_options, take_flag, take_option,
};
use taskmacro::config::Config;
use taskmacro::context::{SharedContext, StandardContext};
use taskmacro::controller::TaskController;
use taskmacro::model::{
    Priority, Status, TaskCreateRequest, TaskDetails, TaskFilter, parse_deadline,
};

const BINARY_NAME: &str = "taskmacro";

fn init_logging(config: &Config) {
    let level = env::var("TASKMACRO_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| config.log_level_filter());
    // A logger may already be installed; that is not fatal for a CLI.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn parse_optional_deadline(raw: &str) -> Result<Option<NaiveDate>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(parse_deadline(raw)?))
}

fn print_one(task: &TaskDetails, config: &Config) {
    println!("{}", format_task_row(task, &config.date_format));
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || matches!(args[0].as_str(), "--help" | "-h" | "help") {
        print_help(BINARY_NAME);
        return Ok(());
    }

    let root = take_option(&mut args, &["--root", "-r"])?;
    let ctx: SharedContext = Arc::new(StandardContext::new(root.map(PathBuf::from)));
    let config = Config::load_or_default(ctx.as_ref())?;
    init_logging(&config);

    let today = Local::now().date_naive();
    let mut controller = TaskController::load(ctx.clone())?;

    if args.is_empty() {
        bail!("Missing command. Run '{} --help' for usage.", BINARY_NAME);
    }
    let command = args.remove(0);
    log::debug!("Running '{}' with {:?}", command, args);

    match command.as_str() {
        "add" => {
            let description = take_option(&mut args, &["--desc"])?;
            let priority = take_option(&mut args, &["--priority", "-p"])?
                .as_deref()
                .map(str::parse::<Priority>)
                .transpose()?;
            let deadline = take_option(&mut args, &["--deadline", "-d"])?
                .as_deref()
                .map(parse_deadline)
                .transpose()?;
            let request = TaskCreateRequest {
                name: args.join(" "),
                description,
                priority,
                deadline,
            };
            let task = controller.create(request, today)?;
            print_one(&task, &config);
        }
        "list" | "ls" => {
            let json = take_flag(&mut args, &["--json"]);
            let priorities = take_all_options(&mut args, &["--priority", "-p"])?
                .iter()
                .map(|p| p.parse::<Priority>())
                .collect::<Result<Vec<_>, _>>()?;
            let statuses = take_all_options(&mut args, &["--status", "-s"])?
                .iter()
                .map(|s| s.parse::<Status>())
                .collect::<Result<Vec<_>, _>>()?;
            let is_done = match (take_flag(&mut args, &["--done"]), take_flag(&mut args, &["--open"])) {
                (true, true) => bail!("--done and --open are mutually exclusive"),
                (true, false) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            };
            let mut filter = TaskFilter {
                priorities: (!priorities.is_empty()).then_some(priorities),
                statuses: (!statuses.is_empty()).then_some(statuses),
                is_done,
                name: take_option(&mut args, &["--name", "-n"])?,
            };
            if config.hide_completed {
                filter = filter.hiding_completed();
            }

            let tasks = controller.list(&filter, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in &tasks {
                    println!("{}", format_task_row(task, &config.date_format));
                }
            }
        }
        "show" => {
            let json = take_flag(&mut args, &["--json"]);
            let id = parse_id(args.first())?;
            let task = controller.get(id, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("{}", format_task_details(&task, &config.date_format));
                if let Some(stored) = controller.store().get(id) {
                    println!("  Edit as:     {}", stored.to_smart_string());
                }
            }
        }
        "done" | "undone" => {
            let id = parse_id(args.first())?;
            let task = controller.update_done(id, command == "done", today)?;
            print_one(&task, &config);
        }
        "rename" => {
            let id = parse_id(args.first())?;
            let task = controller.update_name(id, &args[1..].join(" "), today)?;
            print_one(&task, &config);
        }
        "desc" => {
            let id = parse_id(args.first())?;
            let text = args[1..].join(" ");
            let description = (!text.trim().is_empty()).then_some(text);
            let task = controller.update_description(id, description, today)?;
            print_one(&task, &config);
        }
        "priority" => {
            let id = parse_id(args.first())?;
            let raw = args.get(1).ok_or_else(|| anyhow!("Missing priority"))?;
            let task = controller.update_priority(id, raw.parse::<Priority>()?, today)?;
            print_one(&task, &config);
        }
        "deadline" => {
            let id = parse_id(args.first())?;
            let raw = args.get(1).ok_or_else(|| anyhow!("Missing deadline (or 'none')"))?;
            let task = controller.update_deadline(id, parse_optional_deadline(raw)?, today)?;
            print_one(&task, &config);
        }
        "delete" | "rm" => {
            let id = parse_id(args.first())?;
            controller.delete(id)?;
            println!("Deleted task {}", id);
        }
        "import" => {
            let path = args.first().ok_or_else(|| anyhow!("Missing import file"))?;
            let items = read_import_file(Path::new(path))?;
            let tasks = controller.replace_all(items, today)?;
            println!("Imported {} tasks", tasks.len());
        }
        "config" => {
            println!("{}", Config::get_path_string(ctx.as_ref())?);
        }
        other => bail!("Unknown command '{}'. Run '{} --help' for usage.", other, BINARY_NAME),
    }

    Ok(())
}
