//! Interactive command-line driver.
//!
//! # Responsibility
//! - Map typed commands onto core service handlers, one event at a time.
//! - Implement the notification port against the terminal.
//! - Write the export artifact to disk.

use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use taskpad_core::db::open_db;
use taskpad_core::{
    default_log_level, init_logging, AddTaskInput, Notifier, Permission, ServiceError,
    SqliteKvStore, TaskService, TaskValidationError, Theme,
};

const DEFAULT_DB_FILE: &str = "taskpad.db";
const HELP: &str = "\
commands:
  add            add a task (prompts for text, due date, priority, category)
  list           show all tasks
  toggle <n>     toggle completion of task n
  delete <n>     delete task n (and any structural duplicates)
  theme          switch between light and dark
  export [dir]   write todo-tasks.json (default: current directory)
  help           show this help
  quit           exit";

/// Prints notifications straight to the terminal.
///
/// There is no permission prompt to fail here, so permission is always
/// granted; the icon reference has no terminal rendering and is dropped.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn notify(&self, title: &str, body: &str, _icon: &str) {
        // \x07 rings the terminal bell where supported.
        println!("\x07[{title}] {body}");
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("taskpad: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = env::var("TASKPAD_LOG_DIR") {
        let level = env::var("TASKPAD_LOG").unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let db_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
    let conn = open_db(&db_path)?;
    let store = SqliteKvStore::new(&conn);
    let mut service = TaskService::open(store, Arc::new(TerminalNotifier))?;

    println!(
        "taskpad {} ({} tasks loaded from {})",
        taskpad_core::core_version(),
        service.tasks().len(),
        db_path.display()
    );
    println!("type `help` for commands");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_prompt(service.theme())?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut words = line.split_whitespace();
        match words.next() {
            None => {}
            Some("add") => handle_add(&mut service, &mut lines)?,
            Some("list") => print_rows(&service),
            Some("toggle") => match parse_index(words.next(), &service) {
                Some(index) => {
                    let completed = service.toggle_completed(index)?;
                    println!("task {} is now {}", index + 1, status_label(completed));
                }
                None => println!("usage: toggle <n>"),
            },
            Some("delete") => match parse_index(words.next(), &service) {
                Some(index) => {
                    service.delete_task(index)?;
                    println!("deleted");
                }
                None => println!("usage: delete <n>"),
            },
            Some("theme") => {
                let theme = service.toggle_theme()?;
                println!("theme set to {}", theme.as_store_value());
            }
            Some("export") => {
                let dir = words.next().map(PathBuf::from).unwrap_or_default();
                let artifact = service.export()?;
                let path = dir.join(artifact.file_name);
                fs::write(&path, artifact.json)?;
                println!("exported to {}", path.display());
            }
            Some("help") => println!("{HELP}"),
            Some("quit") | Some("q") | Some("exit") => break,
            Some(other) => println!("unknown command `{other}`; type `help`"),
        }
    }

    Ok(())
}

/// Runs the add form: four prompted fields, Enter submits each.
fn handle_add<S: taskpad_core::KvStore>(
    service: &mut TaskService<S>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), Box<dyn Error>> {
    let text = prompt_field("task text", lines)?;
    let date = prompt_field("due date (YYYY-MM-DD, blank for none)", lines)?;
    let priority = prompt_field("priority (blank for none)", lines)?;
    let category = prompt_field("category (blank for none)", lines)?;

    match service.add_task(AddTaskInput {
        text,
        date,
        priority,
        category,
    }) {
        Ok(index) => println!("added as task {}", index + 1),
        // The validation alert, verbatim; state is untouched.
        Err(ServiceError::Validation(TaskValidationError::EmptyText)) => {
            println!("Enter a task.");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn prompt_field(
    label: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<String, Box<dyn Error>> {
    print!("{label}: ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?),
        None => Ok(String::new()),
    }
}

fn print_prompt(theme: Theme) -> io::Result<()> {
    // Dark theme renders the prompt in reverse video, the closest
    // terminal analogue to the page-wide theme class.
    let prompt = match theme {
        Theme::Dark => "\x1b[7mtaskpad\x1b[0m> ",
        Theme::Light => "taskpad> ",
    };
    print!("{prompt}");
    io::stdout().flush()
}

fn print_rows<S: taskpad_core::KvStore>(service: &TaskService<S>) {
    if service.rows().is_empty() {
        println!("no tasks");
        return;
    }
    for (index, row) in service.rows().iter().enumerate() {
        let mark = if row.completed { "x" } else { " " };
        println!("[{mark}] {}. {}", index + 1, row.label);
        if let Some(meta) = &row.meta {
            println!("       {meta}");
        }
    }
}

fn parse_index<S: taskpad_core::KvStore>(
    word: Option<&str>,
    service: &TaskService<S>,
) -> Option<usize> {
    let position: usize = word?.parse().ok()?;
    if position == 0 || position > service.rows().len() {
        return None;
    }
    Some(position - 1)
}

fn status_label(completed: bool) -> &'static str {
    if completed {
        "completed"
    } else {
        "open"
    }
}
