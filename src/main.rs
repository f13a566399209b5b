use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use std::process;
use todostore::models::DATE_FORMAT;
use todostore::{Backend, Config, FileBackend, Filter, Task, TaskId, TaskStore};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "A local to-do list")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the task slot (overrides the config file)
    #[arg(short, long)]
    store_dir: Option<PathBuf>,

    /// Log more (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        title: String,

        /// Mark as important
        #[arg(short, long)]
        important: bool,

        /// Due date (YYYY-MM-DD, default today)
        #[arg(short, long, value_parser = parse_date)]
        due: Option<NaiveDate>,

        /// Category (default from config)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List tasks
    List {
        #[arg(short, long)]
        category: Option<String>,

        /// Only finished tasks
        #[arg(long, conflicts_with = "pending")]
        done: bool,

        /// Only unfinished tasks
        #[arg(long)]
        pending: bool,

        /// Only important tasks
        #[arg(short, long)]
        important: bool,

        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,
    },

    /// Toggle a task between done and not done
    Done { id: String },

    /// Change a task's title
    Edit {
        id: String,
        title: String,

        /// Store the title exactly as given, without trimming or checks
        #[arg(long)]
        raw: bool,
    },

    /// Delete a task
    Rm { id: String },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let dir = match cli.store_dir {
        Some(dir) => dir,
        None => config.store.resolve_dir()?,
    };

    let backend = FileBackend::open(&dir, &config.store.slot)?;
    let mut store = TaskStore::with_categories(backend, config.categories);

    match cli.command {
        Commands::Add {
            title,
            important,
            due,
            category,
        } => {
            let due = due.unwrap_or_else(|| Local::now().date_naive());
            let category = category.unwrap_or_else(|| store.categories().default.clone());
            let task = store.add(&title, important, due, &category)?;
            saved(&mut store)?;
            println!("Added {}", render(&task));
        }
        Commands::List {
            category,
            done,
            pending,
            important,
            search,
        } => {
            let mut filters = Vec::new();
            if let Some(category) = category {
                filters.push(Filter::category(category));
            }
            if done {
                filters.push(Filter::done(true));
            }
            if pending {
                filters.push(Filter::done(false));
            }
            if important {
                filters.push(Filter::important(true));
            }
            if let Some(search) = search {
                filters.push(Filter::title_contains(search));
            }

            if store.is_empty() {
                println!("{}", "No tasks yet. Add a new one!".dimmed());
                return Ok(());
            }
            let tasks = store.list(&filters);
            if tasks.is_empty() {
                println!("{}", "No matching tasks.".dimmed());
            }
            for task in tasks {
                println!("{}", render(task));
            }
        }
        Commands::Done { id } => {
            let id = resolve(&store, &id)?;
            if let Some(task) = store.toggle_done(id) {
                println!("{}", render(task));
            }
            saved(&mut store)?;
        }
        Commands::Edit { id, title, raw } => {
            let id = resolve(&store, &id)?;
            let task = if raw {
                store.edit_title_raw(id, &title)
            } else {
                store.edit_title(id, &title)?
            };
            if let Some(task) = task {
                println!("{}", render(task));
            }
            saved(&mut store)?;
        }
        Commands::Rm { id } => {
            let id = resolve(&store, &id)?;
            if let Some(task) = store.delete(id) {
                println!("Deleted {}", task.title);
            }
            saved(&mut store)?;
        }
    }

    Ok(())
}

fn resolve<B: Backend>(store: &TaskStore<B>, prefix: &str) -> Result<TaskId> {
    store
        .resolve_id(prefix)
        .ok_or_else(|| eyre!("No single task matches id {:?}", prefix))
}

fn saved<B: Backend>(store: &mut TaskStore<B>) -> Result<()> {
    match store.take_persist_error() {
        Some(e) => Err(e.wrap_err("Task change was not saved")),
        None => Ok(()),
    }
}

fn render(task: &Task) -> String {
    let mark = if task.is_done { "✓".green() } else { "○".dimmed() };
    let title = if task.is_done {
        task.title.strikethrough().dimmed()
    } else {
        task.title.bold()
    };
    let star = if task.is_important { " ★".yellow().to_string() } else { String::new() };
    let id = task.id.to_string();

    format!(
        "{} {} {}{}\n    {} {}  {}",
        mark,
        id[..8].dimmed(),
        title,
        star,
        task.due_date.format("%b %-d, %Y").to_string().cyan(),
        "·".dimmed(),
        task.category.magenta(),
    )
}
