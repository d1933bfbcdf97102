//! Task commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use codejudge_core::{to_clipboard_text, FieldErrors, PageSize, TaskField, TaskForm, TaskId};
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::report;
use crate::context::Context;
use crate::output::{OutputFormat, TaskRow};

const NO_TASKS: &str = "No tasks available. Create a new task to get started!";

/// Task commands
#[derive(Debug, Args)]
pub struct TaskCommands {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum TaskSubcommand {
    /// List one page of the catalog
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page: 10, 20, 50 or 100
        #[arg(short = 's', long)]
        page_size: Option<u32>,
    },

    /// Show a task with its public examples
    Show {
        /// Task ID
        id: TaskId,
    },

    /// Print the public test cases in clipboard format
    CopyTests {
        /// Task ID
        id: TaskId,
    },

    /// Create a task
    Create(CreateArgs),
}

/// Task fields. Flags override values loaded from `--file`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// JSON or TOML file holding the form (camelCase keys)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub input_format: Option<String>,

    #[arg(long)]
    pub output_format: Option<String>,

    /// Easy, Medium or Hard
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Seconds
    #[arg(long)]
    pub time_limit: Option<String>,

    /// Megabytes
    #[arg(long)]
    pub memory_limit: Option<String>,

    /// Comma-separated tag names
    #[arg(long)]
    pub tags: Option<String>,

    /// JSON array of {"input_data", "expected_output"} objects
    #[arg(long, conflicts_with = "tests_file")]
    pub tests: Option<String>,

    /// File holding the test case JSON array
    #[arg(long)]
    pub tests_file: Option<PathBuf>,
}

/// Execute task commands
pub async fn execute(ctx: &Context, cmd: TaskCommands) -> Result<()> {
    match cmd.command {
        TaskSubcommand::List { page, page_size } => list(ctx, page, page_size).await,
        TaskSubcommand::Show { id } => show(ctx, id).await,
        TaskSubcommand::CopyTests { id } => copy_tests(ctx, id).await,
        TaskSubcommand::Create(args) => create(ctx, args).await,
    }
}

async fn list(ctx: &Context, page: u32, page_size: Option<u32>) -> Result<()> {
    if page == 0 {
        anyhow::bail!("Page numbers start at 1");
    }
    let page_size = match page_size {
        Some(size) => PageSize::try_from(size)?,
        None => ctx.default_page_size()?,
    };

    let client = ctx.create_client()?;
    let mut pager = client.task_pager(page_size);

    let spinner = ctx.output.spinner("Fetching tasks...");
    pager.go_to(page - 1).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let rows: Vec<TaskRow> = pager.rows().map(|(n, task)| TaskRow::new(n, task)).collect();
    ctx.output
        .write_list(&rows, &["#", "ID", "Title", "Difficulty", "Tags"], NO_TASKS)?;

    if ctx.output.format() == OutputFormat::Table {
        let state = pager.state();
        let mut footer = format!("Page {} of {}", state.page() + 1, state.total_pages());
        if pager.has_next() {
            footer.push_str(&format!(" (next: --page {})", state.page() + 2));
        }
        ctx.output.info(&footer);
    }
    Ok(())
}

async fn show(ctx: &Context, id: TaskId) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching task...");
    let result = client.tasks().get(id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let task = result.map_err(|e| report(ctx, e))?;
    ctx.output.write(&task)
}

async fn copy_tests(ctx: &Context, id: TaskId) -> Result<()> {
    let client = ctx.create_client()?;
    let task = client.tasks().get(id).await.map_err(|e| report(ctx, e))?;

    let text = to_clipboard_text(&task.testcases);
    if text.is_empty() {
        ctx.output.warning("This task has no public test cases");
    } else {
        println!("{}", text);
    }
    Ok(())
}

async fn create(ctx: &Context, args: CreateArgs) -> Result<()> {
    let form = build_form(args)?;
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Creating task...");
    let result = client.tasks().create_from_form(&form).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match result.map_err(|e| report(ctx, e))? {
        Some(task) => ctx
            .output
            .success(&format!("Task created: {} (ID {})", task.title, task.id)),
        None => ctx.output.success("Task created"),
    }
    Ok(())
}

/// Read a saved form; the format follows the file extension.
fn load_form(path: &Path) -> Result<TaskForm> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).with_context(|| format!("Failed to parse {:?} as TOML", path))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?} as JSON", path))
    }
}

fn build_form(args: CreateArgs) -> Result<TaskForm> {
    let mut form = match &args.file {
        Some(path) => load_form(path)?,
        None => TaskForm::default(),
    };

    let tests = match &args.tests_file {
        Some(path) => Some(
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?,
        ),
        None => args.tests,
    };

    // Errors are reported by the validator after every field is set.
    let mut ignored = FieldErrors::new();
    let overrides = [
        (TaskField::Title, args.title),
        (TaskField::Description, args.description),
        (TaskField::InputFormat, args.input_format),
        (TaskField::OutputFormat, args.output_format),
        (TaskField::Difficulty, args.difficulty),
        (TaskField::TimeLimit, args.time_limit),
        (TaskField::MemoryLimit, args.memory_limit),
        (TaskField::Tags, args.tags),
        (TaskField::TestCases, tests),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            form.set(field, value, &mut ignored);
        }
    }
    Ok(form)
}
