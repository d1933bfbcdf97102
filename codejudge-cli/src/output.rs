//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use codejudge_core::{FieldErrors, Task, Verdict};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Compact format (single line per item)
    Compact,
}

impl OutputFormat {
    /// Parse a format name from the config file, falling back to the table format.
    pub fn from_setting(name: &str) -> Self {
        <Self as ValueEnum>::from_str(name, true).unwrap_or_default()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// The selected format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a single item
    pub fn write<T: Serialize + TableDisplay>(&self, item: &T) -> Result<()> {
        match self.format {
            OutputFormat::Table => item.display_single(),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(item)?),
            OutputFormat::Compact => item.display_compact(),
        }
        Ok(())
    }

    /// Write a list of items; `empty` is shown instead of an empty table
    pub fn write_list<T: Serialize + TableDisplay>(
        &self,
        items: &[T],
        headers: &[&str],
        empty: &str,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("{}", empty.dimmed());
                    return Ok(());
                }

                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.apply_modifier(UTF8_ROUND_CORNERS);

                let header_cells: Vec<Cell> = headers
                    .iter()
                    .map(|h| Cell::new(h).fg(Color::Cyan))
                    .collect();
                table.set_header(header_cells);

                for item in items {
                    table.add_row(item.to_row());
                }

                println!("{table}");
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(items)?),
            OutputFormat::Compact => {
                for item in items {
                    item.display_compact();
                }
            }
        }
        Ok(())
    }

    /// Write a success message
    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "✓".green(), message);
        } else {
            println!("{}", message);
        }
    }

    /// Write an error message
    pub fn error(&self, message: &str) {
        if self.format == OutputFormat::Table {
            eprintln!("{} {}", "✗".red(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    /// Write a warning message
    pub fn warning(&self, message: &str) {
        if self.format == OutputFormat::Table {
            eprintln!("{} {}", "⚠".yellow(), message);
        } else {
            eprintln!("Warning: {}", message);
        }
    }

    /// Write an info message
    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "ℹ".blue(), message);
        } else {
            println!("{}", message);
        }
    }

    /// Inline validation messages, one per field
    pub fn field_errors(&self, errors: &FieldErrors) {
        for (field, message) in errors.iter() {
            if self.format == OutputFormat::Table {
                eprintln!("  {} {}", format!("{}:", field).red(), message);
            } else {
                eprintln!("{}: {}", field, message);
            }
        }
    }

    /// Start a spinner for long operations. Only shown on an interactive table output.
    pub fn spinner(&self, message: &str) -> Option<indicatif::ProgressBar> {
        if self.format != OutputFormat::Table || !console::Term::stderr().is_term() {
            return None;
        }
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    }
}

/// Trait for displaying items in a table
pub trait TableDisplay {
    /// Convert item to a table row
    fn to_row(&self) -> Vec<Cell>;

    /// Display a single item in detail
    fn display_single(&self);

    /// Display in compact format
    fn display_compact(&self);
}

/// One catalog row with its position in the whole catalog
#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub number: u64,
    pub id: i64,
    pub title: String,
    pub difficulty: String,
    pub tags: Vec<String>,
}

impl TaskRow {
    pub fn new(number: u64, task: &Task) -> Self {
        Self {
            number,
            id: task.id.get(),
            title: task.title.clone(),
            difficulty: task.difficulty_label().to_string(),
            tags: task.tag_names(),
        }
    }
}

impl TableDisplay for TaskRow {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.number),
            Cell::new(self.id),
            Cell::new(&self.title),
            Cell::new(difficulty_badge(&self.difficulty)),
            Cell::new(self.tags.join(", ")),
        ]
    }

    fn display_single(&self) {
        print_field("Title", &self.title);
        print_field("Difficulty", &difficulty_badge(&self.difficulty));
        print_list_field("Tags", &self.tags);
    }

    fn display_compact(&self) {
        println!("{}\t{}\t{}\t{}", self.number, self.id, self.difficulty, self.title);
    }
}

impl TableDisplay for Task {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.id),
            Cell::new(&self.title),
            Cell::new(difficulty_badge(self.difficulty_label())),
            Cell::new(self.tag_names().join(", ")),
        ]
    }

    fn display_single(&self) {
        println!("{}", self.title.bold());
        print_field("ID", &self.id.to_string());
        print_field("Difficulty", &difficulty_badge(self.difficulty_label()));
        print_field("Time limit", &format!("{} s", self.time_limit));
        print_field("Memory limit", &format!("{} MB", self.memory_limit));
        print_list_field("Tags", &self.tag_names());

        print_section("Description");
        println!("{}", self.description);
        print_section("Input format");
        println!("{}", self.input_format);
        print_section("Output format");
        println!("{}", self.output_format);

        let public: Vec<_> = self.public_test_cases().collect();
        if !public.is_empty() {
            print_section("Examples");
            for (i, case) in public.iter().enumerate() {
                println!("{}", format!("Example {}", i + 1).cyan());
                println!("  Input:\n{}", indent(&case.input_data));
                println!("  Expected output:\n{}", indent(&case.expected_output));
            }
        }
    }

    fn display_compact(&self) {
        println!("{}\t{}\t{}", self.id, self.difficulty_label(), self.title);
    }
}

/// Print a key-value pair in detail format
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Print a list field
pub fn print_list_field(key: &str, values: &[String]) {
    if values.is_empty() {
        println!("  {}: {}", key.cyan(), "-".dimmed());
    } else {
        println!("  {}:", key.cyan());
        for v in values {
            println!("    - {}", v);
        }
    }
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Difficulty with color
pub fn difficulty_badge(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "easy" => name.green().to_string(),
        "medium" => name.yellow().to_string(),
        "hard" => name.red().to_string(),
        _ => name.dimmed().to_string(),
    }
}

/// Verdict message with color
pub fn verdict_badge(verdict: Verdict) -> String {
    match verdict {
        Verdict::Correct => verdict.message().green().bold().to_string(),
        Verdict::Incorrect => verdict.message().red().bold().to_string(),
        Verdict::Pending => verdict.message().yellow().to_string(),
    }
}
