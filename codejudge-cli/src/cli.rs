//! Command-line arguments

use clap::{Parser, Subcommand};

use crate::commands::{auth::AuthCommands, config::ConfigCommands, submit::SubmitArgs, tasks::TaskCommands};
use crate::output::OutputFormat;

/// Command-line client for the Codejudge online judge
#[derive(Debug, Parser)]
#[command(name = "codejudge", version, about, propagate_version = true)]
pub struct Cli {
    /// Configuration profile to use
    #[arg(short, long, global = true, env = "CODEJUDGE_PROFILE")]
    pub profile: Option<String>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log requests and SDK activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the API base URL
    #[arg(long, global = true, env = "CODEJUDGE_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register, log in and manage the session
    Auth(AuthCommands),

    /// Browse and author tasks
    Tasks(TaskCommands),

    /// Submit a solution for grading
    Submit(SubmitArgs),

    /// Manage configuration and profiles
    Config(ConfigCommands),
}
