//! `codejudge` command-line client

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod token_store;

use cli::{Cli, Commands};
use context::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match Context::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            init_tracing(cli.verbose);
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(ctx.verbose);
    tracing::debug!(profile = %ctx.profile_name, api_url = %ctx.api_url(), "context ready");

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(&ctx, cmd).await,
        Commands::Tasks(cmd) => commands::tasks::execute(&ctx, cmd).await,
        Commands::Submit(args) => commands::submit::execute(&ctx, args).await,
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ctx.output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "codejudge=debug,codejudge_sdk=debug,codejudge_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
