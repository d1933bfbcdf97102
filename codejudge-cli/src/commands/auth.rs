//! Authentication commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use codejudge_core::{LoginForm, RegisterForm};
use dialoguer::{Input, Password};

use crate::commands::report;
use crate::context::Context;

/// Authentication management commands
#[derive(Debug, Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthSubcommand {
    /// Create an account
    Register {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Email address (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted twice if omitted)
        #[arg(long, env = "CODEJUDGE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log in and store the session token
    Login {
        /// Email address (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted if omitted)
        #[arg(long, env = "CODEJUDGE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show current authentication status
    Status,
}

/// Execute authentication commands
pub async fn execute(ctx: &Context, cmd: AuthCommands) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Register {
            username,
            email,
            password,
        } => register(ctx, username, email, password).await,
        AuthSubcommand::Login { email, password } => login(ctx, email, password).await,
        AuthSubcommand::Logout => logout(ctx),
        AuthSubcommand::Status => status(ctx),
    }
}

fn prompt_text(prompt: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .context("Failed to read password")
}

async fn register(
    ctx: &Context,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = prompt_text("Username", username)?;
    let email = prompt_text("Email", email)?;
    let (password, confirm) = match password {
        Some(p) => (p.clone(), p),
        None => (prompt_password("Password")?, prompt_password("Confirm password")?),
    };

    let form = RegisterForm::new(username, email, password, confirm);
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Creating account...");
    let result = client.auth().register(&form).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    result.map_err(|e| report(ctx, e))?;

    ctx.output.success("Account created. Run 'codejudge auth login' to sign in.");
    Ok(())
}

async fn login(ctx: &Context, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = prompt_text("Email", email)?;
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };

    let form = LoginForm::new(email, password);
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Logging in...");
    let result = client.auth().login(&form).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let authenticated = result.map_err(|e| report(ctx, e))?;

    if authenticated {
        ctx.output.success(&format!(
            "Logged in to {} (profile '{}', token in {})",
            ctx.api_url(),
            ctx.profile_name,
            ctx.profile.token_storage
        ));
    } else {
        ctx.output.warning(
            "The server accepted the login but returned no session token. \
             Check the profile's token_rules.",
        );
    }
    Ok(())
}

fn logout(ctx: &Context) -> Result<()> {
    let client = ctx.create_client()?;
    client.auth().logout().map_err(|e| report(ctx, e))?;
    ctx.output.success(&format!("Logged out from profile '{}'", ctx.profile_name));
    Ok(())
}

fn status(ctx: &Context) -> Result<()> {
    let client = ctx.create_client()?;
    let authenticated = client.auth().is_authenticated().map_err(|e| report(ctx, e))?;

    println!("Profile: {}", ctx.profile_name);
    println!("API URL: {}", ctx.api_url());
    println!("Token storage: {}", ctx.profile.token_storage);
    if authenticated {
        println!("Session: logged in");
    } else {
        println!("Session: not logged in. Run 'codejudge auth login' to sign in.");
    }
    Ok(())
}
