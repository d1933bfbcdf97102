//! Configuration commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use codejudge_core::PageSize;
use colored::Colorize;

use crate::config::{CliConfig, Profile, Settings};
use crate::context::Context;
use crate::token_store::KeyringTokenStore;
use codejudge_sdk::TokenStore;

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., settings.timeout_secs, profile.staging.api_url)
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// List all profiles
    Profiles,

    /// Set the default profile
    UseProfile {
        /// Profile name to use as default
        name: String,
    },

    /// Create a new profile
    CreateProfile {
        /// Profile name
        name: String,

        /// API URL for this profile
        #[arg(long)]
        api_url: Option<String>,

        /// Copy settings from another profile
        #[arg(long)]
        from: Option<String>,
    },

    /// Delete a profile and its stored session
    DeleteProfile {
        /// Profile name to delete
        name: String,

        /// Force deletion without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file paths
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Force reset without confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Execute configuration commands
pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Set { key, value } => set(ctx, &key, &value),
        ConfigSubcommand::Get { key } => get(ctx, &key),
        ConfigSubcommand::Profiles => list_profiles(ctx),
        ConfigSubcommand::UseProfile { name } => use_profile(ctx, &name),
        ConfigSubcommand::CreateProfile { name, api_url, from } => {
            create_profile(ctx, &name, api_url.as_deref(), from.as_deref())
        }
        ConfigSubcommand::DeleteProfile { name, force } => delete_profile(ctx, &name, force),
        ConfigSubcommand::Path => show_paths(),
        ConfigSubcommand::Reset { force } => reset(ctx, force),
    }
}

fn show(ctx: &Context) -> Result<()> {
    println!("{}", "Configuration".bold().underline());
    println!();

    let settings = &ctx.config.settings;
    println!("{}", "Settings:".cyan());
    println!("  output_format: {}", settings.output_format);
    println!("  color: {}", settings.color);
    println!("  verbose: {}", settings.verbose);
    println!("  timeout_secs: {}", settings.timeout_secs);
    println!("  page_size: {}", settings.page_size);

    println!();
    println!("{}", "Profiles:".cyan());
    if ctx.config.profiles.is_empty() {
        println!("  No profiles configured");
    }
    for name in ctx.config.list_profiles() {
        let Some(p) = ctx.config.profiles.get(name) else {
            continue;
        };
        let marker = if ctx.config.default_profile.as_deref() == Some(name) {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        println!("  [{}]{}", name, marker);
        println!("    api_url: {}", p.api_url());
        println!("    token_storage: {}", p.token_storage);
        for rule in p.token_rules() {
            println!("    token_rule: {} -> {}", rule.status, rule.field);
        }
        for (k, v) in &p.headers {
            println!("    header: {}: {}", k, v);
        }
    }

    Ok(())
}

fn set_setting(settings: &mut Settings, name: &str, value: &str) -> Result<()> {
    match name {
        "output_format" => settings.output_format = value.to_string(),
        "color" => settings.color = value.parse().context("Invalid boolean value")?,
        "verbose" => settings.verbose = value.parse().context("Invalid boolean value")?,
        "timeout_secs" => settings.timeout_secs = value.parse().context("Invalid number")?,
        "page_size" => {
            let size: u32 = value.parse().context("Invalid number")?;
            settings.page_size = PageSize::try_from(size)?.get();
        }
        _ => anyhow::bail!("Unknown setting: {}", name),
    }
    Ok(())
}

fn set_profile_field(profile: &mut Profile, field: &str, value: &str) -> Result<()> {
    match field {
        "api_url" => {
            url::Url::parse(value).with_context(|| format!("Invalid URL: {}", value))?;
            profile.api_url = Some(value.to_string());
        }
        "token_storage" => profile.token_storage = value.parse()?,
        _ => anyhow::bail!("Unknown profile field: {}", field),
    }
    Ok(())
}

/// Apply `key = value` to a configuration
fn apply(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["settings", setting] => set_setting(&mut config.settings, setting, value),
        ["profile", name, field] => set_profile_field(config.get_or_create_profile(name), field, value),
        ["default_profile"] => {
            config.set_default_profile(value);
            Ok(())
        }
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }
}

fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config.clone();
    apply(&mut config, key, value)?;
    config.save().context("Failed to save configuration")?;
    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn lookup(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();
    let value = match parts.as_slice() {
        ["settings", setting] => {
            let settings = &config.settings;
            match *setting {
                "output_format" => settings.output_format.clone(),
                "color" => settings.color.to_string(),
                "verbose" => settings.verbose.to_string(),
                "timeout_secs" => settings.timeout_secs.to_string(),
                "page_size" => settings.page_size.to_string(),
                _ => anyhow::bail!("Unknown setting: {}", setting),
            }
        }
        ["profile", name, field] => {
            let p = config
                .get_profile(Some(*name))
                .with_context(|| format!("Profile '{}' not found", name))?;
            match *field {
                "api_url" => p.api_url().to_string(),
                "token_storage" => p.token_storage.to_string(),
                _ => anyhow::bail!("Unknown profile field: {}", field),
            }
        }
        ["default_profile"] => config
            .default_profile
            .clone()
            .unwrap_or_else(|| "not set".to_string()),
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    };
    Ok(value)
}

fn get(ctx: &Context, key: &str) -> Result<()> {
    println!("{}", lookup(&ctx.config, key)?);
    Ok(())
}

fn list_profiles(ctx: &Context) -> Result<()> {
    if ctx.config.profiles.is_empty() {
        ctx.output
            .info("No profiles configured. Run 'codejudge config create-profile <name>' to create one.");
        return Ok(());
    }

    println!("{}", "Configured profiles:".bold());
    println!();

    for name in ctx.config.list_profiles() {
        if ctx.config.default_profile.as_deref() == Some(name) {
            println!("  {} {}", "→".green(), name.green().bold());
        } else {
            println!("    {}", name);
        }
    }

    Ok(())
}

fn use_profile(ctx: &Context, name: &str) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        anyhow::bail!(
            "Profile '{}' not found. Run 'codejudge config profiles' to list available profiles.",
            name
        );
    }

    config.set_default_profile(name);
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Now using profile '{}'", name));
    Ok(())
}

fn create_profile(ctx: &Context, name: &str, api_url: Option<&str>, from: Option<&str>) -> Result<()> {
    let mut config = ctx.config.clone();

    if config.profiles.contains_key(name) {
        anyhow::bail!("Profile '{}' already exists", name);
    }

    let mut new_profile = match from {
        Some(source) => config
            .get_profile(Some(source))
            .cloned()
            .with_context(|| format!("Source profile '{}' not found", source))?,
        None => Profile::default(),
    };

    if let Some(url) = api_url {
        set_profile_field(&mut new_profile, "api_url", url)?;
    }

    config.profiles.insert(name.to_string(), new_profile);
    if config.default_profile.is_none() {
        config.set_default_profile(name);
    }
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Created profile '{}'", name));
    if let Some(source) = from {
        ctx.output.info(&format!("Copied settings from '{}'", source));
    }

    Ok(())
}

fn delete_profile(ctx: &Context, name: &str, force: bool) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        anyhow::bail!("Profile '{}' not found", name);
    }

    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete profile '{}'?", name))
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    config.remove_profile(name);
    config.save().context("Failed to save configuration")?;

    let path = CliConfig::credentials_path()?;
    let mut credentials = crate::config::Credentials::load_from(&path)?;
    if credentials.remove(name).is_some() {
        credentials.save_to(&path).context("Failed to save credentials")?;
    }
    if let Err(e) = KeyringTokenStore::new(name).clear() {
        tracing::debug!("No keyring entry removed for '{}': {}", name, e);
    }

    ctx.output.success(&format!("Deleted profile '{}'", name));
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("{}", "Configuration paths:".bold());
    println!();

    for (label, path) in [
        ("Config:     ", CliConfig::config_path()),
        ("Credentials:", CliConfig::credentials_path()),
    ] {
        match path {
            Ok(path) => {
                let status = if path.exists() { "✓".green() } else { "✗".red() };
                println!("  {} {} {}", label, status, path.display());
            }
            Err(e) => println!("  {} Error: {}", label, e),
        }
    }

    Ok(())
}

fn reset(ctx: &Context, force: bool) -> Result<()> {
    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Reset all configuration to defaults? This cannot be undone.")
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    CliConfig::default()
        .save()
        .context("Failed to save configuration")?;
    crate::config::Credentials::default()
        .save_to(&CliConfig::credentials_path()?)
        .context("Failed to save credentials")?;

    ctx.output.success("Configuration reset to defaults");
    Ok(())
}
