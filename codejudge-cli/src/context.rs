//! CLI execution context

use anyhow::{Context as _, Result};
use codejudge_core::PageSize;
use codejudge_sdk::{JudgeClient, SdkConfig, TokenStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Cli;
use crate::config::{CliConfig, Profile, TokenStorage, DEFAULT_PROFILE};
use crate::output::{OutputFormat, OutputWriter};
use crate::token_store::{CredentialsTokenStore, KeyringTokenStore};

/// Execution context for CLI commands
pub struct Context {
    /// CLI configuration
    pub config: CliConfig,

    /// Active profile name
    pub profile_name: String,

    /// Active profile
    pub profile: Profile,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,

    /// API URL override
    pub api_url_override: Option<String>,

    credentials_path: PathBuf,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load()?;
        let credentials_path = CliConfig::credentials_path()?;

        let profile_name = cli
            .profile
            .clone()
            .or_else(|| config.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let profile = config
            .get_profile(Some(&profile_name))
            .cloned()
            .unwrap_or_default();

        let output_format = cli
            .output
            .unwrap_or_else(|| OutputFormat::from_setting(&config.settings.output_format));
        let output = OutputWriter::new(output_format, cli.no_color || !config.settings.color);

        Ok(Self {
            verbose: cli.verbose || config.settings.verbose,
            api_url_override: cli.api_url.clone(),
            config,
            profile_name,
            profile,
            output,
            credentials_path,
        })
    }

    /// Get the effective API URL
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or_else(|| self.profile.api_url())
    }

    /// Catalog page size from the settings
    pub fn default_page_size(&self) -> Result<PageSize> {
        PageSize::try_from(self.config.settings.page_size)
            .context("Invalid settings.page_size in configuration")
    }

    /// The store the active profile keeps its session token in
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        match self.profile.token_storage {
            TokenStorage::File => Arc::new(CredentialsTokenStore::new(
                &self.credentials_path,
                &self.profile_name,
            )),
            TokenStorage::Keyring => Arc::new(KeyringTokenStore::new(&self.profile_name)),
        }
    }

    /// Create an SDK client
    pub fn create_client(&self) -> Result<JudgeClient> {
        let timeout = Duration::from_secs(self.config.settings.timeout_secs);

        let mut config = SdkConfig::new(self.api_url())
            .with_timeout(timeout)
            .with_user_agent(format!("codejudge-cli/{}", env!("CARGO_PKG_VERSION")))
            .with_token_rules(self.profile.token_rules())
            .with_logging(self.verbose);

        for (name, value) in &self.profile.headers {
            config = config.with_header(name.clone(), value.clone());
        }

        JudgeClient::new(config, self.token_store()).context("Failed to create API client")
    }
}
