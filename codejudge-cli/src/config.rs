//! CLI configuration management

use anyhow::{Context as _, Result};
use codejudge_sdk::{TokenRule, DEFAULT_BASE_URL};
use config::{Config as ConfigLoader, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Profile used when neither `--profile` nor a default profile is set
pub const DEFAULT_PROFILE: &str = "default";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Default profile to use
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Named profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

impl CliConfig {
    /// Load configuration from the default location, with `CODEJUDGE_*`
    /// environment overrides (`CODEJUDGE_SETTINGS__TIMEOUT_SECS=5`).
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let loader = ConfigLoader::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("CODEJUDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        loader
            .try_deserialize()
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "codejudge", "codejudge-cli")
            .context("Could not determine config directory")
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the credentials file path
    pub fn credentials_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("credentials.toml"))
    }

    /// Get a profile by name
    pub fn get_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let profile_name = name.or(self.default_profile.as_deref())?;
        self.profiles.get(profile_name)
    }

    /// Get or create a profile
    pub fn get_or_create_profile(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_string()).or_default()
    }

    /// Set the default profile
    pub fn set_default_profile(&mut self, name: &str) {
        self.default_profile = Some(name.to_string());
    }

    /// Remove a profile
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profile names, sorted
    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// A configuration profile: one judge server and how its session is kept
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    /// API base URL
    #[serde(default)]
    pub api_url: Option<String>,

    /// Where the session token is persisted
    #[serde(default)]
    pub token_storage: TokenStorage,

    /// Token capture rules; empty means the SDK defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_rules: Vec<TokenRule>,

    /// Additional headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Profile {
    /// Get the API URL, falling back to default
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Rules to configure the SDK with
    pub fn token_rules(&self) -> Vec<TokenRule> {
        if self.token_rules.is_empty() {
            TokenRule::defaults()
        } else {
            self.token_rules.clone()
        }
    }
}

/// Session token persistence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenStorage {
    /// `credentials.toml` next to the config file
    #[default]
    File,
    /// System keyring
    Keyring,
}

impl fmt::Display for TokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Keyring => write!(f, "keyring"),
        }
    }
}

impl std::str::FromStr for TokenStorage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            other => anyhow::bail!("Unknown token storage '{}', expected file or keyring", other),
        }
    }
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default output format
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Enable verbose output by default
    #[serde(default)]
    pub verbose: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Default catalog page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            color: true,
            verbose: false,
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

/// Credential storage
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    /// Stored credentials by profile name
    #[serde(default)]
    pub profiles: HashMap<String, ProfileCredentials>,
}

impl Credentials {
    /// Load credentials from `path`. A missing file yields no credentials.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials from {:?}", path))
    }

    /// Save credentials to `path`, readable by the owner only
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create credentials directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize credentials")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write credentials to {:?}", path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Stored token for a profile
    pub fn token(&self, profile: &str) -> Option<&str> {
        self.profiles.get(profile)?.token.as_deref()
    }

    /// Set the token for a profile
    pub fn set_token(&mut self, profile: &str, token: &str) {
        self.profiles.insert(
            profile.to_string(),
            ProfileCredentials {
                token: Some(token.to_string()),
            },
        );
    }

    /// Remove credentials for a profile
    pub fn remove(&mut self, profile: &str) -> Option<ProfileCredentials> {
        self.profiles.remove(profile)
    }
}

/// Credentials for a single profile
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileCredentials {
    /// Session token
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.default_profile.is_none());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_profile_defaults() {
        let profile = Profile::default();
        assert_eq!(profile.api_url(), DEFAULT_BASE_URL);
        assert_eq!(profile.token_storage, TokenStorage::File);
        assert_eq!(profile.token_rules(), TokenRule::defaults());

        let profile = Profile {
            api_url: Some("https://judge.example.com/api/v1/".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.api_url(), "https://judge.example.com/api/v1/");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.output_format, "table");
        assert!(settings.color);
        assert!(!settings.verbose);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.page_size, 10);
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CliConfig::default();
        let profile = config.get_or_create_profile("staging");
        profile.api_url = Some("https://staging.example.com/api/v1/".to_string());
        profile.token_storage = TokenStorage::Keyring;
        profile.token_rules = vec![TokenRule::new(200, "session")];
        config.set_default_profile("staging");
        config.save_to(&path).unwrap();

        let loaded = CliConfig::load_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("staging"));
        let profile = loaded.get_profile(None).unwrap();
        assert_eq!(profile.api_url(), "https://staging.example.com/api/v1/");
        assert_eq!(profile.token_storage, TokenStorage::Keyring);
        assert_eq!(profile.token_rules(), vec![TokenRule::new(200, "session")]);
    }

    #[test]
    fn test_missing_config_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_credentials_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.toml");

        let mut creds = Credentials::default();
        creds.set_token("default", "abc");
        creds.save_to(&path).unwrap();

        let loaded = Credentials::load_from(&path).unwrap();
        assert_eq!(loaded.token("default"), Some("abc"));
        assert_eq!(loaded.token("other"), None);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_token_storage_from_str() {
        assert_eq!("Keyring".parse::<TokenStorage>().unwrap(), TokenStorage::Keyring);
        assert_eq!("file".parse::<TokenStorage>().unwrap(), TokenStorage::File);
        assert!("vault".parse::<TokenStorage>().is_err());
    }
}
