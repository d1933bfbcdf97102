//! Persistent session token stores backing the SDK's `TokenStore`

use codejudge_sdk::{SdkError, SdkResult, TokenStore};
use std::path::PathBuf;

use crate::config::Credentials;

/// Keyring service name for stored session tokens
pub const KEYRING_SERVICE: &str = "codejudge-cli";

fn store_error(e: impl std::fmt::Display) -> SdkError {
    SdkError::TokenStore(e.to_string())
}

/// Keeps each profile's token in `credentials.toml`.
///
/// The file is re-read on every access so separate invocations see each
/// other's logins.
#[derive(Debug, Clone)]
pub struct CredentialsTokenStore {
    path: PathBuf,
    profile: String,
}

impl CredentialsTokenStore {
    pub fn new(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            profile: profile.into(),
        }
    }
}

impl TokenStore for CredentialsTokenStore {
    fn get(&self) -> SdkResult<Option<String>> {
        let creds = Credentials::load_from(&self.path).map_err(store_error)?;
        Ok(creds.token(&self.profile).map(str::to_string))
    }

    fn set(&self, token: &str) -> SdkResult<()> {
        let mut creds = Credentials::load_from(&self.path).map_err(store_error)?;
        creds.set_token(&self.profile, token);
        creds.save_to(&self.path).map_err(store_error)
    }

    fn clear(&self) -> SdkResult<()> {
        let mut creds = Credentials::load_from(&self.path).map_err(store_error)?;
        if creds.remove(&self.profile).is_some() {
            creds.save_to(&self.path).map_err(store_error)?;
        }
        Ok(())
    }
}

/// Keeps the token in the system keyring under `<profile>-token`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    user: String,
}

impl KeyringTokenStore {
    pub fn new(profile: &str) -> Self {
        Self {
            user: format!("{}-token", profile),
        }
    }

    fn entry(&self) -> SdkResult<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &self.user).map_err(store_error)
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> SdkResult<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(store_error(e)),
        }
    }

    fn set(&self, token: &str) -> SdkResult<()> {
        self.entry()?.set_password(token).map_err(store_error)
    }

    fn clear(&self) -> SdkResult<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(store_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_credentials_store_is_per_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.toml");
        let default = CredentialsTokenStore::new(&path, "default");
        let staging = CredentialsTokenStore::new(&path, "staging");

        assert_eq!(default.get().unwrap(), None);

        default.set("abc").unwrap();
        staging.set("xyz").unwrap();
        assert_eq!(default.get().unwrap().as_deref(), Some("abc"));
        assert_eq!(staging.get().unwrap().as_deref(), Some("xyz"));

        default.clear().unwrap();
        assert_eq!(default.get().unwrap(), None);
        assert_eq!(staging.get().unwrap().as_deref(), Some("xyz"));
    }

    #[test]
    fn test_clear_without_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.toml");
        let store = CredentialsTokenStore::new(&path, "default");

        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_credentials_file_is_store_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "profiles = 3").unwrap();

        let store = CredentialsTokenStore::new(&path, "default");
        assert!(matches!(store.get(), Err(SdkError::TokenStore(_))));
    }
}
