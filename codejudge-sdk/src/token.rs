//! Session token persistence
//!
//! The client never reads ambient state: a [`TokenStore`] is handed to it at
//! construction and shared by every request it issues.

use crate::error::{SdkError, SdkResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Values that a careless writer may have stored in place of a real token.
const SENTINELS: [&str; 2] = ["missing", "undefined"];

/// Request fields that carry credentials.
pub const SECRET_FIELDS: [&str; 3] = ["password", "confirmPassword", "confirm_password"];

const REDACTED: &str = "<redacted>";

/// Key/value persistence for the single session token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Current token, if any. Sentinel values are returned as stored.
    fn get(&self) -> SdkResult<Option<String>>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> SdkResult<()>;

    /// Forget the stored token.
    fn clear(&self) -> SdkResult<()>;
}

/// Whether a stored value should be sent as a bearer credential.
pub fn is_usable_token(token: &str) -> bool {
    !token.trim().is_empty() && !SENTINELS.contains(&token)
}

/// Renders a token for log output; release builds never print it.
pub fn redact(token: &str) -> String {
    if cfg!(debug_assertions) {
        token.to_string()
    } else {
        REDACTED.to_string()
    }
}

/// Renders a JSON body for log output. Release builds mask every `fields`
/// key, at any depth.
pub fn redact_body(body: &str, fields: &[String]) -> String {
    if cfg!(debug_assertions) {
        body.to_string()
    } else {
        mask_fields(body, fields)
    }
}

/// Replaces the value of every `fields` key, at any depth, with `<redacted>`.
/// A body that is not JSON is returned unchanged.
pub fn mask_fields(body: &str, fields: &[String]) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(mut value) => {
            mask_value(&mut value, fields);
            value.to_string()
        }
        Err(_) => body.to_string(),
    }
}

fn mask_value(value: &mut Value, fields: &[String]) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if fields.iter().any(|f| f == key) {
                    *inner = Value::String(REDACTED.to_string());
                } else {
                    mask_value(inner, fields);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| mask_value(item, fields)),
        _ => {}
    }
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> SdkResult<Option<String>> {
        self.token
            .read()
            .map(|t| t.clone())
            .map_err(|e| SdkError::TokenStore(e.to_string()))
    }

    fn set(&self, token: &str) -> SdkResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| SdkError::TokenStore(e.to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> SdkResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| SdkError::TokenStore(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Stores the token as `{"token": "..."}` in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> SdkResult<TokenFile> {
        if !self.path.exists() {
            return Ok(TokenFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            SdkError::TokenStore(format!("Failed to read {:?}: {}", self.path, e))
        })?;
        if content.trim().is_empty() {
            return Ok(TokenFile::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, file: &TokenFile) -> SdkResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SdkError::TokenStore(format!("Failed to create {:?}: {}", parent, e))
            })?;
        }
        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content).map_err(|e| {
            SdkError::TokenStore(format!("Failed to write {:?}: {}", self.path, e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms)
                .map_err(|e| SdkError::TokenStore(e.to_string()))?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> SdkResult<Option<String>> {
        Ok(self.read()?.token)
    }

    fn set(&self, token: &str) -> SdkResult<()> {
        debug!(path = ?self.path, "persisting session token");
        self.write(&TokenFile {
            token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> SdkResult<()> {
        self.write(&TokenFile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_token() {
        assert!(is_usable_token("abc.def.ghi"));
        assert!(!is_usable_token(""));
        assert!(!is_usable_token("  "));
        assert!(!is_usable_token("missing"));
        assert!(!is_usable_token("undefined"));
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_mask_fields() {
        let masked = mask_fields(
            r#"{"email":"a@b.io","password":"hunter2","user":{"access":"jwt"}}"#,
            &fields(&["password", "access"]),
        );
        assert!(!masked.contains("hunter2"));
        assert!(!masked.contains("jwt"));
        assert!(masked.contains("a@b.io"));
        assert_eq!(masked.matches("<redacted>").count(), 2);
    }

    #[test]
    fn test_mask_fields_in_arrays() {
        let masked = mask_fields(r#"[{"token":"t1"},{"token":"t2"}]"#, &fields(&["token"]));
        assert_eq!(masked, r#"[{"token":"<redacted>"},{"token":"<redacted>"}]"#);
    }

    #[test]
    fn test_mask_fields_leaves_non_json_alone() {
        assert_eq!(mask_fields("<html>oops</html>", &fields(&["token"])), "<html>oops</html>");
        assert_eq!(mask_fields("", &fields(&["token"])), "");
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("t1").unwrap();
        assert_eq!(store.get().unwrap(), Some("t1".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.get().unwrap(), None);
        store.set("persisted").unwrap();

        let reopened = FileTokenStore::new(store.path());
        assert_eq!(reopened.get().unwrap(), Some("persisted".to_string()));

        reopened.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        store.set("secret").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
