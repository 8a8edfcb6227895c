//! Auth session persisted as flat string keys, mirroring what the admin pages
//! keep in browser local storage. The store is a capability so the gateway can
//! run against memory in tests or a JSON file from the terminal.

use super::errors::GatewayError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use tracing::debug;

pub const TOKEN_KEY: &str = "jwtToken";
pub const USERNAME_KEY: &str = "username";
pub const MEMBER_NO_KEY: &str = "memberNo";
pub const ROLE_KEY: &str = "role";
pub const NICKNAME_KEY: &str = "nickname";
pub const POINTS_KEY: &str = "points";

/// Every key owned by the auth session; cleared together.
pub const SESSION_KEYS: [&str; 6] = [
    TOKEN_KEY,
    USERNAME_KEY,
    MEMBER_NO_KEY,
    ROLE_KEY,
    NICKNAME_KEY,
    POINTS_KEY,
];

/// Key-value storage for session state.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns [`GatewayError::Storage`] if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError>;

    /// Removes all `keys` in one step.
    ///
    /// # Errors
    /// Returns [`GatewayError::Storage`] if the store cannot be updated.
    fn clear(&self, keys: &[&str]) -> Result<(), GatewayError>;
}

#[derive(Clone, Debug)]
pub struct AuthSession {
    pub token: SecretString,
    pub username: String,
    pub member_no: String,
    pub role: String,
    pub nickname: String,
    pub points: i64,
}

impl AuthSession {
    #[must_use]
    pub fn new(token: SecretString, username: impl Into<String>) -> Self {
        Self {
            token,
            username: username.into(),
            member_no: String::new(),
            role: String::new(),
            nickname: String::new(),
            points: 0,
        }
    }

    /// Reads the session; `None` when no non-empty token is stored.
    pub fn load(store: &dyn SessionStore) -> Option<Self> {
        let token = store.get(TOKEN_KEY).filter(|token| !token.is_empty())?;
        let field = |key: &str| store.get(key).unwrap_or_default();

        Some(Self {
            token: SecretString::from(token),
            username: field(USERNAME_KEY),
            member_no: field(MEMBER_NO_KEY),
            role: field(ROLE_KEY),
            nickname: field(NICKNAME_KEY),
            points: field(POINTS_KEY).trim().parse().unwrap_or(0),
        })
    }

    /// Writes every session key.
    ///
    /// # Errors
    /// Returns [`GatewayError::Storage`] if any key cannot be written.
    pub fn save(&self, store: &dyn SessionStore) -> Result<(), GatewayError> {
        store.set(TOKEN_KEY, self.token.expose_secret())?;
        store.set(USERNAME_KEY, &self.username)?;
        store.set(MEMBER_NO_KEY, &self.member_no)?;
        store.set(ROLE_KEY, &self.role)?;
        store.set(NICKNAME_KEY, &self.nickname)?;
        store.set(POINTS_KEY, &self.points.to_string())
    }

    /// Removes every session key, used on logout and session expiry.
    ///
    /// # Errors
    /// Returns [`GatewayError::Storage`] if the store cannot be updated.
    pub fn clear(store: &dyn SessionStore) -> Result<(), GatewayError> {
        debug!("clearing auth session");
        store.clear(&SESSION_KEYS)
    }

    /// Stored token or an empty string for anonymous callers.
    #[must_use]
    pub fn bearer_token(store: &dyn SessionStore) -> String {
        store.get(TOKEN_KEY).unwrap_or_default()
    }

    #[must_use]
    pub fn is_authenticated(store: &dyn SessionStore) -> bool {
        !Self::bearer_token(store).is_empty()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// In-process store; the default for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, keys: &[&str]) -> Result<(), GatewayError> {
        let mut values = lock(&self.values);
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}

/// JSON object on disk, rewritten through a temporary file on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Map<String, Value>, GatewayError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => {
                return Err(GatewayError::Storage(format!(
                    "{}: {err}",
                    self.path.display()
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(GatewayError::Storage(format!(
                "{}: expected a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write(&self, map: &Map<String, Value>) -> Result<(), GatewayError> {
        let storage_err = |err: std::io::Error| {
            GatewayError::Storage(format!("{}: {err}", self.path.display()))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?).map_err(storage_err)?;
        fs::rename(&tmp, &self.path).map_err(storage_err)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = lock(&self.guard);
        let map = self.read().ok()?;
        match map.get(key)? {
            Value::String(value) => Some(value.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError> {
        let _guard = lock(&self.guard);
        let mut map = self.read()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write(&map)
    }

    fn clear(&self, keys: &[&str]) -> Result<(), GatewayError> {
        let _guard = lock(&self.guard);
        let mut map = self.read()?;
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before {
            return Ok(());
        }
        self.write(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> AuthSession {
        AuthSession {
            token: SecretString::from("jwt-123".to_string()),
            username: "alice".to_string(),
            member_no: "M0001".to_string(),
            role: "ADMIN".to_string(),
            nickname: "Al".to_string(),
            points: 42,
        }
    }

    #[test]
    fn memory_store_round_trips_session() {
        let store = MemoryStore::new();
        sample_session().save(&store).unwrap();

        let loaded = AuthSession::load(&store).unwrap();
        assert_eq!(loaded.token.expose_secret(), "jwt-123");
        assert_eq!(loaded.member_no, "M0001");
        assert_eq!(loaded.points, 42);
        assert!(AuthSession::is_authenticated(&store));
    }

    #[test]
    fn empty_token_means_anonymous() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "").unwrap();
        store.set(USERNAME_KEY, "ghost").unwrap();

        assert!(AuthSession::load(&store).is_none());
        assert!(!AuthSession::is_authenticated(&store));
        assert_eq!(AuthSession::bearer_token(&store), "");
    }

    #[test]
    fn clear_removes_only_session_keys() {
        let store = MemoryStore::new();
        sample_session().save(&store).unwrap();
        store.set("theme", "dark").unwrap();

        AuthSession::clear(&store).unwrap();

        for key in SESSION_KEYS {
            assert_eq!(store.get(key), None, "{key} should be cleared");
        }
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        // clearing again is a no-op
        AuthSession::clear(&store).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unparsable_points_default_to_zero() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "t").unwrap();
        store.set(POINTS_KEY, "lots").unwrap();
        assert_eq!(AuthSession::load(&store).unwrap().points, 0);
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", sample_session());
        assert!(!rendered.contains("jwt-123"));
    }

    #[test]
    fn file_store_persists_and_clears() {
        let dir = std::env::temp_dir().join(format!("buka-session-{}", uuid::Uuid::new_v4()));
        let path = dir.join("session.json");
        let store = FileStore::new(&path);

        assert_eq!(store.get(TOKEN_KEY), None);
        sample_session().save(&store).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(USERNAME_KEY).as_deref(), Some("alice"));

        AuthSession::clear(&reopened).unwrap();
        assert!(AuthSession::load(&store).is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn file_store_rejects_non_object_json() {
        let path = std::env::temp_dir().join(format!("buka-session-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "[1, 2]").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.set(TOKEN_KEY, "x"),
            Err(GatewayError::Storage(_))
        ));

        let _ = fs::remove_file(path);
    }
}
