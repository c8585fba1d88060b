use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::models::AuthResponse;

pub const KEY_TOKEN: &str = "token";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_USER_NAME: &str = "userName";
pub const KEY_USER_EMAIL: &str = "userEmail";
pub const KEY_FIRST_LOGIN: &str = "isFirstLogin";
pub const KEY_TOUR_COMPLETED: &str = "dashboardTourCompleted";
pub const KEY_SIDEBAR_COLLAPSED: &str = "sidebarCollapsed";
pub const KEY_REDIRECT_AFTER_LOGIN: &str = "redirectAfterLogin";

const SESSION_KEYS: [&str; 4] = [KEY_TOKEN, KEY_USER_ID, KEY_USER_NAME, KEY_USER_EMAIL];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable string key-value storage, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedEntries {
    version: u8,
    entries: BTreeMap<String, String>,
}

/// JSON-file backed store. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let entries = if path.exists() {
            let bytes = std::fs::read(&path)?;
            if bytes.is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_slice::<PersistedEntries>(&bytes)?.entries
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn flush(&self) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(&PersistedEntries {
            version: 1,
            entries: self.entries.clone(),
        })?;
        std::fs::write(&self.path, encoded)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Authenticated-session view over a [`KeyValueStore`]: `init` on login or
/// signup, `read` on every protected entry point, `teardown` on logout.
#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn init(&mut self, auth: &AuthResponse, new_user: bool) -> Result<Session, StoreError> {
        let user_id = decode_user_id(&auth.access_token).or_else(|| auth.user.id.clone());

        self.store.set(KEY_TOKEN, &auth.access_token)?;
        match user_id.as_deref() {
            Some(id) => self.store.set(KEY_USER_ID, id)?,
            None => self.store.remove(KEY_USER_ID)?,
        }
        self.store.set(KEY_USER_NAME, &auth.user.name)?;
        self.store.set(KEY_USER_EMAIL, &auth.user.email)?;
        if new_user || auth.user.is_first_login {
            self.store.set(KEY_FIRST_LOGIN, "true")?;
        }
        if auth.user.tour_completed {
            self.store.set(KEY_TOUR_COMPLETED, "true")?;
        }

        Ok(Session {
            token: auth.access_token.clone(),
            user_id,
            name: non_empty(&auth.user.name),
            email: non_empty(&auth.user.email),
        })
    }

    pub fn read(&self) -> Option<Session> {
        let token = self.store.get(KEY_TOKEN).filter(|t| !t.trim().is_empty())?;
        Some(Session {
            token,
            user_id: self.store.get(KEY_USER_ID),
            name: self.store.get(KEY_USER_NAME).filter(|v| !v.is_empty()),
            email: self.store.get(KEY_USER_EMAIL).filter(|v| !v.is_empty()),
        })
    }

    /// Clears the token and profile fields. Preferences and the tour flag
    /// outlive the session.
    pub fn teardown(&mut self) -> Result<(), StoreError> {
        for key in SESSION_KEYS {
            self.store.remove(key)?;
        }
        Ok(())
    }

    /// Reads and clears the one-shot new-user signal.
    pub fn take_first_login(&mut self) -> Result<bool, StoreError> {
        let first = self.flag(KEY_FIRST_LOGIN);
        self.store.remove(KEY_FIRST_LOGIN)?;
        Ok(first)
    }

    pub fn tour_completed(&self) -> bool {
        self.flag(KEY_TOUR_COMPLETED)
    }

    pub fn set_tour_completed(&mut self, completed: bool) -> Result<(), StoreError> {
        if completed {
            self.store.set(KEY_TOUR_COMPLETED, "true")
        } else {
            self.store.remove(KEY_TOUR_COMPLETED)
        }
    }

    /// Decides once per mount whether to auto-open the tour. Consumes the
    /// new-user signal either way.
    pub fn should_auto_open_tour(&mut self) -> Result<bool, StoreError> {
        let first = self.take_first_login()?;
        Ok(first && !self.tour_completed())
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.flag(KEY_SIDEBAR_COLLAPSED)
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) -> Result<(), StoreError> {
        self.store
            .set(KEY_SIDEBAR_COLLAPSED, if collapsed { "true" } else { "false" })
    }

    pub fn set_redirect_target(&mut self, path: &str) -> Result<(), StoreError> {
        self.store.set(KEY_REDIRECT_AFTER_LOGIN, path)
    }

    pub fn take_redirect_target(&mut self) -> Result<Option<String>, StoreError> {
        let target = self.store.get(KEY_REDIRECT_AFTER_LOGIN);
        if target.is_some() {
            self.store.remove(KEY_REDIRECT_AFTER_LOGIN)?;
        }
        Ok(target)
    }

    fn flag(&self, key: &str) -> bool {
        self.store.get(key).is_some_and(|v| v == "true")
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: Option<serde_json::Value>,
    #[serde(rename = "userId")]
    user_id: Option<serde_json::Value>,
    id: Option<serde_json::Value>,
}

/// Extracts the user id from the payload of a JWT access token. The signature
/// is not checked; the backend owns verification.
pub fn decode_user_id(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    [claims.sub, claims.user_id, claims.id]
        .into_iter()
        .flatten()
        .find_map(|value| match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
