//! Key-value persistence
//!
//! Everything the hub remembers lives in a string-keyed store holding JSON
//! values: LocalStorage in the browser, a `HashMap` natively and in tests.
//! Missing or unparseable values read back as the type's default.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Profile record key
pub const PROFILE_KEY: &str = "gamehub_profile";
/// Score history key
pub const SCORES_KEY: &str = "gamehub_scores";
/// Play count key
pub const GAMES_KEY: &str = "gamehub_games";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend rejected write to {key}: {reason}")]
    Backend { key: String, reason: String },
    #[error("storage is not available")]
    Unavailable,
}

/// String-keyed store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Backend {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove(&mut self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// Read a JSON value, falling back to the default when absent or malformed
pub fn load_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    load_optional(store, key).unwrap_or_default()
}

/// Read a JSON value; malformed data is logged and treated as absent
pub fn load_optional<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding malformed data under {}: {}", key, e);
            None
        }
    }
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[derive(Serialize)]
struct Export {
    profile: Option<crate::profile::UserProfile>,
    scores: Vec<crate::scores::ScoreRecord>,
    games: Vec<crate::catalog::PlayCount>,
    #[serde(rename = "exportedAt")]
    exported_at: f64,
}

/// Dump everything the hub stores as pretty JSON
pub fn export_all<S: KeyValueStore + ?Sized>(store: &S, now_ms: f64) -> Result<String, StoreError> {
    let export = Export {
        profile: crate::profile::UserProfile::load(store),
        scores: crate::scores::ScoreBook::load(store).records,
        games: crate::catalog::PlayCounts::load(store).entries,
        exported_at: now_ms,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Forget the profile, all scores and all play counts
pub fn clear_all<S: KeyValueStore + ?Sized>(store: &mut S) {
    store.remove(PROFILE_KEY);
    store.remove(SCORES_KEY);
    store.remove(GAMES_KEY);
    log::info!("All stored data cleared");
}
