//! Player profile and preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{self, KeyValueStore, PROFILE_KEY, StoreError};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;

/// Colour theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" | "auto" => Some(Theme::System),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("username must be 3-20 characters long")]
    Length,
}

/// Usernames are 3-20 characters long; the characters themselves are not restricted
pub fn validate_username(name: &str) -> Result<(), ProfileError> {
    let len = name.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ProfileError::Length);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub profile_id: String,
    pub username: String,
    /// Unix timestamp (ms)
    pub created_date: f64,
    /// Unix timestamp (ms) of the last change
    pub last_active: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_preference: Option<Theme>,
    pub sound_enabled: bool,
}

/// Partial update; `None` fields are left alone
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub theme_preference: Option<Theme>,
    pub sound_enabled: Option<bool>,
}

impl UserProfile {
    /// New profile with sound on and no theme preference
    pub fn create(username: &str, now_ms: f64) -> Result<Self, ProfileError> {
        validate_username(username)?;
        Ok(Self {
            profile_id: format!("profile_{}", now_ms as u64),
            username: username.to_string(),
            created_date: now_ms,
            last_active: now_ms,
            theme_preference: None,
            sound_enabled: true,
        })
    }

    /// Apply an update and bump `last_active`
    pub fn update(&mut self, changes: ProfileUpdate, now_ms: f64) -> Result<(), ProfileError> {
        if let Some(name) = &changes.username {
            validate_username(name)?;
        }
        if let Some(name) = changes.username {
            self.username = name;
        }
        if let Some(theme) = changes.theme_preference {
            self.theme_preference = Some(theme);
        }
        if let Some(sound) = changes.sound_enabled {
            self.sound_enabled = sound;
        }
        self.last_active = now_ms;
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.theme_preference.unwrap_or_default()
    }

    /// Stored profile, if any
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Option<Self> {
        persistence::load_optional(store, PROFILE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        persistence::save_json(store, PROFILE_KEY, self)?;
        log::info!("Profile saved for {}", self.username);
        Ok(())
    }

    pub fn delete<S: KeyValueStore + ?Sized>(store: &mut S) {
        store.remove(PROFILE_KEY);
        log::info!("Profile deleted");
    }
}
