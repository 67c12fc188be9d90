//! Persisted user preferences: the onboarding flag and profile fields.
//!
//! The `user_registered` flag decides where the app starts. Until it is set,
//! the user is sent to onboarding and the menu is never synchronized.
//!
//! Preferences are stored as `user_prefs.json` next to the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Preferences file name
const PREFS_FILE: &str = "user_prefs.json";

/// Onboarding input that can't be accepted.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{0} must not be blank")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Profile entered during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Profile {
    /// Build a profile from raw form input, trimming whitespace.
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Result<Self, ProfileError> {
        let profile = Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.trim().to_string(),
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.first_name.is_empty() {
            return Err(ProfileError::MissingField("First name"));
        }
        if self.last_name.is_empty() {
            return Err(ProfileError::MissingField("Last name"));
        }
        if self.email.is_empty() {
            return Err(ProfileError::MissingField("Email"));
        }
        if !looks_like_email(&self.email) {
            return Err(ProfileError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Minimal shape check: one '@' with something on both sides and a dot in the domain.
fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Where the app should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDestination {
    Onboarding,
    Home,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefsData {
    #[serde(default)]
    pub user_registered: bool,
    #[serde(flatten)]
    pub profile: Profile,
}

pub struct UserPrefs {
    dir: PathBuf,
    pub data: PrefsData,
}

impl UserPrefs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            data: PrefsData::default(),
        }
    }

    /// Load preferences from `dir`, defaulting to an unregistered user when
    /// no file exists.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let mut prefs = Self::new(dir);
        let path = prefs.prefs_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read preferences file")?;
            prefs.data = serde_json::from_str(&contents).context("Failed to parse preferences file")?;
        }
        debug!(registered = prefs.data.user_registered, "Preferences loaded");
        Ok(prefs)
    }

    /// Save preferences to disk
    pub fn save(&self) -> Result<()> {
        let path = self.prefs_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&path, contents).context("Failed to write preferences file")?;
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.data.user_registered
    }

    pub fn profile(&self) -> &Profile {
        &self.data.profile
    }

    pub fn start_destination(&self) -> StartDestination {
        if self.is_registered() {
            StartDestination::Home
        } else {
            StartDestination::Onboarding
        }
    }

    /// Complete onboarding: store the profile and set the registered flag.
    pub fn register(&mut self, profile: Profile) -> Result<()> {
        profile.validate()?;
        self.data = PrefsData {
            user_registered: true,
            profile,
        };
        self.save()?;
        info!("User registered");
        Ok(())
    }

    /// Log out: forget the profile and clear the registered flag.
    /// The cached menu is left alone.
    pub fn clear(&mut self) -> Result<()> {
        self.data = PrefsData::default();
        let path = self.prefs_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove preferences file")?;
        }
        info!("User preferences cleared");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn prefs_path(&self) -> PathBuf {
        self.dir.join(PREFS_FILE)
    }
}
