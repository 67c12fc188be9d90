//! Core library for Little Lemon.
//!
//! - `api`: downloads the restaurant menu
//! - `cache`: the local menu table, filled once and read offline afterwards
//! - `prefs`: onboarding flag and user profile
//! - `config`: configuration file and directory locations

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod prefs;
pub mod utils;

pub use api::{ApiClient, FetchError, MenuSource};
pub use cache::{CacheError, CacheManager, LiveQuery, MenuFilter, MenuStore, Population, StorageError};
pub use config::Config;
pub use models::{MenuEntry, MenuEntryNetwork};
pub use prefs::{Profile, ProfileError, StartDestination, UserPrefs};
