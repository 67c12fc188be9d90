use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{self, watch};
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::MenuEntry;

/// Cache file name inside the cache directory
const MENU_FILE: &str = "menu.json";

/// Bumped whenever the persisted layout changes. Files written with any
/// other version are thrown away and the menu is fetched again.
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk envelope for the menu table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedMenu {
    schema_version: u32,
    cached_at: DateTime<Utc>,
    data: Vec<MenuEntry>,
}

/// Human readable age of a cache write, e.g. "5m ago".
pub fn age_display(cached_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - cached_at).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

/// The local menu table.
///
/// Rows are kept in insertion order. Every successful write publishes a new
/// snapshot to subscribers; readers never wait on writers beyond a `watch`
/// borrow.
pub struct MenuStore {
    path: Option<PathBuf>,
    /// Held for the duration of a write; also records when the table was last written.
    cached_at: Mutex<Option<DateTime<Utc>>>,
    rows: watch::Sender<Arc<[MenuEntry]>>,
    /// Held across a whole fetch-and-insert so the table is populated once,
    /// however many managers share the store.
    population: sync::Mutex<()>,
}

impl MenuStore {
    /// Open the store backed by `menu.json` in `cache_dir`, creating the
    /// directory if needed.
    ///
    /// An unreadable, corrupt or outdated cache file is discarded and the
    /// store starts empty.
    pub fn open(cache_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let cache_dir = cache_dir.as_ref();
        std::fs::create_dir_all(cache_dir).map_err(|e| StorageError::io(cache_dir, e))?;

        let path = cache_dir.join(MENU_FILE);
        let (rows, cached_at) = match Self::load(&path)? {
            Some(cached) => (cached.data, Some(cached.cached_at)),
            None => (Vec::new(), None),
        };
        debug!(path = %path.display(), rows = rows.len(), "Menu store opened");

        Ok(Self::with_rows(Some(path), rows, cached_at))
    }

    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::with_rows(None, Vec::new(), None)
    }

    fn with_rows(path: Option<PathBuf>, rows: Vec<MenuEntry>, cached_at: Option<DateTime<Utc>>) -> Self {
        let (tx, _rx) = watch::channel(Arc::from(rows));
        Self {
            path,
            cached_at: Mutex::new(cached_at),
            rows: tx,
            population: sync::Mutex::new(()),
        }
    }

    fn load(path: &Path) -> Result<Option<CachedMenu>, StorageError> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;

        match serde_json::from_str::<CachedMenu>(&contents) {
            Ok(cached) if cached.schema_version == SCHEMA_VERSION => Ok(Some(cached)),
            Ok(cached) => {
                warn!(
                    found = cached.schema_version,
                    expected = SCHEMA_VERSION,
                    "Menu cache schema changed, discarding cached menu"
                );
                Self::discard(path);
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Menu cache is unreadable, discarding cached menu");
                Self::discard(path);
                Ok(None)
            }
        }
    }

    fn discard(path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(error = %e, path = %path.display(), "Failed to remove stale menu cache");
        }
    }

    /// Location of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    /// All rows, in insertion order
    pub fn snapshot(&self) -> Arc<[MenuEntry]> {
        self.rows.borrow().clone()
    }

    /// Receive a new snapshot every time the table changes.
    /// The current snapshot counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<Arc<[MenuEntry]>> {
        self.rows.subscribe()
    }

    /// When the table was last written
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        let guard = self.cached_at.lock().unwrap_or_else(|poisoned| {
            warn!("Menu store lock poisoned by an interrupted write");
            PoisonError::into_inner(poisoned)
        });
        *guard
    }

    /// Wait until no other population of this store is in flight.
    pub async fn population_guard(&self) -> sync::MutexGuard<'_, ()> {
        self.population.lock().await
    }

    /// Age of the cached menu for display, "never" if nothing was cached
    pub fn age_display(&self) -> String {
        match self.cached_at() {
            Some(at) => age_display(at, Utc::now()),
            None => "never".to_string(),
        }
    }

    /// Append a batch of entries.
    ///
    /// The batch is written whole or not at all: an id that repeats inside
    /// the batch or collides with an existing row rejects the entire batch.
    /// The file is replaced atomically before subscribers are notified.
    pub fn insert_all(&self, entries: Vec<MenuEntry>) -> Result<usize, StorageError> {
        let mut cached_at = self.cached_at.lock().map_err(|_| StorageError::Poisoned)?;

        if entries.is_empty() {
            return Ok(0);
        }

        let current = self.snapshot();
        let mut ids: HashSet<i64> = current.iter().map(|e| e.id).collect();
        for entry in &entries {
            if !ids.insert(entry.id) {
                return Err(StorageError::DuplicateId(entry.id));
            }
        }

        let inserted = entries.len();
        let mut rows = Vec::with_capacity(current.len() + inserted);
        rows.extend(current.iter().cloned());
        rows.extend(entries);

        let now = Utc::now();
        if let Some(ref path) = self.path {
            Self::persist(path, &rows, now)?;
        }

        *cached_at = Some(now);
        self.rows.send_replace(Arc::from(rows));

        info!(inserted, "Menu entries cached");
        Ok(inserted)
    }

    fn persist(path: &Path, rows: &[MenuEntry], cached_at: DateTime<Utc>) -> Result<(), StorageError> {
        let cached = CachedMenu {
            schema_version: SCHEMA_VERSION,
            cached_at,
            data: rows.to_vec(),
        };
        let contents = serde_json::to_string_pretty(&cached)?;

        // Write next to the target and rename over it so a crash never
        // leaves a half-written table behind.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|e| StorageError::io(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))?;
        Ok(())
    }
}
