use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{CacheError, LiveQuery, MenuFilter, MenuStore};
use crate::api::MenuSource;
use crate::models::MenuEntry;

/// Outcome of `CacheManager::ensure_populated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    /// The table already had rows; nothing was fetched.
    AlreadyPopulated,
    /// The remote menu was fetched and this many rows were inserted.
    Populated(usize),
    /// The remote menu was empty. The table stays empty, so the next call
    /// fetches again.
    EmptyFetch,
}

/// Fills the menu table from a `MenuSource` once and serves reads from it.
pub struct CacheManager<S> {
    store: Arc<MenuStore>,
    source: S,
}

impl<S: MenuSource> CacheManager<S> {
    pub fn new(store: Arc<MenuStore>, source: S) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &Arc<MenuStore> {
        &self.store
    }

    /// True iff the menu table has no rows
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Fetch and store the remote menu if the table is empty.
    ///
    /// Callers that arrive while a population of the same store is in
    /// flight, through this manager or any other, wait for it and then see a
    /// filled table. A failed fetch leaves the table untouched and
    /// is returned to the caller; nothing retries it.
    pub async fn ensure_populated(&self) -> Result<Population, CacheError> {
        let _guard = self.store.population_guard().await;

        if !self.store.is_empty() {
            debug!(rows = self.store.len(), "Menu already cached, skipping fetch");
            return Ok(Population::AlreadyPopulated);
        }

        info!("Menu cache is empty, fetching remote menu");
        let fetched = match self.source.fetch_menu().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to fetch menu");
                return Err(e.into());
            }
        };

        if fetched.is_empty() {
            warn!("Remote menu has no entries");
            return Ok(Population::EmptyFetch);
        }

        let entries: Vec<MenuEntry> = fetched.into_iter().map(MenuEntry::from).collect();
        let inserted = self.store.insert_all(entries)?;

        info!(count = inserted, "Menu cache populated");
        Ok(Population::Populated(inserted))
    }

    /// Every cached entry, in insertion order, following table changes
    pub fn get_all(&self) -> LiveQuery {
        LiveQuery::new(self.store.subscribe(), None)
    }

    /// Entries whose title contains `search_phrase` (ignoring case) and whose
    /// category equals `category`. See `MenuFilter` for the empty-argument rules.
    pub fn filter(&self, search_phrase: &str, category: &str) -> LiveQuery {
        LiveQuery::new(self.store.subscribe(), Some(MenuFilter::new(search_phrase, category)))
    }
}

// ============================================================================
// Tests
// ============================================================================
