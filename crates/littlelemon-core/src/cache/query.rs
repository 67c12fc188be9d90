use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use tokio::sync::watch;

use crate::models::MenuEntry;
use crate::utils::contains_ignore_case;

/// Title search plus category match.
///
/// The title matches when it contains `search_phrase` ignoring case; an
/// empty phrase matches every title. The category must be equal to
/// `category`. An empty category is not a wildcard: it only matches
/// entries whose category is itself empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuFilter {
    pub search_phrase: String,
    pub category: String,
}

impl MenuFilter {
    pub fn new(search_phrase: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search_phrase: search_phrase.into(),
            category: category.into(),
        }
    }

    pub fn matches(&self, entry: &MenuEntry) -> bool {
        entry.category == self.category && contains_ignore_case(&entry.title, &self.search_phrase)
    }
}

/// A read over the menu table that follows every change to it.
///
/// `current` never waits. `changed` resolves when the table is next
/// written; until then readers should treat the menu as not yet available.
pub struct LiveQuery {
    rows: watch::Receiver<Arc<[MenuEntry]>>,
    filter: Option<MenuFilter>,
}

impl LiveQuery {
    pub(crate) fn new(rows: watch::Receiver<Arc<[MenuEntry]>>, filter: Option<MenuFilter>) -> Self {
        Self { rows, filter }
    }

    pub fn filter(&self) -> Option<&MenuFilter> {
        self.filter.as_ref()
    }

    fn select(&self, rows: &[MenuEntry]) -> Vec<MenuEntry> {
        match self.filter {
            Some(ref filter) => rows.iter().filter(|e| filter.matches(e)).cloned().collect(),
            None => rows.to_vec(),
        }
    }

    /// Latest result, without waiting
    pub fn current(&self) -> Vec<MenuEntry> {
        let rows = self.rows.borrow().clone();
        self.select(&rows)
    }

    /// Wait for the next change to the table and return the new result.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Vec<MenuEntry>> {
        self.rows.changed().await.ok()?;
        let rows = self.rows.borrow_and_update().clone();
        Some(self.select(&rows))
    }

    /// The current result followed by one item per change.
    pub fn into_stream(self) -> impl Stream<Item = Vec<MenuEntry>> + Send {
        let first = self.current();
        stream::once(async move { first }).chain(stream::unfold(self, |mut query| async move {
            let rows = query.changed().await?;
            Some((rows, query))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MenuStore;

    fn entry(id: i64, title: &str, category: &str) -> MenuEntry {
        MenuEntry {
            id,
            title: title.to_string(),
            description: String::new(),
            price: "10".to_string(),
            image: String::new(),
            category: category.to_string(),
        }
    }

    fn sample_rows() -> Vec<MenuEntry> {
        vec![
            entry(1, "Greek Salad", "starters"),
            entry(2, "Lemon Dessert", "desserts"),
        ]
    }

    fn titles(rows: &[MenuEntry]) -> Vec<&str> {
        rows.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_filter_by_phrase_and_category() {
        let store = MenuStore::in_memory();
        store.insert_all(sample_rows()).unwrap();

        let lemon = LiveQuery::new(store.subscribe(), Some(MenuFilter::new("lemon", "desserts")));
        assert_eq!(titles(&lemon.current()), vec!["Lemon Dessert"]);

        let starters = LiveQuery::new(store.subscribe(), Some(MenuFilter::new("", "starters")));
        assert_eq!(titles(&starters.current()), vec!["Greek Salad"]);

        let nothing = LiveQuery::new(store.subscribe(), Some(MenuFilter::new("zzz", "")));
        assert!(nothing.current().is_empty());
    }

    #[test]
    fn test_empty_category_is_not_a_wildcard() {
        let filter = MenuFilter::new("", "");
        assert!(!filter.matches(&entry(1, "Greek Salad", "starters")));
        assert!(filter.matches(&entry(9, "Daily Special", "")));
    }

    #[test]
    fn test_phrase_must_match_category_too() {
        let filter = MenuFilter::new("lemon", "starters");
        assert!(!filter.matches(&entry(2, "Lemon Dessert", "desserts")));
        assert!(filter.matches(&entry(3, "Lemon Chicken Soup", "starters")));
    }

    #[test]
    fn test_category_match_is_exact() {
        let filter = MenuFilter::new("", "Desserts");
        assert!(!filter.matches(&entry(2, "Lemon Dessert", "desserts")));
    }

    #[tokio::test]
    async fn test_changed_delivers_filtered_snapshot() {
        let store = MenuStore::in_memory();
        let mut query = LiveQuery::new(store.subscribe(), Some(MenuFilter::new("SALAD", "starters")));
        assert!(query.current().is_empty());

        store.insert_all(sample_rows()).unwrap();

        let rows = query.changed().await.expect("store still alive");
        assert_eq!(titles(&rows), vec!["Greek Salad"]);
    }

    #[tokio::test]
    async fn test_changed_returns_none_after_store_dropped() {
        let store = MenuStore::in_memory();
        let mut query = LiveQuery::new(store.subscribe(), None);
        drop(store);

        assert!(query.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_yields_current_then_changes() {
        let store = MenuStore::in_memory();
        let query = LiveQuery::new(store.subscribe(), None);
        let mut stream = Box::pin(query.into_stream());

        let first = stream.next().await.expect("initial snapshot");
        assert!(first.is_empty());

        store.insert_all(sample_rows()).unwrap();
        let second = stream.next().await.expect("snapshot after insert");
        assert_eq!(second.len(), 2);

        drop(store);
        assert!(stream.next().await.is_none());
    }
}
