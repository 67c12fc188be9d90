//! Local menu cache for offline display and search.
//!
//! `MenuStore` is the persisted table of menu entries, saved as JSON in the
//! cache directory. `CacheManager` fills it from the remote menu exactly
//! once, when it is empty, and serves every read from it afterwards. There
//! is no expiry: once populated, the cached menu is kept for the life of the
//! install.
//!
//! Reads are exposed as `LiveQuery` values that re-emit whenever the table
//! changes.

pub mod error;
pub mod manager;
pub mod query;
pub mod store;

pub use error::{CacheError, StorageError};
pub use manager::{CacheManager, Population};
pub use query::{LiveQuery, MenuFilter};
pub use store::MenuStore;
