use std::path::PathBuf;

use thiserror::Error;

use crate::api::FetchError;

/// Failure reading or writing the local menu table.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode menu cache: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Menu entry {0} is already cached")]
    DuplicateId(i64),

    #[error("Menu cache lock poisoned")]
    Poisoned,
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure while populating the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
