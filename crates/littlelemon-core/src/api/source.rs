use std::future::Future;

use super::FetchError;
use crate::models::MenuEntryNetwork;

/// Anything that can produce the remote menu.
pub trait MenuSource: Send + Sync {
    /// Fetch the full menu, in document order.
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<MenuEntryNetwork>, FetchError>> + Send;
}
