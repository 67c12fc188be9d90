//! Data models for the Little Lemon menu.
//!
//! - `MenuEntry`: a menu item as stored in the local cache
//! - `MenuEntryNetwork`, `MenuDocument`: the wire format served by the menu endpoint

pub mod menu;

pub use menu::{MenuDocument, MenuEntry, MenuEntryNetwork};
