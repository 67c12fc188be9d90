//! Remote menu source.
//!
//! This module provides the `ApiClient` that downloads the Little Lemon
//! menu document, and the `MenuSource` trait the cache depends on so the
//! network can be swapped out.
//!
//! The endpoint is unauthenticated and serves a single JSON document.

pub mod client;
pub mod error;
pub mod source;

pub use client::ApiClient;
pub use error::FetchError;
pub use source::MenuSource;
