//! Remote user-record store.
//!
//! DESIGN
//! ======
//! The session manager only needs two queries: a single-row lookup by
//! username and a one-row insert. `UserStore` is that seam; `RestUserStore`
//! speaks PostgREST over HTTP and `MemoryUserStore` keeps rows in process.

pub mod memory;
pub mod rest;

pub use memory::MemoryUserStore;
pub use rest::RestUserStore;

use crate::user::{NewUser, UserRecord};

/// Errors produced by user-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("store request failed: {0}")]
    Request(String),

    /// The store returned a non-success HTTP status.
    #[error("store response error: status {status}")]
    Response { status: u16, body: String },

    /// The store rejected an insert because a unique constraint was violated.
    #[error("store conflict: {0}")]
    Conflict(String),

    /// The response body could not be deserialized.
    #[error("store response parse failed: {0}")]
    Parse(String),

    /// A single-row lookup matched more than one row.
    #[error("expected at most one row, got {0}")]
    Ambiguous(usize),
}

impl StoreError {
    /// True when the store was never reached or never answered.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::HttpClientBuild(_))
    }
}

/// Lookup and insert against the `users` collection.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the single record whose `username` equals `username`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails, the response is
    /// malformed, or more than one row matches.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new record and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or the store rejects
    /// the row.
    async fn insert(&self, user: &NewUser) -> Result<UserRecord, StoreError>;
}
