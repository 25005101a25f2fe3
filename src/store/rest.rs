//! PostgREST client for the remote `users` table.
//!
//! Thin HTTP wrapper over `/rest/v1/{table}`. Response handling lives in pure
//! functions (`parse_single_row`, `parse_inserted_row`, `classify_status`) so
//! it can be tested without a server.

use std::time::Duration;

use super::{StoreError, UserStore};
use crate::config::StoreConfig;
use crate::user::{NewUser, UserRecord};

const REST_PREFIX: &str = "rest/v1";
/// Fetch one extra row so a duplicate username is detectable.
const SINGLE_ROW_LIMIT: &str = "2";

// =============================================================================
// CLIENT
// =============================================================================

pub struct RestUserStore {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RestUserStore {
    /// Build a client for the configured project and table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: table_endpoint(&config.url, &config.users_table), api_key: config.api_key.clone() })
    }

    /// Full URL of the users table endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http
            .request(method, &self.endpoint)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<(u16, String), StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Ok((status, text))
    }
}

#[async_trait::async_trait]
impl UserStore for RestUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let builder = self.request(reqwest::Method::GET).query(&[
            ("username", format!("eq.{username}").as_str()),
            ("select", "*"),
            ("limit", SINGLE_ROW_LIMIT),
        ]);
        let (status, body) = self.send(builder).await?;
        classify_status(status, &body)?;
        parse_single_row(&body)
    }

    async fn insert(&self, user: &NewUser) -> Result<UserRecord, StoreError> {
        let builder = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(user);
        let (status, body) = self.send(builder).await?;
        classify_status(status, &body)?;
        parse_inserted_row(&body)
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

pub(crate) fn table_endpoint(base_url: &str, table: &str) -> String {
    format!("{}/{REST_PREFIX}/{table}", base_url.trim_end_matches('/'))
}

/// Map a non-success HTTP status to a [`StoreError`]. 409 is a constraint
/// conflict (e.g. a unique index on `username`).
pub(crate) fn classify_status(status: u16, body: &str) -> Result<(), StoreError> {
    match status {
        200..=299 => Ok(()),
        409 => Err(StoreError::Conflict(body.to_owned())),
        _ => Err(StoreError::Response { status, body: body.to_owned() }),
    }
}

/// Parse a row array that should hold zero or one record.
pub(crate) fn parse_single_row(body: &str) -> Result<Option<UserRecord>, StoreError> {
    let mut rows: Vec<UserRecord> = serde_json::from_str(body).map_err(|e| StoreError::Parse(e.to_string()))?;
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(StoreError::Ambiguous(n)),
    }
}

/// Parse the representation returned by an insert: an array whose first row
/// is the created record.
pub(crate) fn parse_inserted_row(body: &str) -> Result<UserRecord, StoreError> {
    let rows: Vec<UserRecord> = serde_json::from_str(body).map_err(|e| StoreError::Parse(e.to_string()))?;
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::Parse("insert returned no rows".to_owned()))
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
