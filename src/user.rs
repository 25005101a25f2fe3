//! User records as stored remotely and as held in the local session.
//!
//! DESIGN
//! ======
//! The store row (`UserRecord`) carries the plaintext password column; the
//! session value (`User`) never does. Converting a record into a `User` is
//! the only way a session user is built, so the password cannot leak into the
//! persisted snapshot.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Closed set of account roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    /// Wire name of the role (`"admin"` or `"staff"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            other => Err(format!("unknown role '{other}' (expected 'admin' or 'staff')")),
        }
    }
}

/// The authenticated user held by a session and mirrored to local storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unique login handle.
    pub username: String,
    pub role: Role,
    /// Insert timestamp assigned by the store.
    pub created_at: String,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Parse a persisted snapshot, rejecting values that break the session
    /// invariant (empty username).
    ///
    /// # Errors
    ///
    /// Returns a serde error if the JSON is malformed, has the wrong shape,
    /// carries an unknown role, or has an empty username.
    pub fn from_snapshot(raw: &str) -> Result<Self, serde_json::Error> {
        let user: Self = serde_json::from_str(raw)?;
        if user.username.is_empty() {
            return Err(serde_json::Error::custom("snapshot has empty username"));
        }
        Ok(user)
    }
}

/// A full row from the remote `users` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: Role,
    /// Stored as plaintext by the remote table.
    pub password: String,
    pub created_at: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            username: record.username,
            role: record.role,
            created_at: record.created_at,
        }
    }
}

/// Signup payload inserted into the remote table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Accept either a JSON string or an integer id and carry it as a string.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(number) if number.is_i64() || number.is_u64() => Ok(number.to_string()),
        _ => Err(D::Error::custom("expected string or integer id")),
    }
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
