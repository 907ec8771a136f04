//! User domain entity
//!
//! Represents an account on the platform, as returned by the auth and
//! profile endpoints.

use serde::{Deserialize, Serialize};

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user account with profile counters
///
/// `email` is only present when viewing your own profile; the counters are
/// zero on payloads that omit them (e.g. the login response).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub posts_count: u32,
    #[serde(default)]
    pub comments_count: u32,
}

impl User {
    /// Name shown in the UI: real name when present, else the handle.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Profile selector for the users endpoints
///
/// The API accepts a literal `me` segment in place of a user id; this sum
/// type keeps the two cases explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRef {
    /// The authenticated user (`/users/me`)
    Me,
    /// A user by id (`/users/{id}`)
    Id(UserId),
}

impl UserRef {
    /// Path segment used by the users endpoints.
    pub fn path_segment(&self) -> String {
        match self {
            UserRef::Me => "me".to_string(),
            UserRef::Id(id) => id.to_string(),
        }
    }
}

/// Data needed to register a new account
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Changes submitted by the edit-profile form
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub username: String,
    /// Left `None` to keep the current password.
    pub password: Option<String>,
}
