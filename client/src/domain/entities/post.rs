//! Post domain entity
//!
//! A post as returned by the listing endpoints, plus the draft type used
//! to create or edit one. Posts are immutable once fetched; an edit or
//! delete goes through the server and the feed is re-fetched.

use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Unique identifier for a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub i64);

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author block embedded in posts and comments
///
/// A lighter view of a user than the profile endpoints return - no email,
/// no counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

impl Author {
    /// Name shown in the UI: real name when present, else the handle.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// A tag attached to a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub arabic_name: Option<String>,
}

impl Tag {
    /// The Arabic name is preferred for display when the API provides one.
    pub fn display_name(&self) -> &str {
        self.arabic_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// A published post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: Option<String>,
    pub body: String,
    /// Image URL, when the post has one.
    pub image: Option<String>,
    pub author: Author,
    pub tags: Vec<Tag>,
    pub comments_count: u32,
    /// Wire timestamp - either RFC 3339 or a relative "2 hours ago" string.
    pub created_at: Option<String>,
}

impl Post {
    /// Whether `user` may edit or delete this post.
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.id == user.id
    }
}

/// An image attachment uploaded with a post draft
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Draft content for creating or editing a post
///
/// `body` is the only required field; presence is checked by the service
/// before any request is issued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub title: Option<String>,
    pub body: String,
    pub image: Option<ImageUpload>,
    pub tags: Vec<String>,
}
