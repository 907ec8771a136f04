//! Feed loader collaborator ports
//!
//! The loader needs exactly three capabilities from the outside world: a
//! way to fetch one page of posts, a display to append them to, and a
//! loading indicator to toggle.

use async_trait::async_trait;

use crate::domain::entities::{Post, Session};
use crate::domain::ports::PostPage;
use crate::error::ApiError;

/// The sole networking capability the feed loader needs.
#[async_trait]
pub trait PostListing: Send + Sync {
    async fn fetch_page(
        &self,
        page: u32,
        limit: u32,
        session: Option<&Session>,
    ) -> Result<PostPage, ApiError>;
}

/// Display collaborator: receives posts in server order.
pub trait PostSink: Send + Sync {
    fn append(&self, post: Post);
    fn clear(&self);
}

/// Loading indicator collaborator.
pub trait LoadIndicator: Send + Sync {
    fn set_visible(&self, visible: bool);
}
