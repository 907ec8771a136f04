//! Application layer
//!
//! The feed loader plus thin services coordinating the domain ports.

pub mod auth;
pub mod feed_loader;
pub mod posts;
pub mod profile;

pub use auth::AuthService;
pub use feed_loader::{FeedLoader, FeedOutcome, FeedScope, PageCursor, ScopedListing};
pub use posts::PostService;
pub use profile::ProfileService;
