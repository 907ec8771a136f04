//! Tarmeez API client
//!
//! A typed client for the Tarmeez Academy blogging API: authentication,
//! an incrementally loaded post feed, post and comment CRUD, and user
//! profiles. Uses hexagonal (ports & adapters) architecture so the feed
//! loader and services stay independent of the HTTP layer.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;

pub use adapters::HttpBlogApi;
pub use app::{AuthService, FeedLoader, FeedOutcome, FeedScope, PostService, ProfileService, ScopedListing};
pub use config::Config;
pub use error::{ApiError, ClientError, FeedError};
