//! Domain ports (traits)
//!
//! Port traits define interfaces the application layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod api;
pub mod feed;

pub use api::{BlogApi, PostPage};
pub use feed::{LoadIndicator, PostListing, PostSink};
