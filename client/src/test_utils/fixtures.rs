//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use crate::domain::entities::{Author, Post, PostId, User, UserId};
use crate::domain::ports::PostPage;

/// Create a test author with default values
pub fn test_author(id: i64) -> Author {
    Author {
        id: UserId(id),
        username: format!("user{}", id),
        name: Some(format!("User {}", id)),
        profile_image: None,
    }
}

/// Create a test post with default values
pub fn test_post(id: i64) -> Post {
    test_post_by(id, test_author(1))
}

/// Create a test post with a specific author
pub fn test_post_by(id: i64, author: Author) -> Post {
    Post {
        id: PostId(id),
        title: Some(format!("Post {}", id)),
        body: format!("Body of post {}", id),
        image: None,
        author,
        tags: vec![],
        comments_count: 0,
        created_at: Some("3 hours ago".to_string()),
    }
}

/// Create a test user with default values
pub fn test_user(id: i64, username: &str) -> User {
    User {
        id: UserId(id),
        username: username.to_string(),
        name: Some(format!("{} (test)", username)),
        email: Some(format!("{}@example.com", username)),
        profile_image: None,
        posts_count: 0,
        comments_count: 0,
    }
}

/// Create a page of posts with explicit server-reported bounds
pub fn test_page(posts: Vec<Post>, current_page: u32, last_page: u32) -> PostPage {
    PostPage {
        posts,
        current_page,
        last_page,
    }
}
