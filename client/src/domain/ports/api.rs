//! Blog API port trait
//!
//! Defines the interface for interacting with the remote blogging API.
//! Read endpoints take an optional session (the server returns public data
//! without one); write endpoints require it.

use async_trait::async_trait;

use crate::domain::entities::{
    Comment, NewPost, Post, PostId, ProfileUpdate, Registration, Session, Tag, User, UserRef,
};
use crate::error::ApiError;

/// One page of posts plus the server-reported pagination bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub current_page: u32,
    pub last_page: u32,
}

#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<Session, ApiError>;

    async fn logout(&self, session: &Session) -> Result<(), ApiError>;

    async fn list_posts(
        &self,
        page: u32,
        limit: u32,
        session: Option<&Session>,
    ) -> Result<PostPage, ApiError>;

    async fn create_post(&self, draft: &NewPost, session: &Session) -> Result<Post, ApiError>;

    async fn update_post(
        &self,
        id: PostId,
        draft: &NewPost,
        session: &Session,
    ) -> Result<Post, ApiError>;

    async fn delete_post(&self, id: PostId, session: &Session) -> Result<(), ApiError>;

    async fn list_comments(
        &self,
        post: PostId,
        session: Option<&Session>,
    ) -> Result<Vec<Comment>, ApiError>;

    async fn create_comment(
        &self,
        post: PostId,
        body: &str,
        session: &Session,
    ) -> Result<Comment, ApiError>;

    async fn list_tags(&self, session: Option<&Session>) -> Result<Vec<Tag>, ApiError>;

    async fn get_user(
        &self,
        user: UserRef,
        session: Option<&Session>,
    ) -> Result<User, ApiError>;

    async fn list_user_posts(
        &self,
        user: UserRef,
        page: u32,
        limit: u32,
        session: Option<&Session>,
    ) -> Result<PostPage, ApiError>;

    async fn update_profile(
        &self,
        update: &ProfileUpdate,
        session: &Session,
    ) -> Result<User, ApiError>;
}
