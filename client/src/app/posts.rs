//! Post and comment service
//!
//! Single-shot request/response operations. The only client-side
//! validation is a presence check on the free-text bodies; everything else
//! is the server's call and comes back as a validation error.

use std::sync::Arc;

use crate::domain::entities::{Comment, NewPost, Post, PostId, Session, Tag};
use crate::domain::ports::BlogApi;
use crate::error::ClientError;

pub struct PostService<A: BlogApi> {
    api: Arc<A>,
}

impl<A: BlogApi> PostService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn create(&self, draft: &NewPost, session: &Session) -> Result<Post, ClientError> {
        if draft.body.trim().is_empty() {
            return Err(ClientError::MissingField("body"));
        }
        Ok(self.api.create_post(draft, session).await?)
    }

    pub async fn update(
        &self,
        id: PostId,
        draft: &NewPost,
        session: &Session,
    ) -> Result<Post, ClientError> {
        if draft.body.trim().is_empty() {
            return Err(ClientError::MissingField("body"));
        }
        Ok(self.api.update_post(id, draft, session).await?)
    }

    pub async fn delete(&self, id: PostId, session: &Session) -> Result<(), ClientError> {
        Ok(self.api.delete_post(id, session).await?)
    }

    pub async fn comments(
        &self,
        post: PostId,
        session: Option<&Session>,
    ) -> Result<Vec<Comment>, ClientError> {
        Ok(self.api.list_comments(post, session).await?)
    }

    pub async fn add_comment(
        &self,
        post: PostId,
        body: &str,
        session: &Session,
    ) -> Result<Comment, ClientError> {
        if body.trim().is_empty() {
            return Err(ClientError::MissingField("comment body"));
        }
        Ok(self.api.create_comment(post, body.trim(), session).await?)
    }

    pub async fn tags(&self, session: Option<&Session>) -> Result<Vec<Tag>, ClientError> {
        Ok(self.api.list_tags(session).await?)
    }
}
