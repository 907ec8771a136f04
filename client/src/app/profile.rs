//! Profile service

use std::sync::Arc;

use crate::domain::entities::{ProfileUpdate, Session, User, UserRef};
use crate::domain::ports::BlogApi;
use crate::error::ClientError;

pub struct ProfileService<A: BlogApi> {
    api: Arc<A>,
}

impl<A: BlogApi> ProfileService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn get(
        &self,
        user: UserRef,
        session: Option<&Session>,
    ) -> Result<User, ClientError> {
        Ok(self.api.get_user(user, session).await?)
    }

    pub async fn update(
        &self,
        update: &ProfileUpdate,
        session: &Session,
    ) -> Result<User, ClientError> {
        if update.name.trim().is_empty() {
            return Err(ClientError::MissingField("name"));
        }
        if update.username.trim().is_empty() {
            return Err(ClientError::MissingField("username"));
        }
        Ok(self.api.update_profile(update, session).await?)
    }
}
