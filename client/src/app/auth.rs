//! Authentication service
//!
//! A plain credential exchange: login and register return an opaque bearer
//! token plus the user record, bundled as a `Session`. Where the session
//! gets cached is the front end's business.

use std::sync::Arc;

use crate::domain::entities::{Registration, Session};
use crate::domain::ports::BlogApi;
use crate::error::ClientError;

pub struct AuthService<A: BlogApi> {
    api: Arc<A>,
}

impl<A: BlogApi> AuthService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        if username.trim().is_empty() {
            return Err(ClientError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(ClientError::MissingField("password"));
        }

        Ok(self.api.login(username.trim(), password).await?)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Session, ClientError> {
        if registration.name.trim().is_empty() {
            return Err(ClientError::MissingField("name"));
        }
        if registration.username.trim().is_empty() {
            return Err(ClientError::MissingField("username"));
        }
        if registration.email.trim().is_empty() {
            return Err(ClientError::MissingField("email"));
        }
        if registration.password.is_empty() {
            return Err(ClientError::MissingField("password"));
        }

        Ok(self.api.register(registration).await?)
    }

    /// Best-effort server-side logout. The caller discards its session
    /// either way, so a failed request only gets logged.
    pub async fn logout(&self, session: &Session) {
        if let Err(e) = self.api.logout(session).await {
            tracing::warn!("logout request failed: {}", e);
        }
    }
}
