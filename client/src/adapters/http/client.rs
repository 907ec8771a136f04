//! Tarmeez API client implementation

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart;
use reqwest::{Client, Method};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entities::{
    Author, Comment, CommentId, NewPost, Post, PostId, ProfileUpdate, Registration, Session, Tag,
    User, UserId, UserRef,
};
use crate::domain::ports::{BlogApi, PostPage};
use crate::error::{ApiError, ValidationBody};

/// Implementation of the blog API client
pub struct HttpBlogApi {
    http: Client,
    base_url: String,
}

impl HttpBlogApi {
    /// `base_url` is the full API root, e.g. `https://tarmeezacademy.com/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
    ) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.api_url(path))
            .header(ACCEPT, "application/json");
        if let Some(session) = session {
            builder = builder.header(AUTHORIZATION, session.bearer());
        }
        builder
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

/// Map a non-2xx response to an `ApiError`.
async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    match status {
        401 => ApiError::Unauthorized,
        422 => validation_error(&message),
        _ => ApiError::Api { status, message },
    }
}

/// Flatten a 422 body into a single validation message.
fn validation_error(body: &str) -> ApiError {
    match serde_json::from_str::<ValidationBody>(body) {
        Ok(parsed) => ApiError::Validation(parsed.flatten()),
        Err(_) => ApiError::Api {
            status: 422,
            message: body.to_string(),
        },
    }
}

/// Helper to deserialize null as default (empty vec, empty string, etc.)
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// The API sends image fields as either a URL string or an empty array when
/// unset; anything non-string collapses to `None`, and strings are trimmed.
fn deserialize_flexible_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    })
}

/// Request types for the Tarmeez API
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct UpdateProfileRequest<'a> {
    name: &'a str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

/// Response types from the Tarmeez API
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct PageMetaDto {
    current_page: u32,
    last_page: u32,
}

#[derive(Deserialize)]
struct PagedResponse {
    data: Vec<PostDto>,
    meta: PageMetaDto,
}

impl From<PagedResponse> for PostPage {
    fn from(r: PagedResponse) -> Self {
        PostPage {
            posts: r.data.into_iter().map(Into::into).collect(),
            current_page: r.meta.current_page,
            last_page: r.meta.last_page,
        }
    }
}

#[derive(Deserialize)]
struct AuthResponse {
    user: UserDto,
    token: String,
}

#[derive(Deserialize)]
struct AuthorDto {
    id: i64,
    username: String,
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_url")]
    profile_image: Option<String>,
}

impl From<AuthorDto> for Author {
    fn from(r: AuthorDto) -> Self {
        Author {
            id: UserId(r.id),
            username: r.username,
            name: r.name,
            profile_image: r.profile_image,
        }
    }
}

#[derive(Deserialize)]
struct TagDto {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    name: String,
    arabic_name: Option<String>,
}

impl From<TagDto> for Tag {
    fn from(r: TagDto) -> Self {
        Tag {
            name: r.name,
            arabic_name: r.arabic_name,
        }
    }
}

#[derive(Deserialize)]
struct PostDto {
    id: i64,
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    body: String,
    #[serde(default, deserialize_with = "deserialize_flexible_url")]
    image: Option<String>,
    author: AuthorDto,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    tags: Vec<TagDto>,
    #[serde(default)]
    comments_count: u32,
    created_at: Option<String>,
}

impl From<PostDto> for Post {
    fn from(r: PostDto) -> Self {
        Post {
            id: PostId(r.id),
            title: r.title,
            body: r.body,
            image: r.image,
            author: r.author.into(),
            tags: r.tags.into_iter().map(Into::into).collect(),
            comments_count: r.comments_count,
            created_at: r.created_at,
        }
    }
}

#[derive(Deserialize)]
struct CommentDto {
    id: i64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    body: String,
    author: AuthorDto,
    created_at: Option<String>,
}

impl From<CommentDto> for Comment {
    fn from(r: CommentDto) -> Self {
        Comment {
            id: CommentId(r.id),
            body: r.body,
            author: r.author.into(),
            created_at: r.created_at,
        }
    }
}

#[derive(Deserialize)]
struct UserDto {
    id: i64,
    username: String,
    name: Option<String>,
    email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_url")]
    profile_image: Option<String>,
    #[serde(default)]
    posts_count: u32,
    #[serde(default)]
    comments_count: u32,
}

impl From<UserDto> for User {
    fn from(r: UserDto) -> Self {
        User {
            id: UserId(r.id),
            username: r.username,
            name: r.name,
            email: r.email,
            profile_image: r.profile_image,
            posts_count: r.posts_count,
            comments_count: r.comments_count,
        }
    }
}

/// The profile endpoints answer with `{ "data": user }`, but some payloads
/// come back as a bare user object. Accept both.
fn parse_user_body(body: &str) -> Result<User, ApiError> {
    if let Ok(envelope) = serde_json::from_str::<Envelope<UserDto>>(body) {
        return Ok(envelope.data.into());
    }
    serde_json::from_str::<UserDto>(body)
        .map(Into::into)
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Build the multipart form shared by create and update.
///
/// The API takes post content as form-data: optional `title`, required
/// `body`, optional `image` file, repeated `tags[]` entries.
fn post_form(draft: &NewPost) -> multipart::Form {
    let mut form = multipart::Form::new().text("body", draft.body.clone());
    if let Some(title) = &draft.title {
        form = form.text("title", title.clone());
    }
    if let Some(image) = &draft.image {
        let part = multipart::Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        form = form.part("image", part);
    }
    for tag in &draft.tags {
        form = form.text("tags[]", tag.clone());
    }
    form
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let resp = self
            .request(Method::POST, "/login", None)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let auth: AuthResponse = self.handle_response(resp).await?;
        Ok(Session::new(auth.token, auth.user.into()))
    }

    async fn register(&self, registration: &Registration) -> Result<Session, ApiError> {
        let resp = self
            .request(Method::POST, "/register", None)
            .json(&RegisterRequest {
                name: &registration.name,
                username: &registration.username,
                email: &registration.email,
                password: &registration.password,
            })
            .send()
            .await?;

        let auth: AuthResponse = self.handle_response(resp).await?;
        Ok(Session::new(auth.token, auth.user.into()))
    }

    async fn logout(&self, session: &Session) -> Result<(), ApiError> {
        let resp = self
            .request(Method::POST, "/logout", Some(session))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }

    async fn list_posts(
        &self,
        page: u32,
        limit: u32,
        session: Option<&Session>,
    ) -> Result<PostPage, ApiError> {
        tracing::debug!("list_posts: page {} limit {}", page, limit);

        let resp = self
            .request(Method::GET, "/posts", session)
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;

        let paged: PagedResponse = self.handle_response(resp).await?;
        Ok(paged.into())
    }

    async fn create_post(&self, draft: &NewPost, session: &Session) -> Result<Post, ApiError> {
        let resp = self
            .request(Method::POST, "/posts", Some(session))
            .multipart(post_form(draft))
            .send()
            .await?;

        let created: Envelope<PostDto> = self.handle_response(resp).await?;
        Ok(created.data.into())
    }

    async fn update_post(
        &self,
        id: PostId,
        draft: &NewPost,
        session: &Session,
    ) -> Result<Post, ApiError> {
        // Laravel form-method spoofing: multipart POST with _method=PUT.
        let resp = self
            .request(Method::POST, &format!("/posts/{}", id), Some(session))
            .query(&[("_method", "PUT")])
            .multipart(post_form(draft))
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("post {}", id)));
        }

        let updated: Envelope<PostDto> = self.handle_response(resp).await?;
        Ok(updated.data.into())
    }

    async fn delete_post(&self, id: PostId, session: &Session) -> Result<(), ApiError> {
        let resp = self
            .request(Method::DELETE, &format!("/posts/{}", id), Some(session))
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("post {}", id)));
        }

        self.handle_empty_response(resp).await
    }

    async fn list_comments(
        &self,
        post: PostId,
        session: Option<&Session>,
    ) -> Result<Vec<Comment>, ApiError> {
        let resp = self
            .request(Method::GET, &format!("/posts/{}/comments", post), session)
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("post {}", post)));
        }

        let comments: Envelope<Vec<CommentDto>> = self.handle_response(resp).await?;
        Ok(comments.data.into_iter().map(Into::into).collect())
    }

    async fn create_comment(
        &self,
        post: PostId,
        body: &str,
        session: &Session,
    ) -> Result<Comment, ApiError> {
        let resp = self
            .request(
                Method::POST,
                &format!("/posts/{}/comments", post),
                Some(session),
            )
            .json(&CreateCommentRequest { body })
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("post {}", post)));
        }

        let created: Envelope<CommentDto> = self.handle_response(resp).await?;
        Ok(created.data.into())
    }

    async fn list_tags(&self, session: Option<&Session>) -> Result<Vec<Tag>, ApiError> {
        let resp = self.request(Method::GET, "/tags", session).send().await?;

        let tags: Envelope<Vec<TagDto>> = self.handle_response(resp).await?;
        Ok(tags.data.into_iter().map(Into::into).collect())
    }

    async fn get_user(
        &self,
        user: UserRef,
        session: Option<&Session>,
    ) -> Result<User, ApiError> {
        let resp = self
            .request(
                Method::GET,
                &format!("/users/{}", user.path_segment()),
                session,
            )
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("user {}", user.path_segment())));
        }
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let body = resp.text().await?;
        parse_user_body(&body)
    }

    async fn list_user_posts(
        &self,
        user: UserRef,
        page: u32,
        limit: u32,
        session: Option<&Session>,
    ) -> Result<PostPage, ApiError> {
        tracing::debug!(
            "list_user_posts: user {} page {} limit {}",
            user.path_segment(),
            page,
            limit
        );

        let resp = self
            .request(
                Method::GET,
                &format!("/users/{}/posts", user.path_segment()),
                session,
            )
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("user {}", user.path_segment())));
        }

        let paged: PagedResponse = self.handle_response(resp).await?;
        Ok(paged.into())
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdate,
        session: &Session,
    ) -> Result<User, ApiError> {
        // The remote route really is spelled this way.
        let resp = self
            .request(Method::PUT, "/updatePorfile", Some(session))
            .json(&UpdateProfileRequest {
                name: &update.name,
                username: &update.username,
                password: update.password.as_deref(),
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let body = resp.text().await?;
        parse_user_body(&body)
    }
}
