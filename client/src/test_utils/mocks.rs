//! Mock implementations of port traits
//!
//! Manual in-memory implementations configured per test. `ScriptedListing`
//! answers the feed loader with a fixed sequence of pages and errors;
//! `InMemoryBlogApi` backs the service tests with real-ish state.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::entities::{
    Author, Comment, CommentId, NewPost, Post, PostId, ProfileUpdate, Registration, Session, Tag,
    User, UserId, UserRef,
};
use crate::domain::ports::{BlogApi, LoadIndicator, PostListing, PostPage, PostSink};
use crate::error::ApiError;

// ============================================================================
// Scripted listing
// ============================================================================

/// Answers `fetch_page` calls from a scripted queue of results.
///
/// With `gated()`, every fetch parks inside the listing until `release()`
/// is called - used to hold a request "in flight" while a test pokes the
/// loader from the outside.
pub struct ScriptedListing {
    responses: Mutex<VecDeque<Result<PostPage, ApiError>>>,
    requested: Mutex<Vec<u32>>,
    gate: Option<Gate>,
}

struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl ScriptedListing {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requested: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn with_page(self, page: PostPage) -> Self {
        self.responses.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn with_error(self, error: ApiError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Gate {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        });
        self
    }

    /// Wait until a fetch has parked inside the listing.
    pub async fn entered(&self) {
        self.gate
            .as_ref()
            .expect("listing is not gated")
            .entered
            .notified()
            .await;
    }

    /// Let the parked fetch complete.
    pub fn release(&self) {
        self.gate
            .as_ref()
            .expect("listing is not gated")
            .release
            .notify_one();
    }

    /// Pages requested so far, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl Default for ScriptedListing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostListing for ScriptedListing {
    async fn fetch_page(
        &self,
        page: u32,
        _limit: u32,
        _session: Option<&Session>,
    ) -> Result<PostPage, ApiError> {
        self.requested.lock().unwrap().push(page);

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::Api {
                    status: 500,
                    message: "no scripted response left".to_string(),
                })
            })
    }
}

// ============================================================================
// Recording sink and indicator
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Append(PostId),
    Clear,
}

/// Records appended posts and the relative order of appends and clears.
#[derive(Default)]
pub struct RecordingSink {
    posts: Mutex<Vec<Post>>,
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl PostSink for RecordingSink {
    fn append(&self, post: Post) {
        self.events.lock().unwrap().push(SinkEvent::Append(post.id));
        self.posts.lock().unwrap().push(post);
    }

    fn clear(&self) {
        self.events.lock().unwrap().push(SinkEvent::Clear);
        self.posts.lock().unwrap().clear();
    }
}

/// Records every visibility toggle.
#[derive(Default)]
pub struct RecordingIndicator {
    states: Mutex<Vec<bool>>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<bool> {
        self.states.lock().unwrap().clone()
    }
}

impl LoadIndicator for RecordingIndicator {
    fn set_visible(&self, visible: bool) {
        self.states.lock().unwrap().push(visible);
    }
}

// ============================================================================
// In-memory blog API
// ============================================================================

struct AccountRecord {
    password: String,
    user: User,
}

/// Full `BlogApi` implementation over in-memory state, for service tests.
#[derive(Default)]
pub struct InMemoryBlogApi {
    accounts: RwLock<HashMap<String, AccountRecord>>,
    posts: RwLock<Vec<Post>>,
    comments: RwLock<HashMap<i64, Vec<Comment>>>,
    tags: RwLock<Vec<Tag>>,
    active_tokens: RwLock<HashSet<String>>,
    next_id: AtomicI64,
}

impl InMemoryBlogApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    /// Pre-populate with an account for testing
    pub fn with_account(self, username: &str, password: &str, user: User) -> Self {
        self.accounts.write().unwrap().insert(
            username.to_string(),
            AccountRecord {
                password: password.to_string(),
                user,
            },
        );
        self
    }

    /// Pre-populate with posts, newest first
    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        *self.posts.write().unwrap() = posts;
        self
    }

    /// Pre-populate with tags
    pub fn with_tags(self, tags: Vec<Tag>) -> Self {
        *self.tags.write().unwrap() = tags;
        self
    }

    /// Shorthand for tests that need an authenticated session.
    pub async fn login_for_test(&self, username: &str, password: &str) -> Session {
        BlogApi::login(self, username, password)
            .await
            .expect("test account should log in")
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn authorize(&self, session: &Session) -> Result<(), ApiError> {
        if self.active_tokens.read().unwrap().contains(&session.token) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    fn find_user_by_id(&self, id: UserId) -> Option<User> {
        self.accounts
            .read()
            .unwrap()
            .values()
            .find(|record| record.user.id == id)
            .map(|record| record.user.clone())
    }

    fn with_live_counters(&self, mut user: User) -> User {
        user.posts_count = self
            .posts
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.author.id == user.id)
            .count() as u32;
        user.comments_count = self
            .comments
            .read()
            .unwrap()
            .values()
            .flatten()
            .filter(|c| c.author.id == user.id)
            .count() as u32;
        user
    }
}

fn author_of(user: &User) -> Author {
    Author {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
        profile_image: user.profile_image.clone(),
    }
}

fn paginate(posts: Vec<Post>, page: u32, limit: u32) -> PostPage {
    let limit = limit.max(1) as usize;
    let total_pages = (posts.len().div_ceil(limit)).max(1) as u32;
    let start = (page.saturating_sub(1) as usize) * limit;
    let slice = posts.into_iter().skip(start).take(limit).collect();

    PostPage {
        posts: slice,
        current_page: page,
        last_page: total_pages,
    }
}

#[async_trait]
impl BlogApi for InMemoryBlogApi {
    async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let user = {
            let accounts = self.accounts.read().unwrap();
            let record = accounts.get(username).ok_or(ApiError::Unauthorized)?;
            if record.password != password {
                return Err(ApiError::Unauthorized);
            }
            record.user.clone()
        };

        let token = format!("token-{}-{}", username, self.next_id());
        self.active_tokens.write().unwrap().insert(token.clone());
        Ok(Session::new(token, user))
    }

    async fn register(&self, registration: &Registration) -> Result<Session, ApiError> {
        {
            let accounts = self.accounts.read().unwrap();
            if accounts.contains_key(&registration.username) {
                return Err(ApiError::Validation(
                    "The username has already been taken.".to_string(),
                ));
            }
        }

        let user = User {
            id: UserId(self.next_id()),
            username: registration.username.clone(),
            name: Some(registration.name.clone()),
            email: Some(registration.email.clone()),
            profile_image: None,
            posts_count: 0,
            comments_count: 0,
        };
        self.accounts.write().unwrap().insert(
            registration.username.clone(),
            AccountRecord {
                password: registration.password.clone(),
                user: user.clone(),
            },
        );

        let token = format!("token-{}-{}", registration.username, self.next_id());
        self.active_tokens.write().unwrap().insert(token.clone());
        Ok(Session::new(token, user))
    }

    async fn logout(&self, session: &Session) -> Result<(), ApiError> {
        if self.active_tokens.write().unwrap().remove(&session.token) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    async fn list_posts(
        &self,
        page: u32,
        limit: u32,
        _session: Option<&Session>,
    ) -> Result<PostPage, ApiError> {
        let posts = self.posts.read().unwrap().clone();
        Ok(paginate(posts, page, limit))
    }

    async fn create_post(&self, draft: &NewPost, session: &Session) -> Result<Post, ApiError> {
        self.authorize(session)?;

        let post = Post {
            id: PostId(self.next_id()),
            title: draft.title.clone(),
            body: draft.body.clone(),
            image: draft
                .image
                .as_ref()
                .map(|i| format!("https://cdn.test/{}", i.file_name)),
            author: author_of(&session.user),
            tags: draft
                .tags
                .iter()
                .map(|name| Tag {
                    name: name.clone(),
                    arabic_name: None,
                })
                .collect(),
            comments_count: 0,
            created_at: Some("just now".to_string()),
        };

        self.posts.write().unwrap().insert(0, post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: PostId,
        draft: &NewPost,
        session: &Session,
    ) -> Result<Post, ApiError> {
        self.authorize(session)?;

        let mut posts = self.posts.write().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))?;
        if post.author.id != session.user.id {
            return Err(ApiError::Api {
                status: 403,
                message: "forbidden".to_string(),
            });
        }

        post.title = draft.title.clone();
        post.body = draft.body.clone();
        if let Some(image) = &draft.image {
            post.image = Some(format!("https://cdn.test/{}", image.file_name));
        }
        post.tags = draft
            .tags
            .iter()
            .map(|name| Tag {
                name: name.clone(),
                arabic_name: None,
            })
            .collect();

        Ok(post.clone())
    }

    async fn delete_post(&self, id: PostId, session: &Session) -> Result<(), ApiError> {
        self.authorize(session)?;

        let mut posts = self.posts.write().unwrap();
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))?;
        if posts[index].author.id != session.user.id {
            return Err(ApiError::Api {
                status: 403,
                message: "forbidden".to_string(),
            });
        }

        posts.remove(index);
        self.comments.write().unwrap().remove(&id.0);
        Ok(())
    }

    async fn list_comments(
        &self,
        post: PostId,
        _session: Option<&Session>,
    ) -> Result<Vec<Comment>, ApiError> {
        if !self.posts.read().unwrap().iter().any(|p| p.id == post) {
            return Err(ApiError::NotFound(format!("post {}", post)));
        }
        Ok(self
            .comments
            .read()
            .unwrap()
            .get(&post.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_comment(
        &self,
        post: PostId,
        body: &str,
        session: &Session,
    ) -> Result<Comment, ApiError> {
        self.authorize(session)?;

        let mut posts = self.posts.write().unwrap();
        let target = posts
            .iter_mut()
            .find(|p| p.id == post)
            .ok_or_else(|| ApiError::NotFound(format!("post {}", post)))?;

        let comment = Comment {
            id: CommentId(self.next_id()),
            body: body.to_string(),
            author: author_of(&session.user),
            created_at: Some("just now".to_string()),
        };
        target.comments_count += 1;
        self.comments
            .write()
            .unwrap()
            .entry(post.0)
            .or_default()
            .push(comment.clone());

        Ok(comment)
    }

    async fn list_tags(&self, _session: Option<&Session>) -> Result<Vec<Tag>, ApiError> {
        Ok(self.tags.read().unwrap().clone())
    }

    async fn get_user(
        &self,
        user: UserRef,
        session: Option<&Session>,
    ) -> Result<User, ApiError> {
        let found = match user {
            UserRef::Me => {
                let session = session.ok_or(ApiError::Unauthorized)?;
                self.find_user_by_id(session.user.id)
                    .unwrap_or_else(|| session.user.clone())
            }
            UserRef::Id(id) => self
                .find_user_by_id(id)
                .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))?,
        };
        Ok(self.with_live_counters(found))
    }

    async fn list_user_posts(
        &self,
        user: UserRef,
        page: u32,
        limit: u32,
        session: Option<&Session>,
    ) -> Result<PostPage, ApiError> {
        let id = match user {
            UserRef::Me => session.ok_or(ApiError::Unauthorized)?.user.id,
            UserRef::Id(id) => id,
        };
        let posts: Vec<Post> = self
            .posts
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.author.id == id)
            .cloned()
            .collect();
        Ok(paginate(posts, page, limit))
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdate,
        session: &Session,
    ) -> Result<User, ApiError> {
        self.authorize(session)?;

        let mut accounts = self.accounts.write().unwrap();
        let old_key = accounts
            .iter()
            .find(|(_, record)| record.user.id == session.user.id)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| ApiError::NotFound(format!("user {}", session.user.id)))?;

        let mut record = accounts.remove(&old_key).expect("record exists");
        record.user.name = Some(update.name.clone());
        record.user.username = update.username.clone();
        if let Some(password) = &update.password {
            record.password = password.clone();
        }
        let user = record.user.clone();
        accounts.insert(update.username.clone(), record);

        Ok(user)
    }
}
