//! Terminal rendering
//!
//! Renders posts, comments, and profiles as plain text blocks, and hosts
//! the terminal-side implementations of the display and indicator ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDateTime};

use tarmeez_client::domain::entities::{Comment, Post, Tag, User};
use tarmeez_client::domain::ports::{LoadIndicator, PostSink};

/// Render a post card
///
/// `viewer` enables the edit/delete hint on the viewer's own posts.
pub fn render_post(post: &Post, viewer: Option<&User>) -> String {
    let mut buf = String::new();

    buf.push_str(&format!(
        "#{} {} - {}\n",
        post.id,
        post.author.display_name(),
        format_timestamp(post.created_at.as_deref()),
    ));

    if let Some(title) = &post.title {
        buf.push_str(&format!("  {}\n", title));
    }
    buf.push_str(&format!("  {}\n", post.body));

    if let Some(image) = &post.image {
        buf.push_str(&format!("  [image] {}\n", image));
    }

    if !post.tags.is_empty() {
        let tags: Vec<String> = post
            .tags
            .iter()
            .map(|t| format!("#{}", t.display_name()))
            .collect();
        buf.push_str(&format!("  {}\n", tags.join(" ")));
    }

    buf.push_str(&format!("  {} comments", post.comments_count));
    if viewer.map(|u| post.is_authored_by(u)).unwrap_or(false) {
        buf.push_str(&format!(
            "  (yours - `edit {id}` / `delete {id}`)",
            id = post.id
        ));
    }
    buf.push('\n');

    buf
}

/// Render a single comment
pub fn render_comment(comment: &Comment) -> String {
    format!(
        "  {} ({}): {}\n",
        comment.author.display_name(),
        format_timestamp(comment.created_at.as_deref()),
        comment.body,
    )
}

/// Render a profile header
pub fn render_profile(user: &User, is_me: bool) -> String {
    let mut buf = String::new();

    buf.push_str(&format!("{} (@{})\n", user.display_name(), user.username));
    if is_me {
        if let Some(email) = &user.email {
            buf.push_str(&format!("  email: {}\n", email));
        }
    }
    buf.push_str(&format!(
        "  {} posts, {} comments\n",
        user.posts_count, user.comments_count
    ));
    if let Some(avatar) = &user.profile_image {
        buf.push_str(&format!("  [avatar] {}\n", avatar));
    }

    buf
}

/// Render the tag list
pub fn render_tags(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "No tags available.\n".to_string();
    }
    tags.iter()
        .map(|t| format!("#{}\n", t.display_name()))
        .collect()
}

/// Pretty-print a wire timestamp.
///
/// The API answers with either a relative string ("2 hours ago") or an
/// absolute timestamp; relative strings pass through untouched.
fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "just now".to_string();
    };
    if raw.contains("ago") {
        return raw.to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%b %e, %Y %H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.format("%b %e, %Y %H:%M").to_string();
    }
    raw.to_string()
}

/// Display port implementation that prints posts as they arrive.
#[derive(Default)]
pub struct TerminalSink {
    viewer: Mutex<Option<User>>,
    count: AtomicUsize,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logged-in user so their own posts get the edit/delete hint.
    pub fn set_viewer(&self, viewer: Option<User>) {
        *self.viewer.lock().unwrap() = viewer;
    }

    /// Posts shown since the last clear.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl PostSink for TerminalSink {
    fn append(&self, post: Post) {
        let viewer = self.viewer.lock().unwrap();
        println!("{}", render_post(&post, viewer.as_ref()));
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn clear(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

/// Indicator port implementation; progress goes to stderr so the feed on
/// stdout stays clean.
pub struct TerminalIndicator;

impl LoadIndicator for TerminalIndicator {
    fn set_visible(&self, visible: bool) {
        if visible {
            eprintln!("loading...");
        }
    }
}
