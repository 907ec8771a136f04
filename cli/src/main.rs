//! Tarmeez terminal client
//!
//! An interactive line-oriented front end for the Tarmeez blogging API:
//! parse a command, dispatch it to the client services, render the result
//! as text. The feed loads incrementally - each `feed` command pulls the
//! next page.

mod commands;
mod render;
mod store;

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use tarmeez_client::app::{
    AuthService, FeedLoader, FeedScope, PostService, ProfileService, ScopedListing,
};
use tarmeez_client::domain::entities::{
    ImageUpload, NewPost, ProfileUpdate, Registration, Session, UserRef,
};
use tarmeez_client::{Config, FeedOutcome, HttpBlogApi};

use commands::{help_text, parse_command, Command, DraftArgs};
use render::{render_comment, render_profile, render_tags, TerminalIndicator, TerminalSink};
use store::SessionStore;

type HomeFeed = FeedLoader<ScopedListing<HttpBlogApi>, TerminalSink, TerminalIndicator>;

struct App {
    api: Arc<HttpBlogApi>,
    auth: AuthService<HttpBlogApi>,
    posts: PostService<HttpBlogApi>,
    profiles: ProfileService<HttpBlogApi>,
    feed: HomeFeed,
    sink: Arc<TerminalSink>,
    store: SessionStore,
    session: Option<Session>,
    page_size: u32,
}

impl App {
    fn new(config: Config) -> Self {
        let api = Arc::new(HttpBlogApi::from_config(&config));
        let sink = Arc::new(TerminalSink::new());
        let feed = FeedLoader::new(
            Arc::new(ScopedListing::new(api.clone(), FeedScope::Home)),
            sink.clone(),
            Arc::new(TerminalIndicator),
            config.page_size,
        );

        let store = SessionStore::from_env();
        let session = store.load();
        sink.set_viewer(session.as_ref().map(|s| s.user.clone()));

        Self {
            auth: AuthService::new(api.clone()),
            posts: PostService::new(api.clone()),
            profiles: ProfileService::new(api.clone()),
            api,
            feed,
            sink,
            store,
            session,
            page_size: config.page_size,
        }
    }

    async fn startup(&self) {
        println!("Tarmeez terminal client - type `help` for commands.");
        if let Some(session) = &self.session {
            println!("Welcome back, {}.", session.user.display_name());
        }
        self.load_feed(false).await;
    }

    async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { username, password } => {
                let session = self.auth.login(&username, &password).await?;
                self.store.save(&session)?;
                self.sink.set_viewer(Some(session.user.clone()));
                println!("Logged in as {}.", session.user.display_name());
                self.session = Some(session);
                self.load_feed(true).await;
            }

            Command::Register {
                name,
                username,
                email,
                password,
            } => {
                let session = self
                    .auth
                    .register(&Registration {
                        name,
                        username,
                        email,
                        password,
                    })
                    .await?;
                self.store.save(&session)?;
                self.sink.set_viewer(Some(session.user.clone()));
                println!("Account created - logged in as {}.", session.user.display_name());
                self.session = Some(session);
                self.load_feed(true).await;
            }

            Command::Logout => {
                if let Some(session) = self.session.take() {
                    self.auth.logout(&session).await;
                }
                self.store.clear()?;
                self.sink.set_viewer(None);
                println!("Logged out.");
            }

            Command::Feed => self.load_feed(false).await,

            Command::Refresh => self.load_feed(true).await,

            Command::Post(args) => {
                let session = self.require_session()?.clone();
                let draft = build_draft(args)?;
                let post = self.posts.create(&draft, &session).await?;
                println!("Published post #{}.", post.id);
                self.load_feed(true).await;
            }

            Command::Edit { id, draft } => {
                let session = self.require_session()?.clone();
                let draft = build_draft(draft)?;
                let post = self.posts.update(id, &draft, &session).await?;
                println!("Updated post #{}.", post.id);
                self.load_feed(true).await;
            }

            Command::Delete { id } => {
                let session = self.require_session()?.clone();
                self.posts.delete(id, &session).await?;
                println!("Deleted post #{}.", id);
                self.load_feed(true).await;
            }

            Command::Comments { id } => {
                let comments = self.posts.comments(id, self.session.as_ref()).await?;
                if comments.is_empty() {
                    println!("No comments yet on post #{}.", id);
                } else {
                    println!("Comments on post #{}:", id);
                    for comment in &comments {
                        print!("{}", render_comment(comment));
                    }
                }
            }

            Command::Comment { id, body } => {
                let session = self.require_session()?.clone();
                self.posts.add_comment(id, &body, &session).await?;
                // Re-fetch rather than append locally, so the listing shows
                // what the server actually stored.
                let comments = self.posts.comments(id, Some(&session)).await?;
                println!("Comments on post #{}:", id);
                for comment in &comments {
                    print!("{}", render_comment(comment));
                }
            }

            Command::Profile { user } => {
                let target = match user {
                    Some(id) => UserRef::Id(id),
                    None => UserRef::Me,
                };
                let profile = self.profiles.get(target, self.session.as_ref()).await?;
                let is_me = self
                    .session
                    .as_ref()
                    .map(|s| s.user.id == profile.id)
                    .unwrap_or(false);
                println!("{}", render_profile(&profile, is_me));

                // First page of the user's posts, through a user-scoped
                // loader.
                let listing = Arc::new(ScopedListing::new(
                    self.api.clone(),
                    FeedScope::User(UserRef::Id(profile.id)),
                ));
                let loader = FeedLoader::new(
                    listing,
                    self.sink.clone(),
                    Arc::new(TerminalIndicator),
                    self.page_size,
                );
                match loader.load_next_page(self.session.as_ref(), false).await {
                    Ok(FeedOutcome::Empty) => println!("No posts from this user yet."),
                    Ok(_) => {}
                    Err(e) => println!("Failed to load this user's posts: {}", e),
                }
            }

            Command::Tags => match self.posts.tags(self.session.as_ref()).await {
                Ok(tags) => print!("{}", render_tags(&tags)),
                Err(e) => println!("Could not load tags: {}", e),
            },

            Command::UpdateProfile {
                name,
                username,
                password,
            } => {
                let session = self.require_session()?.clone();
                let updated = self
                    .profiles
                    .update(
                        &ProfileUpdate {
                            name,
                            username,
                            password,
                        },
                        &session,
                    )
                    .await?;
                // Token is unchanged; refresh the cached user record.
                let session = Session::new(session.token, updated);
                self.store.save(&session)?;
                self.sink.set_viewer(Some(session.user.clone()));
                println!("Profile updated.");
                self.session = Some(session);
            }

            Command::Help => println!("{}", help_text()),

            // Handled by the input loop.
            Command::Quit => {}
        }

        Ok(())
    }

    async fn load_feed(&self, reset: bool) {
        match self.feed.load_next_page(self.session.as_ref(), reset).await {
            Ok(FeedOutcome::Appended { .. }) => {
                if self.feed.has_more() {
                    println!("-- `feed` loads the next page --");
                } else {
                    println!("-- end of feed ({} posts) --", self.sink.count());
                }
            }
            Ok(FeedOutcome::Empty) => println!("No posts yet."),
            Ok(FeedOutcome::Skipped) => {
                if self.feed.has_more() {
                    println!("A page is already loading.");
                } else {
                    println!("-- end of feed -- (`refresh` starts over)");
                }
            }
            Err(e) if e.is_initial() => println!("Failed to load the feed: {}", e),
            Err(e) => println!("Failed to load more posts: {} (retry with `feed`)", e),
        }
    }

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().context("please `login` first")
    }
}

/// Turn parsed draft arguments into a `NewPost`, reading the image file if
/// one was given.
fn build_draft(args: DraftArgs) -> Result<NewPost> {
    let image = match args.image_path {
        Some(path) => {
            let bytes =
                fs::read(&path).with_context(|| format!("could not read image '{}'", path))?;
            let file_name = Path::new(&path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.bin")
                .to_string();
            Some(ImageUpload { file_name, bytes })
        }
        None => None,
    };

    Ok(NewPost {
        title: args.title,
        body: args.body,
        image,
        tags: args.tags,
    })
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the rendered feed.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let mut app = App::new(config);
    app.startup().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Err(e) = app.run(command).await {
                    println!("error: {:#}", e);
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
