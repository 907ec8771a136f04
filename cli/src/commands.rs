//! Command parser for the interactive client
//!
//! Each user action is a named command with typed input, decoupled from
//! how results get rendered.

use thiserror::Error;

use tarmeez_client::domain::entities::{PostId, UserId};

/// Parse error for command input
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Draft content parsed from a `post` or `edit` command
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftArgs {
    pub title: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
    /// Path to an image file, from a trailing `@path` token.
    pub image_path: Option<String>,
}

/// Commands the user can issue
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login {
        username: String,
        password: String,
    },
    Register {
        name: String,
        username: String,
        email: String,
        password: String,
    },
    Logout,

    /// Load the next feed page (the scroll trigger).
    Feed,
    /// Discard the feed and start over from page 1.
    Refresh,

    Post(DraftArgs),
    Edit {
        id: PostId,
        draft: DraftArgs,
    },
    Delete {
        id: PostId,
    },

    /// Show a post's comments.
    Comments {
        id: PostId,
    },
    Comment {
        id: PostId,
        body: String,
    },

    /// View a profile; `None` means the logged-in user.
    Profile {
        user: Option<UserId>,
    },
    Tags,
    UpdateProfile {
        name: String,
        username: String,
        password: Option<String>,
    },

    Help,
    Quit,
}

/// Parse a command from a line of input
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ParseError::UnknownCommand("empty input".to_string()));
    }

    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };
    let command = command.to_lowercase();
    let parts: Vec<&str> = rest.split_whitespace().collect();

    match command.as_str() {
        "login" => {
            if parts.len() < 2 {
                return Err(ParseError::MissingArgument(
                    "login (usage: login <username> <password>)".to_string(),
                ));
            }
            Ok(Command::Login {
                username: parts[0].to_string(),
                password: parts[1].to_string(),
            })
        }

        "register" | "signup" => {
            let (name, remainder) = take_name(rest, "register")?;
            let fields: Vec<&str> = remainder.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(ParseError::MissingArgument(
                    "register (usage: register <name> <username> <email> <password>)".to_string(),
                ));
            }
            Ok(Command::Register {
                name,
                username: fields[0].to_string(),
                email: fields[1].to_string(),
                password: fields[2].to_string(),
            })
        }

        "logout" => Ok(Command::Logout),

        "feed" | "more" | "next" => Ok(Command::Feed),

        "refresh" | "reload" => Ok(Command::Refresh),

        "post" | "publish" => Ok(Command::Post(parse_draft(rest)?)),

        "edit" => {
            if parts.is_empty() {
                return Err(ParseError::MissingArgument(
                    "edit (usage: edit <post-id> \"title\" \"body\" [tags])".to_string(),
                ));
            }
            let id = parse_post_id(parts[0])?;
            let remainder = rest[parts[0].len()..].trim();
            Ok(Command::Edit {
                id,
                draft: parse_draft(remainder)?,
            })
        }

        "delete" | "remove" => {
            if parts.is_empty() {
                return Err(ParseError::MissingArgument("delete".to_string()));
            }
            Ok(Command::Delete {
                id: parse_post_id(parts[0])?,
            })
        }

        "comments" | "view" | "details" => {
            if parts.is_empty() {
                return Err(ParseError::MissingArgument("comments".to_string()));
            }
            Ok(Command::Comments {
                id: parse_post_id(parts[0])?,
            })
        }

        "comment" | "reply" => {
            if parts.len() < 2 {
                return Err(ParseError::MissingArgument(
                    "comment (usage: comment <post-id> <text>)".to_string(),
                ));
            }
            let id = parse_post_id(parts[0])?;
            Ok(Command::Comment {
                id,
                body: parts[1..].join(" "),
            })
        }

        "profile" | "me" => {
            let user = match parts.first() {
                Some(raw) => Some(UserId(raw.parse().map_err(|_| {
                    ParseError::InvalidArgument(format!("'{}' is not a valid user id", raw))
                })?)),
                None => None,
            };
            Ok(Command::Profile { user })
        }

        "tags" => Ok(Command::Tags),

        "update-profile" | "updateprofile" => {
            let (name, remainder) = take_name(rest, "update-profile")?;
            let fields: Vec<&str> = remainder.split_whitespace().collect();
            if fields.is_empty() {
                return Err(ParseError::MissingArgument(
                    "update-profile (usage: update-profile <name> <username> [password])"
                        .to_string(),
                ));
            }
            Ok(Command::UpdateProfile {
                name,
                username: fields[0].to_string(),
                password: fields.get(1).map(|p| p.to_string()),
            })
        }

        "help" | "?" | "commands" => Ok(Command::Help),

        "quit" | "exit" | "q" => Ok(Command::Quit),

        _ => Err(ParseError::UnknownCommand(command)),
    }
}

fn parse_post_id(raw: &str) -> Result<PostId, ParseError> {
    raw.trim_start_matches('#')
        .parse()
        .map(PostId)
        .map_err(|_| ParseError::InvalidArgument(format!("'{}' is not a valid post id", raw)))
}

/// First argument that may be quoted to contain spaces (display names).
fn take_name(rest: &str, command: &str) -> Result<(String, String), ParseError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ParseError::MissingArgument(command.to_string()));
    }
    if rest.starts_with('"') {
        let (name, remainder) = take_quoted(rest)?;
        Ok((name, remainder.trim().to_string()))
    } else {
        match rest.split_once(char::is_whitespace) {
            Some((name, remainder)) => Ok((name.to_string(), remainder.trim().to_string())),
            None => Ok((rest.to_string(), String::new())),
        }
    }
}

/// Consume a leading double-quoted string, returning it and the remainder.
fn take_quoted(input: &str) -> Result<(String, &str), ParseError> {
    for (i, c) in input.char_indices().skip(1) {
        if c == '"' {
            return Ok((input[1..i].to_string(), &input[i + 1..]));
        }
    }
    Err(ParseError::InvalidArgument(
        "unterminated quoted string".to_string(),
    ))
}

/// Parse draft arguments for `post` and `edit`.
///
/// Accepted shapes:
/// - `<body text...>` - everything is the body
/// - `"body"` - quoted body, no title
/// - `"title" "body"` - both
/// Either quoted shape may be followed by a comma-separated tags token
/// and/or an `@path` image token.
fn parse_draft(input: &str) -> Result<DraftArgs, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::MissingArgument(
            "post body (usage: post \"title\" \"body\" [tags] [@image])".to_string(),
        ));
    }

    if !input.starts_with('"') {
        return Ok(DraftArgs {
            title: None,
            body: input.to_string(),
            ..Default::default()
        });
    }

    let (first, rest) = take_quoted(input)?;
    let rest = rest.trim();

    if rest.starts_with('"') {
        let (body, tail) = take_quoted(rest)?;
        let (tags, image_path) = parse_trailing(tail)?;
        Ok(DraftArgs {
            title: Some(first),
            body,
            tags,
            image_path,
        })
    } else {
        let (tags, image_path) = parse_trailing(rest)?;
        Ok(DraftArgs {
            title: None,
            body: first,
            tags,
            image_path,
        })
    }
}

/// Trailing draft tokens: `tag1,tag2` and/or `@path/to/image.png`.
fn parse_trailing(tail: &str) -> Result<(Vec<String>, Option<String>), ParseError> {
    let mut tags = Vec::new();
    let mut image_path = None;

    for token in tail.split_whitespace() {
        if let Some(path) = token.strip_prefix('@') {
            if image_path.is_some() {
                return Err(ParseError::InvalidArgument(
                    "only one @image token is allowed".to_string(),
                ));
            }
            image_path = Some(path.to_string());
        } else if tags.is_empty() {
            tags = token
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        } else {
            return Err(ParseError::InvalidArgument(format!(
                "unexpected argument '{}'",
                token
            )));
        }
    }

    Ok((tags, image_path))
}

/// Generate help text for available commands
pub fn help_text() -> String {
    r#"# Available Commands

## Account
- `login <username> <password>` - Sign in
- `register <name> <username> <email> <password>` - Create an account
  (quote the name if it contains spaces: `register "Sara K" sara ...`)
- `logout` - Sign out and forget the cached session
- `update-profile <name> <username> [password]` - Edit your profile

## Feed
- `feed` - Load the next page of posts
- `refresh` - Discard the feed and reload from the start

## Posts
- `post <text>` - Publish a post (everything after `post` is the body)
- `post "title" "body" [tag1,tag2] [@image.png]` - Publish with extras
- `edit <post-id> "title" "body" [tags]` - Edit one of your posts
- `delete <post-id>` - Delete one of your posts

## Comments
- `comments <post-id>` - Show a post's comments
- `comment <post-id> <text>` - Add a comment

## Other
- `profile [user-id]` - View a profile (yours when no id is given)
- `tags` - List available tags
- `help` - Show this help message
- `quit` - Exit
"#
    .to_string()
}
