//! The post data model shared by every source.
//!
//! Reddit wraps every object in a "thing": `{"kind": "t3", "data": {...}}`.
//! The kind tag decides which [`Post`] variant the payload becomes.  Tags
//! this client does not know about are kept as [`Post::Unrecognized`] so
//! that the rest of the application handles them explicitly instead of
//! losing them during decoding.
//!
//! ## For contributors
//!
//! To support a new kind of thing:
//!
//! 1. Add a payload struct and a [`Post`] variant.
//! 2. Add a match arm in [`Post::from_thing`].
//! 3. Add a row shape in [`crate::rows`]; the compiler will point at every
//!    other match that needs updating.

use serde::Deserialize;

/// Kind tag Reddit uses for comments.
pub const COMMENT_KIND: &str = "t1";
/// Kind tag Reddit uses for links (submissions).
pub const LINK_KIND: &str = "t3";

/// A single feed entry, decoded from a tagged Reddit thing.
#[derive(Debug, Clone, PartialEq)]
pub enum Post {
    /// `t1`
    Comment(Comment),
    /// `t3`
    Link(Link),
    /// Any other tag, or a known tag whose payload failed to decode.
    Unrecognized { kind: String, id: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subreddit: String,
    /// Media preview.  Absent for self posts and for links Reddit has not
    /// generated thumbnails for.
    #[serde(default)]
    pub preview: Option<Preview>,
}

/// Opaque media descriptor attached to a link.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Preview {
    #[serde(default)]
    pub images: Vec<PreviewImage>,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreviewImage {
    pub source: ImageSource,
}

/// Only the size is kept; nothing here renders the image itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageSource {
    pub width: u32,
    pub height: u32,
}

impl Preview {
    /// Dimensions of the first full-size image, if previews are enabled.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        if !self.enabled {
            return None;
        }
        self.images
            .first()
            .map(|image| (image.source.width, image.source.height))
    }
}

/// The raw `{kind, data}` envelope, before the tag is inspected.
#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Post {
    /// Decode a thing by its kind tag.
    ///
    /// Never fails: unknown tags and malformed payloads both come back as
    /// [`Post::Unrecognized`], carrying whatever `id` could be salvaged.
    pub fn from_thing(thing: Thing) -> Self {
        let Thing { kind, data } = thing;
        let decoded = match kind.as_str() {
            COMMENT_KIND => serde_json::from_value(data.clone()).map(Post::Comment),
            LINK_KIND => serde_json::from_value(data.clone()).map(Post::Link),
            _ => {
                tracing::warn!(kind = %kind, "unrecognized post kind");
                return Post::Unrecognized {
                    id: salvage_id(&data),
                    kind,
                };
            }
        };

        decoded.unwrap_or_else(|err| {
            tracing::warn!(kind = %kind, error = %err, "malformed post payload");
            Post::Unrecognized {
                id: salvage_id(&data),
                kind,
            }
        })
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Post::Comment(comment) => Some(&comment.id),
            Post::Link(link) => Some(&link.id),
            Post::Unrecognized { id, .. } => id.as_deref(),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Post::Comment(_) => COMMENT_KIND,
            Post::Link(_) => LINK_KIND,
            Post::Unrecognized { kind, .. } => kind,
        }
    }
}

fn salvage_id(data: &serde_json::Value) -> Option<String> {
    data.get("id").and_then(|id| id.as_str()).map(String::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
