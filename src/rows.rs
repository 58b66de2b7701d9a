//! Turning posts into render-ready rows.
//!
//! [`materialize`] is the only entry point.  It is pure and keeps one row per
//! post, in order, so the screen can rebuild its rows wholesale whenever the
//! store publishes a new post list.

use crate::source::{Post, Preview};

/// Stable identity of a row across re-materializations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey(String);

impl RowKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The fields a row exposes to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RowContent {
    Comment {
        body: String,
        subreddit: String,
        author: String,
    },
    Link {
        title: String,
        subreddit: String,
        preview: Option<Preview>,
    },
    /// A post of a kind this client cannot display.  Renders as nothing.
    Placeholder { kind: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: RowKey,
    pub content: RowContent,
}

impl Row {
    /// Placeholders are kept in the row list but never drawn.
    pub fn is_visible(&self) -> bool {
        !matches!(self.content, RowContent::Placeholder { .. })
    }
}

/// Project `posts` into rows, preserving order and length.
pub fn materialize(posts: &[Post]) -> Vec<Row> {
    posts
        .iter()
        .enumerate()
        .map(|(index, post)| {
            let key = match post.id() {
                Some(id) => RowKey(id.to_string()),
                None => RowKey(format!("{}#{index}", post.kind())),
            };

            let content = match post {
                Post::Comment(comment) => RowContent::Comment {
                    body: comment.body.clone(),
                    subreddit: comment.subreddit.clone(),
                    author: comment.author.clone(),
                },
                Post::Link(link) => RowContent::Link {
                    title: link.title.clone(),
                    subreddit: link.subreddit.clone(),
                    preview: link.preview.clone(),
                },
                Post::Unrecognized { kind, .. } => RowContent::Placeholder { kind: kind.clone() },
            };

            Row { key, content }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Comment, Link};

    fn link(id: &str, title: &str) -> Post {
        Post::Link(Link {
            id: id.into(),
            title: title.into(),
            subreddit: "s".into(),
            preview: Some(Preview::default()),
        })
    }

    fn comment(id: &str, body: &str) -> Post {
        Post::Comment(Comment {
            id: id.into(),
            body: body.into(),
            subreddit: "s".into(),
            author: "a".into(),
        })
    }

    fn keys(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn preserves_order_and_exposes_fields() {
        let rows = materialize(&[link("1", "A"), comment("2", "b")]);

        assert_eq!(rows.len(), 2);
        assert_eq!(keys(&rows), ["1", "2"]);
        assert!(matches!(&rows[0].content, RowContent::Link { title, .. } if title == "A"));
        assert!(matches!(
            &rows[1].content,
            RowContent::Comment { body, author, .. } if body == "b" && author == "a"
        ));
    }

    #[test]
    fn link_row_carries_preview() {
        let rows = materialize(&[link("1", "A")]);
        assert!(matches!(
            &rows[0].content,
            RowContent::Link { preview: Some(_), subreddit, .. } if subreddit == "s"
        ));
    }

    #[test]
    fn unrecognized_kind_renders_nothing_without_disturbing_siblings() {
        let posts = vec![
            comment("1", "before"),
            Post::Unrecognized {
                kind: "t5".into(),
                id: Some("x".into()),
            },
            link("2", "after"),
        ];

        let rows = materialize(&posts);

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_visible());
        assert!(!rows[1].is_visible());
        assert!(rows[2].is_visible());

        let visible: Vec<_> = rows.iter().filter(|r| r.is_visible()).collect();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].key.as_str(), "1");
        assert_eq!(visible[1].key.as_str(), "2");
    }

    #[test]
    fn unrecognized_without_id_gets_positional_key() {
        let rows = materialize(&[
            comment("1", "b"),
            Post::Unrecognized {
                kind: "t5".into(),
                id: None,
            },
        ]);
        assert_eq!(rows[1].key.as_str(), "t5#1");
    }

    #[test]
    fn rematerializing_yields_identical_keys() {
        let posts = vec![link("1", "A"), comment("2", "b"), link("3", "C")];
        assert_eq!(keys(&materialize(&posts)), keys(&materialize(&posts)));
        assert_eq!(materialize(&posts), materialize(&posts));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(materialize(&[]).is_empty());
    }
}
