//! Feed state and the reducer that updates it.
//!
//! [`FeedState`] is an immutable snapshot.  The only way to change it is to
//! feed an [`Action`] through [`FeedState::reduce`], which returns the next
//! snapshot.  The post list lives behind an [`Arc`], so consumers detect a
//! new list with [`Arc::ptr_eq`] instead of comparing contents.
//!
//! ## Request generations
//!
//! Every dispatched fetch carries a request id that increases monotonically.
//! The reducer remembers the newest id it has seen requested and drops
//! completions from older requests, so a slow fetch cannot overwrite the
//! result of a newer refresh.
//!
//! A rejected token is handled the same way: the rejection names the request
//! and the token it was sent with, and only clears the session when both are
//! still current.  Logging in again while an old request is in flight must
//! not be undone by that request's 401.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::session::Token;
use crate::source::Post;

/// Identifier of one dispatched fetch.
pub type RequestId = u64;

/// Messages that update the feed state.
#[derive(Debug, Clone)]
pub enum Action {
    /// A session token became available.
    LoggedIn(Token),
    /// The user dropped the session.
    LoggedOut,
    /// The API refused `token` when it was used for `request`.
    TokenRejected { request: RequestId, token: Token },
    /// A fetch was dispatched.
    FetchRequested { request: RequestId },
    /// A fetch returned these posts.
    FetchSucceeded {
        request: RequestId,
        posts: Vec<Post>,
        at: DateTime<Utc>,
    },
    /// A fetch failed with this error description.
    FetchFailed {
        request: RequestId,
        error: String,
        at: DateTime<Utc>,
    },
}

/// A snapshot of everything the feed screen reads.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub token: Option<Token>,
    /// Posts in server order.
    pub posts: Arc<Vec<Post>>,
    pub posts_error: Option<String>,
    /// When the last fetch completed, successfully or not.
    pub posts_timestamp: Option<DateTime<Utc>>,
    pub is_fetching_posts: bool,
    latest_request: Option<RequestId>,
}

impl FeedState {
    /// Initial state, optionally pre-seeded with a token.
    pub fn new(token: Option<Token>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Apply `action`, returning the next snapshot.
    pub fn reduce(&self, action: Action) -> FeedState {
        let mut next = self.clone();

        match action {
            Action::LoggedIn(token) => next.token = Some(token),
            Action::LoggedOut => next.token = None,
            Action::TokenRejected { request, token } => {
                if !self.is_latest(request) || self.token.as_ref() != Some(&token) {
                    tracing::debug!(request, "ignoring rejection of a superseded token");
                    return next;
                }
                next.token = None;
            }
            Action::FetchRequested { request } => {
                next.latest_request = Some(request);
                next.is_fetching_posts = true;
            }
            Action::FetchSucceeded { request, posts, at } => {
                if !self.is_latest(request) {
                    tracing::debug!(request, "discarding stale fetch result");
                    return next;
                }
                next.posts = Arc::new(posts);
                next.posts_error = None;
                next.posts_timestamp = Some(at);
                next.is_fetching_posts = false;
            }
            Action::FetchFailed { request, error, at } => {
                if !self.is_latest(request) {
                    tracing::debug!(request, "discarding stale fetch failure");
                    return next;
                }
                next.posts_error = Some(error);
                next.posts_timestamp = Some(at);
                next.is_fetching_posts = false;
            }
        }

        next
    }

    fn is_latest(&self, request: RequestId) -> bool {
        self.latest_request == Some(request)
    }
}
