//! The feed screen: lifecycle, refresh triggers and scroll position.
//!
//! The screen never mutates [`FeedState`].  It reads snapshots, asks a
//! [`FetchPosts`] implementation to fetch, and asks the [`Navigator`] to show
//! the login route.
//!
//! Two different triggers fetch on their own:
//!
//! * [`FeedScreen::mount`] always fetches when a token is present, like a
//!   refresh on open.
//! * [`FeedScreen::on_snapshot`] fetches on the token going from absent to
//!   present, but only if [`should_refetch`] agrees.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use ratatui::widgets::ListState;

use crate::dispatch::FetchPosts;
use crate::navigation::Navigator;
use crate::rows::{materialize, Row, RowContent, RowKey};
use crate::source::Post;
use crate::staleness::should_refetch;
use crate::store::FeedState;

pub struct FeedScreen {
    topic: String,
    stale_after: TimeDelta,
    /// The post list `rows` was built from.
    posts: Arc<Vec<Post>>,
    rows: Vec<Row>,
    /// Selection over visible rows only.
    pub list_state: ListState,
}

impl FeedScreen {
    pub fn new(topic: impl Into<String>, stale_after: TimeDelta, state: &FeedState) -> Self {
        Self {
            topic: topic.into(),
            stale_after,
            posts: Arc::clone(&state.posts),
            rows: materialize(&state.posts),
            list_state: ListState::default(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Every materialized row, placeholders included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows that produce visible output, in order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.is_visible())
    }

    pub fn visible_len(&self) -> usize {
        self.visible_rows().count()
    }

    // -- lifecycle -----------------------------------------------------------

    /// Called once when the screen is first shown.
    ///
    /// Without a token this only redirects to login.  With one it fetches
    /// unconditionally, whatever the current timestamp says.
    pub fn mount(&mut self, state: &FeedState, nav: &mut Navigator, dispatcher: &mut impl FetchPosts) {
        match &state.token {
            None => nav.go_to_login(),
            Some(token) => dispatcher.fetch_posts(&self.topic, token),
        }
    }

    /// Called for every new snapshot, with the one it replaces.
    pub fn on_snapshot(
        &mut self,
        prev: &FeedState,
        next: &FeedState,
        nav: &mut Navigator,
        dispatcher: &mut impl FetchPosts,
        now: DateTime<Utc>,
    ) {
        match (&prev.token, &next.token) {
            (None, Some(_)) => {
                self.fetch_if_needed(next, dispatcher, now);
            }
            (Some(_), None) => nav.go_to_login(),
            _ => {}
        }

        if !Arc::ptr_eq(&self.posts, &next.posts) {
            self.rebuild(&next.posts);
        }
    }

    /// Dispatch a fetch if [`should_refetch`] says the feed is stale.
    /// Returns whether a fetch was dispatched.
    pub fn fetch_if_needed(
        &self,
        state: &FeedState,
        dispatcher: &mut impl FetchPosts,
        now: DateTime<Utc>,
    ) -> bool {
        let stale = should_refetch(
            state.token.as_ref(),
            state.is_fetching_posts,
            state.posts_timestamp,
            &state.posts,
            now,
            self.stale_after,
        );

        match (&state.token, stale) {
            (Some(token), true) => {
                dispatcher.fetch_posts(&self.topic, token);
                true
            }
            _ => false,
        }
    }

    fn selected_row(&self) -> Option<&Row> {
        self.list_state
            .selected()
            .and_then(|i| self.visible_rows().nth(i))
    }

    /// Re-materialize rows for a new post list.  The selection follows the
    /// selected row's key; if that row is gone it is clamped instead.
    fn rebuild(&mut self, posts: &Arc<Vec<Post>>) {
        let selected_key: Option<RowKey> = self.selected_row().map(|row| row.key.clone());

        self.posts = Arc::clone(posts);
        self.rows = materialize(posts);

        let hidden: Vec<&str> = self
            .rows
            .iter()
            .filter_map(|row| match &row.content {
                RowContent::Placeholder { kind } => Some(kind.as_str()),
                _ => None,
            })
            .collect();
        if !hidden.is_empty() {
            tracing::debug!(?hidden, "rows hidden for unrecognized kinds");
        }

        let len = self.visible_len();
        let moved_to = selected_key.as_ref().and_then(|key| {
            let position = self.visible_rows().position(|row| &row.key == key);
            if position.is_none() {
                tracing::debug!(key = key.as_str(), "selected row dropped out of the feed");
            }
            position
        });

        match (moved_to, self.list_state.selected()) {
            _ if len == 0 => self.list_state.select(None),
            (Some(i), _) => self.list_state.select(Some(i)),
            (None, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    // -- refresh controller --------------------------------------------------

    /// Manual refresh: fetch regardless of staleness.
    pub fn on_refresh(&mut self, state: &FeedState, nav: &mut Navigator, dispatcher: &mut impl FetchPosts) {
        match &state.token {
            None => nav.go_to_login(),
            Some(token) => dispatcher.fetch_posts(&self.topic, token),
        }
    }

    /// Fired when the user scrolls past the last row.
    ///
    /// TODO: fetch the next page with the listing's `after` cursor and append
    /// it without re-keying existing rows.
    pub fn on_reach_end(&mut self) {
        tracing::debug!(topic = %self.topic, "reached end of feed");
    }

    /// Whether the loading indicator should show.  True until the first
    /// fetch completes, so the very first load always shows it.
    pub fn is_refreshing(state: &FeedState) -> bool {
        state.is_fetching_posts || state.posts_timestamp.is_none()
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 >= len => {
                self.on_reach_end();
                len - 1
            }
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}
