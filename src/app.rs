use chrono::{DateTime, TimeDelta, Utc};

use crate::dispatch::FetchPosts;
use crate::navigation::Navigator;
use crate::screen::FeedScreen;
use crate::session::{LoginForm, Token};
use crate::store::{Action, FeedState};

/// Owns all application state.
///
/// Every state change goes through [`App::apply`], on the UI thread, one
/// action at a time.
pub struct App<D: FetchPosts> {
    /// Current snapshot.
    pub state: FeedState,
    pub screen: FeedScreen,
    pub navigator: Navigator,
    pub login: LoginForm,
    dispatcher: D,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl<D: FetchPosts> App<D> {
    pub fn new(topic: &str, stale_after: TimeDelta, token: Option<Token>, dispatcher: D) -> Self {
        let state = FeedState::new(token);
        let screen = FeedScreen::new(topic, stale_after, &state);
        Self {
            state,
            screen,
            navigator: Navigator::new(),
            login: LoginForm::default(),
            dispatcher,
            quit: false,
        }
    }

    /// Show the feed for the first time.
    pub fn mount(&mut self) {
        self.screen
            .mount(&self.state, &mut self.navigator, &mut self.dispatcher);
    }

    /// Reduce `action` into a new snapshot and let the screen react to it.
    pub fn apply(&mut self, action: Action, now: DateTime<Utc>) {
        let next = self.state.reduce(action);
        self.screen.on_snapshot(
            &self.state,
            &next,
            &mut self.navigator,
            &mut self.dispatcher,
            now,
        );
        self.state = next;
    }

    pub fn refresh(&mut self) {
        self.screen
            .on_refresh(&self.state, &mut self.navigator, &mut self.dispatcher);
    }

    /// Drop the session; the screen sends the user to the login route.
    pub fn log_out(&mut self, now: DateTime<Utc>) {
        self.apply(Action::LoggedOut, now);
    }

    /// Submit the login form.  Blank input keeps the login route showing.
    pub fn submit_login(&mut self, now: DateTime<Utc>) {
        if let Some(token) = self.login.submit() {
            self.navigator.back();
            self.apply(Action::LoggedIn(token), now);
        }
    }

    /// One-line summary for the status bar.
    pub fn status(&self) -> String {
        let state = &self.state;
        if state.token.is_none() {
            "Not logged in".into()
        } else if state.is_fetching_posts {
            format!("Fetching r/{}…", self.screen.topic())
        } else if state.posts_error.is_some() {
            "Last fetch failed".into()
        } else if let Some(at) = state.posts_timestamp {
            format!(
                "Fetched {} posts at {}",
                self.screen.visible_len(),
                at.format("%H:%M:%S")
            )
        } else {
            "Starting…".into()
        }
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }
}
