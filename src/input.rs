//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  The active route decides
//! the keymap: the feed gets navigation and refresh keys, the login route
//! gets a text field.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] (or [`crate::screen::FeedScreen`]) for the
//!    action if one doesn't exist.
//! 2. Add a `KeyCode` match arm in the handler for the right route.
//! 3. Update the help text in [`crate::ui`].

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::dispatch::FetchPosts;
use crate::navigation::Route;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event<D: FetchPosts>(app: &mut App<D>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.navigator.current() {
        Route::Feed => handle_feed_key(app, key.code),
        Route::Login => handle_login_key(app, key.code),
    }
}

fn handle_feed_key<D: FetchPosts>(app: &mut App<D>, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('r') | KeyCode::F(5) => app.refresh(),
        KeyCode::Char('L') => app.log_out(Utc::now()),
        KeyCode::Down | KeyCode::Char('j') => app.screen.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.screen.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.screen.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.screen.select_last(),
        _ => {}
    }
}

fn handle_login_key<D: FetchPosts>(app: &mut App<D>, code: KeyCode) {
    match code {
        // No way forward without a token.
        KeyCode::Esc => app.quit = true,
        KeyCode::Enter => app.submit_login(Utc::now()),
        KeyCode::Backspace => app.login.pop(),
        KeyCode::Char(c) => app.login.push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::tests::RecordingDispatcher;
    use crate::session::Token;
    use crate::staleness::STALE_AFTER;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(token: Option<&str>) -> App<RecordingDispatcher> {
        App::new(
            "random",
            STALE_AFTER,
            token.and_then(Token::new),
            RecordingDispatcher::default(),
        )
    }

    #[test]
    fn q_quits_feed() {
        let mut app = app(Some("t"));
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);
    }

    #[test]
    fn r_refreshes() {
        let mut app = app(Some("t"));
        handle_key_event(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.dispatcher().calls.len(), 1);
    }

    #[test]
    fn shift_l_logs_out() {
        let mut app = app(Some("t"));
        app.mount();
        handle_key_event(&mut app, press(KeyCode::Char('L')));
        assert_eq!(app.navigator.current(), Route::Login);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app(Some("t"));
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }

    #[test]
    fn login_keys_edit_and_submit() {
        let mut app = app(None);
        app.mount();

        // 'q' is text on the login route, not quit.
        for c in "qx".chars() {
            handle_key_event(&mut app, press(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, press(KeyCode::Backspace));
        assert!(!app.quit);
        assert_eq!(app.login.char_count(), 1);

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.navigator.current(), Route::Feed);
        assert_eq!(app.dispatcher().calls.len(), 1);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = app(None);
        app.mount();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.quit);
    }
}
