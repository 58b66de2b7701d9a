//! Session credentials and the login form.
//!
//! There is no OAuth handshake here: a bearer token is either passed on the
//! command line / environment, or pasted into the login route.

use std::fmt;

/// A bearer token for the Reddit API.
///
/// `Debug` is redacted so tokens never end up in log files.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Text input backing the login route.
#[derive(Debug, Default)]
pub struct LoginForm {
    input: String,
}

impl LoginForm {
    pub fn push(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop(&mut self) {
        self.input.pop();
    }

    /// Number of characters typed, for masked display.
    pub fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Take the typed token, clearing the form.  Blank input yields `None`
    /// and leaves the form as it was.
    pub fn submit(&mut self) -> Option<Token> {
        let token = Token::new(self.input.as_str())?;
        self.input.clear();
        Some(token)
    }
}
