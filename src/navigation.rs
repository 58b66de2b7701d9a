//! Route stack.
//!
//! The feed is always at the bottom of the stack and stays mounted while the
//! login route sits on top of it, so it keeps observing state changes (in
//! particular the token arriving).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Feed,
    Login,
}

#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Feed],
        }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Feed)
    }

    /// Show the login route.  Does nothing if it is already showing.
    pub fn go_to_login(&mut self) {
        if self.current() != Route::Login {
            tracing::info!("redirecting to login");
            self.stack.push(Route::Login);
        }
    }

    /// Pop back towards the feed.  The feed itself is never popped.
    pub fn back(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_feed() {
        assert_eq!(Navigator::new().current(), Route::Feed);
    }

    #[test]
    fn go_to_login_is_idempotent() {
        let mut nav = Navigator::new();
        nav.go_to_login();
        nav.go_to_login();
        assert_eq!(nav.current(), Route::Login);

        nav.back();
        assert_eq!(nav.current(), Route::Feed);
    }

    #[test]
    fn back_never_pops_the_feed() {
        let mut nav = Navigator::new();
        nav.back();
        assert_eq!(nav.current(), Route::Feed);
    }
}
