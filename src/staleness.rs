//! When is the cached feed old enough to fetch again?

use chrono::{DateTime, TimeDelta, Utc};

use crate::session::Token;
use crate::source::Post;

/// Default age after which an empty feed is worth another attempt.
pub const STALE_AFTER: TimeDelta = TimeDelta::seconds(60);

/// Decide whether a fetch should be dispatched.
///
/// * never without a token (the caller redirects to login instead) or while
///   a fetch is already in flight;
/// * always if no fetch has ever been attempted;
/// * otherwise only if the feed is empty and the last attempt is older than
///   `stale_after`.
///
/// A non-empty feed is never considered stale here; the user refreshes it
/// explicitly.
pub fn should_refetch(
    token: Option<&Token>,
    is_fetching: bool,
    last_attempt: Option<DateTime<Utc>>,
    posts: &[Post],
    now: DateTime<Utc>,
    stale_after: TimeDelta,
) -> bool {
    if token.is_none() || is_fetching {
        return false;
    }

    match last_attempt {
        None => true,
        Some(at) => posts.is_empty() && now - at > stale_after,
    }
}
