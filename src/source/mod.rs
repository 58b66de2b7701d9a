//! Post source abstraction layer.
//!
//! This module defines the [`PostSource`] trait and the common [`Post`]
//! type.  Concrete source implementations live in sub-modules (currently only
//! [`reddit`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lemmy.rs`).
//! 2. Define a struct and implement [`PostSource`] for it.
//! 3. Add `mod lemmy;` below and re-export your struct in the `pub use` block.
//! 4. Construct an instance in `main.rs` instead of the Reddit source.
//!
//! The dispatcher, store and UI are all source-agnostic.

mod post;
mod reddit;

pub use post::{Post, Preview};
#[cfg(test)]
pub use post::{Comment, Link};
pub use reddit::RedditSource;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::session::Token;

/// Trait that every post source must implement.
///
/// The dispatcher calls [`fetch()`](PostSource::fetch) from a spawned tokio
/// task, so implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Human-readable label, used in logs.
    fn name(&self) -> &str;

    /// Fetch the current listing for `topic`.
    ///
    /// Errors are turned into the error banner by the store.
    async fn fetch(&self, topic: &str, token: &Token) -> Result<Vec<Post>, FetchError>;
}
