//! Reddit listing source.
//!
//! Fetches `/r/{topic}/hot` from the OAuth API host and decodes the Listing
//! envelope into [`Post`]s.  Decoding is split out into
//! [`RedditSource::parse_listing`] so tests can exercise it without the
//! network.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::post::Thing;
use super::{Post, PostSource};
use crate::error::FetchError;
use crate::session::Token;

/// Longest slice of an error body copied into [`FetchError::Api`].
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

/// A Reddit data source.
pub struct RedditSource {
    client: reqwest::Client,
    /// API host, without a trailing slash (e.g. `https://oauth.reddit.com`).
    api_url: String,
    /// Page size requested from the API.
    limit: u32,
}

impl RedditSource {
    /// Create a new Reddit source.
    ///
    /// Reddit throttles requests without a descriptive User-Agent, so one is
    /// required here.
    pub fn new(api_url: &str, user_agent: &str, limit: u32) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            limit,
        })
    }

    /// The listing endpoint for `topic`, without query parameters.
    pub fn listing_url(&self, topic: &str) -> String {
        format!("{}/r/{}/hot", self.api_url, topic.trim_matches('/'))
    }

    /// Decode a Listing JSON body.  Pure, no I/O.
    pub fn parse_listing(body: &str) -> Result<Vec<Post>, FetchError> {
        let listing: Listing = serde_json::from_str(body)?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(Post::from_thing)
            .collect())
    }
}

#[async_trait]
impl PostSource for RedditSource {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn fetch(&self, topic: &str, token: &Token) -> Result<Vec<Post>, FetchError> {
        let url = self.listing_url(topic);
        tracing::debug!(%url, limit = self.limit, "fetching listing");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .query(&[("raw_json", "1".to_string()), ("limit", self.limit.to_string())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Self::parse_listing(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
