//! Fire-and-forget fetch dispatch.
//!
//! [`Dispatcher::fetch_posts`] returns immediately.  It announces the request
//! on the action channel, then spawns a tokio task that fetches from the
//! configured [`PostSource`] and publishes the outcome on the same channel.
//! The UI thread drains the channel every tick and feeds each [`Action`]
//! through the store, so completion is only ever observed as a new snapshot.
//!
//! ## For contributors
//!
//! There is no cancellation.  Overlapping fetches are allowed; the reducer
//! discards results from anything but the newest request (see
//! [`crate::store`]).  Retries, if ever needed, belong here rather than in
//! the screen.

use std::sync::Arc;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::session::Token;
use crate::source::PostSource;
use crate::store::{Action, RequestId};

/// Anything that can be asked to fetch a topic.
///
/// The screen only talks to this trait, so tests can count dispatches
/// without a runtime or a network.
pub trait FetchPosts {
    fn fetch_posts(&mut self, topic: &str, token: &Token);
}

/// Dispatches fetches onto a tokio runtime.
pub struct Dispatcher {
    source: Arc<dyn PostSource>,
    runtime: Handle,
    tx: UnboundedSender<Action>,
    last_request: RequestId,
}

impl Dispatcher {
    /// Create a dispatcher and the receiver the main loop should drain on
    /// every tick.
    pub fn new(source: Arc<dyn PostSource>, runtime: Handle) -> (Self, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            source,
            runtime,
            tx,
            last_request: 0,
        };
        (dispatcher, rx)
    }
}

impl FetchPosts for Dispatcher {
    fn fetch_posts(&mut self, topic: &str, token: &Token) {
        self.last_request += 1;
        let request = self.last_request;

        // Sent before the task exists, so the reducer always sees the
        // request ahead of its completion.
        if self.tx.send(Action::FetchRequested { request }).is_err() {
            tracing::debug!("action channel closed, not fetching");
            return;
        }

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let topic = topic.to_string();
        let token = token.clone();

        tracing::info!(request, %topic, source = source.name(), "dispatching fetch");

        self.runtime.spawn(async move {
            let result = source.fetch(&topic, &token).await;
            let at = Utc::now();

            match result {
                Ok(posts) => {
                    tracing::info!(request, count = posts.len(), "fetch succeeded");
                    let _ = tx.send(Action::FetchSucceeded { request, posts, at });
                }
                Err(err) => {
                    tracing::warn!(request, error = %err, "fetch failed");
                    let unauthorized = err.is_unauthorized();
                    // If the receiver is gone the UI has exited; nothing to do.
                    if tx
                        .send(Action::FetchFailed {
                            request,
                            error: err.to_string(),
                            at,
                        })
                        .is_err()
                    {
                        return;
                    }
                    if unauthorized {
                        let _ = tx.send(Action::TokenRejected { request, token });
                    }
                }
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::app::App;
    use crate::error::FetchError;
    use crate::navigation::Route;
    use crate::source::Post;
    use crate::staleness::STALE_AFTER;

    enum Outcome {
        Posts(Vec<Post>),
        Unauthorized,
        ServerError,
    }

    struct StaticSource(Outcome);

    #[async_trait]
    impl PostSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch(&self, _topic: &str, _token: &Token) -> Result<Vec<Post>, FetchError> {
            match &self.0 {
                Outcome::Posts(posts) => Ok(posts.clone()),
                Outcome::Unauthorized => Err(FetchError::Unauthorized),
                Outcome::ServerError => Err(FetchError::Api {
                    status: 500,
                    message: "down".into(),
                }),
            }
        }
    }

    fn dispatcher(outcome: Outcome) -> (Dispatcher, UnboundedReceiver<Action>) {
        Dispatcher::new(Arc::new(StaticSource(outcome)), Handle::current())
    }

    fn token() -> Token {
        Token::new("t").unwrap()
    }

    fn post(id: &str) -> Post {
        Post::Unrecognized {
            kind: "t3".into(),
            id: Some(id.into()),
        }
    }

    #[tokio::test]
    async fn success_publishes_request_then_result() {
        let (mut dispatcher, mut rx) = dispatcher(Outcome::Posts(vec![post("a")]));
        dispatcher.fetch_posts("random", &token());

        assert!(matches!(rx.recv().await, Some(Action::FetchRequested { request: 1 })));
        match rx.recv().await {
            Some(Action::FetchSucceeded { request, posts, .. }) => {
                assert_eq!(request, 1);
                assert_eq!(posts.len(), 1);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_ids_increase() {
        let (mut dispatcher, mut rx) = dispatcher(Outcome::Posts(vec![]));
        dispatcher.fetch_posts("random", &token());
        dispatcher.fetch_posts("random", &token());

        let mut requested = Vec::new();
        for _ in 0..4 {
            if let Some(Action::FetchRequested { request }) = rx.recv().await {
                requested.push(request);
            }
        }
        assert_eq!(requested, [1, 2]);
    }

    #[tokio::test]
    async fn failure_publishes_error_text() {
        let (mut dispatcher, mut rx) = dispatcher(Outcome::ServerError);
        dispatcher.fetch_posts("random", &token());

        let _requested = rx.recv().await;
        match rx.recv().await {
            Some(Action::FetchFailed { error, .. }) => assert!(error.contains("500")),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_also_rejects_the_token() {
        let (mut dispatcher, mut rx) = dispatcher(Outcome::Unauthorized);
        dispatcher.fetch_posts("random", &token());

        let _requested = rx.recv().await;
        assert!(matches!(rx.recv().await, Some(Action::FetchFailed { .. })));
        match rx.recv().await {
            Some(Action::TokenRejected { request, token: rejected }) => {
                assert_eq!(request, 1);
                assert_eq!(rejected, token());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    /// Refuses the token "old" once its gate opens; any other token gets an
    /// empty listing straight away.  Gates are handed out in call order.
    struct GatedSource {
        gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl PostSource for GatedSource {
        fn name(&self) -> &str {
            "gated"
        }

        async fn fetch(&self, _topic: &str, token: &Token) -> Result<Vec<Post>, FetchError> {
            if token.secret() != "old" {
                return Ok(vec![]);
            }
            let gate = self.gates.lock().unwrap().pop_front();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Err(FetchError::Unauthorized)
        }
    }

    #[tokio::test]
    async fn late_rejection_of_old_token_keeps_new_session() {
        let (first_gate, first_rx) = oneshot::channel();
        let (second_gate, second_rx) = oneshot::channel();
        let source = GatedSource {
            gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
        };
        let (dispatcher, mut rx) = Dispatcher::new(Arc::new(source), Handle::current());
        let mut app = App::new("random", STALE_AFTER, Token::new("old"), dispatcher);
        let now = Utc::now();

        app.mount();
        app.refresh();
        for _ in 0..2 {
            let action = rx.recv().await.unwrap();
            assert!(matches!(action, Action::FetchRequested { .. }));
            app.apply(action, now);
        }

        // The refresh comes back first and logs the user out.
        second_gate.send(()).unwrap();
        for _ in 0..2 {
            let action = rx.recv().await.unwrap();
            app.apply(action, now);
        }
        assert_eq!(app.navigator.current(), Route::Login);

        for c in "new".chars() {
            app.login.push(c);
        }
        app.submit_login(now);
        assert_eq!(app.navigator.current(), Route::Feed);

        // Now the mount fetch finally fails with the old token.
        first_gate.send(()).unwrap();
        for _ in 0..2 {
            let action = rx.recv().await.unwrap();
            app.apply(action, now);
        }

        assert_eq!(app.state.token.as_ref().map(Token::secret), Some("new"));
        assert_eq!(app.navigator.current(), Route::Feed);
        assert!(!app.state.is_fetching_posts);
    }

    #[tokio::test]
    async fn closed_channel_does_not_panic() {
        let (mut dispatcher, rx) = dispatcher(Outcome::Posts(vec![]));
        drop(rx);
        dispatcher.fetch_posts("random", &token());
    }
}
