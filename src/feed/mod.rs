//! The tweet feed component: session, feed loading, composer and reactions.
//!
//! Every user action that changes server state is followed by a full
//! refresh of the feed. Nothing is updated optimistically.

pub mod store;
#[cfg(test)]
pub(crate) mod testing;

use crate::api::{Tweet, TweetService};
use crate::error::{Action, FeedError, FetchError, ValidationError};
use crate::notify::{Notification, Notifier};
use crate::session::{Session, SessionProvider};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use store::{FeedSnapshot, FeedStore, ReloadingFeedStore};

/// Cheap to clone; clones share the same feed, composer and session.
#[derive(Clone)]
pub struct TweetFeed {
    service: Arc<dyn TweetService>,
    store: Arc<dyn FeedStore>,
    notifier: Arc<dyn Notifier>,
    session: Arc<Session>,
    composer: Arc<Mutex<String>>,
}

impl TweetFeed {
    /// Mounts the feed. The session is read here, once, and never again.
    pub fn new(
        service: Arc<dyn TweetService>,
        store: Arc<dyn FeedStore>,
        notifier: Arc<dyn Notifier>,
        sessions: &dyn SessionProvider,
    ) -> Self {
        let session = sessions.read_session();
        tracing::info!(
            authenticated = session.is_authenticated(),
            user = session.display_name().unwrap_or("-"),
            "feed mounted"
        );

        Self {
            service,
            store,
            notifier,
            session: Arc::new(session),
            composer: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Builds a feed backed by a full-reload store over `service`.
    pub fn with_reloading_store(
        service: Arc<dyn TweetService>,
        notifier: Arc<dyn Notifier>,
        sessions: &dyn SessionProvider,
    ) -> Self {
        let store = Arc::new(ReloadingFeedStore::new(service.clone()));
        Self::new(service, store, notifier, sessions)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.store.snapshot()
    }

    pub fn tweets(&self) -> Vec<Tweet> {
        self.store.snapshot().tweets
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Initial load; failures are already reported through the notifier.
    pub async fn on_mount(&self) {
        tracing::debug!(authenticated = self.is_authenticated(), "feed mounted");
        self.refresh().await;
    }

    /// Reload on demand. Failures are reported through the notifier.
    pub async fn refresh(&self) {
        let _ = self.load_feed().await;
    }

    pub async fn load_feed(&self) -> Result<Vec<Tweet>, FetchError> {
        match self.store.refresh().await {
            Ok(tweets) => Ok(tweets),
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch tweets");
                self.notifier
                    .notify(Notification::error(format!("Error fetching tweets: {}", e)));
                Err(e)
            }
        }
    }

    pub async fn submit(&self, text: &str) {
        if let Err(e) = self.try_submit(text).await {
            tracing::debug!(error = %e, "tweet not posted");
        }
    }

    async fn try_submit(&self, text: &str) -> Result<(), FeedError> {
        if text.trim().is_empty() {
            return Err(self.reject(ValidationError::EmptyContent));
        }
        let token = self
            .session
            .token()
            .ok_or_else(|| self.reject(ValidationError::LoginRequired(Action::Tweet)))?;

        if let Err(e) = self.service.post_tweet(text, token).await {
            tracing::warn!(error = %e, "failed to post tweet");
            self.notifier.notify(Notification::error("Failed to post tweet"));
            return Err(e.into());
        }

        self.notifier
            .notify(Notification::success("Tweet posted successfully!"));
        {
            // A draft typed while the post was in flight is kept.
            let mut composer = self.lock_composer();
            if *composer == text {
                composer.clear();
            }
        }
        self.refresh().await;
        Ok(())
    }

    pub async fn toggle(&self, tweet_id: &str) {
        if let Err(e) = self.try_toggle(tweet_id).await {
            tracing::debug!(error = %e, tweet_id, "reaction not toggled");
        }
    }

    async fn try_toggle(&self, tweet_id: &str) -> Result<(), FeedError> {
        let token = self
            .session
            .token()
            .ok_or_else(|| self.reject(ValidationError::LoginRequired(Action::Like)))?;

        let message = match self.service.toggle_tweet_like(tweet_id, token).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, tweet_id, "failed to toggle like");
                self.notifier.notify(Notification::error(format!(
                    "Error toggling like/dislike: {}",
                    e
                )));
                return Err(e.into());
            }
        };

        self.notifier.notify(Notification::success(message));
        self.refresh().await;
        Ok(())
    }

    fn reject(&self, err: ValidationError) -> FeedError {
        self.notifier.notify(Notification::error(err.to_string()));
        err.into()
    }

    fn lock_composer(&self) -> MutexGuard<'_, String> {
        self.composer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn composer_text(&self) -> String {
        self.lock_composer().clone()
    }

    pub fn set_composer_text(&self, text: impl Into<String>) {
        *self.lock_composer() = text.into();
    }

    pub fn composer_push(&self, c: char) {
        self.lock_composer().push(c);
    }

    pub fn composer_pop(&self) {
        self.lock_composer().pop();
    }
}
