use crate::api::{Tweet, TweetService};
use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub tweets: Vec<Tweet>,
    pub loading: bool,
}

/// Owner of the displayed feed and its loading flag.
///
/// `refresh` is the only way the feed changes, so the reload strategy can be
/// swapped without touching the composer or the reaction handler.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Fetches the feed and returns the list now on display, which is the
    /// newer one if this response arrived after a later refresh applied.
    async fn refresh(&self) -> Result<Vec<Tweet>, FetchError>;

    fn snapshot(&self) -> FeedSnapshot;

    fn is_loading(&self) -> bool {
        self.snapshot().loading
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tweets: Vec<Tweet>,
    in_flight: usize,
    issued_seq: u64,
    applied_seq: u64,
}

/// Re-fetches the whole collection on every refresh and replaces the feed.
///
/// Each refresh takes a sequence number when it starts. A response is only
/// applied if no later-started refresh has been applied already, so a slow
/// stale response can never overwrite a newer one.
pub struct ReloadingFeedStore {
    service: Arc<dyn TweetService>,
    state: Mutex<StoreState>,
}

impl ReloadingFeedStore {
    pub fn new(service: Arc<dyn TweetService>) -> Self {
        Self {
            service,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the loading flag up for one fetch; released on drop.
struct LoadingGuard<'a> {
    store: &'a ReloadingFeedStore,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(store: &'a ReloadingFeedStore) -> (Self, u64) {
        let mut state = store.lock();
        state.in_flight += 1;
        state.issued_seq += 1;
        let seq = state.issued_seq;
        (Self { store }, seq)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.store.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

#[async_trait]
impl FeedStore for ReloadingFeedStore {
    async fn refresh(&self) -> Result<Vec<Tweet>, FetchError> {
        let (_loading, seq) = LoadingGuard::acquire(self);
        tracing::debug!(seq, "feed refresh started");

        let tweets = self.service.get_all_tweets().await?;

        let mut state = self.lock();
        if seq > state.applied_seq {
            state.applied_seq = seq;
            state.tweets = tweets.clone();
            tracing::debug!(seq, count = tweets.len(), "feed refresh applied");
        } else {
            tracing::debug!(
                seq,
                applied = state.applied_seq,
                "dropping stale feed response"
            );
        }

        Ok(state.tweets.clone())
    }

    fn snapshot(&self) -> FeedSnapshot {
        let state = self.lock();
        FeedSnapshot {
            tweets: state.tweets.clone(),
            loading: state.in_flight > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{tweet, wait_for_calls, FakeService, GatedService};

    #[tokio::test]
    async fn test_refresh_replaces_feed() {
        let service = Arc::new(FakeService::with_tweets(vec![tweet("1"), tweet("2")]));
        let store = ReloadingFeedStore::new(service.clone());

        let fetched = store.refresh().await.unwrap();

        assert_eq!(fetched.len(), 2);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.tweets.len(), 2);
        assert!(!snapshot.loading);

        service.set_tweets(vec![tweet("3")]);
        store.refresh().await.unwrap();
        let ids: Vec<_> = store.snapshot().tweets.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_feed() {
        let service = Arc::new(FakeService::with_tweets(vec![tweet("1")]));
        let store = ReloadingFeedStore::new(service.clone());
        store.refresh().await.unwrap();

        service.fail_list(FetchError::Status(500));
        let err = store.refresh().await.unwrap_err();

        assert_eq!(err, FetchError::Status(500));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.tweets, vec![tweet("1")]);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_loading_flag_held_while_in_flight() {
        let (service, mut gates) = GatedService::new(2);
        let service = Arc::new(service);
        let store = Arc::new(ReloadingFeedStore::new(service.clone()));
        assert!(!store.is_loading());

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        wait_for_calls(service.as_ref(), 1).await;
        assert!(store.is_loading());

        gates.remove(0).send(Err(FetchError::Transport("reset".into()))).unwrap();
        assert!(task.await.unwrap().is_err());
        assert!(!store.is_loading());

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        wait_for_calls(service.as_ref(), 2).await;
        assert!(store.is_loading());

        gates.remove(0).send(Ok(vec![tweet("1")])).unwrap();
        assert!(task.await.unwrap().is_ok());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let (service, mut gates) = GatedService::new(2);
        let service = Arc::new(service);
        let store = Arc::new(ReloadingFeedStore::new(service.clone()));

        let older = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        wait_for_calls(service.as_ref(), 1).await;
        let newer = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        wait_for_calls(service.as_ref(), 2).await;

        let older_gate = gates.remove(0);
        let newer_gate = gates.remove(0);

        newer_gate.send(Ok(vec![tweet("new")])).unwrap();
        newer.await.unwrap().unwrap();
        assert!(store.is_loading());

        older_gate.send(Ok(vec![tweet("old")])).unwrap();
        let returned = older.await.unwrap().unwrap();
        assert_eq!(returned, vec![tweet("new")]);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.tweets, vec![tweet("new")]);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_in_order_responses_both_apply() {
        let (service, mut gates) = GatedService::new(2);
        let service = Arc::new(service);
        let store = Arc::new(ReloadingFeedStore::new(service.clone()));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        wait_for_calls(service.as_ref(), 1).await;
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        wait_for_calls(service.as_ref(), 2).await;

        gates.remove(0).send(Ok(vec![tweet("a")])).unwrap();
        first.await.unwrap().unwrap();
        assert_eq!(store.snapshot().tweets, vec![tweet("a")]);

        gates.remove(0).send(Ok(vec![tweet("b")])).unwrap();
        second.await.unwrap().unwrap();
        assert_eq!(store.snapshot().tweets, vec![tweet("b")]);
    }
}
