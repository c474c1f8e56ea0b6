//! Service doubles shared by the feed tests.

use crate::api::{Owner, Tweet, TweetService};
use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

type ListResult = Result<Vec<Tweet>, FetchError>;

pub fn tweet(id: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        content: format!("tweet {}", id),
        created_at: None,
        owner: Some(Owner {
            username: Some("bob".to_string()),
        }),
    }
}

pub trait CountsCalls {
    fn list_calls(&self) -> usize;
}

/// Yields until the service has seen `n` list calls.
pub async fn wait_for_calls<S: CountsCalls>(service: &S, n: usize) {
    while service.list_calls() < n {
        tokio::task::yield_now().await;
    }
}

pub struct FakeService {
    list_calls: AtomicUsize,
    post_calls: AtomicUsize,
    toggle_calls: AtomicUsize,
    list_result: Mutex<ListResult>,
    post_result: Mutex<Result<(), FetchError>>,
    toggle_result: Mutex<Result<String, FetchError>>,
    posted: Mutex<Vec<(String, String)>>,
    toggled: Mutex<Vec<(String, String)>>,
}

impl FakeService {
    pub fn with_tweets(tweets: Vec<Tweet>) -> Self {
        Self {
            list_calls: AtomicUsize::new(0),
            post_calls: AtomicUsize::new(0),
            toggle_calls: AtomicUsize::new(0),
            list_result: Mutex::new(Ok(tweets)),
            post_result: Mutex::new(Ok(())),
            toggle_result: Mutex::new(Ok("Liked".to_string())),
            posted: Mutex::new(Vec::new()),
            toggled: Mutex::new(Vec::new()),
        }
    }

    pub fn set_tweets(&self, tweets: Vec<Tweet>) {
        *self.list_result.lock().unwrap() = Ok(tweets);
    }

    pub fn fail_list(&self, err: FetchError) {
        *self.list_result.lock().unwrap() = Err(err);
    }

    pub fn fail_post(&self, err: FetchError) {
        *self.post_result.lock().unwrap() = Err(err);
    }

    pub fn set_toggle(&self, result: Result<String, FetchError>) {
        *self.toggle_result.lock().unwrap() = result;
    }

    pub fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    pub fn toggle_calls(&self) -> usize {
        self.toggle_calls.load(Ordering::SeqCst)
    }

    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn toggled(&self) -> Vec<(String, String)> {
        self.toggled.lock().unwrap().clone()
    }
}

impl CountsCalls for FakeService {
    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TweetService for FakeService {
    async fn get_all_tweets(&self) -> ListResult {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_result.lock().unwrap().clone()
    }

    async fn post_tweet(&self, content: &str, token: &str) -> Result<(), FetchError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        self.posted
            .lock()
            .unwrap()
            .push((content.to_string(), token.to_string()));
        self.post_result.lock().unwrap().clone()
    }

    async fn toggle_tweet_like(&self, tweet_id: &str, token: &str) -> Result<String, FetchError> {
        self.toggle_calls.fetch_add(1, Ordering::SeqCst);
        self.toggled
            .lock()
            .unwrap()
            .push((tweet_id.to_string(), token.to_string()));
        self.toggle_result.lock().unwrap().clone()
    }
}

/// List calls block until the test releases them, in call order.
pub struct GatedService {
    list_calls: AtomicUsize,
    gates: Mutex<VecDeque<oneshot::Receiver<ListResult>>>,
}

impl GatedService {
    pub fn new(n: usize) -> (Self, Vec<oneshot::Sender<ListResult>>) {
        let mut senders = Vec::with_capacity(n);
        let mut receivers = VecDeque::with_capacity(n);
        for _ in 0..n {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        let service = Self {
            list_calls: AtomicUsize::new(0),
            gates: Mutex::new(receivers),
        };
        (service, senders)
    }
}

impl CountsCalls for GatedService {
    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TweetService for GatedService {
    async fn get_all_tweets(&self) -> ListResult {
        let gate = self.gates.lock().unwrap().pop_front();
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".into()))),
            None => Err(FetchError::Transport("no gate left".into())),
        }
    }

    async fn post_tweet(&self, _content: &str, _token: &str) -> Result<(), FetchError> {
        Ok(())
    }

    async fn toggle_tweet_like(&self, _tweet_id: &str, _token: &str) -> Result<String, FetchError> {
        Ok("Liked".to_string())
    }
}
