use super::wire::{self, NewTweet};
use super::{Tweet, TweetService};
use crate::config::ApiConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;

pub struct HttpTweetService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTweetService {
    pub fn new(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tweetfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn tweets_url(&self) -> String {
        format!("{}/tweets", self.base_url)
    }

    fn toggle_url(&self, tweet_id: &str) -> String {
        format!(
            "{}/likes/toggle/t/{}",
            self.base_url,
            urlencoding::encode(tweet_id)
        )
    }

    async fn read_body(response: reqwest::Response) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TweetService for HttpTweetService {
    async fn get_all_tweets(&self) -> Result<Vec<Tweet>, FetchError> {
        let url = self.tweets_url();
        tracing::debug!(%url, "fetching tweets");

        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(response).await?;

        wire::parse_tweet_list(&body)
    }

    async fn post_tweet(&self, content: &str, token: &str) -> Result<(), FetchError> {
        let url = self.tweets_url();
        tracing::debug!(%url, len = content.len(), "posting tweet");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&NewTweet { content })
            .send()
            .await?;
        Self::read_body(response).await?;

        Ok(())
    }

    async fn toggle_tweet_like(&self, tweet_id: &str, token: &str) -> Result<String, FetchError> {
        let url = self.toggle_url(tweet_id);
        tracing::debug!(%url, "toggling like");

        let response = self.client.post(&url).bearer_auth(token).send().await?;
        let body = Self::read_body(response).await?;

        wire::parse_toggle_message(&body)
    }
}
