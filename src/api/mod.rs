pub mod http;
pub mod wire;

use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use http::HttpTweetService;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tweet {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_owner")]
    pub owner: Option<Owner>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub username: Option<String>,
}

impl Tweet {
    pub fn author(&self) -> &str {
        self.owner
            .as_ref()
            .and_then(|o| o.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown User")
    }
}

/// An unpopulated owner arrives as a bare id string; treat any shape other
/// than an object as "no owner" rather than failing the whole list.
fn lenient_owner<'de, D>(deserializer: D) -> Result<Option<Owner>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Remote operations of the tweet API.
#[async_trait]
pub trait TweetService: Send + Sync {
    async fn get_all_tweets(&self) -> Result<Vec<Tweet>, FetchError>;

    async fn post_tweet(&self, content: &str, token: &str) -> Result<(), FetchError>;

    /// Flips the caller's reaction on a tweet and returns the server's message.
    async fn toggle_tweet_like(&self, tweet_id: &str, token: &str) -> Result<String, FetchError>;
}
