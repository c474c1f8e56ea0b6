//! Response envelopes of the tweet API.
//!
//! The list endpoint nests its payload as
//! `{"statusCode": {"data": {"tweets": [...]}}}`. Anything that does not
//! match, including a tweet without `_id` or `content`, is rejected here so
//! nothing half-decoded reaches the feed. A missing or partial `owner` is
//! not an error; the tweet renders as "Unknown User".

use super::Tweet;
use crate::error::FetchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct TweetListEnvelope {
    #[serde(rename = "statusCode")]
    status_code: TweetListBody,
}

#[derive(Debug, Deserialize)]
struct TweetListBody {
    data: TweetListData,
}

#[derive(Debug, Deserialize)]
struct TweetListData {
    tweets: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewTweet<'a> {
    pub content: &'a str,
}

pub fn parse_tweet_list(body: &str) -> Result<Vec<Tweet>, FetchError> {
    let envelope: TweetListEnvelope = serde_json::from_str(body)?;
    Ok(envelope.status_code.data.tweets)
}

pub fn parse_toggle_message(body: &str) -> Result<String, FetchError> {
    let response: MessageResponse = serde_json::from_str(body)?;
    Ok(response.message)
}
