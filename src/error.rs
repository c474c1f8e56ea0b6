//! Error taxonomy for the feed contract.
//!
//! `ValidationError` is raised locally before any request is issued.
//! `FetchError` covers every way a remote call can fail, including a
//! response that does not decode into the expected records.

use thiserror::Error;

/// The user action a login requirement was checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Tweet,
    Like,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Tweet content cannot be empty")]
    EmptyContent,
    #[error("{}", login_message(.0))]
    LoginRequired(Action),
}

fn login_message(action: &Action) -> &'static str {
    match action {
        Action::Tweet => "Login to Tweet",
        Action::Like => "Login to Like tweet",
    }
}

/// Cloneable so results can be passed across task channels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
