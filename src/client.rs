//! HTTP client for the backend API, used by the client UI.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::model::Post;

const SUBSCRIBE_FALLBACK_MSG: &str = "Subscription failed";

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub http_client: Client,
    pub base_url: reqwest::Url,
}

/// What the user is told after submitting the subscription form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    /// Carries the server's error text, or a generic fallback if it sent none.
    Rejected(String),
}

impl SubscribeOutcome {
    pub fn message(&self) -> &str {
        match self {
            SubscribeOutcome::Subscribed => "Successfully subscribed!",
            SubscribeOutcome::Rejected(msg) => msg,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubscribeOutcome::Subscribed)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://127.0.0.1:5000/api`.
    pub fn new<S: AsRef<str>>(base_url: S, timeout: std::time::Duration) -> Result<Self> {
        // Without the trailing slash `Url::join` would replace the last path segment.
        let mut base_url = base_url.as_ref().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url =
            reqwest::Url::parse(&base_url).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(ApiClient {
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::UrlParsing(e.to_string()))
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = self
            .http_client
            .get(self.endpoint("posts")?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(posts)
    }

    /// Never fails: every failure is folded into `SubscribeOutcome::Rejected`.
    #[tracing::instrument(name = "Submitting subscription", skip(self))]
    pub async fn subscribe(&self, email: &str) -> SubscribeOutcome {
        let url = match self.endpoint("subscribe") {
            Ok(url) => url,
            Err(er) => {
                warn!("{er}");
                return SubscribeOutcome::Rejected(SUBSCRIBE_FALLBACK_MSG.to_string());
            }
        };

        let resp = match self
            .http_client
            .post(url)
            .json(&json!({ "email": email }))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(er) => {
                warn!("subscription request failed: {er}");
                return SubscribeOutcome::Rejected(SUBSCRIBE_FALLBACK_MSG.to_string());
            }
        };

        if resp.status().is_success() {
            return SubscribeOutcome::Subscribed;
        }

        let status = resp.status();
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| SUBSCRIBE_FALLBACK_MSG.to_string());
        debug!(%status, error_message = %message, "subscription rejected");

        SubscribeOutcome::Rejected(message)
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
