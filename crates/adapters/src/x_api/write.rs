//! X API write adapter for publishing posts

use async_trait::async_trait;
use memo_poster_domain::{PublishError, PublishReceipt, Publisher};
use reqwest::Client;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::oauth1::OAuth1Signer;

/// OAuth 1.0a user-context credentials for the X API
pub struct XCredentials {
    pub api_key: String,
    pub api_secret: SecretString,
    pub access_token: String,
    pub access_secret: SecretString,
}

/// X API publisher for creating posts
pub struct XPublisher {
    client: Client,
    signer: Option<OAuth1Signer>,
    base_url: String,
    max_chars: usize,
    enabled: bool,
}

impl XPublisher {
    pub fn new(credentials: XCredentials, max_chars: usize) -> Self {
        Self::with_base_url(
            credentials,
            "https://api.x.com".to_string(),
            max_chars,
            true,
        )
    }

    pub fn with_base_url(
        credentials: XCredentials,
        base_url: String,
        max_chars: usize,
        enabled: bool,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let signer = OAuth1Signer::new(
            credentials.api_key,
            credentials.api_secret,
            credentials.access_token,
            credentials.access_secret,
        );

        Self {
            client,
            signer: Some(signer),
            base_url,
            max_chars,
            enabled,
        }
    }

    /// Create a disabled publisher (for testing/dry-run)
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            signer: None,
            base_url: String::new(),
            max_chars: 280,
            enabled: false,
        }
    }
}

#[derive(Serialize)]
struct CreateTweetRequest {
    text: String,
}

#[derive(Deserialize)]
struct CreateTweetResponse {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

#[async_trait]
impl Publisher for XPublisher {
    async fn publish(&self, text: &str) -> Result<PublishReceipt, PublishError> {
        let Some(signer) = self.signer.as_ref() else {
            return Err(PublishError::Api("Publisher is disabled".to_string()));
        };

        // The platform limit counts characters, not bytes
        let len = text.chars().count();
        if len > self.max_chars {
            return Err(PublishError::ContentTooLong {
                len,
                max: self.max_chars,
            });
        }

        let request = CreateTweetRequest {
            text: text.to_string(),
        };

        let url = format!("{}/2/tweets", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", signer.authorization_header("POST", &url))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        if response.status() == 401 {
            return Err(PublishError::Auth("Invalid credentials".to_string()));
        }

        if response.status() == 429 {
            return Err(PublishError::RateLimited);
        }

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api(format!(
                "Failed to create tweet: {}",
                body
            )));
        }

        let tweet_response: CreateTweetResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        Ok(PublishReceipt {
            id: tweet_response.data.id.clone(),
            url: Some(format!("https://x.com/i/status/{}", tweet_response.data.id)),
        })
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn platform(&self) -> &'static str {
        "x"
    }
}
