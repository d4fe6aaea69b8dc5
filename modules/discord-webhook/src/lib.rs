pub mod error;
pub mod types;

pub use error::{Result, WebhookError};
pub use types::{Embed, EmbedField, EmbedFooter, EmbedImage, WebhookMessage};

use std::time::Duration;

use reqwest::StatusCode;

/// Wait applied when a 429 response carries no usable `retry_after`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

/// How a message was delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Accepted on the first attempt (204).
    Delivered,
    /// Rate limited, waited `retry_after`, posted once more. `status` is the
    /// retry's status; it is reported as-is and never retried again.
    Retried { retry_after: Duration, status: u16 },
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        match self {
            Delivery::Delivered => true,
            Delivery::Retried { status, .. } => *status == StatusCode::NO_CONTENT.as_u16(),
        }
    }
}

/// Client for a single Discord incoming webhook url.
pub struct WebhookClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookClient {
    pub fn new(webhook_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            webhook_url: webhook_url.to_string(),
        }
    }

    /// Post a message.
    ///
    /// - 204: `Delivery::Delivered`
    /// - 429: sleep for the body's `retry_after` (default 5s), post exactly
    ///   once more, return `Delivery::Retried` with that attempt's status
    /// - anything else: `WebhookError::Api` with status and body, no retry
    pub async fn execute(&self, message: &WebhookMessage) -> Result<Delivery> {
        let resp = self.post(message).await?;
        let status = resp.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(Delivery::Delivered);
        }

        let body = resp.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_from_body(&body);
            tracing::warn!(
                retry_after_secs = retry_after.as_secs_f64(),
                "Webhook rate limited, waiting before single retry"
            );
            tokio::time::sleep(retry_after).await;

            let retry = self.post(message).await?;
            return Ok(Delivery::Retried {
                retry_after,
                status: retry.status().as_u16(),
            });
        }

        Err(WebhookError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn post(&self, message: &WebhookMessage) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?)
    }
}

/// Read `retry_after` (seconds, possibly fractional) from a 429 body.
pub fn retry_after_from_body(body: &str) -> Duration {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("retry_after").and_then(|r| r.as_f64()))
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}
