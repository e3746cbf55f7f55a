// src/messaging/line.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::{error::AppError, messaging::Broadcaster};

const BROADCAST_PATH: &str = "/v2/bot/message/broadcast";
const RETRY_KEY_HEADER: &str = "x-line-retry-key";

/// LINE rejects text messages longer than this.
pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, Serialize)]
struct BroadcastRequest<'a> {
    messages: Vec<TextMessage<'a>>,
    #[serde(rename = "notificationDisabled")]
    notification_disabled: bool,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Broadcasts through the LINE Messaging API to every friend of the channel.
pub struct LineBroadcaster {
    client: Client,
    endpoint: Url,
    access_token: String,
}

impl LineBroadcaster {
    pub fn new(api_base: &Url, access_token: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AppError::InternalServerError(format!("Failed to create HTTP client: {}", e))
            })?;

        let endpoint = api_base.join(BROADCAST_PATH).map_err(|e| {
            AppError::InternalServerError(format!("Invalid LINE API base URL: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.into(),
        })
    }

    /// Get headers with authentication and a fresh retry key
    fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|_| AppError::InternalServerError("Invalid LINE access token".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        // Lets LINE drop duplicates if the request is retried.
        let retry_key = HeaderValue::from_str(&Uuid::new_v4().to_string())
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        headers.insert(RETRY_KEY_HEADER, retry_key);

        Ok(headers)
    }
}

#[async_trait]
impl Broadcaster for LineBroadcaster {
    async fn broadcast(&self, text: &str) -> Result<(), AppError> {
        let full_len = text.len();
        let text = truncate_chars(text, MAX_TEXT_CHARS);
        if text.len() < full_len {
            tracing::warn!(
                max_chars = MAX_TEXT_CHARS,
                dropped_bytes = full_len - text.len(),
                "Broadcast text truncated"
            );
        }

        let body = BroadcastRequest {
            messages: vec![TextMessage { kind: "text", text }],
            notification_disabled: false,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::BadGateway(format!(
                "LINE broadcast failed with {}: {}",
                status, detail
            )));
        }

        tracing::info!(chars = text.chars().count(), "Broadcast delivered");
        Ok(())
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
