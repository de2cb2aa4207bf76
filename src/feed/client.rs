//! Text-generation collaborator clients

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Instruction sent with every request
pub const TRANSMISSION_PROMPT: &str = "Write one short radio transmission overheard in a neon-lit, \
    surveilled megacity at night. Under 15 words. Terse dystopian chatter. No quotes, no preamble.";

/// Source of ambient transmissions
#[async_trait]
pub trait TextCollaborator: Send + Sync {
    /// Request one short transmission
    async fn transmission(&self) -> Result<String, FeedError>;
}

/// OpenAI-style chat-completions client
#[derive(Clone)]
pub struct HttpCollaborator {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl HttpCollaborator {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FeedError::Request)?;

        Ok(Self {
            client,
            url: url.into(),
            api_key,
            model: model.into(),
        })
    }
}

#[async_trait]
impl TextCollaborator for HttpCollaborator {
    async fn transmission(&self) -> Result<String, FeedError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: TRANSMISSION_PROMPT,
            }],
            max_tokens: 40,
            temperature: 1.0,
        };

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(FeedError::Request)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(FeedError::Parse)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        clean_transmission(&text).ok_or(FeedError::Empty)
    }
}

/// Used when no endpoint is configured; every request falls back
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCollaborator;

#[async_trait]
impl TextCollaborator for OfflineCollaborator {
    async fn transmission(&self) -> Result<String, FeedError> {
        Err(FeedError::Offline)
    }
}

/// Trim whitespace and wrapping quotes; `None` if nothing is left
pub fn clean_transmission(raw: &str) -> Option<String> {
    let text = raw
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}'))
        .trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Feed collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),

    #[error("Collaborator returned no text")]
    Empty,

    #[error("Request timed out")]
    Timeout,

    #[error("No collaborator configured")]
    Offline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_quotes_and_whitespace() {
        assert_eq!(
            clean_transmission("  \"Unit 7, hold the overpass.\"\n"),
            Some("Unit 7, hold the overpass.".to_string())
        );
        assert_eq!(clean_transmission(" \u{201c}Curfew in ten.\u{201d} "), Some("Curfew in ten.".to_string()));
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(clean_transmission("   "), None);
        assert_eq!(clean_transmission("\"\""), None);
    }

    #[test]
    fn parses_chat_response_shape() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Sector nine is dark."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).expect("valid response");
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Sector nine is dark."));

        let empty: ChatResponse = serde_json::from_str("{}").expect("empty object");
        assert!(empty.choices.is_empty());
    }

    #[tokio::test]
    async fn offline_always_fails() {
        assert!(matches!(OfflineCollaborator.transmission().await, Err(FeedError::Offline)));
    }
}
