use std::time::Duration;

use anyhow::Context as _;
use policy_config::RetryConfig;
use policy_domain::{AnswerSource, ChatMessage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;
use crate::retry::retry_with_config;

/// Answers questions through a deployed chat service exposing `POST /chat`.
pub struct HttpChatSource {
    client: Client,
    url: Url,
    retry: RetryConfig,
}

impl HttpChatSource {
    /// `base_url` is the service root; a trailing `/` is ignored.
    pub fn new(base_url: &str, timeout: Duration, retry: RetryConfig) -> anyhow::Result<Self> {
        let endpoint = format!("{}/chat", base_url.trim_end_matches('/'));
        let url = Url::parse(&endpoint).with_context(|| format!("Invalid service URL {base_url}"))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, url, retry })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<String, Error> {
        let response = self.client.post(self.url.clone()).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatResponse>(&body)
                .ok()
                .and_then(|response| response.error)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(Error::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let response: ChatResponse = serde_json::from_str(&body).map_err(|e| Error::Malformed {
            url: self.url.to_string(),
            reason: e.to_string(),
        })?;

        response
            .response
            .ok_or_else(|| Error::MissingField { url: self.url.to_string(), field: "response" })
    }
}

#[async_trait::async_trait]
impl AnswerSource for HttpChatSource {
    async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String> {
        let request = ChatRequest { message: question, history };
        let (this, request) = (self, &request);
        Ok(retry_with_config(&self.retry, move || this.send(request)).await?)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: Option<String>,
    error: Option<String>,
}
