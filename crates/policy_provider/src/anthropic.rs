use anyhow::Context as _;
use policy_config::{PolicyConfig, RetryConfig, SystemPrompt};
use policy_domain::{AnswerSource, ChatMessage, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;
use crate::retry::retry_with_config;

/// Answers questions by calling the Anthropic Messages API directly, with the
/// assembled system prompt in front of every conversation.
pub struct AnthropicSource {
    client: Client,
    url: Url,
    api_key: String,
    version: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: SystemPrompt,
    retry: RetryConfig,
}

impl AnthropicSource {
    pub fn new(
        config: &PolicyConfig,
        api_key: impl Into<String>,
        system: SystemPrompt,
    ) -> anyhow::Result<Self> {
        let url = config
            .anthropic_url
            .join("messages")
            .with_context(|| format!("Invalid Anthropic URL {}", config.anthropic_url))?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            api_key: api_key.into(),
            version: config.anthropic_version.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system,
            retry: config.retry.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> Result<String, Error> {
        let response = self
            .client
            .post(self.url.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.version)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let response: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| Error::Malformed {
                url: self.url.to_string(),
                reason: e.to_string(),
            })?;

        response.text().ok_or_else(|| Error::MissingField {
            url: self.url.to_string(),
            field: "content[].text",
        })
    }
}

#[async_trait::async_trait]
impl AnswerSource for AnthropicSource {
    async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String> {
        let messages = history
            .iter()
            .map(|message| Message { role: message.role, content: &message.content })
            .chain(std::iter::once(Message { role: Role::User, content: question }))
            .collect();

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: self.system.as_str(),
            messages,
        };

        let (this, request) = (self, &request);
        let answer = retry_with_config(&self.retry, move || this.send(request)).await?;
        tracing::debug!(model = %self.model, chars = answer.chars().count(), "Anthropic answered");
        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    /// Concatenated text of all text blocks, `None` if there are none.
    fn text(self) -> Option<String> {
        let texts: Vec<String> = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();

        (!texts.is_empty()).then(|| texts.concat())
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Pulls the message out of an Anthropic error envelope, falling back to the
/// raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!("{}: {}", envelope.error.kind, envelope.error.message),
        Err(_) => body.chars().take(200).collect(),
    }
}
