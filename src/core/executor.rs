//! Request/retry executor: one turn against the completion endpoint.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{ChatMessage, ChatRequest, ChatResponse};
use crate::core::config::Config;
use crate::core::credentials::ApiKey;
use crate::core::message::{Message, Transcript};
use crate::ui::console::Console;

/// Fixed-count retry with a constant delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Everything the HTTP transport needs, built once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn from_config(config: &Config, api_key: ApiKey, base_url: Option<&str>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| config.base_url()).to_string(),
            timeout: config.request_timeout(),
            retry: RetryPolicy {
                max_attempts: config.max_attempts(),
                delay: config.retry_delay(),
            },
        }
    }

    pub fn chat_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

/// Why a single attempt failed. Every variant is retryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// Endpoint answered with a non-success status.
    Status { code: u16, body: String },
    /// Connection, timeout, or body read failure.
    Transport(String),
    /// Success status but the body did not carry a reply.
    Malformed(String),
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Status { code, body } => {
                write!(f, "HTTP {code}: {}", summarize_error_body(body))
            }
            RequestFailure::Transport(reason) => write!(f, "{reason}"),
            RequestFailure::Malformed(reason) => write!(f, "Unexpected response: {reason}"),
        }
    }
}

impl std::error::Error for RequestFailure {}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Single-line description of an error body: the provider's message when
/// the body is JSON, else the collapsed raw text.
pub fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value).filter(|s| !s.is_empty()) {
            return summary;
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the reply text from a raw success body.
pub fn parse_reply(body: &str) -> Result<String, RequestFailure> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|err| RequestFailure::Malformed(format!("invalid JSON ({err})")))?;
    response
        .first_content()
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            RequestFailure::Malformed("missing choices[0].message.content".to_string())
        })
}

/// One request per call; retries are the executor's job.
#[async_trait]
pub trait ChatTransport {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, RequestFailure>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    chat_url: String,
    api_key: ApiKey,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            chat_url: config.chat_url(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, RequestFailure> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.iter().map(ChatMessage::from).collect(),
        };

        let response = self
            .client
            .post(&self.chat_url)
            .header("Content-Type", "application/json")
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|err| RequestFailure::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RequestFailure::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(RequestFailure::Status {
                code: status.as_u16(),
                body,
            });
        }

        parse_reply(&body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied { reply: String, attempts: u32 },
    Exhausted { attempts: u32, last_failure: RequestFailure },
}

impl TurnOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            TurnOutcome::Replied { attempts, .. } | TurnOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }
}

pub struct RequestExecutor<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: ChatTransport> RequestExecutor<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one turn. The transcript only changes when a reply arrives.
    pub async fn run_turn<W: Write>(
        &self,
        transcript: &mut Transcript,
        model: &str,
        console: &mut Console<W>,
    ) -> io::Result<TurnOutcome> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, model, messages = transcript.len(), "sending chat request");

            match self.transport.complete(model, transcript.messages()).await {
                Ok(reply) => {
                    let message = transcript.push_assistant(reply);
                    console.reply_panel(&message.content)?;
                    return Ok(TurnOutcome::Replied {
                        reply: message.content.clone(),
                        attempts: attempt,
                    });
                }
                Err(failure) => {
                    warn!(attempt, %failure, "chat request failed");
                    console.error(&format!(
                        "Error talking to AI (attempt {attempt}): {failure}"
                    ))?;

                    if attempt >= max_attempts {
                        console.alert(&format!(
                            "Failed to get a response after {max_attempts} attempts. Moving on."
                        ))?;
                        return Ok(TurnOutcome::Exhausted {
                            attempts: attempt,
                            last_failure: failure,
                        });
                    }

                    if !self.policy.delay.is_zero() {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }
    }
}
