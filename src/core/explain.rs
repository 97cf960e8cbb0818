//! Natural-language explanations of errors and log events.
//!
//! [`ExplanationGateway`] is the seam to an external model. [`Explainer`] wraps a
//! gateway and always yields displayable text: a sentinel when the gateway is not
//! configured, an error line when the call fails, the model's prose otherwise.

use std::fmt;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::diagnostics::DiagnosticEvent;
use crate::error::{DiagError, Result};

/// Returned by [`Explainer`] when no gateway is configured
pub const GATEWAY_UNAVAILABLE: &str =
    "AI analysis not available. Set the SCANTOOL_API_KEY or OPENAI_API_KEY environment variable.";

/// Environment variables searched, in order, for the gateway API key
pub const API_KEY_VARS: [&str; 2] = ["SCANTOOL_API_KEY", "OPENAI_API_KEY"];

pub const DEFAULT_GATEWAY_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_GATEWAY_MODEL: &str = "gpt-3.5-turbo";

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.3;

const ERROR_PROMPT: &str = "You are a helpful system diagnostic assistant. Analyze the following \
error message and provide a clear explanation of what it means and suggest possible solutions.";

const EVENT_PROMPT: &str = "You are a helpful system diagnostic assistant. Analyze the following \
Windows event log entry and provide a clear explanation of what it means, its potential impact \
on the system, and suggest possible solutions or actions to address it.";

/// The fields of a log event that are sent for explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventIdentity {
    pub id: i64,
    pub source: String,
    pub log_name: String,
    pub message: String,
}

impl From<&DiagnosticEvent> for EventIdentity {
    fn from(event: &DiagnosticEvent) -> Self {
        Self {
            id: event.event_id,
            source: event.source.clone(),
            log_name: event.log_name.to_string(),
            message: event.message.clone(),
        }
    }
}

impl fmt::Display for EventIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event ID: {}\nSource: {}\nLog: {}\nMessage: {}",
            self.id, self.source, self.log_name, self.message
        )
    }
}

#[async_trait]
pub trait ExplanationGateway: Send + Sync {
    /// Whether the gateway is configured well enough to be called
    fn is_available(&self) -> bool;

    async fn explain(&self, text: &str) -> Result<String>;

    async fn explain_event(&self, event: &EventIdentity) -> Result<String>;
}

/// Infallible front end over an [`ExplanationGateway`]
pub struct Explainer {
    gateway: Box<dyn ExplanationGateway>,
}

impl Explainer {
    pub fn new(gateway: Box<dyn ExplanationGateway>) -> Self {
        Self { gateway }
    }

    pub fn is_available(&self) -> bool {
        self.gateway.is_available()
    }

    pub async fn explain_text(&self, text: &str) -> String {
        if !self.gateway.is_available() {
            return GATEWAY_UNAVAILABLE.to_string();
        }

        info!("Analyzing error with AI: {}...", preview(text));
        match self.gateway.explain(text).await {
            Ok(explanation) => explanation,
            Err(e) => {
                error!("Error during AI analysis: {}", e);
                format!("Error during AI analysis: {}", e)
            }
        }
    }

    pub async fn explain_event(&self, event: &EventIdentity) -> String {
        if !self.gateway.is_available() {
            return GATEWAY_UNAVAILABLE.to_string();
        }

        info!(
            "Analyzing system event with AI: Event ID {} from {}",
            event.id, event.source
        );
        match self.gateway.explain_event(event).await {
            Ok(explanation) => explanation,
            Err(e) => {
                error!("Error during AI analysis of system event: {}", e);
                format!("Error during AI analysis: {}", e)
            }
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
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
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Gateway for OpenAI-compatible chat-completions endpoints
pub struct OpenAiGateway {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiGateway {
    pub fn new(url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Build a gateway whose key comes from the first non-empty [`API_KEY_VARS`] entry
    pub fn from_env(url: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty());

        if api_key.is_none() {
            debug!("No gateway API key found in {}", API_KEY_VARS.join(" or "));
        }

        Self::new(url, model, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DiagError::gateway("API key not configured"))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DiagError::gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = failure_detail(status.as_u16(), &body);
            warn!("AI analysis failed: {}", detail);
            return Ok(format!("AI analysis failed: {}", detail));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| DiagError::gateway(format!("Invalid gateway response: {}", e)))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DiagError::gateway("Gateway response contained no choices"))?;

        info!("AI analysis completed successfully");
        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl ExplanationGateway for OpenAiGateway {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn explain(&self, text: &str) -> Result<String> {
        self.complete(ERROR_PROMPT, text).await
    }

    async fn explain_event(&self, event: &EventIdentity) -> Result<String> {
        self.complete(EVENT_PROMPT, &event.to_string()).await
    }
}

/// Error message reported by the endpoint, or the bare status when the body
/// carries none
fn failure_detail(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| format!("HTTP {}", status))
}
