/// LLM Client: the single point of entry for all model calls in AgroSense.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Flows depend on the `ModelInvoker` trait; `LlmClient` is the production
/// implementation and tests inject a stub.
///
/// Model: claude-sonnet-4-5 (hardcoded, do not make configurable to prevent drift)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::media::DataUri;

pub mod prompts;
#[cfg(test)]
pub mod testing;

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in AgroSense.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM call timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(err)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Invocation contract
// ────────────────────────────────────────────────────────────────────────────

/// The shape a model answer must take, sent to the model as a forced tool.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    /// Tool name; must match `^[a-zA-Z0-9_-]{1,64}$`.
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema object.
    pub schema: Value,
}

/// Everything one model call needs: the rendered prompt, an optional image
/// part and the output schema.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: &'static str,
    pub prompt: String,
    pub image: Option<DataUri>,
    pub output: OutputSchema,
}

/// A hosted model that answers a prompt with JSON conforming to an output schema.
///
/// Carried in `AppState` as `Arc<dyn ModelInvoker>`.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Returns the structured answer, unvalidated. Callers check it against
    /// their own record types.
    async fn invoke(&self, request: &ModelRequest) -> Result<Value, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    tools: Vec<ToolDefinition<'a>>,
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RequestBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'a str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
    pub name: Option<String>,
    pub input: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }

    /// The `input` of the first `tool_use` block addressed to `tool`.
    pub fn tool_input(&self, tool: &str) -> Option<&Value> {
        self.content
            .iter()
            .find(|b| b.block_type == "tool_use" && b.name.as_deref() == Some(tool))
            .and_then(|b| b.input.as_ref())
    }

    /// The structured answer: the forced tool's input, or failing that the
    /// text block parsed as JSON.
    pub fn structured_output(&self, tool: &str) -> Result<Value, LlmError> {
        let value = match self.tool_input(tool) {
            Some(input) => input.clone(),
            None => {
                let text = strip_json_fences(self.text().unwrap_or_default());
                if text.is_empty() {
                    return Err(LlmError::EmptyContent);
                }
                serde_json::from_str(text)?
            }
        };

        if is_empty_value(&value) {
            return Err(LlmError::EmptyContent);
        }
        Ok(value)
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

fn build_request_body(request: &ModelRequest) -> AnthropicRequest<'_> {
    let mut content = Vec::with_capacity(2);
    if let Some(image) = &request.image {
        content.push(RequestBlock::Image {
            source: ImageSource {
                source_type: "base64",
                media_type: &image.mime_type,
                data: &image.data,
            },
        });
    }
    content.push(RequestBlock::Text {
        text: &request.prompt,
    });

    AnthropicRequest {
        model: MODEL,
        max_tokens: MAX_TOKENS,
        system: request.system,
        messages: vec![AnthropicMessage {
            role: "user",
            content,
        }],
        tools: vec![ToolDefinition {
            name: request.output.name,
            description: request.output.description,
            input_schema: &request.output.schema,
        }],
        tool_choice: ToolChoice {
            choice_type: "tool",
            name: request.output.name,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by both flows.
/// Wraps the Anthropic Messages API. One attempt per call: failures go straight
/// back to the caller.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url,
        })
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    pub async fn call(&self, request: &ModelRequest) -> Result<LlmResponse, LlmError> {
        let body = build_request_body(request);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Err(api_error(status.as_u16(), body));
        }

        let llm_response: LlmResponse = response.json().await.map_err(LlmError::from_transport)?;

        debug!(
            "LLM call succeeded: tool={}, stop_reason={:?}, input_tokens={}, output_tokens={}",
            request.output.name,
            llm_response.stop_reason,
            llm_response.usage.input_tokens,
            llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl ModelInvoker for LlmClient {
    async fn invoke(&self, request: &ModelRequest) -> Result<Value, LlmError> {
        let response = self.call(request).await?;
        response.structured_output(request.output.name)
    }
}

/// Prefers the message inside Anthropic's error envelope, else the raw body.
fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<AnthropicError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// `null`, `{}` and blank strings carry no answer.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let stripped = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match stripped {
        Some(inner) => inner
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(inner.trim_start()),
        None => text,
    }
}
