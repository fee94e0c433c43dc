//! Model gateway — the single point of entry for all scoring-oracle calls.
//!
//! ARCHITECTURAL RULE: no other module may call the OpenAI API directly.
//! All model interactions MUST go through this module.
//!
//! The gateway makes exactly one attempt per invocation. Failures are
//! terminal for the current request; retry, timeout, and cancellation
//! policy belong to the caller, never here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The model used for all assessment calls.
/// Intentionally hardcoded: scoring behavior must not drift with config.
pub const MODEL: &str = "gpt-4-turbo-preview";

/// Very low temperature for consistency across identical inputs.
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

/// Raw result of one oracle invocation: unparsed text plus telemetry.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub raw_text: String,
    pub tokens_used: u32,
    pub system_fingerprint: Option<String>,
}

/// The scoring-oracle contract consumed by the analysis pipeline.
/// Carried in `AppState` as `Arc<dyn ModelGateway>` so orchestrator
/// tests can substitute a scripted gateway.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends the composed prompts with the deterministic seed and returns
    /// raw text plus usage telemetry. May suspend for the duration of the
    /// remote call; one attempt only.
    async fn invoke(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        seed: u64,
    ) -> Result<GatewayResponse, GatewayError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat<'a>,
    seed: u64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
    system_fingerprint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// OpenAI Chat Completions client configured for low-temperature,
/// single-JSON-object output with the seed passed through unmodified.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiClient {
    async fn invoke(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        seed: u64,
    ) -> Result<GatewayResponse, GatewayError> {
        let request_body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            seed,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        let tokens_used = chat_response
            .usage
            .as_ref()
            .map(|u| u.total_tokens)
            .unwrap_or(0);
        let system_fingerprint = chat_response.system_fingerprint;

        let raw_text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(GatewayError::EmptyContent)?;

        debug!(
            "model call succeeded: seed={}, total_tokens={}",
            seed, tokens_used
        );

        Ok(GatewayResponse {
            raw_text,
            tokens_used,
            system_fingerprint,
        })
    }
}
