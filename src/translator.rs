//! Translation backend client.
//!
//! Talks to the Anthropic Messages API. Each call translates the entire
//! accumulated transcript; fragments translated independently lose
//! grammatical coherence across sentence boundaries, so callers never send
//! deltas here.

use crate::languages::Language;
use crate::pipeline::{EventSender, PipelineEvent};
use crate::settings;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 1000;

/// One translation attempt. `seq` orders resolutions: the pipeline applies a
/// result only if no newer attempt has been applied before it.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub seq: u64,
    pub text: String,
    pub target: Language,
}

/// Dispatches translation calls. The outcome must be delivered as a
/// `TranslationResolved` event carrying the request's `seq`; the call itself
/// is fire-and-forget from the pipeline's point of view.
pub trait TranslationBackend: Send + Sync {
    fn dispatch(&self, request: TranslationRequest, events: EventSender);
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

fn build_headers(api_key: &str) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        "x-api-key",
        HeaderValue::from_str(api_key).map_err(|e| format!("Invalid API key header value: {}", e))?,
    );
    headers.insert(
        "anthropic-version",
        HeaderValue::from_static(ANTHROPIC_VERSION),
    );

    Ok(headers)
}

fn build_prompt(text: &str, target: &Language) -> String {
    format!(
        "Translate the following text to {} ({}), keeping the same meaning:\n\n\"{}\"\n\nOnly provide the translation, without explanations or additional text.",
        target.display_name, target.native_name, text
    )
}

/// Client for the Anthropic Messages API. API key, model, and base URL are
/// read from the environment on every call.
pub struct ClaudeTranslator;

impl ClaudeTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Translate `text` into `target`. Empty input short-circuits to an empty
    /// result without touching the network. One attempt, no retry.
    pub async fn translate(text: &str, target: &Language) -> Result<String, String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let api_key =
            settings::api_key().ok_or_else(|| "PARROT_API_KEY is not set".to_string())?;
        let url = format!("{}/v1/messages", settings::base_url());

        debug!("Sending translation request to: {}", url);

        let headers = build_headers(&api_key)?;
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        let request_body = MessagesRequest {
            model: settings::model(),
            max_tokens: MAX_OUTPUT_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: build_prompt(text, target),
            }],
        };

        let response = client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(format!(
                "Translation request failed with status {}: {}",
                status, error_text
            ));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse API response: {}", e))?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.trim().to_string())
            .ok_or_else(|| "No text in translation response".to_string())?;

        Ok(text)
    }
}

impl Default for ClaudeTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationBackend for ClaudeTranslator {
    fn dispatch(&self, request: TranslationRequest, events: EventSender) {
        tokio::spawn(async move {
            let result = Self::translate(&request.text, &request.target).await;
            let _ = events.send(PipelineEvent::TranslationResolved {
                seq: request.seq,
                result,
            });
        });
    }
}

/// Tags the source text with the target code instead of translating it, for
/// exercising the pipeline without network access.
pub struct EchoTranslator;

impl TranslationBackend for EchoTranslator {
    fn dispatch(&self, request: TranslationRequest, events: EventSender) {
        let result = if request.text.trim().is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("[{}] {}", request.target.code, request.text))
        };
        let _ = events.send(PipelineEvent::TranslationResolved {
            seq: request.seq,
            result,
        });
    }
}
