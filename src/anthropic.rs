//! Minimal Anthropic Messages API client for our use-case.
//!
//! We only send a single user turn made of one base64 image block and one text block,
//! and read back the first content block. Calls are instrumented and log the model,
//! latency and token usage (not contents).
//!
//! NOTE: We never log the API key or the image payload.

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const API_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct Anthropic {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
}

impl Anthropic {
  /// Construct the client if we find ANTHROPIC_API_KEY; `Ok(None)` when it is unset or blank.
  /// A key that is set but yields no usable HTTP client is an error.
  pub fn from_env(timeout: Duration) -> Result<Option<Self>, ProviderError> {
    let Some(api_key) = std::env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.trim().is_empty()) else {
      return Ok(None);
    };
    let base_url = std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
    Self::new(api_key, base_url, model, timeout).map(Some)
  }

  pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self, ProviderError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| ProviderError::Transport(e.to_string()))?;
    let base_url = base_url.trim_end_matches('/').to_string();
    Ok(Self { client, api_key, base_url, model })
  }

  /// Ask the model about one image. Returns the first content block if it is text,
  /// `None` when the reply carries no text block.
  #[instrument(level = "info", skip_all, fields(model = %self.model, media_type = %media_type, max_tokens = max_tokens, image_len = image_base64.len(), prompt_len = prompt.len()))]
  pub async fn describe_image(
    &self,
    media_type: &str,
    image_base64: &str,
    prompt: &str,
    max_tokens: u32,
  ) -> Result<Option<String>, ProviderError> {
    let url = format!("{}/v1/messages", self.base_url);
    let req = MessagesRequest {
      model: &self.model,
      max_tokens,
      messages: vec![MessageReq {
        role: "user",
        content: vec![
          ContentBlockReq::Image {
            source: ImageSource { kind: "base64", media_type, data: image_base64 },
          },
          ContentBlockReq::Text { text: prompt },
        ],
      }],
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "gracitecture-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .json(&req).send().await
      .map_err(|e| ProviderError::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_anthropic_error(&body).unwrap_or(body);
      error!(elapsed = ?start.elapsed(), status = status.as_u16(), "Anthropic call failed");
      return Err(ProviderError::Status { status: status.as_u16(), message });
    }

    let body: MessagesResponse = res.json().await.map_err(|e| ProviderError::Decode(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(elapsed = ?start.elapsed(), input_tokens = ?usage.input_tokens, output_tokens = ?usage.output_tokens, "Anthropic usage");
    }

    Ok(first_text_block(body.content))
  }
}

fn first_text_block(content: Vec<ContentBlockResp>) -> Option<String> {
  match content.into_iter().next() {
    Some(ContentBlockResp::Text { text }) => Some(text),
    _ => None,
  }
}

// --- Messages DTOs ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
  model: &'a str,
  max_tokens: u32,
  messages: Vec<MessageReq<'a>>,
}
#[derive(Serialize)]
struct MessageReq<'a> { role: &'a str, content: Vec<ContentBlockReq<'a>> }
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockReq<'a> {
  Image { source: ImageSource<'a> },
  Text { text: &'a str },
}
#[derive(Serialize)]
struct ImageSource<'a> {
  #[serde(rename = "type")]
  kind: &'a str,
  media_type: &'a str,
  data: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
  #[serde(default)] content: Vec<ContentBlockResp>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResp {
  Text { text: String },
  #[serde(other)]
  Other,
}
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] input_tokens: Option<u32>,
  #[serde(default)] output_tokens: Option<u32>,
}

/// Try to extract a clean error message from an Anthropic error body.
fn extract_anthropic_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
