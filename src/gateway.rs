//! Analysis gateway: validates an uploaded image, templates the initial or follow-up
//! prompt, relays both to the model provider and hands back the reply text.

use tracing::{error, info, instrument, warn};

use crate::anthropic::Anthropic;
use crate::config::{AnalysisSettings, Prompts};
use crate::domain::ChatMessage;
use crate::error::{AnalyzeError, ProviderError};
use crate::util::{fill_template, trunc_for_log};

/// Media types the provider documents for image input.
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A `data:<media-type>;base64,<payload>` URI split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
  pub media_type: &'a str,
  pub payload: &'a str,
}

/// Split a data URI. Both parts must be non-empty and single-line; the media type
/// runs up to the last `;base64,` marker.
pub fn parse_data_uri(s: &str) -> Result<DataUri<'_>, AnalyzeError> {
  let rest = s.strip_prefix("data:").ok_or(AnalyzeError::InvalidImage)?;
  let idx = rest.rfind(";base64,").ok_or(AnalyzeError::InvalidImage)?;
  let media_type = &rest[..idx];
  let payload = &rest[idx + ";base64,".len()..];
  let single_line = |p: &str| !p.is_empty() && !p.contains(['\n', '\r']);
  if !single_line(media_type) || !single_line(payload) {
    return Err(AnalyzeError::InvalidImage);
  }
  Ok(DataUri { media_type, payload })
}

/// One `/api/analyze` call, already decoded from the wire. Follow-up history is
/// optional here so the image is always validated first.
#[derive(Debug, Clone, Copy)]
pub enum AnalysisRequest<'a> {
  Initial,
  FollowUp { messages: Option<&'a [ChatMessage]>, initial_analysis: Option<&'a str> },
}

/// Render the conversation as `Student:` / `You:` lines separated by a blank line.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
  messages
    .iter()
    .map(|m| format!("{}: {}", m.role.transcript_label(), m.content))
    .collect::<Vec<_>>()
    .join("\n\n")
}

#[derive(Clone)]
pub struct AnalysisGateway {
  provider: Option<Anthropic>,
  prompts: Prompts,
  settings: AnalysisSettings,
}

impl AnalysisGateway {
  pub fn new(provider: Option<Anthropic>, prompts: Prompts, settings: AnalysisSettings) -> Self {
    Self { provider, prompts, settings }
  }

  pub fn is_configured(&self) -> bool {
    self.provider.is_some()
  }

  pub fn settings(&self) -> &AnalysisSettings {
    &self.settings
  }

  /// The prompt text and token budget for a request. Follow-ups need both a
  /// non-empty history and the earlier analysis.
  pub fn build_prompt(&self, req: &AnalysisRequest<'_>) -> Result<(String, u32), AnalyzeError> {
    match req {
      AnalysisRequest::Initial => Ok((self.prompts.initial.clone(), self.settings.initial_max_tokens)),
      AnalysisRequest::FollowUp { messages, initial_analysis } => {
        let messages = messages.filter(|m| !m.is_empty()).ok_or(AnalyzeError::MissingHistory("messages"))?;
        let initial_analysis = initial_analysis
          .filter(|a| !a.trim().is_empty())
          .ok_or(AnalyzeError::MissingHistory("initialAnalysis"))?;
        let conversation = render_transcript(messages);
        let prompt = fill_template(
          &self.prompts.follow_up_template,
          &[("initial_analysis", initial_analysis), ("conversation", &conversation)],
        );
        Ok((prompt, self.settings.follow_up_max_tokens))
      }
    }
  }

  /// Validate the image, call the model once and return its text (or the fallback
  /// when the reply has no text block). Nothing is retried.
  #[instrument(level = "info", skip_all, fields(initial = matches!(req, AnalysisRequest::Initial), image_len = image.map(str::len)))]
  pub async fn analyze(&self, image: Option<&str>, req: AnalysisRequest<'_>) -> Result<String, AnalyzeError> {
    let image = image.filter(|s| !s.is_empty()).ok_or(AnalyzeError::MissingImage)?;
    let uri = parse_data_uri(image)?;
    if !SUPPORTED_MEDIA_TYPES.contains(&uri.media_type) {
      warn!(target: "gracitecture", media_type = %trunc_for_log(uri.media_type, 64), "Unsupported media type; passing through to provider");
    }

    let (prompt, max_tokens) = self.build_prompt(&req)?;
    let provider = self.provider.as_ref().ok_or_else(|| {
      error!(target: "gracitecture", "Analysis requested but no model provider is configured");
      AnalyzeError::Upstream(ProviderError::NotConfigured)
    })?;

    match provider.describe_image(uri.media_type, uri.payload, &prompt, max_tokens).await {
      Ok(Some(text)) => {
        info!(target: "gracitecture", reply_len = text.len(), "Analysis produced");
        Ok(text)
      }
      Ok(None) => {
        warn!(target: "gracitecture", "Model reply had no text block; using fallback");
        Ok(self.prompts.empty_reply_fallback.clone())
      }
      Err(e) => {
        error!(target: "gracitecture", error = %e, "Analysis error");
        Err(AnalyzeError::Upstream(e))
      }
    }
  }
}
