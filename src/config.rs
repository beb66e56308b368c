//! Loading service configuration (prompts, analysis limits, catalog path) from TOML.
//!
//! Every section is optional; missing keys fall back to the defaults below.
//! See `AppConfig`, `Prompts` and `AnalysisSettings` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub analysis: AnalysisSettings,
  /// JSON catalog replacing the built-in one.
  #[serde(default)]
  pub catalog_path: Option<String>,
}

/// Prompt templates used by the analysis gateway.
/// `follow_up_template` understands `{initial_analysis}` and `{conversation}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub initial: String,
  pub follow_up_template: String,
  /// Returned when the model reply carries no text block.
  pub empty_reply_fallback: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      initial: "You are a friendly university architecture professor with deep expertise but a gift for making complex concepts accessible. Analyze this building image as if explaining it to a curious student over coffee.

Keep your response concise but informative - aim for 3-4 short paragraphs covering:

1. **Style & Era**: What style is this and when was it likely built?

2. **Key Features**: What stands out architecturally?

3. **How It Works**: Brief explanation of the structural system and materials.

4. **One Cool Detail**: An interesting tidbit about construction or design.

Write in a warm, conversational tone. Be specific but don't overwhelm with jargon.".into(),
      follow_up_template: "You are a friendly university architecture professor. Here's the conversation so far:

Initial Analysis:
{initial_analysis}

{conversation}

Answer the latest question in 2-3 sentences. Stay conversational and use analogies when helpful. Reference the image when relevant.".into(),
      empty_reply_fallback: "Unable to analyze image".into(),
    }
  }
}

/// Fixed budget per request kind, the provider call timeout, and the largest
/// `/api/analyze` body accepted (the image travels base64-encoded inside it).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisSettings {
  pub initial_max_tokens: u32,
  pub follow_up_max_tokens: u32,
  pub timeout_secs: u64,
  pub max_body_bytes: usize,
}

impl Default for AnalysisSettings {
  fn default() -> Self {
    Self { initial_max_tokens: 1500, follow_up_max_tokens: 500, timeout_secs: 60, max_body_bytes: 20 * 1024 * 1024 }
  }
}

/// Parse a TOML document into `AppConfig`.
pub fn parse_app_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}

/// Attempt to load `AppConfig` from GRACITECTURE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("GRACITECTURE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_app_config(&s) {
      Ok(cfg) => {
        info!(target: "gracitecture", %path, "Loaded service config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "gracitecture", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "gracitecture", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
