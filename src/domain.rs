//! Domain models: building records served by the quiz and chat messages exchanged
//! with the analysis gateway.

use serde::{Deserialize, Serialize};

/// One entry of the building catalog. Field names follow the JSON catalog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildingRecord {
  pub id: String,
  pub name: String,
  pub image_url: String,
  pub era: String,
  pub difficulty: String, // free-form: "beginner", "intermediate", "advanced"

  // Style question
  pub style: String,
  pub style_distractors: Vec<String>,
  pub style_explanation: String,

  // Engineering question
  pub engineering_question: String,
  pub engineering_answer: String,
  pub engineering_distractors: Vec<String>,
  pub engineering_explanation: String,

  #[serde(default)]
  pub fun_facts: Vec<String>,
}

impl BuildingRecord {
  /// Correct style followed by its distractors (unshuffled).
  pub fn style_option_set(&self) -> Vec<String> {
    let mut out = self.style_distractors.clone();
    out.push(self.style.clone());
    out
  }

  /// Correct engineering answer followed by its distractors (unshuffled).
  pub fn engineering_option_set(&self) -> Vec<String> {
    let mut out = self.engineering_distractors.clone();
    out.push(self.engineering_answer.clone());
    out
  }
}

/// Who said it in an upload/chat conversation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  User,
  Assistant,
}

impl Role {
  /// Speaker label used when a transcript is rendered into a prompt.
  pub fn transcript_label(self) -> &'static str {
    match self {
      Role::User => "Student",
      Role::Assistant => "You",
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
  pub role: Role,
  pub content: String,
}

impl ChatMessage {
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self { role: Role::Assistant, content: content.into() }
  }
}
