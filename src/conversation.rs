//! Upload/chat conversation model: the state the upload view keeps between calls to
//! `/api/analyze`, and the transitions it performs around each request.
//!
//! Only one request may be in flight at a time. Failures never drop history:
//! a failed initial analysis leaves a notice and allows a retry, a failed follow-up
//! is answered with an inline apology.

use std::fmt::Display;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tracing::warn;

use crate::domain::ChatMessage;
use crate::protocol::AnalyzeIn;

pub const INITIAL_FAILURE_TEXT: &str = "Sorry, analysis failed. Please try again.";
pub const FOLLOW_UP_FAILURE_TEXT: &str = "Sorry, I had trouble responding. Could you try again?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
  #[error("no image selected")]
  NoImage,
  #[error("a request is already in flight")]
  Busy,
  #[error("the image has already been analyzed")]
  AlreadyAnalyzed,
  #[error("follow-ups need an initial analysis first")]
  NotAnalyzed,
  #[error("question is empty")]
  EmptyQuestion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
  pub media_type: String,
  pub bytes: Vec<u8>,
}

impl SelectedImage {
  pub fn to_data_uri(&self) -> String {
    format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
  Initial,
  FollowUp,
}

#[derive(Debug, Default)]
pub struct ConversationState {
  image: Option<SelectedImage>,
  initial_analysis: Option<String>,
  messages: Vec<ChatMessage>,
  notice: Option<String>,
  pending: Option<Pending>,
}

impl ConversationState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pick a new image. Clears the analysis, the messages and any in-flight request;
  /// a reply that arrives for the old image is then discarded.
  pub fn select_image(&mut self, media_type: impl Into<String>, bytes: Vec<u8>) {
    *self = Self { image: Some(SelectedImage { media_type: media_type.into(), bytes }), ..Self::default() };
  }

  /// Drop the image and everything attached to it.
  pub fn clear(&mut self) {
    *self = Self::default();
  }

  /// Request body for the initial analysis; marks the conversation busy.
  pub fn begin_initial(&mut self) -> Result<AnalyzeIn, ConversationError> {
    let image = self.image.as_ref().ok_or(ConversationError::NoImage)?;
    if self.pending.is_some() {
      return Err(ConversationError::Busy);
    }
    if self.initial_analysis.is_some() {
      return Err(ConversationError::AlreadyAnalyzed);
    }
    let req = AnalyzeIn { image: Some(image.to_data_uri()), is_initial: Some(true), ..AnalyzeIn::default() };
    self.notice = None;
    self.pending = Some(Pending::Initial);
    Ok(req)
  }

  /// Apply the outcome of the initial request. Returns false if no initial request was pending.
  pub fn finish_initial<E: Display>(&mut self, outcome: Result<String, E>) -> bool {
    if self.pending != Some(Pending::Initial) {
      return false;
    }
    self.pending = None;
    match outcome {
      Ok(text) => self.initial_analysis = Some(text),
      Err(e) => {
        warn!(target: "gracitecture", error = %e, "Initial analysis failed");
        self.notice = Some(INITIAL_FAILURE_TEXT.to_string());
      }
    }
    true
  }

  /// Append the user's question and build the follow-up request; marks the conversation busy.
  pub fn ask(&mut self, question: &str) -> Result<AnalyzeIn, ConversationError> {
    let question = question.trim();
    if question.is_empty() {
      return Err(ConversationError::EmptyQuestion);
    }
    let image = self.image.as_ref().ok_or(ConversationError::NoImage)?;
    if self.pending.is_some() {
      return Err(ConversationError::Busy);
    }
    let analysis = self.initial_analysis.clone().ok_or(ConversationError::NotAnalyzed)?;
    let image = image.to_data_uri();

    self.messages.push(ChatMessage::user(question));
    self.pending = Some(Pending::FollowUp);
    Ok(AnalyzeIn {
      image: Some(image),
      is_initial: None,
      messages: Some(self.messages.clone()),
      initial_analysis: Some(analysis),
    })
  }

  /// Apply the outcome of a follow-up. Returns false if no follow-up was pending.
  pub fn finish_follow_up<E: Display>(&mut self, outcome: Result<String, E>) -> bool {
    if self.pending != Some(Pending::FollowUp) {
      return false;
    }
    self.pending = None;
    let reply = match outcome {
      Ok(text) => text,
      Err(e) => {
        warn!(target: "gracitecture", error = %e, "Follow-up failed");
        FOLLOW_UP_FAILURE_TEXT.to_string()
      }
    };
    self.messages.push(ChatMessage::assistant(reply));
    true
  }

  pub fn image(&self) -> Option<&SelectedImage> {
    self.image.as_ref()
  }

  pub fn initial_analysis(&self) -> Option<&str> {
    self.initial_analysis.as_deref()
  }

  pub fn messages(&self) -> &[ChatMessage] {
    &self.messages
  }

  /// Inline message shown after a failed initial analysis.
  pub fn notice(&self) -> Option<&str> {
    self.notice.as_deref()
  }

  /// True while a request is in flight; the view disables its controls.
  pub fn is_pending(&self) -> bool {
    self.pending.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Role;

  fn analyzed() -> ConversationState {
    let mut c = ConversationState::new();
    c.select_image("image/png", vec![1, 2, 3]);
    c.begin_initial().unwrap();
    assert!(c.finish_initial::<String>(Ok("A Gothic nave.".into())));
    c
  }

  #[test]
  fn data_uri_encodes_bytes() {
    let img = SelectedImage { media_type: "image/jpeg".into(), bytes: b"hello".to_vec() };
    assert_eq!(img.to_data_uri(), "data:image/jpeg;base64,aGVsbG8=");
  }

  #[test]
  fn initial_request_needs_an_image() {
    let mut c = ConversationState::new();
    assert_eq!(c.begin_initial(), Err(ConversationError::NoImage));
    c.select_image("image/png", vec![0]);
    let req = c.begin_initial().unwrap();
    assert_eq!(req.is_initial, Some(true));
    assert_eq!(req.image.as_deref(), Some("data:image/png;base64,AA=="));
    assert!(req.messages.is_none());
    assert!(c.is_pending());
  }

  #[test]
  fn only_one_request_in_flight() {
    let mut c = ConversationState::new();
    c.select_image("image/png", vec![0]);
    c.begin_initial().unwrap();
    assert_eq!(c.begin_initial(), Err(ConversationError::Busy));

    let mut c = analyzed();
    c.ask("First?").unwrap();
    assert_eq!(c.ask("Second?"), Err(ConversationError::Busy));
    assert_eq!(c.messages().len(), 1);
  }

  #[test]
  fn follow_up_requires_analysis() {
    let mut c = ConversationState::new();
    c.select_image("image/png", vec![0]);
    assert_eq!(c.ask("What is it?"), Err(ConversationError::NotAnalyzed));
    assert!(c.messages().is_empty());
  }

  #[test]
  fn follow_up_carries_history_and_analysis() {
    let mut c = analyzed();
    let req = c.ask("  What material is the dome?  ").unwrap();
    assert_eq!(req.is_initial, None);
    assert_eq!(req.initial_analysis.as_deref(), Some("A Gothic nave."));
    assert_eq!(req.messages.unwrap(), vec![ChatMessage::user("What material is the dome?")]);

    assert!(c.finish_follow_up::<String>(Ok("Lead over timber.".into())));
    let req = c.ask("Why lead?").unwrap();
    let roles: Vec<Role> = req.messages.unwrap().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
  }

  #[test]
  fn empty_question_is_refused() {
    let mut c = analyzed();
    assert_eq!(c.ask("   "), Err(ConversationError::EmptyQuestion));
    assert!(!c.is_pending());
  }

  #[test]
  fn failed_initial_leaves_a_notice_and_allows_retry() {
    let mut c = ConversationState::new();
    c.select_image("image/png", vec![0]);
    c.begin_initial().unwrap();
    assert!(c.finish_initial(Err("connection reset")));
    assert_eq!(c.notice(), Some(INITIAL_FAILURE_TEXT));
    assert!(c.initial_analysis().is_none());
    assert!(!c.is_pending());
    c.begin_initial().unwrap();
    assert!(c.notice().is_none());
  }

  #[test]
  fn failed_follow_up_keeps_history_and_apologizes() {
    let mut c = analyzed();
    c.ask("Q1").unwrap();
    c.finish_follow_up::<String>(Ok("A1".into()));
    c.ask("Q2").unwrap();
    assert!(c.finish_follow_up(Err("HTTP 500")));
    let contents: Vec<&str> = c.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["Q1", "A1", "Q2", FOLLOW_UP_FAILURE_TEXT]);
    assert!(!c.is_pending());
  }

  #[test]
  fn new_image_clears_everything_and_discards_late_replies() {
    let mut c = analyzed();
    c.ask("Q1").unwrap();
    c.select_image("image/webp", vec![9]);
    assert!(c.initial_analysis().is_none());
    assert!(c.messages().is_empty());
    assert!(!c.is_pending());
    assert!(!c.finish_follow_up::<String>(Ok("late".into())));
    assert!(c.messages().is_empty());
    assert_eq!(c.image().unwrap().media_type, "image/webp");
  }

  #[test]
  fn analyzing_twice_is_refused() {
    let mut c = analyzed();
    assert_eq!(c.begin_initial(), Err(ConversationError::AlreadyAnalyzed));
    c.clear();
    assert!(c.image().is_none());
  }
}
