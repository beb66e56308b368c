//! Quiz engine: a per-building state machine over a shuffled copy of the catalog.
//!
//! Each building is shown twice: a style question, then an engineering question,
//! each followed by an answer stage with the explanation. `next_stage` is the pure
//! transition table; `QuizSession::apply` runs it and does the bookkeeping
//! (scoring, advancing, reshuffling options).

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::domain::BuildingRecord;
use crate::error::QuizError;
use crate::util::shuffle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
  StyleQuestion,
  StyleAnswer,
  EngineeringQuestion,
  EngineeringAnswer,
  Complete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
  PickStyle(String),
  ContinueToEngineering,
  PickEngineering(String),
  Next,
  Restart,
  ToggleName,
}

/// Transition table. `is_last` tells whether the current building is the last one.
/// Returns None when the event is not accepted in `stage`.
pub fn next_stage(stage: Stage, event: &QuizEvent, is_last: bool) -> Option<Stage> {
  use QuizEvent::*;
  use Stage::*;
  match (stage, event) {
    (_, Restart) => Some(StyleQuestion),
    (Complete, _) => None,
    (s, ToggleName) => Some(s),
    (StyleQuestion, PickStyle(_)) => Some(StyleAnswer),
    (StyleAnswer, ContinueToEngineering) => Some(EngineeringQuestion),
    (EngineeringQuestion, PickEngineering(_)) => Some(EngineeringAnswer),
    (EngineeringAnswer, Next) if is_last => Some(Complete),
    (EngineeringAnswer, Next) => Some(StyleQuestion),
    _ => None,
  }
}

/// Every answer counts towards `total`, right or wrong.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Score {
  pub correct: u32,
  pub total: u32,
}

impl Score {
  pub fn record(&mut self, correct: bool) {
    self.total += 1;
    if correct {
      self.correct += 1;
    }
  }

  /// Rounded percentage; None when nothing was answered.
  pub fn percentage(&self) -> Option<u32> {
    if self.total == 0 {
      return None;
    }
    Some((100.0 * self.correct as f64 / self.total as f64).round() as u32)
  }
}

pub struct QuizSession {
  id: Uuid,
  buildings: Vec<BuildingRecord>,
  position: usize,
  stage: Stage,
  style_options: Vec<String>,
  engineering_options: Vec<String>,
  selected_style: Option<String>,
  selected_engineering: Option<String>,
  score: Score,
  name_revealed: bool,
  rng: StdRng,
}

impl QuizSession {
  /// New session with an OS-seeded random source.
  pub fn start(catalog: &Catalog) -> Self {
    Self::with_rng(catalog, StdRng::from_entropy())
  }

  /// New session drawing every shuffle from `rng`. An empty catalog starts out complete.
  #[instrument(level = "debug", skip_all, fields(buildings = catalog.len()))]
  pub fn with_rng(catalog: &Catalog, mut rng: StdRng) -> Self {
    let buildings = shuffle(catalog.buildings().to_vec(), &mut rng);
    let stage = if buildings.is_empty() { Stage::Complete } else { Stage::StyleQuestion };
    let mut session = Self {
      id: Uuid::new_v4(),
      buildings,
      position: 0,
      stage,
      style_options: Vec::new(),
      engineering_options: Vec::new(),
      selected_style: None,
      selected_engineering: None,
      score: Score::default(),
      name_revealed: false,
      rng,
    };
    session.reset_building_view();
    session
  }

  /// Apply one user event. Rejected events leave the session untouched.
  #[instrument(level = "debug", skip(self), fields(session = %self.id, stage = ?self.stage, position = self.position))]
  pub fn apply(&mut self, event: QuizEvent) -> Result<Stage, QuizError> {
    let next = next_stage(self.stage, &event, self.is_last())
      .ok_or_else(|| QuizError::InvalidEvent { stage: self.stage, event: event.clone() })?;

    match event {
      QuizEvent::PickStyle(option) => {
        if !self.style_options.contains(&option) {
          return Err(QuizError::UnknownOption(option));
        }
        let correct = self.current().map(|b| b.style == option).unwrap_or(false);
        self.score.record(correct);
        debug!(target: "quiz", session = %self.id, %correct, "Style answered");
        self.selected_style = Some(option);
      }
      QuizEvent::PickEngineering(option) => {
        if !self.engineering_options.contains(&option) {
          return Err(QuizError::UnknownOption(option));
        }
        let correct = self.current().map(|b| b.engineering_answer == option).unwrap_or(false);
        self.score.record(correct);
        debug!(target: "quiz", session = %self.id, %correct, "Engineering answered");
        self.selected_engineering = Some(option);
      }
      QuizEvent::Next => {
        if next == Stage::StyleQuestion {
          self.position += 1;
          self.reset_building_view();
        }
      }
      QuizEvent::Restart => {
        self.position = 0;
        self.score = Score::default();
        self.reset_building_view();
      }
      QuizEvent::ToggleName => self.name_revealed = !self.name_revealed,
      QuizEvent::ContinueToEngineering => {}
    }

    self.stage = if self.buildings.is_empty() { Stage::Complete } else { next };
    Ok(self.stage)
  }

  /// Clear per-building selections and draw fresh option orders for the current building.
  fn reset_building_view(&mut self) {
    self.selected_style = None;
    self.selected_engineering = None;
    self.name_revealed = false;
    let (style, engineering) = match self.buildings.get(self.position) {
      Some(b) => (b.style_option_set(), b.engineering_option_set()),
      None => (Vec::new(), Vec::new()),
    };
    self.style_options = shuffle(style, &mut self.rng);
    self.engineering_options = shuffle(engineering, &mut self.rng);
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn stage(&self) -> Stage {
    self.stage
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn len(&self) -> usize {
    self.buildings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buildings.is_empty()
  }

  pub fn is_last(&self) -> bool {
    self.position + 1 >= self.buildings.len()
  }

  pub fn current(&self) -> Option<&BuildingRecord> {
    self.buildings.get(self.position)
  }

  pub fn buildings(&self) -> &[BuildingRecord] {
    &self.buildings
  }

  pub fn style_options(&self) -> &[String] {
    &self.style_options
  }

  pub fn engineering_options(&self) -> &[String] {
    &self.engineering_options
  }

  pub fn selected_style(&self) -> Option<&str> {
    self.selected_style.as_deref()
  }

  pub fn selected_engineering(&self) -> Option<&str> {
    self.selected_engineering.as_deref()
  }

  pub fn score(&self) -> Score {
    self.score
  }

  pub fn name_revealed(&self) -> bool {
    self.name_revealed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::tests::record;
  use std::collections::HashSet;

  fn catalog(n: usize) -> Catalog {
    Catalog::from_records((0..n).map(|i| record(&format!("b{i}"), "Gothic")).collect())
  }

  fn session(n: usize, seed: u64) -> QuizSession {
    QuizSession::with_rng(&catalog(n), StdRng::seed_from_u64(seed))
  }

  fn correct_style(s: &QuizSession) -> String {
    s.current().unwrap().style.clone()
  }

  fn wrong_style(s: &QuizSession) -> String {
    s.current().unwrap().style_distractors[0].clone()
  }

  fn correct_engineering(s: &QuizSession) -> String {
    s.current().unwrap().engineering_answer.clone()
  }

  fn wrong_engineering(s: &QuizSession) -> String {
    s.current().unwrap().engineering_distractors[0].clone()
  }

  /// Answer both questions of the current building and stop at `engineering-answer`.
  fn answer_building(s: &mut QuizSession, style_ok: bool, eng_ok: bool) {
    let style = if style_ok { correct_style(s) } else { wrong_style(s) };
    s.apply(QuizEvent::PickStyle(style)).unwrap();
    s.apply(QuizEvent::ContinueToEngineering).unwrap();
    let eng = if eng_ok { correct_engineering(s) } else { wrong_engineering(s) };
    s.apply(QuizEvent::PickEngineering(eng)).unwrap();
  }

  #[test]
  fn transition_table() {
    use QuizEvent::*;
    use Stage::*;
    let pick = PickStyle("x".into());
    assert_eq!(next_stage(StyleQuestion, &pick, false), Some(StyleAnswer));
    assert_eq!(next_stage(StyleQuestion, &pick, true), Some(StyleAnswer));
    assert_eq!(next_stage(StyleAnswer, &ContinueToEngineering, false), Some(EngineeringQuestion));
    assert_eq!(next_stage(EngineeringQuestion, &PickEngineering("y".into()), false), Some(EngineeringAnswer));
    assert_eq!(next_stage(EngineeringAnswer, &Next, false), Some(StyleQuestion));
    assert_eq!(next_stage(EngineeringAnswer, &Next, true), Some(Complete));
    assert_eq!(next_stage(Complete, &Next, true), None);
    assert_eq!(next_stage(Complete, &ToggleName, true), None);
    assert_eq!(next_stage(StyleQuestion, &Next, false), None);
    assert_eq!(next_stage(StyleQuestion, &PickEngineering("y".into()), false), None);
    assert_eq!(next_stage(StyleAnswer, &PickStyle("x".into()), false), None);
    assert_eq!(next_stage(EngineeringQuestion, &ToggleName, false), Some(EngineeringQuestion));
    for s in [StyleQuestion, StyleAnswer, EngineeringQuestion, EngineeringAnswer, Complete] {
      assert_eq!(next_stage(s, &Restart, false), Some(StyleQuestion));
    }
  }

  #[test]
  fn initial_state() {
    let s = session(3, 1);
    assert_eq!(s.stage(), Stage::StyleQuestion);
    assert_eq!(s.position(), 0);
    assert_eq!(s.score(), Score::default());
    assert_eq!(s.len(), 3);
    assert!(!s.name_revealed());
  }

  #[test]
  fn session_is_a_permutation_of_the_catalog() {
    let s = session(6, 3);
    let ids: HashSet<_> = s.buildings().iter().map(|b| b.id.clone()).collect();
    assert_eq!(ids.len(), 6);
  }

  #[test]
  fn style_options_contain_answer_exactly_once() {
    let mut s = session(4, 5);
    loop {
      let b = s.current().unwrap().clone();
      assert_eq!(s.style_options().len(), 1 + b.style_distractors.len());
      assert_eq!(s.style_options().iter().filter(|o| **o == b.style).count(), 1);
      assert_eq!(s.engineering_options().len(), 1 + b.engineering_distractors.len());
      assert_eq!(s.engineering_options().iter().filter(|o| **o == b.engineering_answer).count(), 1);
      answer_building(&mut s, true, true);
      if s.apply(QuizEvent::Next).unwrap() == Stage::Complete {
        break;
      }
    }
  }

  #[test]
  fn option_order_varies_across_views() {
    let orders: HashSet<Vec<String>> = (0..40).map(|seed| session(1, seed).style_options().to_vec()).collect();
    assert!(orders.len() > 1);
  }

  #[test]
  fn picking_a_style_moves_to_answer_and_scores() {
    let mut s = session(2, 9);
    let stage = s.apply(QuizEvent::PickStyle(correct_style(&s))).unwrap();
    assert_eq!(stage, Stage::StyleAnswer);
    assert_eq!(s.score(), Score { correct: 1, total: 1 });
    assert_eq!(s.selected_style(), Some("Gothic"));
  }

  #[test]
  fn wrong_answers_still_count_towards_total() {
    let mut s = session(2, 9);
    answer_building(&mut s, false, false);
    assert_eq!(s.score(), Score { correct: 0, total: 2 });
  }

  #[test]
  fn unknown_option_is_rejected_without_side_effects() {
    let mut s = session(2, 9);
    let err = s.apply(QuizEvent::PickStyle("Googie".into())).unwrap_err();
    assert_eq!(err, QuizError::UnknownOption("Googie".into()));
    assert_eq!(s.stage(), Stage::StyleQuestion);
    assert_eq!(s.score(), Score::default());
  }

  #[test]
  fn events_out_of_order_are_rejected() {
    let mut s = session(2, 9);
    let err = s.apply(QuizEvent::Next).unwrap_err();
    assert_eq!(err, QuizError::InvalidEvent { stage: Stage::StyleQuestion, event: QuizEvent::Next });
    assert!(s.apply(QuizEvent::ContinueToEngineering).is_err());
    assert_eq!(s.stage(), Stage::StyleQuestion);
  }

  #[test]
  fn next_advances_and_resets_building_view() {
    let mut s = session(3, 11);
    s.apply(QuizEvent::ToggleName).unwrap();
    assert!(s.name_revealed());
    answer_building(&mut s, true, false);
    let first = s.current().unwrap().id.clone();
    assert_eq!(s.apply(QuizEvent::Next).unwrap(), Stage::StyleQuestion);
    assert_eq!(s.position(), 1);
    assert_ne!(s.current().unwrap().id, first);
    assert!(!s.name_revealed());
    assert_eq!(s.selected_style(), None);
    assert_eq!(s.selected_engineering(), None);
    assert!(s.style_options().contains(&s.current().unwrap().style));
  }

  #[test]
  fn next_on_last_building_completes() {
    let mut s = session(2, 13);
    answer_building(&mut s, true, true);
    s.apply(QuizEvent::Next).unwrap();
    answer_building(&mut s, true, false);
    assert!(s.is_last());
    assert_eq!(s.apply(QuizEvent::Next).unwrap(), Stage::Complete);
    assert_eq!(s.position(), 1);
    assert!(s.apply(QuizEvent::Next).is_err());
    assert!(s.apply(QuizEvent::ToggleName).is_err());
    assert_eq!(s.score(), Score { correct: 3, total: 4 });
    assert_eq!(s.score().percentage(), Some(75));
  }

  #[test]
  fn total_tracks_answers_at_every_step() {
    let mut s = session(3, 17);
    let mut answered = 0;
    loop {
      assert_eq!(s.score().total, answered);
      assert!(s.score().correct <= s.score().total);
      s.apply(QuizEvent::PickStyle(wrong_style(&s))).unwrap();
      answered += 1;
      assert_eq!(s.score().total, answered);
      s.apply(QuizEvent::ContinueToEngineering).unwrap();
      s.apply(QuizEvent::PickEngineering(correct_engineering(&s))).unwrap();
      answered += 1;
      assert_eq!(s.score().total as usize, 2 * (s.position() + 1));
      if s.apply(QuizEvent::Next).unwrap() == Stage::Complete {
        break;
      }
    }
    assert_eq!(s.score(), Score { correct: 3, total: 6 });
  }

  #[test]
  fn restart_resets_from_any_stage() {
    let mut s = session(3, 19);
    answer_building(&mut s, true, true);
    s.apply(QuizEvent::Next).unwrap();
    s.apply(QuizEvent::PickStyle(correct_style(&s))).unwrap();
    s.apply(QuizEvent::ToggleName).unwrap();
    let order: Vec<String> = s.buildings().iter().map(|b| b.id.clone()).collect();

    assert_eq!(s.apply(QuizEvent::Restart).unwrap(), Stage::StyleQuestion);
    assert_eq!(s.position(), 0);
    assert_eq!(s.score(), Score::default());
    assert_eq!(s.selected_style(), None);
    assert!(!s.name_revealed());
    let after: Vec<String> = s.buildings().iter().map(|b| b.id.clone()).collect();
    assert_eq!(order, after);
  }

  #[test]
  fn restart_after_completion() {
    let mut s = session(1, 23);
    answer_building(&mut s, true, true);
    assert_eq!(s.apply(QuizEvent::Next).unwrap(), Stage::Complete);
    assert_eq!(s.apply(QuizEvent::Restart).unwrap(), Stage::StyleQuestion);
    assert_eq!(s.score(), Score::default());
    assert_eq!(s.position(), 0);
  }

  #[test]
  fn empty_catalog_is_complete_with_no_percentage() {
    let mut s = QuizSession::with_rng(&Catalog::default(), StdRng::seed_from_u64(0));
    assert_eq!(s.stage(), Stage::Complete);
    assert!(s.current().is_none());
    assert_eq!(s.score().percentage(), None);
    assert_eq!(s.apply(QuizEvent::Restart).unwrap(), Stage::Complete);
  }

  #[test]
  fn percentage_rounds() {
    assert_eq!(Score { correct: 7, total: 10 }.percentage(), Some(70));
    assert_eq!(Score { correct: 2, total: 3 }.percentage(), Some(67));
    assert_eq!(Score { correct: 1, total: 8 }.percentage(), Some(13));
    assert_eq!(Score { correct: 0, total: 0 }.percentage(), None);
  }
}
