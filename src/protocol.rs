//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;
use crate::gateway::AnalysisRequest;
use crate::hints::style_hint;
use crate::quiz::{QuizEvent, QuizSession, Score, Stage};

/// Messages the client can send over the quiz WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartQuiz,
    PickStyle { option: String },
    Continue,
    PickEngineering { option: String },
    Next,
    Restart,
    ToggleName,
    LeaveQuiz,
}

impl ClientWsMessage {
    /// The quiz event carried by this message, if it is one.
    pub fn quiz_event(self) -> Option<QuizEvent> {
        match self {
            ClientWsMessage::PickStyle { option } => Some(QuizEvent::PickStyle(option)),
            ClientWsMessage::Continue => Some(QuizEvent::ContinueToEngineering),
            ClientWsMessage::PickEngineering { option } => Some(QuizEvent::PickEngineering(option)),
            ClientWsMessage::Next => Some(QuizEvent::Next),
            ClientWsMessage::Restart => Some(QuizEvent::Restart),
            ClientWsMessage::ToggleName => Some(QuizEvent::ToggleName),
            ClientWsMessage::Ping | ClientWsMessage::StartQuiz | ClientWsMessage::LeaveQuiz => None,
        }
    }
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Quiz { view: QuizView },
    Left,
    Error { message: String },
}

/// Everything the quiz screen needs to render the current stage.
/// Answers stay hidden until the matching answer stage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub session_id: String,
    pub stage: Stage,
    pub position: usize,
    pub total_buildings: usize,
    pub is_last: bool,
    pub score: Score,
    pub percentage: Option<u32>,
    pub building: Option<BuildingView>,
    pub style_options: Vec<StyleOptionView>,
    pub engineering_question: Option<String>,
    pub engineering_options: Vec<String>,
    pub feedback: Option<AnswerFeedback>,
    pub fun_facts: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingView {
    pub image_url: String,
    pub difficulty: String,
    pub name_revealed: bool,
    pub name: Option<String>,
    pub era: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StyleOptionView {
    pub label: String,
    pub hint: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub selected: String,
    pub correct_answer: String,
    pub correct: bool,
    pub explanation: String,
}

/// Project a session into its public view.
pub fn to_view(s: &QuizSession) -> QuizView {
    let stage = s.stage();
    let score = s.score();
    let current = if stage == Stage::Complete { None } else { s.current() };

    let mut view = QuizView {
        session_id: s.id().to_string(),
        stage,
        position: s.position(),
        total_buildings: s.len(),
        is_last: s.is_last(),
        score,
        percentage: score.percentage(),
        building: None,
        style_options: Vec::new(),
        engineering_question: None,
        engineering_options: Vec::new(),
        feedback: None,
        fun_facts: Vec::new(),
    };

    let Some(b) = current else { return view };
    let revealed = s.name_revealed();
    view.building = Some(BuildingView {
        image_url: b.image_url.clone(),
        difficulty: b.difficulty.clone(),
        name_revealed: revealed,
        name: revealed.then(|| b.name.clone()),
        era: revealed.then(|| b.era.clone()),
    });

    match stage {
        Stage::StyleQuestion => {
            view.style_options = s
                .style_options()
                .iter()
                .map(|o| StyleOptionView { label: o.clone(), hint: style_hint(o) })
                .collect();
        }
        Stage::StyleAnswer => {
            let selected = s.selected_style().unwrap_or_default().to_string();
            view.feedback = Some(AnswerFeedback {
                correct: selected == b.style,
                selected,
                correct_answer: b.style.clone(),
                explanation: b.style_explanation.clone(),
            });
        }
        Stage::EngineeringQuestion => {
            view.engineering_question = Some(b.engineering_question.clone());
            view.engineering_options = s.engineering_options().to_vec();
        }
        Stage::EngineeringAnswer => {
            let selected = s.selected_engineering().unwrap_or_default().to_string();
            view.engineering_question = Some(b.engineering_question.clone());
            view.feedback = Some(AnswerFeedback {
                correct: selected == b.engineering_answer,
                selected,
                correct_answer: b.engineering_answer.clone(),
                explanation: b.engineering_explanation.clone(),
            });
            view.fun_facts = b.fun_facts.clone();
        }
        Stage::Complete => {}
    }
    view
}

//
// HTTP request/response DTOs
//

/// Body of `POST /api/analyze`. Serialize is used by the upload view to build requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeIn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_initial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_analysis: Option<String>,
}

impl AnalyzeIn {
    /// Anything but an explicit `isInitial: true` is a follow-up.
    pub fn analysis_request(&self) -> AnalysisRequest<'_> {
        if self.is_initial.unwrap_or(false) {
            AnalysisRequest::Initial
        } else {
            AnalysisRequest::FollowUp {
                messages: self.messages.as_deref(),
                initial_analysis: self.initial_analysis.as_deref(),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeOut {
    pub analysis: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOut {
    pub ok: bool,
    pub model_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{tests::record, Catalog};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn session() -> QuizSession {
        QuizSession::with_rng(&Catalog::from_records(vec![record("a", "Gothic")]), StdRng::seed_from_u64(1))
    }

    #[test]
    fn client_messages_parse() {
        let m: ClientWsMessage = serde_json::from_value(json!({ "type": "pick_style", "option": "Gothic" })).unwrap();
        assert_eq!(m.quiz_event(), Some(QuizEvent::PickStyle("Gothic".into())));
        let m: ClientWsMessage = serde_json::from_value(json!({ "type": "continue" })).unwrap();
        assert_eq!(m.quiz_event(), Some(QuizEvent::ContinueToEngineering));
        let m: ClientWsMessage = serde_json::from_value(json!({ "type": "start_quiz" })).unwrap();
        assert_eq!(m.quiz_event(), None);
    }

    #[test]
    fn question_view_hides_answers_and_name() {
        let v = to_view(&session());
        assert_eq!(v.stage, Stage::StyleQuestion);
        assert_eq!(v.style_options.len(), 4);
        assert!(v.style_options.iter().all(|o| !o.hint.is_empty()));
        assert!(v.feedback.is_none());
        let b = v.building.unwrap();
        assert!(!b.name_revealed);
        assert!(b.name.is_none() && b.era.is_none());

        let wire = serde_json::to_value(to_view(&session())).unwrap();
        assert_eq!(wire["stage"], "style-question");
        assert_eq!(wire["totalBuildings"], 1);
    }

    #[test]
    fn answer_views_carry_feedback_and_facts() {
        let mut s = session();
        s.apply(QuizEvent::ToggleName).unwrap();
        s.apply(QuizEvent::PickStyle("Baroque".into())).unwrap();
        let v = to_view(&s);
        let fb = v.feedback.unwrap();
        assert!(!fb.correct);
        assert_eq!(fb.selected, "Baroque");
        assert_eq!(fb.correct_answer, "Gothic");
        assert_eq!(v.building.unwrap().name.as_deref(), Some("Building a"));
        assert!(v.style_options.is_empty());

        s.apply(QuizEvent::ContinueToEngineering).unwrap();
        let v = to_view(&s);
        assert_eq!(v.engineering_options.len(), 4);
        assert!(v.feedback.is_none());

        s.apply(QuizEvent::PickEngineering("Flying buttresses".into())).unwrap();
        let v = to_view(&s);
        assert!(v.feedback.unwrap().correct);
        assert_eq!(v.fun_facts.len(), 1);
        assert!(v.is_last);
    }

    #[test]
    fn complete_view_reports_percentage() {
        let mut s = session();
        s.apply(QuizEvent::PickStyle("Gothic".into())).unwrap();
        s.apply(QuizEvent::ContinueToEngineering).unwrap();
        s.apply(QuizEvent::PickEngineering("Steel frame".into())).unwrap();
        s.apply(QuizEvent::Next).unwrap();
        let v = to_view(&s);
        assert_eq!(v.stage, Stage::Complete);
        assert!(v.building.is_none());
        assert_eq!(v.percentage, Some(50));
    }

    #[test]
    fn analyze_in_decodes_camel_case_and_defaults_to_follow_up() {
        let body: AnalyzeIn = serde_json::from_value(json!({
            "image": "data:image/png;base64,AAAA",
            "messages": [{ "role": "user", "content": "Why?" }],
            "initialAnalysis": "Gothic."
        }))
        .unwrap();
        match body.analysis_request() {
            AnalysisRequest::FollowUp { messages, initial_analysis } => {
                assert_eq!(messages.unwrap().len(), 1);
                assert_eq!(initial_analysis, Some("Gothic."));
            }
            AnalysisRequest::Initial => panic!("expected follow-up"),
        }

        let initial: AnalyzeIn = serde_json::from_value(json!({ "image": "x", "isInitial": true })).unwrap();
        assert!(matches!(initial.analysis_request(), AnalysisRequest::Initial));
    }
}
