//! Quiz WebSocket: upgrade + message loop. Each socket owns at most one quiz session;
//! every client message is parsed as JSON, applied, and answered with one JSON message.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug, warn};

use crate::protocol::{to_view, ClientWsMessage, ServerWsMessage};
use crate::quiz::QuizSession;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "gracitecture", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "gracitecture", "WebSocket connected");
  let mut session: Option<QuizSession> = None;
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "quiz", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session)
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "gracitecture", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  if let Some(s) = &session {
    info!(target: "quiz", session = %s.id(), "Quiz session dropped with socket");
  }
  info!(target: "gracitecture", "WebSocket disconnected");
}

/// Apply one client message to the socket's quiz session.
pub fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut Option<QuizSession>) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartQuiz => {
      let s = QuizSession::start(&state.catalog);
      info!(target: "quiz", session = %s.id(), buildings = s.len(), "Quiz started");
      let view = to_view(&s);
      *session = Some(s);
      ServerWsMessage::Quiz { view }
    }

    ClientWsMessage::LeaveQuiz => {
      if let Some(s) = session.take() {
        info!(target: "quiz", session = %s.id(), position = s.position(), "Quiz left");
      }
      ServerWsMessage::Left
    }

    other => {
      let Some(s) = session.as_mut() else {
        return ServerWsMessage::Error { message: "No quiz in progress; send start_quiz first.".into() };
      };
      let Some(event) = other.quiz_event() else {
        return ServerWsMessage::Error { message: "Unsupported message".into() };
      };
      match s.apply(event) {
        Ok(stage) => {
          debug!(target: "quiz", session = %s.id(), ?stage, correct = s.score().correct, total = s.score().total, "Quiz event applied");
          ServerWsMessage::Quiz { view: to_view(s) }
        }
        Err(e) => {
          warn!(target: "quiz", session = %s.id(), error = %e, "Quiz event rejected");
          ServerWsMessage::Error { message: e.to_string() }
        }
      }
    }
  }
}
