//! Gracitecture · architecture learning backend
//!
//! - Quiz engine over a static building catalog, driven over a WebSocket
//! - `/api/analyze`: relays an uploaded photo to a hosted multimodal model
//! - Conversation model used by the upload/chat view
//! - Static SPA fallback (STATIC_DIR/index.html)

pub mod anthropic;
pub mod catalog;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod hints;
pub mod protocol;
pub mod quiz;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod util;
