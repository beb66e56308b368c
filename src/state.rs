//! Application state: the building catalog, the analysis gateway and serving options.
//!
//! Everything here is read-only after startup, so handlers share it through an
//! `Arc` without locks. Quiz sessions are not stored here: each WebSocket owns its own.

use std::{sync::Arc, time::Duration};

use tracing::{error, info, instrument};

use crate::anthropic::Anthropic;
use crate::catalog::Catalog;
use crate::config::load_app_config_from_env;
use crate::gateway::AnalysisGateway;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub gateway: AnalysisGateway,
    pub static_dir: String,
}

impl AppState {
    pub fn new(catalog: Catalog, gateway: AnalysisGateway) -> Self {
        Self { catalog: Arc::new(catalog), gateway, static_dir: "./static".into() }
    }

    /// Build state from env: load config, load the catalog, init the model provider.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let cfg = load_app_config_from_env().unwrap_or_default();

        let catalog = Catalog::load(cfg.catalog_path.as_deref());
        let mut by_difficulty: Vec<(String, usize)> = Vec::new();
        for b in catalog.buildings() {
            match by_difficulty.iter_mut().find(|(d, _)| *d == b.difficulty) {
                Some((_, n)) => *n += 1,
                None => by_difficulty.push((b.difficulty.clone(), 1)),
            }
        }
        for (difficulty, count) in by_difficulty {
            info!(target: "catalog", %difficulty, count, "Startup catalog inventory");
        }

        let provider = match Anthropic::from_env(Duration::from_secs(cfg.analysis.timeout_secs)) {
            Ok(Some(p)) => {
                info!(target: "gracitecture", base_url = %p.base_url, model = %p.model, initial_max_tokens = cfg.analysis.initial_max_tokens, follow_up_max_tokens = cfg.analysis.follow_up_max_tokens, max_body_bytes = cfg.analysis.max_body_bytes, "Model provider enabled.");
                Some(p)
            }
            Ok(None) => {
                info!(target: "gracitecture", "Model provider disabled (no ANTHROPIC_API_KEY). /api/analyze will fail with 500.");
                None
            }
            Err(e) => {
                error!(target: "gracitecture", error = %e, "ANTHROPIC_API_KEY is set but the model client could not be built. /api/analyze will fail with 500.");
                None
            }
        };
        let gateway = AnalysisGateway::new(provider, cfg.prompts, cfg.analysis);

        let mut state = Self::new(catalog, gateway);
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            state.static_dir = dir;
        }
        state
    }
}
