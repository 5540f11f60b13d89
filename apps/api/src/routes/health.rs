use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status and whether research runs live or from fallback.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let research_mode = if state.llm.is_configured() {
        "live"
    } else {
        "fallback"
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "dossier-api",
        "research_mode": research_mode
    }))
}
