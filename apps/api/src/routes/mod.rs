pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::research::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/research", post(handlers::handle_research))
        .with_state(state)
}
