//! Axum route handlers for the Research API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::ResearchReport;
use crate::models::request::ResearchRequest;
use crate::research::pipeline::run_research;
use crate::state::AppState;

/// POST /api/research
///
/// Validates the request, then runs the research pipeline on its own task so
/// a panic inside it becomes a 500 instead of a dropped connection. A client
/// that disconnects does not cancel the in-flight provider call.
pub async fn handle_research(
    State(state): State<AppState>,
    payload: Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchReport>, AppError> {
    let Json(request) = payload?;
    let subject = request.validate()?;

    let span = info_span!(
        "research",
        request_id = %Uuid::new_v4(),
        firm = %subject.firm_name
    );

    let llm = state.llm.clone();
    let validator = state.validator.clone();

    let report = tokio::spawn(
        async move { run_research(llm.as_ref(), validator.as_ref(), &subject).await }
            .instrument(span),
    )
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Research task failed: {e}")))?;

    Ok(Json(report))
}
