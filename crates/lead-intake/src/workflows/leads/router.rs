use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use tracing::warn;

use super::domain::LeadRecord;
use super::service::{IntakeOutcome, LeadAssessment, LeadIntakeService};
use super::store::LeadStore;
use crate::error::AppError;

/// Router builder exposing the scoring and intake webhooks.
pub fn lead_router<S>(service: Arc<LeadIntakeService<S>>) -> Router
where
    S: LeadStore + 'static,
{
    Router::new()
        .route("/api/v1/leads/score", post(score_handler::<S>))
        .route("/api/v1/leads/intake", post(intake_handler::<S>))
        .with_state(service)
}

/// Webhook bodies are parsed here rather than by the `Json` extractor so a
/// malformed payload surfaces as `AppError::Input` with the serde message.
fn parse_lead(body: &[u8]) -> Result<LeadRecord, AppError> {
    Ok(serde_json::from_slice(body)?)
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<LeadIntakeService<S>>>,
    body: Bytes,
) -> Result<Json<LeadAssessment>, AppError>
where
    S: LeadStore + 'static,
{
    let lead = parse_lead(&body)?;
    Ok(Json(service.assess(&lead)))
}

pub(crate) async fn intake_handler<S>(
    State(service): State<Arc<LeadIntakeService<S>>>,
    body: Bytes,
) -> Result<Json<IntakeOutcome>, AppError>
where
    S: LeadStore + 'static,
{
    let lead = parse_lead(&body)?;
    let outcome = service.ingest(lead).await.map_err(|error| {
        warn!(error = %error, "lead upsert failed");
        error
    })?;
    Ok(Json(outcome))
}
