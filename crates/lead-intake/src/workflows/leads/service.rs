use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::consent::{ConsentSummary, RoutingSummary};
use super::dedupe::DedupeKey;
use super::domain::LeadRecord;
use super::evaluation::{GateConfig, ScoreResult, ScoringEngine};
use super::mapping::store_fields;
use super::store::{LeadStore, StoreError};

/// Everything the read-only endpoint returns for a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadAssessment {
    pub result: ScoreResult,
    pub consent: ConsentSummary,
    pub routing: RoutingSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertReceipt {
    pub action: UpsertAction,
    pub record_id: String,
    pub dedupe_key: Option<DedupeKey>,
}

/// Assessment plus the row it was written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeOutcome {
    #[serde(flatten)]
    pub assessment: LeadAssessment,
    pub upsert: UpsertReceipt,
}

/// Service composing the scoring engine with the lead table.
pub struct LeadIntakeService<S> {
    store: Arc<S>,
    engine: ScoringEngine,
}

impl<S> LeadIntakeService<S>
where
    S: LeadStore + 'static,
{
    pub fn new(store: Arc<S>, gates: GateConfig) -> Self {
        Self {
            store,
            engine: ScoringEngine::new(gates),
        }
    }

    /// Score a lead and derive its routing without touching the store.
    pub fn assess(&self, lead: &LeadRecord) -> LeadAssessment {
        let result = self.engine.score(lead);
        let consent = ConsentSummary::from_lead(lead);
        let routing = RoutingSummary::for_verdict(&result, &consent);

        info!(
            score = result.score,
            tier = %result.tier,
            queue = ?routing.queue,
            "lead scored"
        );

        LeadAssessment {
            result,
            consent,
            routing,
        }
    }

    /// Score a lead and upsert it into the lead table.
    pub async fn ingest(&self, lead: LeadRecord) -> Result<IntakeOutcome, IntakeError> {
        self.ingest_at(lead, Utc::now()).await
    }

    pub async fn ingest_at(
        &self,
        lead: LeadRecord,
        scored_at: DateTime<Utc>,
    ) -> Result<IntakeOutcome, IntakeError> {
        let assessment = self.assess(&lead);
        let fields = store_fields(&lead, &assessment.result, scored_at);
        let dedupe_key = DedupeKey::from_lead(&lead);

        let existing = match &dedupe_key {
            Some(key) => self.store.find(key).await?,
            None => None,
        };

        let (action, stored) = match existing {
            Some(existing) => (
                UpsertAction::Updated,
                self.store.update(&existing.id, fields).await?,
            ),
            None => (UpsertAction::Created, self.store.create(fields).await?),
        };

        info!(
            action = ?action,
            record_id = %stored.id,
            dedupe = dedupe_key.as_ref().map_or("none", DedupeKey::kind),
            "lead upserted"
        );

        Ok(IntakeOutcome {
            assessment,
            upsert: UpsertReceipt {
                action,
                record_id: stored.id,
                dedupe_key,
            },
        })
    }
}

/// Error raised by the intake service. Scoring itself cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
