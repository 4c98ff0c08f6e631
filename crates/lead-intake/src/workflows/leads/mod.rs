//! Lead intake: field resolution, qualification scoring, and the upsert into
//! the lead table.
//!
//! [`score_lead`] is the pure core. [`LeadIntakeService`] wraps it with the
//! consent/routing summary and the deduplicating upsert, and
//! [`lead_router`] exposes both over HTTP.

pub mod consent;
pub mod dedupe;
pub mod domain;
pub(crate) mod evaluation;
pub mod fields;
pub mod mapping;
pub mod router;
pub mod service;
pub mod signals;
pub mod store;

#[cfg(test)]
mod tests;

pub use consent::{ConsentSummary, RoutingQueue, RoutingSummary};
pub use dedupe::{normalize_phone, DedupeKey};
pub use domain::LeadRecord;
pub use evaluation::{score_lead, GateConfig, LeadTemperature, ScoreResult, ScoringEngine, Tier};
pub use fields::{resolve, ContactField, LeadField};
pub use router::lead_router;
pub use service::{
    IntakeError, IntakeOutcome, LeadAssessment, LeadIntakeService, UpsertAction, UpsertReceipt,
};
pub use signals::YesNo;
pub use store::{AirtableStore, LeadStore, StoreError, StoreFields, StoredLead};
