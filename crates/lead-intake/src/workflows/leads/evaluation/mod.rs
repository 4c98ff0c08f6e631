mod config;
mod policy;
mod rules;

pub use config::GateConfig;
pub use policy::{LeadTemperature, Tier};

use super::domain::LeadRecord;
use serde::{Deserialize, Serialize};

/// Neutral starting point: a homeowner who skipped every optional question
/// lands just under the warm tier instead of failing outright.
const BASE_SCORE: i32 = 50;
const REASON_SEPARATOR: &str = " | ";

/// Stateless scorer holding the deployment's gate switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    gates: GateConfig,
}

impl ScoringEngine {
    pub fn new(gates: GateConfig) -> Self {
        Self { gates }
    }

    pub fn score(&self, lead: &LeadRecord) -> ScoreResult {
        score_lead(lead, &self.gates)
    }
}

/// Verdict for one lead. Field names and tier labels are read by the
/// automation platform and copied into the lead table as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub tier: Tier,
    pub lead_temperature: LeadTemperature,
    pub reject_reasons: Vec<String>,
    pub score_reasons: String,
    pub marshall_eligible: bool,
}

impl ScoreResult {
    fn disqualified(reject_reasons: Vec<String>) -> Self {
        Self {
            score: 0,
            tier: Tier::Disqualified,
            lead_temperature: Tier::Disqualified.temperature(),
            score_reasons: reject_reasons.join(REASON_SEPARATOR),
            reject_reasons,
            marshall_eligible: false,
        }
    }

    pub fn is_disqualified(&self) -> bool {
        self.tier == Tier::Disqualified
    }

    pub fn reject_reasons_joined(&self) -> String {
        self.reject_reasons.join(REASON_SEPARATOR)
    }
}

/// Scores a lead. Total over every input: missing or garbled answers fall
/// through to the "unknown" branches rather than failing.
pub fn score_lead(lead: &LeadRecord, gates: &GateConfig) -> ScoreResult {
    let geo_reasons = policy::geo_reject_reasons(lead, gates);
    if !geo_reasons.is_empty() {
        return ScoreResult::disqualified(geo_reasons);
    }

    if let Some(reason) = policy::ownership_reject_reason(lead) {
        return ScoreResult::disqualified(vec![reason]);
    }

    let adjustments = rules::score_signals(lead);
    let raw = BASE_SCORE + adjustments.iter().map(|adj| adj.points).sum::<i32>();
    let score = clamp_score(f64::from(raw));
    let tier = Tier::for_score(score);

    let score_reasons = adjustments
        .iter()
        .filter_map(|adj| adj.reason)
        .collect::<Vec<_>>()
        .join(REASON_SEPARATOR);

    ScoreResult {
        score,
        tier,
        lead_temperature: tier.temperature(),
        reject_reasons: Vec::new(),
        score_reasons,
        marshall_eligible: tier == Tier::QualifiedSendToMarshall,
    }
}

fn clamp_score(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}
