use super::super::domain::LeadRecord;
use super::super::fields::LeadField;
use super::super::signals::YesNo;
use super::config::GateConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const OUTSIDE_CALIFORNIA: &str = "Outside California";
pub(crate) const OUTSIDE_KERN_COUNTY: &str = "Outside Kern County";
pub(crate) const NOT_HOMEOWNER: &str = "Not homeowner";

const QUALIFIED_FLOOR: u8 = 75;
const WARM_FLOOR: u8 = 55;

/// Routing tier. Labels match the single-select options in the lead table,
/// en-dash included, and must not drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Tier {
    QualifiedSendToMarshall,
    WarmReviewLater,
    EducationalOnly,
    Disqualified,
}

impl Tier {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::QualifiedSendToMarshall,
            Self::WarmReviewLater,
            Self::EducationalOnly,
            Self::Disqualified,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::QualifiedSendToMarshall => "Qualified \u{2013} Send to Marshall",
            Self::WarmReviewLater => "Warm \u{2013} Review Later",
            Self::EducationalOnly => "Educational Only",
            Self::Disqualified => "Disqualified",
        }
    }

    pub const fn temperature(self) -> LeadTemperature {
        match self {
            Self::QualifiedSendToMarshall => LeadTemperature::Hot,
            Self::WarmReviewLater => LeadTemperature::Warm,
            Self::EducationalOnly | Self::Disqualified => LeadTemperature::Cold,
        }
    }

    /// Tier for a lead that cleared every gate.
    pub const fn for_score(score: u8) -> Self {
        if score >= QUALIFIED_FLOOR {
            Self::QualifiedSendToMarshall
        } else if score >= WARM_FLOOR {
            Self::WarmReviewLater
        } else {
            Self::EducationalOnly
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Tier> for &'static str {
    fn from(value: Tier) -> Self {
        value.label()
    }
}

impl TryFrom<String> for Tier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ordered()
            .into_iter()
            .find(|tier| tier.label() == value)
            .ok_or_else(|| format!("unknown tier label '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadTemperature {
    Hot,
    Warm,
    Cold,
}

impl LeadTemperature {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
        }
    }
}

/// Gates only fire when switched on and the lead actually answered the question.
pub(crate) fn geo_reject_reasons(lead: &LeadRecord, gates: &GateConfig) -> Vec<String> {
    let mut reasons = Vec::new();

    if gates.state_gate() {
        if let Some(state) = lead.field(LeadField::State) {
            let state = state.to_uppercase();
            if state != "CA" && state != "CALIFORNIA" {
                reasons.push(OUTSIDE_CALIFORNIA.to_string());
            }
        }
    }

    if gates.county_gate() {
        if let Some(county) = lead.field(LeadField::County) {
            if !county.to_lowercase().contains("kern") {
                reasons.push(OUTSIDE_KERN_COUNTY.to_string());
            }
        }
    }

    reasons
}

pub(crate) fn ownership_reject_reason(lead: &LeadRecord) -> Option<String> {
    let owns = YesNo::parse(lead.field(LeadField::OwnsProperty).as_deref());
    if owns.is_yes() {
        None
    } else {
        Some(NOT_HOMEOWNER.to_string())
    }
}
