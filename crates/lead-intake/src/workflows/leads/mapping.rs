//! Projection of a scored lead onto the lead table's columns.
//!
//! Column names are shared with views, automations, and single-select options
//! in the base; renaming one here silently breaks the table side.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::dedupe::normalize_phone;
use super::domain::LeadRecord;
use super::evaluation::ScoreResult;
use super::fields::{ContactField, LeadField};
use super::store::StoreFields;

pub const NAME_COLUMN: &str = "Name";
pub const PHONE_COLUMN: &str = "Phone";
pub const EMAIL_COLUMN: &str = "Email";
pub const ADDRESS_COLUMN: &str = "Address";
pub const ZIP_COLUMN: &str = "Zip";

pub const SCORE_COLUMN: &str = "Score";
pub const TIER_COLUMN: &str = "Tier";
pub const AI_TIER_COLUMN: &str = "AI tier";
pub const TEMPERATURE_COLUMN: &str = "Lead temperature";
pub const SCORE_REASONS_COLUMN: &str = "Score reasons";
pub const REJECT_REASONS_COLUMN: &str = "Reject reasons";
pub const SCORING_NOTES_COLUMN: &str = "Scoring notes";

/// Builds the row written on create and update. Answers the lead did not give
/// are left out so an update never blanks a column filled by an earlier submission.
pub fn store_fields(lead: &LeadRecord, result: &ScoreResult, scored_at: DateTime<Utc>) -> StoreFields {
    let mut fields = StoreFields::new();

    if let Some(name) = display_name(lead) {
        fields.insert(NAME_COLUMN.to_string(), text_value(name));
    }
    if let Some(phone) = lead.contact(ContactField::Phone) {
        let phone = normalize_phone(&phone).unwrap_or(phone);
        fields.insert(PHONE_COLUMN.to_string(), text_value(phone));
    }
    if let Some(email) = lead.contact(ContactField::Email) {
        fields.insert(EMAIL_COLUMN.to_string(), text_value(email.to_lowercase()));
    }
    if let Some(address) = lead.contact(ContactField::Address) {
        fields.insert(ADDRESS_COLUMN.to_string(), text_value(address));
    }
    if let Some(zip) = lead.contact(ContactField::Zip) {
        fields.insert(ZIP_COLUMN.to_string(), text_value(zip));
    }

    for field in LeadField::ordered() {
        if let Some(answer) = lead.field(field) {
            fields.insert(field.column().to_string(), text_value(answer));
        }
    }

    fields.insert(SCORE_COLUMN.to_string(), Value::from(result.score));
    fields.insert(TIER_COLUMN.to_string(), text_value(result.tier.label()));
    fields.insert(AI_TIER_COLUMN.to_string(), text_value(result.tier.label()));
    fields.insert(
        TEMPERATURE_COLUMN.to_string(),
        text_value(result.lead_temperature.label()),
    );
    fields.insert(
        SCORE_REASONS_COLUMN.to_string(),
        text_value(result.score_reasons.clone()),
    );
    fields.insert(
        REJECT_REASONS_COLUMN.to_string(),
        text_value(result.reject_reasons_joined()),
    );
    fields.insert(
        SCORING_NOTES_COLUMN.to_string(),
        text_value(scoring_note(result, scored_at)),
    );

    fields
}

fn display_name(lead: &LeadRecord) -> Option<String> {
    if let Some(name) = lead.contact(ContactField::Name) {
        return Some(name);
    }

    let parts: Vec<String> = [ContactField::FirstName, ContactField::LastName]
        .into_iter()
        .filter_map(|field| lead.contact(field))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// The one free-text trace of scoring kept on the row; overwritten on every upsert.
fn scoring_note(result: &ScoreResult, scored_at: DateTime<Utc>) -> String {
    format!(
        "Scored {} ({}) at {}",
        result.score,
        result.tier,
        scored_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

pub(crate) fn text_value(value: impl Into<String>) -> Value {
    Value::String(value.into())
}
