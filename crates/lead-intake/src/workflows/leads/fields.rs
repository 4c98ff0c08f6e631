//! Alias tables for the loosely-keyed form payloads.
//!
//! Each logical field lists the keys upstream tools have been seen to send,
//! highest priority first. Resolution takes the first alias carrying a
//! non-blank value; a blank answer never shadows a later alias.

use super::domain::LeadRecord;

/// Form answers consumed by the scorer and mirrored into the lead table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    State,
    County,
    OwnsProperty,
    AvgMonthlyBill,
    RoofAgeYears,
    SunExposure,
    Hoa,
    AnnualTrueUp,
    PropertyType,
}

impl LeadField {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::State,
            Self::County,
            Self::OwnsProperty,
            Self::AvgMonthlyBill,
            Self::RoofAgeYears,
            Self::SunExposure,
            Self::Hoa,
            Self::AnnualTrueUp,
            Self::PropertyType,
        ]
    }

    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::State => &["State", "state"],
            Self::County => &["County", "county"],
            Self::OwnsProperty => &["Owns property?", "owns_property", "owns", "own", "homeowner"],
            Self::AvgMonthlyBill => &["Avg monthly bill", "avg_monthly_bill", "bill"],
            Self::RoofAgeYears => &["Roof age (years)", "roof_age_years", "roof_age"],
            Self::SunExposure => &["Sun exposure", "sun_exposure"],
            Self::Hoa => &["HOA?", "hoa", "has_hoa"],
            Self::AnnualTrueUp => &["Annual true-up cost", "true_up", "trueup"],
            Self::PropertyType => &["Property type", "property_type"],
        }
    }

    /// Lead table column; the Airtable-style alias doubles as the column name.
    pub const fn column(self) -> &'static str {
        self.aliases()[0]
    }
}

/// Contact details used for dedupe and the table's identity columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    FirstName,
    LastName,
    Phone,
    Email,
    Address,
    Zip,
}

impl ContactField {
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["Name", "Full name", "name", "full_name", "What is your name?"],
            Self::FirstName => &["First name", "first_name"],
            Self::LastName => &["Last name", "last_name"],
            Self::Phone => &[
                "Phone",
                "phone",
                "phone_number",
                "Phone number",
                "What is your phone number?",
            ],
            Self::Email => &["Email", "email", "email_address", "What is your email?"],
            Self::Address => &["Address", "address", "street_address", "Street address"],
            Self::Zip => &["Zip", "ZIP", "zip", "postal_code", "zip_code"],
        }
    }
}

/// First alias with a non-blank value, or `None` when the field was never answered.
pub fn resolve(record: &LeadRecord, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| record.text(alias))
}

impl LeadRecord {
    pub fn field(&self, field: LeadField) -> Option<String> {
        resolve(self, field.aliases())
    }

    pub fn contact(&self, field: ContactField) -> Option<String> {
        resolve(self, field.aliases())
    }
}
