//! Identity used to find an existing row before writing a lead.
//!
//! Priority is phone, then email, then street address plus zip. Phones are
//! compared on their last ten digits so "+1 (661) 555-0100" and
//! "661.555.0100" collide.

use serde::{Deserialize, Serialize};

use super::domain::{coerce_text, LeadRecord};
use super::fields::ContactField;
use super::mapping::{ADDRESS_COLUMN, EMAIL_COLUMN, PHONE_COLUMN, ZIP_COLUMN};
use super::store::StoreFields;

const PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DedupeKey {
    Phone { digits: String },
    Email { email: String },
    Address { address: String, zip: String },
}

impl DedupeKey {
    /// `None` when the lead carries no usable identity; it is then always created fresh.
    pub fn from_lead(lead: &LeadRecord) -> Option<Self> {
        if let Some(digits) = lead
            .contact(ContactField::Phone)
            .and_then(|raw| normalize_phone(&raw))
        {
            return Some(Self::Phone { digits });
        }

        if let Some(email) = lead.contact(ContactField::Email) {
            return Some(Self::Email {
                email: email.to_lowercase(),
            });
        }

        match (
            lead.contact(ContactField::Address),
            lead.contact(ContactField::Zip),
        ) {
            (Some(address), Some(zip)) => Some(Self::Address {
                address: address.to_lowercase(),
                zip: zip.to_lowercase(),
            }),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Phone { .. } => "phone",
            Self::Email { .. } => "email",
            Self::Address { .. } => "address",
        }
    }

    /// Airtable `filterByFormula` expression selecting rows with this identity.
    pub fn formula(&self) -> String {
        match self {
            Self::Phone { digits } => format!(
                "RIGHT(REGEX_REPLACE({{{PHONE_COLUMN}}}, \"[^0-9]\", \"\"), {PHONE_DIGITS}) = {}",
                formula_literal(digits)
            ),
            Self::Email { email } => {
                format!("LOWER({{{EMAIL_COLUMN}}}) = {}", formula_literal(email))
            }
            Self::Address { address, zip } => format!(
                "AND(LOWER({{{ADDRESS_COLUMN}}}) = {}, LOWER({{{ZIP_COLUMN}}}) = {})",
                formula_literal(address),
                formula_literal(zip)
            ),
        }
    }

    /// Same comparison as [`DedupeKey::formula`], applied to already-fetched columns.
    pub fn matches(&self, fields: &StoreFields) -> bool {
        let column = |name: &str| fields.get(name).and_then(coerce_text);

        match self {
            Self::Phone { digits } => column(PHONE_COLUMN)
                .and_then(|raw| normalize_phone(&raw))
                .is_some_and(|stored| &stored == digits),
            Self::Email { email } => {
                column(EMAIL_COLUMN).is_some_and(|stored| stored.to_lowercase() == *email)
            }
            Self::Address { address, zip } => {
                column(ADDRESS_COLUMN).is_some_and(|stored| stored.to_lowercase() == *address)
                    && column(ZIP_COLUMN).is_some_and(|stored| stored.to_lowercase() == *zip)
            }
        }
    }
}

/// Last ten digits of a phone number; shorter numbers are not trusted as identity.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < PHONE_DIGITS {
        return None;
    }
    Some(digits[digits.len() - PHONE_DIGITS..].iter().collect())
}

fn formula_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::super::mapping::text_value;
    use super::*;

    #[test]
    fn phone_keeps_last_ten_digits() {
        assert_eq!(
            normalize_phone("+1 (661) 555-0100"),
            Some("6615550100".to_string())
        );
        assert_eq!(normalize_phone("555-0100"), None);
    }

    #[test]
    fn formula_escapes_quotes_and_backslashes() {
        let key = DedupeKey::Email {
            email: "o\"brien\\x@example.com".to_string(),
        };
        assert_eq!(
            key.formula(),
            "LOWER({Email}) = \"o\\\"brien\\\\x@example.com\""
        );
    }

    #[test]
    fn phone_formula_compares_digit_suffix() {
        let key = DedupeKey::Phone {
            digits: "6615550100".to_string(),
        };
        assert_eq!(
            key.formula(),
            "RIGHT(REGEX_REPLACE({Phone}, \"[^0-9]\", \"\"), 10) = \"6615550100\""
        );
    }

    #[test]
    fn matches_stored_columns_case_insensitively() {
        let mut fields = StoreFields::new();
        fields.insert(ADDRESS_COLUMN.to_string(), text_value("12 Oak St"));
        fields.insert(ZIP_COLUMN.to_string(), text_value("93301"));
        let key = DedupeKey::Address {
            address: "12 oak st".to_string(),
            zip: "93301".to_string(),
        };
        assert!(key.matches(&fields));

        fields.insert(ZIP_COLUMN.to_string(), text_value("93302"));
        assert!(!key.matches(&fields));
    }
}
