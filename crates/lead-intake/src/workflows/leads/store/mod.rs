mod airtable;

pub use airtable::AirtableStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::dedupe::DedupeKey;

/// Column name to cell value, as sent to and returned by the lead table.
pub type StoreFields = Map<String, Value>;

/// A row in the lead table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLead {
    pub id: String,
    #[serde(default)]
    pub fields: StoreFields,
}

/// Storage seam for the lead table so the intake service can run against a
/// stub in tests and without credentials in development.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn find(&self, key: &DedupeKey) -> Result<Option<StoredLead>, StoreError>;
    async fn create(&self, fields: StoreFields) -> Result<StoredLead, StoreError>;
    async fn update(&self, id: &str, fields: StoreFields) -> Result<StoredLead, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("store transport failed: {0}")]
    Transport(String),
    #[error("store rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("store response could not be decoded: {0}")]
    Decode(String),
}

impl StoreError {
    /// Rate limits, server errors, and dropped connections are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Transport(_) => true,
            StoreError::Rejected { status, .. } => *status == 429 || *status >= 500,
            StoreError::InvalidEndpoint(_) | StoreError::Decode(_) => false,
        }
    }
}
