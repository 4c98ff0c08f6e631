use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::leads::dedupe::DedupeKey;
use crate::workflows::leads::store::{LeadStore, StoreError, StoreFields, StoredLead};
use crate::workflows::leads::{lead_router, GateConfig, LeadIntakeService, LeadRecord};

pub(super) fn gates_off() -> GateConfig {
    GateConfig::default()
}

pub(super) fn kern_only() -> GateConfig {
    GateConfig {
        require_california: Some(true),
        require_kern_county: Some(true),
    }
}

/// Bakersfield homeowner who answered every question favourably.
pub(super) fn hot_lead() -> LeadRecord {
    LeadRecord::new()
        .with("Name", "Dana Ruiz")
        .with("Phone", "(661) 555-0100")
        .with("Email", "dana@example.com")
        .with("State", "CA")
        .with("County", "Kern")
        .with("owns", "yes")
        .with("Avg monthly bill", "300")
        .with("Roof age (years)", "5")
        .with("Sun exposure", "full sun")
        .with("HOA?", "no")
        .with("Property type", "single family")
        .with("sms_consent", true)
}

pub(super) fn owner_only() -> LeadRecord {
    LeadRecord::new().with("owns", "yes")
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    rows: Arc<Mutex<Vec<StoredLead>>>,
}

impl MemoryStore {
    pub(super) fn rows(&self) -> Vec<StoredLead> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn seed(&self, id: &str, fields: StoreFields) {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .push(StoredLead {
                id: id.to_string(),
                fields,
            });
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn find(&self, key: &DedupeKey) -> Result<Option<StoredLead>, StoreError> {
        let guard = self.rows.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|row| key.matches(&row.fields)).cloned())
    }

    async fn create(&self, fields: StoreFields) -> Result<StoredLead, StoreError> {
        let mut guard = self.rows.lock().expect("store mutex poisoned");
        let row = StoredLead {
            id: format!("rec{:04}", guard.len() + 1),
            fields,
        };
        guard.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &str, fields: StoreFields) -> Result<StoredLead, StoreError> {
        let mut guard = self.rows.lock().expect("store mutex poisoned");
        let row = guard
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| StoreError::Rejected {
                status: 404,
                body: "record not found".to_string(),
            })?;
        row.fields.extend(fields);
        Ok(row.clone())
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl LeadStore for UnavailableStore {
    async fn find(&self, _key: &DedupeKey) -> Result<Option<StoredLead>, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn create(&self, _fields: StoreFields) -> Result<StoredLead, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn update(&self, _id: &str, _fields: StoreFields) -> Result<StoredLead, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }
}

pub(super) fn build_service(gates: GateConfig) -> (LeadIntakeService<MemoryStore>, MemoryStore) {
    let store = MemoryStore::default();
    let service = LeadIntakeService::new(Arc::new(store.clone()), gates);
    (service, store)
}

pub(super) fn router_with_service<S>(service: LeadIntakeService<S>) -> axum::Router
where
    S: LeadStore + 'static,
{
    lead_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_bad_gateway(response: &Response) {
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
