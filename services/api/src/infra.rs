use async_trait::async_trait;
use lead_intake::error::AppError;
use lead_intake::workflows::leads::{
    DedupeKey, LeadRecord, LeadStore, StoreError, StoreFields, StoredLead,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lead table kept in process memory, used when no Airtable credentials are configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadStore {
    rows: Arc<Mutex<Vec<StoredLead>>>,
}

impl InMemoryLeadStore {
    fn guard(&self) -> Result<MutexGuard<'_, Vec<StoredLead>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Transport("in-memory lead table poisoned".to_string()))
    }

    #[cfg(test)]
    pub(crate) fn rows(&self) -> Vec<StoredLead> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn find(&self, key: &DedupeKey) -> Result<Option<StoredLead>, StoreError> {
        let guard = self.guard()?;
        Ok(guard.iter().find(|row| key.matches(&row.fields)).cloned())
    }

    async fn create(&self, fields: StoreFields) -> Result<StoredLead, StoreError> {
        let mut guard = self.guard()?;
        let row = StoredLead {
            id: format!("mem{:06}", guard.len() + 1),
            fields,
        };
        guard.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &str, fields: StoreFields) -> Result<StoredLead, StoreError> {
        let mut guard = self.guard()?;
        let row = guard
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| StoreError::Rejected {
                status: 404,
                body: format!("record {id} not found"),
            })?;
        row.fields.extend(fields);
        Ok(row.clone())
    }
}

/// Reads a lead payload from a JSON file, or from stdin when the path is `-`.
pub(crate) fn load_lead(path: &Path) -> Result<LeadRecord, AppError> {
    let raw = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };

    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> StoreFields {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), json!(value)))
            .collect()
    }

    #[tokio::test]
    async fn update_merges_into_matched_row() {
        let store = InMemoryLeadStore::default();
        let created = store
            .create(fields(&[("Phone", "6615550100"), ("Notes", "first call")]))
            .await
            .expect("create succeeds");

        let key = DedupeKey::Phone {
            digits: "6615550100".to_string(),
        };
        let found = store
            .find(&key)
            .await
            .expect("find succeeds")
            .expect("row matched");
        assert_eq!(found.id, created.id);

        store
            .update(&found.id, fields(&[("Score", "98")]))
            .await
            .expect("update succeeds");

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.get("Notes"), Some(&json!("first call")));
        assert_eq!(rows[0].fields.get("Score"), Some(&json!("98")));
    }

    #[tokio::test]
    async fn update_of_unknown_row_is_rejected() {
        let store = InMemoryLeadStore::default();

        let err = store
            .update("mem999999", StoreFields::new())
            .await
            .expect_err("missing row");

        assert!(matches!(err, StoreError::Rejected { status: 404, .. }));
    }

    #[test]
    fn load_lead_reads_json_object() {
        let path = std::env::temp_dir().join(format!("lead-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"owns": "yes", "bill": 320}"#).expect("write fixture");

        let lead = load_lead(&path).expect("lead parses");
        std::fs::remove_file(&path).ok();

        assert_eq!(lead.text("bill"), Some("320".to_string()));
    }

    #[test]
    fn load_lead_rejects_non_objects() {
        let path = std::env::temp_dir().join(format!("lead-array-{}.json", std::process::id()));
        std::fs::write(&path, r#"["owns", "yes"]"#).expect("write fixture");

        let result = load_lead(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::Input(_))));
    }
}
