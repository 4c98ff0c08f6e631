use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::json;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use super::{LeadStore, StoreError, StoreFields, StoredLead};
use crate::config::AirtableConfig;
use crate::workflows::leads::dedupe::DedupeKey;

const RETRY_ATTEMPTS: usize = 2;
const RETRY_MAX_DELAY: Duration = Duration::from_secs(2);

/// REST client for one Airtable table.
#[derive(Clone)]
pub struct AirtableStore {
    client: Client,
    table_url: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<StoredLead>,
}

impl AirtableStore {
    pub fn new(config: &AirtableConfig) -> Result<Self, StoreError> {
        let mut table_url = Url::parse(&config.api_url)
            .map_err(|err| StoreError::InvalidEndpoint(format!("{}: {err}", config.api_url)))?;
        table_url
            .path_segments_mut()
            .map_err(|_| StoreError::InvalidEndpoint(config.api_url.clone()))?
            .pop_if_empty()
            .extend(["v0", config.base_id.as_str(), config.table.as_str()]);

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            table_url,
            token: config.token.clone(),
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn record_url(&self, id: &str) -> Url {
        let mut url = self.table_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    /// Sends the request built by `build`, retrying transient failures with backoff.
    async fn send<F>(&self, build: F) -> Result<Response, StoreError>
    where
        F: Fn() -> RequestBuilder,
    {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .max_delay(RETRY_MAX_DELAY)
            .take(RETRY_ATTEMPTS);

        RetryIf::start(
            strategy,
            || {
                let request = build().bearer_auth(&self.token);
                async move {
                    let response = request
                        .send()
                        .await
                        .map_err(|err| StoreError::Transport(err.to_string()))?;
                    ensure_success(response).await
                }
            },
            |err: &StoreError| {
                let transient = err.is_transient();
                if transient {
                    warn!(error = %err, "airtable request failed with a transient error");
                }
                transient
            },
        )
        .await
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    response
        .json::<T>()
        .await
        .map_err(|err| StoreError::Decode(err.to_string()))
}

#[async_trait]
impl LeadStore for AirtableStore {
    async fn find(&self, key: &DedupeKey) -> Result<Option<StoredLead>, StoreError> {
        let formula = key.formula();
        debug!(dedupe = key.kind(), "looking up existing airtable lead");

        let response = self
            .send(|| {
                self.client.get(self.table_url.clone()).query(&[
                    ("filterByFormula", formula.as_str()),
                    ("maxRecords", "1"),
                ])
            })
            .await?;

        let list: RecordList = decode(response).await?;
        Ok(list.records.into_iter().next())
    }

    async fn create(&self, fields: StoreFields) -> Result<StoredLead, StoreError> {
        let body = json!({ "fields": fields, "typecast": true });
        let response = self
            .send(|| self.client.post(self.table_url.clone()).json(&body))
            .await?;
        decode(response).await
    }

    async fn update(&self, id: &str, fields: StoreFields) -> Result<StoredLead, StoreError> {
        let url = self.record_url(id);
        let body = json!({ "fields": fields, "typecast": true });
        let response = self
            .send(|| self.client.patch(url.clone()).json(&body))
            .await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_url: &str, table: &str) -> AirtableConfig {
        AirtableConfig {
            api_url: api_url.to_string(),
            base_id: "appLeads".to_string(),
            table: table.to_string(),
            token: "pat-test".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn table_url_encodes_table_name() {
        let store =
            AirtableStore::new(&config("https://api.airtable.com", "Solar Leads")).expect("store");
        assert_eq!(
            store.table_url().as_str(),
            "https://api.airtable.com/v0/appLeads/Solar%20Leads"
        );
        assert_eq!(
            store.record_url("rec123").as_str(),
            "https://api.airtable.com/v0/appLeads/Solar%20Leads/rec123"
        );
    }

    #[test]
    fn trailing_slash_on_api_url_is_tolerated() {
        let store = AirtableStore::new(&config("http://127.0.0.1:9000/", "Leads")).expect("store");
        assert_eq!(
            store.table_url().as_str(),
            "http://127.0.0.1:9000/v0/appLeads/Leads"
        );
    }

    #[test]
    fn rejects_unparseable_api_url() {
        let err = AirtableStore::new(&config("not a url", "Leads"))
            .err()
            .expect("invalid url");
        assert!(matches!(err, StoreError::InvalidEndpoint(_)));
    }

    #[test]
    fn transient_errors_are_retried() {
        assert!(StoreError::Transport("reset".to_string()).is_transient());
        assert!(StoreError::Rejected {
            status: 429,
            body: String::new()
        }
        .is_transient());
        assert!(!StoreError::Rejected {
            status: 422,
            body: String::new()
        }
        .is_transient());
    }
}
