use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::domain::Lead;
use crate::config::StoreSettings;

/// Remote read side of the lead store.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// Every lead, newest first.
    async fn fetch_all(&self) -> Result<Vec<Lead>, LeadSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LeadSourceError {
    #[error("lead store unreachable: {0}")]
    Network(String),
    #[error("lead store returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("lead store payload could not be decoded: {0}")]
    Decode(String),
}

/// PostgREST-style client for the `leads` table.
pub struct RestLeadSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestLeadSource {
    pub fn new(settings: StoreSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_timeout(
        settings: StoreSettings,
        timeout: Option<Duration>,
    ) -> Result<Self, LeadSourceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| LeadSourceError::Network(err.to_string()))?;
        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: reqwest::Client, settings: StoreSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
        }
    }

    fn leads_url(&self) -> String {
        format!("{}/rest/v1/leads", self.base_url)
    }
}

#[async_trait]
impl LeadSource for RestLeadSource {
    async fn fetch_all(&self) -> Result<Vec<Lead>, LeadSourceError> {
        let url = self.leads_url();
        debug!(%url, "fetching leads");

        let resp = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| LeadSourceError::Network(err.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, "lead store returned non-success");
            return Err(LeadSourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|err| LeadSourceError::Network(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| LeadSourceError::Decode(err.to_string()))
    }
}
