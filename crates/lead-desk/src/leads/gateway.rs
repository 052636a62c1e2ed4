use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use super::domain::LeadId;

/// Outbound side effect that starts contacting a lead.
#[async_trait]
pub trait OutreachGateway: Send + Sync {
    async fn send(&self, lead_id: &LeadId) -> Result<(), OutreachError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutreachError {
    #[error("outreach webhook unreachable: {0}")]
    Transport(String),
    #[error("outreach webhook returned status {status}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct OutreachRequest<'a> {
    lead_id: &'a LeadId,
}

/// Posts `{"lead_id": ...}` to a fixed webhook URL.
pub struct WebhookOutreachGateway {
    client: reqwest::Client,
    url: String,
}

impl WebhookOutreachGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn with_timeout(
        url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, OutreachError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| OutreachError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl OutreachGateway for WebhookOutreachGateway {
    async fn send(&self, lead_id: &LeadId) -> Result<(), OutreachError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&OutreachRequest { lead_id })
            .send()
            .await
            .map_err(|err| OutreachError::Transport(err.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, %lead_id, "outreach webhook returned non-success");
            return Err(OutreachError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
