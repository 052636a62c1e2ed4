use async_trait::async_trait;
use lead_desk::config::AppConfig;
use lead_desk::error::AppError;
use lead_desk::leads::{
    Lead, LeadId, LeadSource, LeadSourceError, NotificationLog, OutreachError, OutreachGateway,
    RestLeadSource, WebhookOutreachGateway,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) notifications: Arc<NotificationLog>,
}

pub(crate) fn rest_lead_source(config: &AppConfig) -> Result<RestLeadSource, AppError> {
    let settings = config.remote.store()?;
    Ok(RestLeadSource::with_timeout(
        settings,
        config.remote.request_timeout,
    )?)
}

pub(crate) fn webhook_gateway(config: &AppConfig) -> Result<WebhookOutreachGateway, AppError> {
    let url = config.remote.webhook()?;
    Ok(WebhookOutreachGateway::with_timeout(
        url,
        config.remote.request_timeout,
    )?)
}

/// Serves a fixed set of leads; backs the offline demo.
#[derive(Debug, Default, Clone)]
pub(crate) struct StaticLeadSource {
    leads: Vec<Lead>,
}

impl StaticLeadSource {
    pub(crate) fn new(leads: Vec<Lead>) -> Self {
        Self { leads }
    }
}

#[async_trait]
impl LeadSource for StaticLeadSource {
    async fn fetch_all(&self) -> Result<Vec<Lead>, LeadSourceError> {
        Ok(self.leads.clone())
    }
}

/// Records every outreach request and answers with a fixed outcome.
#[derive(Debug, Default)]
pub(crate) struct ScriptedOutreachGateway {
    fail: bool,
    sent: Mutex<Vec<LeadId>>,
}

impl ScriptedOutreachGateway {
    pub(crate) fn new(fail: bool) -> Self {
        Self {
            fail,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent(&self) -> Vec<LeadId> {
        self.sent.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl OutreachGateway for ScriptedOutreachGateway {
    async fn send(&self, lead_id: &LeadId) -> Result<(), OutreachError> {
        self.sent
            .lock()
            .expect("gateway mutex poisoned")
            .push(lead_id.clone());
        if self.fail {
            return Err(OutreachError::Rejected {
                status: 503,
                body: "outreach workflow unavailable".to_string(),
            });
        }
        Ok(())
    }
}
