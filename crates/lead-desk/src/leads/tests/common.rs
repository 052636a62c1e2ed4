use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, Notify};

use crate::leads::domain::{Lead, LeadId, LeadStatus};
use crate::leads::gateway::{OutreachError, OutreachGateway};
use crate::leads::notify::NotificationLog;
use crate::leads::source::{LeadSource, LeadSourceError};
use crate::leads::{lead_router, FailurePolicy, LeadDashboard, SharedDashboard};

pub(crate) fn lead(id: &str, fit_band: Option<&str>, label: Option<&str>) -> Lead {
    Lead {
        id: LeadId::from(id),
        name: format!("Lead {id}"),
        email: format!("{id}@example.test"),
        company: Some("Acme Analytics".to_string()),
        website: None,
        industry: Some("Logistics".to_string()),
        company_size: Some("11-50".to_string()),
        problem_text: "Manual quoting takes days".to_string(),
        status: LeadStatus::New,
        score: Some(72.0),
        fit_score: Some(0.8),
        band: Some("B".to_string()),
        fit_band: fit_band.map(str::to_string),
        label: label.map(str::to_string),
        use_case_label: None,
        rationale: None,
        model_rationale: None,
        created_at: "2025-03-01T09:00:00Z".to_string(),
        updated_at: "2025-03-01T09:00:00Z".to_string(),
    }
}

pub(crate) fn shared(leads: Vec<Lead>) -> Vec<Arc<Lead>> {
    leads.into_iter().map(Arc::new).collect()
}

pub(super) fn sample_leads() -> Vec<Lead> {
    vec![
        lead("x", Some("SMB"), Some("crm")),
        lead("y", Some("Enterprise"), Some("support")),
        lead("z", Some(""), Some("crm")),
    ]
}

#[derive(Default)]
pub(super) struct MemorySource {
    leads: Vec<Lead>,
}

impl MemorySource {
    pub(super) fn new(leads: Vec<Lead>) -> Self {
        Self { leads }
    }
}

#[async_trait]
impl LeadSource for MemorySource {
    async fn fetch_all(&self) -> Result<Vec<Lead>, LeadSourceError> {
        Ok(self.leads.clone())
    }
}

pub(super) struct UnavailableSource;

#[async_trait]
impl LeadSource for UnavailableSource {
    async fn fetch_all(&self) -> Result<Vec<Lead>, LeadSourceError> {
        Err(LeadSourceError::Network("connection refused".to_string()))
    }
}

/// Serves the leads once, then reports the store as unreachable.
pub(super) struct FlakySource {
    leads: Mutex<Option<Vec<Lead>>>,
}

impl FlakySource {
    pub(super) fn new(leads: Vec<Lead>) -> Self {
        Self {
            leads: Mutex::new(Some(leads)),
        }
    }
}

#[async_trait]
impl LeadSource for FlakySource {
    async fn fetch_all(&self) -> Result<Vec<Lead>, LeadSourceError> {
        self.leads
            .lock()
            .expect("source mutex poisoned")
            .take()
            .ok_or_else(|| LeadSourceError::Network("connection reset".to_string()))
    }
}

/// Replays queued outcomes; succeeds once the queue is empty.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    outcomes: Mutex<VecDeque<Result<(), OutreachError>>>,
    calls: Mutex<Vec<LeadId>>,
}

impl ScriptedGateway {
    pub(super) fn failing() -> Self {
        let gateway = Self::default();
        gateway.push(Err(OutreachError::Rejected {
            status: 500,
            body: "workflow error".to_string(),
        }));
        gateway
    }

    pub(super) fn push(&self, outcome: Result<(), OutreachError>) {
        self.outcomes
            .lock()
            .expect("gateway mutex poisoned")
            .push_back(outcome);
    }

    pub(super) fn calls(&self) -> Vec<LeadId> {
        self.calls.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl OutreachGateway for ScriptedGateway {
    async fn send(&self, lead_id: &LeadId) -> Result<(), OutreachError> {
        self.calls
            .lock()
            .expect("gateway mutex poisoned")
            .push(lead_id.clone());
        self.outcomes
            .lock()
            .expect("gateway mutex poisoned")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// Holds every call until the test releases it.
#[derive(Default)]
pub(super) struct GatedGateway {
    pub(super) entered: Notify,
    pub(super) release: Notify,
}

#[async_trait]
impl OutreachGateway for GatedGateway {
    async fn send(&self, _lead_id: &LeadId) -> Result<(), OutreachError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

pub(super) type TestDashboard = LeadDashboard<MemorySource, ScriptedGateway, NotificationLog>;

pub(super) async fn loaded_dashboard(
    gateway: ScriptedGateway,
    policy: FailurePolicy,
) -> (TestDashboard, Arc<ScriptedGateway>, Arc<NotificationLog>) {
    let gateway = Arc::new(gateway);
    let notifications = Arc::new(NotificationLog::default());
    let mut dashboard = LeadDashboard::with_policy(
        Arc::new(MemorySource::new(sample_leads())),
        gateway.clone(),
        notifications.clone(),
        policy,
    );
    dashboard.load().await.expect("memory source loads");
    (dashboard, gateway, notifications)
}

pub(super) fn shared_dashboard<S, G>(
    source: S,
    gateway: Arc<G>,
) -> (SharedDashboard<S, G, NotificationLog>, Arc<NotificationLog>)
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
{
    let notifications = Arc::new(NotificationLog::default());
    let dashboard = LeadDashboard::new(Arc::new(source), gateway, notifications.clone());
    (Arc::new(AsyncMutex::new(dashboard)), notifications)
}

pub(super) fn router_for<S, G>(dashboard: SharedDashboard<S, G, NotificationLog>) -> axum::Router
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
{
    lead_router(dashboard)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
