mod common;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{lead_rows, spawn_stub, Captured, Recorder};
use lead_desk::config::StoreSettings;
use lead_desk::leads::{
    LeadDashboard, LeadId, LeadStatus, NotificationLog, RestLeadSource, Severity,
    TransitionPhase, WebhookOutreachGateway, OUTREACH_SENT_MESSAGE,
};
use serde_json::{json, Value};

async fn webhook_endpoint(State(recorder): State<Recorder>, Json(body): Json<Value>) -> StatusCode {
    recorder.push(Captured {
        body: Some(body),
        ..Captured::default()
    });
    StatusCode::OK
}

async fn remote_stub(recorder: Recorder) -> String {
    let router = Router::new()
        .route("/rest/v1/leads", get(|| async { Json(lead_rows()) }))
        .route("/webhook/send-outreach", post(webhook_endpoint))
        .with_state(recorder);
    spawn_stub(router).await
}

fn ids(dashboard: &LeadDashboard<RestLeadSource, WebhookOutreachGateway, NotificationLog>) -> Vec<String> {
    dashboard
        .view()
        .iter()
        .map(|lead| lead.id.to_string())
        .collect()
}

#[tokio::test]
async fn review_filter_and_contact_a_lead() {
    let recorder = Recorder::default();
    let base_url = remote_stub(recorder.clone()).await;
    let notifications = Arc::new(NotificationLog::default());
    let mut dashboard = LeadDashboard::new(
        Arc::new(RestLeadSource::new(StoreSettings {
            base_url: base_url.clone(),
            api_key: "anon-key".to_string(),
        })),
        Arc::new(WebhookOutreachGateway::new(format!(
            "{base_url}/webhook/send-outreach"
        ))),
        notifications.clone(),
    );

    assert_eq!(dashboard.load().await.expect("leads load"), 3);
    assert_eq!(dashboard.band_options(), vec!["Enterprise", "SMB"]);
    assert_eq!(dashboard.label_options(), vec!["ops-automation", "support"]);

    dashboard.set_label_filter("ops-automation");
    assert_eq!(ids(&dashboard), vec!["6a1f", "19bd"]);
    dashboard.set_band_filter("Enterprise");
    assert_eq!(ids(&dashboard), vec!["6a1f"]);

    assert!(dashboard.activate_row(&LeadId::from("6a1f")));
    let resolution = dashboard.send_outreach().await.expect("outreach triggered");

    assert_eq!(resolution.phase, TransitionPhase::Committed);
    assert!(!dashboard.selection().is_open());
    let lead = dashboard.lead(&LeadId::from("6a1f")).expect("lead kept");
    assert_eq!(lead.status, LeadStatus::OutreachSent);
    assert_ne!(lead.updated_at, "2025-03-04T10:00:00Z");
    assert_eq!(ids(&dashboard), vec!["6a1f"]);

    let bodies: Vec<_> = recorder.all().into_iter().filter_map(|c| c.body).collect();
    assert_eq!(bodies, vec![json!({ "lead_id": "6a1f" })]);

    let entries = notifications.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, OUTREACH_SENT_MESSAGE);
    assert_eq!(entries[0].severity, Severity::Info);
}

#[tokio::test]
async fn reload_replaces_local_changes_with_remote_state() {
    let recorder = Recorder::default();
    let base_url = remote_stub(recorder).await;
    let mut dashboard = LeadDashboard::new(
        Arc::new(RestLeadSource::new(StoreSettings {
            base_url: base_url.clone(),
            api_key: "anon-key".to_string(),
        })),
        Arc::new(WebhookOutreachGateway::new(format!(
            "{base_url}/webhook/send-outreach"
        ))),
        Arc::new(NotificationLog::default()),
    );
    dashboard.load().await.expect("leads load");
    dashboard.activate_row(&LeadId::from("52c0"));
    dashboard.send_outreach().await.expect("outreach triggered");

    dashboard.load().await.expect("leads reload");

    let lead = dashboard.lead(&LeadId::from("52c0")).expect("lead kept");
    assert_eq!(lead.status, LeadStatus::Other("Nurturing".to_string()));
}
