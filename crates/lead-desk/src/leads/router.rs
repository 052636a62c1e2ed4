use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::dashboard::{DashboardSnapshot, LeadDashboard, SelectionView};
use super::domain::LeadId;
use super::gateway::OutreachGateway;
use super::notify::{Notification, NotificationSink};
use super::outreach::TransitionPhase;
use super::source::LeadSource;
use crate::error::AppError;

/// Dashboard shared between request handlers.
pub type SharedDashboard<S, G, N> = Arc<Mutex<LeadDashboard<S, G, N>>>;

#[derive(Debug, Default, Deserialize)]
pub struct FilterUpdate {
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OutreachResponse {
    pub lead_id: LeadId,
    pub phase: TransitionPhase,
    pub notification: Notification,
    pub detail_open: bool,
}

/// Router builder exposing the dashboard over JSON.
pub fn lead_router<S, G, N>(dashboard: SharedDashboard<S, G, N>) -> Router
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route("/api/v1/leads", get(snapshot_handler::<S, G, N>))
        .route("/api/v1/leads/reload", post(reload_handler::<S, G, N>))
        .route(
            "/api/v1/leads/filters",
            put(update_filters_handler::<S, G, N>).delete(clear_filters_handler::<S, G, N>),
        )
        .route(
            "/api/v1/leads/:lead_id/select",
            post(select_handler::<S, G, N>),
        )
        .route(
            "/api/v1/selection",
            get(selection_handler::<S, G, N>).delete(dismiss_handler::<S, G, N>),
        )
        .route(
            "/api/v1/selection/outreach",
            post(outreach_handler::<S, G, N>),
        )
        .with_state(dashboard)
}

pub(crate) async fn snapshot_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
) -> Json<DashboardSnapshot>
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    Json(dashboard.lock().await.snapshot())
}

pub(crate) async fn reload_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
) -> Result<Json<DashboardSnapshot>, AppError>
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    let source = {
        let mut guard = dashboard.lock().await;
        guard.begin_load();
        guard.source()
    };

    let result = source.fetch_all().await;

    let mut guard = dashboard.lock().await;
    guard.finish_load(result)?;
    Ok(Json(guard.snapshot()))
}

pub(crate) async fn update_filters_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
    Json(update): Json<FilterUpdate>,
) -> Json<DashboardSnapshot>
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    let mut guard = dashboard.lock().await;
    if let Some(band) = update.band {
        guard.set_band_filter(band);
    }
    if let Some(label) = update.label {
        guard.set_label_filter(label);
    }
    Json(guard.snapshot())
}

pub(crate) async fn clear_filters_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
) -> Json<DashboardSnapshot>
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    let mut guard = dashboard.lock().await;
    guard.clear_filters();
    Json(guard.snapshot())
}

pub(crate) async fn select_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
    Path(lead_id): Path<String>,
) -> Result<Json<SelectionView>, AppError>
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    let id = LeadId(lead_id);
    let mut guard = dashboard.lock().await;
    if !guard.activate_row(&id) {
        return Err(AppError::LeadNotFound(id));
    }
    Ok(Json(guard.selection_view()))
}

pub(crate) async fn selection_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
) -> Json<SelectionView>
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    Json(dashboard.lock().await.selection_view())
}

pub(crate) async fn dismiss_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
) -> StatusCode
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    dashboard.lock().await.dismiss();
    StatusCode::NO_CONTENT
}

/// The lock is released while the webhook call is in flight so filter and
/// selection requests keep working.
pub(crate) async fn outreach_handler<S, G, N>(
    State(dashboard): State<SharedDashboard<S, G, N>>,
) -> Response
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    let started = {
        let mut guard = dashboard.lock().await;
        guard
            .begin_outreach()
            .map(|ticket| (ticket, guard.gateway()))
    };
    let (ticket, gateway) = match started {
        Ok(started) => started,
        Err(skipped) => return AppError::from(skipped).into_response(),
    };

    let result = gateway.send(ticket.lead_id()).await;

    let mut guard = dashboard.lock().await;
    let resolution = guard.complete_outreach(ticket, result);
    let status = match resolution.phase {
        TransitionPhase::Committed => StatusCode::OK,
        _ => StatusCode::BAD_GATEWAY,
    };
    let body = OutreachResponse {
        lead_id: resolution.lead_id,
        phase: resolution.phase,
        notification: resolution.notification,
        detail_open: guard.selection().is_open(),
    };
    (status, Json(body)).into_response()
}
