use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use lead_desk::leads::{
    lead_router, LeadSource, Notification, NotificationSink, OutreachGateway, SharedDashboard,
};
use serde_json::json;

pub(crate) fn with_lead_routes<S, G, N>(dashboard: SharedDashboard<S, G, N>) -> Router
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    lead_router(dashboard)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/notifications", get(notifications_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Hands out queued toasts once; the next call only sees newer ones.
pub(crate) async fn notifications_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<Notification>> {
    Json(state.notifications.drain())
}
