use crate::cli::ServeArgs;
use crate::infra::{rest_lead_source, webhook_gateway, AppState};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_desk::config::AppConfig;
use lead_desk::error::AppError;
use lead_desk::leads::{LeadDashboard, NotificationLog};
use lead_desk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let notifications = Arc::new(NotificationLog::default());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        notifications: notifications.clone(),
    };

    let mut dashboard = LeadDashboard::with_policy(
        Arc::new(rest_lead_source(&config)?),
        Arc::new(webhook_gateway(&config)?),
        notifications,
        config.outreach.failure_policy,
    );
    // A failed first fetch is already queued as a notification; the service
    // still starts and `/api/v1/leads/reload` can retry.
    if let Err(err) = dashboard.load().await {
        warn!(error = %err, "initial lead fetch failed");
    }

    let app = with_lead_routes(Arc::new(Mutex::new(dashboard)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = ?config.outreach.failure_policy,
        "lead desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
