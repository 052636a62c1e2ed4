use crate::infra::{rest_lead_source, webhook_gateway};
use crate::render::{render_detail, render_selection, write_rows, OutputFormat};
use clap::Args;
use lead_desk::config::AppConfig;
use lead_desk::error::AppError;
use lead_desk::leads::{
    apply_filters, LeadDashboard, LeadFilters, LeadId, LeadRow, LeadSource, LeadStore,
    OutreachGateway, TracingNotificationSink, BAND_DIMENSION, LABEL_DIMENSION,
};
use lead_desk::telemetry;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Only show leads whose fit band equals this value
    #[arg(long)]
    pub(crate) band: Option<String>,
    /// Only show leads carrying this label
    #[arg(long)]
    pub(crate) label: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Identifier assigned by the lead store
    pub(crate) lead_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct OutreachArgs {
    /// Identifier assigned by the lead store
    pub(crate) lead_id: String,
}

fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

async fn fetch_store(config: &AppConfig) -> Result<LeadStore, AppError> {
    let source = rest_lead_source(config)?;
    let leads = source.fetch_all().await?;
    Ok(LeadStore::load(leads))
}

pub(crate) async fn run_list(args: ListArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let store = fetch_store(&config).await?;

    let filters = LeadFilters::new()
        .with(BAND_DIMENSION, args.band.unwrap_or_default())
        .with(LABEL_DIMENSION, args.label.unwrap_or_default());
    let rows: Vec<LeadRow> = apply_filters(store.leads(), &filters)
        .iter()
        .map(|lead| LeadRow::from(lead.as_ref()))
        .collect();
    info!(total = store.len(), shown = rows.len(), "lead listing");

    write_rows(&rows, args.format)
}

pub(crate) async fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let store = fetch_store(&config).await?;

    let id = LeadId(args.lead_id);
    match store.get(&id) {
        Some(lead) => {
            render_detail(lead);
            Ok(())
        }
        None => Err(AppError::LeadNotFound(id)),
    }
}

pub(crate) async fn run_outreach(args: OutreachArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let mut dashboard = LeadDashboard::with_policy(
        Arc::new(rest_lead_source(&config)?),
        Arc::new(webhook_gateway(&config)?),
        Arc::new(TracingNotificationSink),
        config.outreach.failure_policy,
    );
    dashboard.load().await?;

    let id = LeadId(args.lead_id);
    if !dashboard.activate_row(&id) {
        return Err(AppError::LeadNotFound(id));
    }

    let ticket = dashboard.begin_outreach()?;
    render_selection(&dashboard.selection_view());

    let result = dashboard.gateway().send(ticket.lead_id()).await;
    let resolution = dashboard.complete_outreach(ticket, result.clone());
    println!(
        "{}: {}",
        resolution.notification.title, resolution.notification.description
    );
    render_selection(&dashboard.selection_view());

    result.map_err(AppError::from)
}
