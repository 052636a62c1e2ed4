use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{Lead, LeadId, StatusBadge};
use super::filter::{apply_filters, derive_options, FilterDimension, LeadFilters};
use super::gateway::{OutreachError, OutreachGateway};
use super::notify::{Notification, NotificationSink};
use super::outreach::{
    FailurePolicy, OutreachController, OutreachResolution, OutreachSkipped, OutreachTicket,
    TransitionPhase,
};
use super::selection::SelectionCoordinator;
use super::source::{LeadSource, LeadSourceError};
use super::store::LeadStore;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch leads data";

/// Dimension behind the dashboard's "band" filter.
pub const BAND_DIMENSION: FilterDimension = FilterDimension::FitBand;
/// Dimension behind the dashboard's "label" filter.
pub const LABEL_DIMENSION: FilterDimension = FilterDimension::Label;

/// Owns every piece of lead review state and is the only caller of the
/// remote store and the outreach webhook.
///
/// State-changing methods are synchronous and recompute the filtered view
/// before returning. Remote work is split into `begin_*`/`finish_*` pairs so
/// a caller sharing the dashboard behind a lock can release it while the
/// request is in flight; [`LeadDashboard::load`] and
/// [`LeadDashboard::send_outreach`] chain the pairs for single owners.
pub struct LeadDashboard<S, G, N> {
    source: Arc<S>,
    gateway: Arc<G>,
    notifications: Arc<N>,
    store: LeadStore,
    filters: LeadFilters,
    view: Vec<Arc<Lead>>,
    selection: SelectionCoordinator,
    outreach: OutreachController,
    loading: bool,
}

impl<S, G, N> LeadDashboard<S, G, N>
where
    S: LeadSource + 'static,
    G: OutreachGateway + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(source: Arc<S>, gateway: Arc<G>, notifications: Arc<N>) -> Self {
        Self::with_policy(source, gateway, notifications, FailurePolicy::default())
    }

    pub fn with_policy(
        source: Arc<S>,
        gateway: Arc<G>,
        notifications: Arc<N>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            source,
            gateway,
            notifications,
            store: LeadStore::default(),
            filters: LeadFilters::default(),
            view: Vec::new(),
            selection: SelectionCoordinator::default(),
            outreach: OutreachController::new(policy),
            loading: true,
        }
    }

    pub fn source(&self) -> Arc<S> {
        Arc::clone(&self.source)
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    /// Fetch the full collection and replace local state with it.
    pub async fn load(&mut self) -> Result<usize, LeadSourceError> {
        self.begin_load();
        let result = self.source.fetch_all().await;
        self.finish_load(result)
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply a fetch result. Failures keep whatever was loaded before and
    /// notify; nothing is retried.
    pub fn finish_load(
        &mut self,
        result: Result<Vec<Lead>, LeadSourceError>,
    ) -> Result<usize, LeadSourceError> {
        self.loading = false;
        let outcome = match result {
            Ok(leads) => {
                self.store = LeadStore::load(leads);
                info!(count = self.store.len(), "leads loaded");
                Ok(self.store.len())
            }
            Err(err) => {
                warn!(error = %err, kept = self.store.len(), "lead fetch failed");
                self.notifications
                    .notify(Notification::error(FETCH_FAILED_MESSAGE));
                Err(err)
            }
        };
        self.recompute();
        outcome
    }

    pub fn set_filter(&mut self, dimension: FilterDimension, value: impl Into<String>) {
        self.filters.set(dimension, value);
        self.recompute();
    }

    pub fn set_band_filter(&mut self, value: impl Into<String>) {
        self.set_filter(BAND_DIMENSION, value);
    }

    pub fn set_label_filter(&mut self, value: impl Into<String>) {
        self.set_filter(LABEL_DIMENSION, value);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
    }

    /// Open the detail view on the lead with `id`. Unknown ids change nothing.
    pub fn activate_row(&mut self, id: &LeadId) -> bool {
        match self.store.get(id) {
            Some(lead) => {
                let lead = Arc::clone(lead);
                self.selection.select(Some(lead));
                true
            }
            None => false,
        }
    }

    pub fn select(&mut self, lead: Option<Arc<Lead>>) {
        self.selection.select(lead);
    }

    pub fn dismiss(&mut self) {
        self.selection.dismiss();
    }

    /// Trigger outreach for the selected lead and wait for the webhook.
    pub async fn send_outreach(&mut self) -> Result<OutreachResolution, OutreachSkipped> {
        let ticket = self.begin_outreach()?;
        let result = self.gateway.send(ticket.lead_id()).await;
        Ok(self.complete_outreach(ticket, result))
    }

    /// Optimistically mark the selected lead as `outreach_sent`.
    pub fn begin_outreach(&mut self) -> Result<OutreachTicket, OutreachSkipped> {
        let ticket = self
            .outreach
            .begin(&mut self.store, &mut self.selection)
            .inspect_err(|skipped| info!(reason = %skipped, "outreach trigger ignored"))?;
        self.recompute();
        Ok(ticket)
    }

    /// Apply the webhook result: notify, and close the detail view on success.
    pub fn complete_outreach(
        &mut self,
        ticket: OutreachTicket,
        result: Result<(), OutreachError>,
    ) -> OutreachResolution {
        let resolution =
            self.outreach
                .complete(ticket, result, &mut self.store, &mut self.selection);
        self.notifications.notify(resolution.notification.clone());
        if resolution.close_detail {
            self.selection.dismiss();
        }
        self.recompute();
        resolution
    }

    fn recompute(&mut self) {
        self.view = apply_filters(self.store.leads(), &self.filters);
    }

    pub fn view(&self) -> &[Arc<Lead>] {
        &self.view
    }

    pub fn leads(&self) -> &[Arc<Lead>] {
        self.store.leads()
    }

    pub fn lead(&self, id: &LeadId) -> Option<&Arc<Lead>> {
        self.store.get(id)
    }

    pub fn options(&self, dimension: FilterDimension) -> Vec<String> {
        derive_options(self.store.leads(), dimension)
    }

    pub fn band_options(&self) -> Vec<String> {
        self.options(BAND_DIMENSION)
    }

    pub fn label_options(&self) -> Vec<String> {
        self.options(LABEL_DIMENSION)
    }

    pub fn filters(&self) -> &LeadFilters {
        &self.filters
    }

    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self, id: &LeadId) -> TransitionPhase {
        self.outreach.phase(id)
    }

    pub fn pending_outreach(&self) -> Vec<LeadId> {
        self.outreach.pending()
    }

    pub fn selection_view(&self) -> SelectionView {
        SelectionView {
            open: self.selection.is_open(),
            lead: self.selection.active().map(|lead| Lead::clone(lead)),
            phase: self
                .selection
                .active_id()
                .map(|id| self.outreach.phase(id))
                .unwrap_or_default(),
        }
    }

    /// Serializable picture of the dashboard for presentation surfaces.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            loading: self.loading,
            total: self.store.len(),
            filters: FilterValues {
                band: self.filters.value(BAND_DIMENSION).to_string(),
                label: self.filters.value(LABEL_DIMENSION).to_string(),
            },
            options: FilterOptions {
                bands: self.band_options(),
                labels: self.label_options(),
            },
            leads: self.view.iter().map(|lead| LeadRow::from(lead.as_ref())).collect(),
            selection: self.selection_view(),
            pending_outreach: self.outreach.pending(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub loading: bool,
    pub total: usize,
    pub filters: FilterValues,
    pub options: FilterOptions,
    pub leads: Vec<LeadRow>,
    pub selection: SelectionView,
    pub pending_outreach: Vec<LeadId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterValues {
    pub band: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub bands: Vec<String>,
    pub labels: Vec<String>,
}

/// Table row projection of a lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRow {
    pub id: LeadId,
    pub name: String,
    pub company: Option<String>,
    pub score: Option<f64>,
    pub band: Option<String>,
    pub status: String,
    pub badge: StatusBadge,
}

impl From<&Lead> for LeadRow {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.clone(),
            name: lead.name.clone(),
            company: lead.company.clone(),
            score: lead.score,
            band: lead.band.clone(),
            status: lead.status.as_str().to_string(),
            badge: lead.status.badge(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub open: bool,
    pub lead: Option<Lead>,
    pub phase: TransitionPhase,
}
