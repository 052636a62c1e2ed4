//! Lead review engine: the canonical lead collection, filtered views, the
//! detail selection, and the optimistic outreach transition, composed by
//! [`LeadDashboard`].

pub mod dashboard;
pub mod domain;
pub mod filter;
pub mod gateway;
pub mod notify;
pub mod outreach;
pub mod router;
pub mod selection;
pub mod source;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

pub use dashboard::{
    DashboardSnapshot, FilterOptions, FilterValues, LeadDashboard, LeadRow, SelectionView,
    BAND_DIMENSION, FETCH_FAILED_MESSAGE, LABEL_DIMENSION,
};
pub use domain::{Lead, LeadId, LeadPatch, LeadStatus, StatusBadge};
pub use filter::{apply_filters, derive_options, FilterDimension, LeadFilters};
pub use gateway::{OutreachError, OutreachGateway, WebhookOutreachGateway};
pub use notify::{Notification, NotificationLog, NotificationSink, Severity, TracingNotificationSink};
pub use outreach::{
    FailurePolicy, OutreachController, OutreachResolution, OutreachSkipped, OutreachTicket,
    TransitionPhase, OUTREACH_FAILED_MESSAGE, OUTREACH_SENT_MESSAGE,
};
pub use router::{lead_router, FilterUpdate, OutreachResponse, SharedDashboard};
pub use selection::SelectionCoordinator;
pub use source::{LeadSource, LeadSourceError, RestLeadSource};
pub use store::LeadStore;
