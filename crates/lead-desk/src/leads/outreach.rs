//! Optimistic `outreach_sent` transition.
//!
//! Each trigger runs `Idle -> Optimistic -> Committed | Failed` for one lead.
//! The local status flips before the webhook is called; the remote result
//! only decides the notification, whether the detail view closes, and, under
//! [`FailurePolicy::Revert`], whether the previous status comes back.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{LeadId, LeadPatch, LeadStatus};
use super::gateway::OutreachError;
use super::notify::Notification;
use super::selection::SelectionCoordinator;
use super::store::LeadStore;

pub const OUTREACH_SENT_MESSAGE: &str = "Outreach Sent!";
pub const OUTREACH_FAILED_MESSAGE: &str = "Failed to send outreach. Please try again.";

/// What happens to the optimistic status when the webhook fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave `outreach_sent` in place so the operator decides whether to retry.
    #[default]
    KeepOptimistic,
    /// Restore the status the lead had before the trigger.
    Revert,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    #[default]
    Idle,
    Optimistic,
    Committed,
    Failed,
}

impl TransitionPhase {
    pub const fn is_pending(self) -> bool {
        matches!(self, TransitionPhase::Optimistic)
    }
}

/// Reasons a trigger did nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutreachSkipped {
    #[error("no lead is selected")]
    NoSelection,
    #[error("outreach for lead {0} is still in flight")]
    AlreadyPending(LeadId),
}

/// Proof that a lead entered the optimistic phase; consumed on completion.
#[derive(Debug, PartialEq, Eq)]
pub struct OutreachTicket {
    lead_id: LeadId,
    previous_status: LeadStatus,
    attempt: u32,
}

impl OutreachTicket {
    pub fn lead_id(&self) -> &LeadId {
        &self.lead_id
    }

    pub fn previous_status(&self) -> &LeadStatus {
        &self.previous_status
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// Externally visible effects of a finished transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachResolution {
    pub lead_id: LeadId,
    pub phase: TransitionPhase,
    pub notification: Notification,
    pub close_detail: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct TransitionRecord {
    phase: TransitionPhase,
    attempts: u32,
}

#[derive(Debug, Clone, Default)]
pub struct OutreachController {
    policy: FailurePolicy,
    ledger: HashMap<LeadId, TransitionRecord>,
}

impl OutreachController {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            ledger: HashMap::new(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn phase(&self, lead_id: &LeadId) -> TransitionPhase {
        self.ledger
            .get(lead_id)
            .map(|record| record.phase)
            .unwrap_or_default()
    }

    pub fn pending(&self) -> Vec<LeadId> {
        let mut pending: Vec<LeadId> = self
            .ledger
            .iter()
            .filter(|(_, record)| record.phase.is_pending())
            .map(|(id, _)| id.clone())
            .collect();
        pending.sort();
        pending
    }

    /// Enter the optimistic phase for the selected lead.
    ///
    /// Store and selection are both written before this returns, so the
    /// caller can issue the remote call with local state already updated.
    pub fn begin(
        &mut self,
        store: &mut LeadStore,
        selection: &mut SelectionCoordinator,
    ) -> Result<OutreachTicket, OutreachSkipped> {
        let active = selection.active().ok_or(OutreachSkipped::NoSelection)?;
        let lead_id = active.id.clone();
        let previous_status = active.status.clone();

        let record = self.ledger.entry(lead_id.clone()).or_default();
        if record.phase.is_pending() {
            debug!(%lead_id, "outreach already in flight");
            return Err(OutreachSkipped::AlreadyPending(lead_id));
        }
        record.phase = TransitionPhase::Optimistic;
        record.attempts += 1;
        let attempt = record.attempts;

        let patch = LeadPatch::status(LeadStatus::OutreachSent).touched_at(timestamp());
        write_through(store, selection, &lead_id, &patch);

        info!(%lead_id, attempt, previous = %previous_status, "outreach marked optimistic");
        Ok(OutreachTicket {
            lead_id,
            previous_status,
            attempt,
        })
    }

    /// Settle a transition with the webhook result.
    pub fn complete(
        &mut self,
        ticket: OutreachTicket,
        result: Result<(), OutreachError>,
        store: &mut LeadStore,
        selection: &mut SelectionCoordinator,
    ) -> OutreachResolution {
        let OutreachTicket {
            lead_id,
            previous_status,
            attempt,
        } = ticket;

        let phase = if result.is_ok() {
            TransitionPhase::Committed
        } else {
            TransitionPhase::Failed
        };

        let record = self.ledger.entry(lead_id.clone()).or_default();
        if record.attempts == attempt {
            record.phase = phase;
        } else {
            warn!(%lead_id, attempt, latest = record.attempts, "settling a superseded outreach attempt");
        }

        match result {
            Ok(()) => {
                info!(%lead_id, attempt, "outreach committed");
                OutreachResolution {
                    lead_id,
                    phase,
                    notification: Notification::success(OUTREACH_SENT_MESSAGE),
                    close_detail: true,
                }
            }
            Err(err) => {
                warn!(%lead_id, attempt, error = %err, "outreach failed");
                if self.policy == FailurePolicy::Revert {
                    let still_optimistic = store
                        .get(&lead_id)
                        .is_some_and(|lead| lead.status == LeadStatus::OutreachSent);
                    if still_optimistic {
                        let patch = LeadPatch::status(previous_status).touched_at(timestamp());
                        write_through(store, selection, &lead_id, &patch);
                        info!(%lead_id, "optimistic status reverted");
                    }
                }
                OutreachResolution {
                    lead_id,
                    phase,
                    notification: Notification::error(OUTREACH_FAILED_MESSAGE),
                    close_detail: false,
                }
            }
        }
    }
}

// The selection may hold a lead the store no longer has (a reload replaced
// the collection mid-flight); it is still patched so the detail view agrees.
fn write_through(
    store: &mut LeadStore,
    selection: &mut SelectionCoordinator,
    lead_id: &LeadId,
    patch: &LeadPatch,
) {
    *store = store.patch(lead_id, patch);
    let updated = match store.get(lead_id) {
        Some(lead) => Arc::clone(lead),
        None => match selection.active() {
            Some(lead) if &lead.id == lead_id => Arc::new(patch.apply_to(lead)),
            _ => return,
        },
    };
    selection.refresh(&updated);
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
