use std::sync::Arc;

use super::domain::{Lead, LeadId};

/// Tracks which lead the detail view shows and whether it is open.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    active: Option<Arc<Lead>>,
    open: bool,
}

impl SelectionCoordinator {
    /// Open the detail view on `lead`; `None` closes it with nothing selected.
    pub fn select(&mut self, lead: Option<Arc<Lead>>) {
        self.open = lead.is_some();
        self.active = lead;
    }

    /// Close the detail view. The last selected lead stays readable.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// Swap in fresh data for the active lead if `lead` has the same identity.
    pub fn refresh(&mut self, lead: &Arc<Lead>) -> bool {
        match &self.active {
            Some(current) if current.id == lead.id => {
                self.active = Some(Arc::clone(lead));
                true
            }
            _ => false,
        }
    }

    pub fn active(&self) -> Option<&Arc<Lead>> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&LeadId> {
        self.active.as_ref().map(|lead| &lead.id)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
