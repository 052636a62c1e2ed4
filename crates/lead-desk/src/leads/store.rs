use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use super::domain::{Lead, LeadId, LeadPatch};

/// Canonical, ordered lead collection for the session.
///
/// Leads are shared behind `Arc` so a patch produces a new collection that
/// reuses every untouched lead.
#[derive(Debug, Clone, Default)]
pub struct LeadStore {
    leads: Vec<Arc<Lead>>,
    index: HashMap<LeadId, usize>,
}

impl LeadStore {
    /// Replace the whole collection, keeping server order.
    ///
    /// Identities must be unique; later duplicates are dropped.
    pub fn load(leads: Vec<Lead>) -> Self {
        let mut seen = HashSet::with_capacity(leads.len());
        let mut kept = Vec::with_capacity(leads.len());
        for lead in leads {
            if seen.insert(lead.id.clone()) {
                kept.push(Arc::new(lead));
            } else {
                warn!(lead_id = %lead.id, "dropping duplicate lead identity from fetch");
            }
        }
        Self::from_shared(kept)
    }

    fn from_shared(leads: Vec<Arc<Lead>>) -> Self {
        let index = leads
            .iter()
            .enumerate()
            .map(|(position, lead)| (lead.id.clone(), position))
            .collect();
        Self { leads, index }
    }

    pub fn leads(&self) -> &[Arc<Lead>] {
        &self.leads
    }

    pub fn get(&self, id: &LeadId) -> Option<&Arc<Lead>> {
        self.index.get(id).map(|&position| &self.leads[position])
    }

    pub fn contains(&self, id: &LeadId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Return a collection with `patch` merged into the lead matching `id`.
    ///
    /// Unknown ids leave the collection unchanged; deciding whether that is a
    /// bug belongs to the caller.
    pub fn patch(&self, id: &LeadId, patch: &LeadPatch) -> Self {
        let Some(&position) = self.index.get(id) else {
            return self.clone();
        };

        let mut leads = self.leads.clone();
        leads[position] = Arc::new(patch.apply_to(&self.leads[position]));
        Self {
            leads,
            index: self.index.clone(),
        }
    }
}

impl PartialEq for LeadStore {
    fn eq(&self, other: &Self) -> bool {
        self.leads == other.leads
    }
}
