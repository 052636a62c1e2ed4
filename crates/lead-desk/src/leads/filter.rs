use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::Lead;

/// Classification fields a lead list can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Band,
    FitBand,
    Label,
    UseCaseLabel,
}

impl FilterDimension {
    pub const fn key(self) -> &'static str {
        match self {
            FilterDimension::Band => "band",
            FilterDimension::FitBand => "fit_band",
            FilterDimension::Label => "label",
            FilterDimension::UseCaseLabel => "use_case_label",
        }
    }

    pub fn value_of(self, lead: &Lead) -> Option<&str> {
        let field = match self {
            FilterDimension::Band => &lead.band,
            FilterDimension::FitBand => &lead.fit_band,
            FilterDimension::Label => &lead.label,
            FilterDimension::UseCaseLabel => &lead.use_case_label,
        };
        field.as_deref()
    }
}

/// Active filter values keyed by dimension.
///
/// Blank values are never stored: an absent entry means the dimension imposes
/// no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilters {
    values: BTreeMap<FilterDimension, String>,
}

impl LeadFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dimension: FilterDimension, value: impl Into<String>) -> Self {
        self.set(dimension, value);
        self
    }

    pub fn set(&mut self, dimension: FilterDimension, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.values.remove(&dimension);
        } else {
            self.values.insert(dimension, value);
        }
    }

    pub fn clear_dimension(&mut self, dimension: FilterDimension) {
        self.values.remove(&dimension);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Current value, `""` when the dimension is unconstrained.
    pub fn value(&self, dimension: FilterDimension) -> &str {
        self.values.get(&dimension).map(String::as_str).unwrap_or("")
    }

    pub fn is_active(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        self.values
            .iter()
            .all(|(dimension, wanted)| dimension.value_of(lead) == Some(wanted.as_str()))
    }
}

/// Distinct, trimmed, non-empty values seen for `dimension`, in first-seen order.
pub fn derive_options(leads: &[Arc<Lead>], dimension: FilterDimension) -> Vec<String> {
    let mut seen = HashSet::new();
    leads
        .iter()
        .filter_map(|lead| dimension.value_of(lead))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Order-preserving subsequence of `leads` that satisfies every active filter.
pub fn apply_filters(leads: &[Arc<Lead>], filters: &LeadFilters) -> Vec<Arc<Lead>> {
    if !filters.is_active() {
        return leads.to_vec();
    }
    leads
        .iter()
        .filter(|lead| filters.matches(lead))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::tests::common::{lead, shared};

    fn ids(leads: &[Arc<Lead>]) -> Vec<&str> {
        leads.iter().map(|lead| lead.id.as_str()).collect()
    }

    fn collection() -> Vec<Arc<Lead>> {
        shared(vec![
            lead("x", Some("SMB"), Some("crm")),
            lead("y", Some("Enterprise"), Some("support")),
            lead("z", Some(""), Some("crm")),
            lead("w", Some("SMB"), Some("support")),
            lead("v", None, None),
        ])
    }

    #[test]
    fn options_skip_blank_values_and_keep_first_seen_order() {
        let leads = shared(vec![
            lead("x", Some("SMB"), None),
            lead("y", Some("Enterprise"), None),
            lead("z", Some(""), None),
        ]);
        assert_eq!(
            derive_options(&leads, FilterDimension::FitBand),
            vec!["SMB".to_string(), "Enterprise".to_string()]
        );
    }

    #[test]
    fn options_are_trimmed_and_deduplicated() {
        let leads = shared(vec![
            lead("a", Some(" Mid-Market "), Some("   ")),
            lead("b", Some("Mid-Market"), Some("crm")),
            lead("c", Some("\t"), Some("crm")),
        ]);
        assert_eq!(
            derive_options(&leads, FilterDimension::FitBand),
            vec!["Mid-Market".to_string()]
        );
        assert_eq!(
            derive_options(&leads, FilterDimension::Label),
            vec!["crm".to_string()]
        );
    }

    #[test]
    fn empty_filters_return_the_full_collection() {
        let leads = collection();
        let filters = LeadFilters::new()
            .with(FilterDimension::FitBand, "")
            .with(FilterDimension::Label, "");
        let view = apply_filters(&leads, &filters);
        assert_eq!(ids(&view), ids(&leads));
    }

    #[test]
    fn filters_combine_and_preserve_order() {
        let leads = collection();
        let by_band = apply_filters(&leads, &LeadFilters::new().with(FilterDimension::FitBand, "SMB"));
        assert_eq!(ids(&by_band), vec!["x", "w"]);

        let both = LeadFilters::new()
            .with(FilterDimension::FitBand, "SMB")
            .with(FilterDimension::Label, "support");
        assert_eq!(ids(&apply_filters(&leads, &both)), vec!["w"]);
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let leads = collection();
        assert!(apply_filters(&leads, &LeadFilters::new().with(FilterDimension::FitBand, "smb")).is_empty());
        assert!(apply_filters(&leads, &LeadFilters::new().with(FilterDimension::FitBand, "SM")).is_empty());
    }

    #[test]
    fn blank_filter_values_impose_no_constraint() {
        let mut filters = LeadFilters::new();
        filters.set(FilterDimension::Label, "   ");
        assert!(!filters.is_active());
        assert_eq!(filters.value(FilterDimension::Label), "");
        assert_eq!(apply_filters(&collection(), &filters).len(), 5);
    }

    #[test]
    fn clearing_restores_the_original_sequence() {
        let leads = collection();
        let mut filters = LeadFilters::new().with(FilterDimension::Label, "crm");
        assert_eq!(ids(&apply_filters(&leads, &filters)), vec!["x", "z"]);

        filters.clear();
        let restored = apply_filters(&leads, &filters);
        assert_eq!(ids(&restored), ids(&leads));
        assert!(restored.iter().zip(&leads).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn every_filtered_lead_satisfies_the_filters() {
        let leads = collection();
        for band in ["", "SMB", "Enterprise", "Unknown"] {
            for label in ["", "crm", "support"] {
                let filters = LeadFilters::new()
                    .with(FilterDimension::FitBand, band)
                    .with(FilterDimension::Label, label);
                let view = apply_filters(&leads, &filters);
                let mut cursor = leads.iter();
                for kept in &view {
                    assert!(filters.matches(kept));
                    assert!(cursor.any(|candidate| Arc::ptr_eq(candidate, kept)));
                }
            }
        }
    }
}
