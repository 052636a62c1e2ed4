use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identity assigned by the remote lead store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub String);

impl LeadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Pipeline status of a lead.
///
/// Values the store returns that are not recognised here are kept verbatim in
/// `Other` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    OutreachSent,
    Other(String),
}

impl LeadStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "new" => Self::New,
            "contacted" => Self::Contacted,
            "qualified" => Self::Qualified,
            "outreach_sent" => Self::OutreachSent,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::OutreachSent => "outreach_sent",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Badge variant used when rendering the status column.
    pub fn badge(&self) -> StatusBadge {
        match self.as_str().to_ascii_lowercase().as_str() {
            "new" => StatusBadge::Default,
            "contacted" => StatusBadge::Secondary,
            "qualified" => StatusBadge::Outline,
            _ => StatusBadge::Default,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LeadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    Default,
    Secondary,
    Outline,
}

/// A single inbound lead as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub problem_text: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub fit_score: Option<f64>,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub fit_band: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub use_case_label: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub model_rationale: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Shallow partial update applied through [`crate::leads::LeadStore::patch`].
///
/// Unset fields leave the lead untouched. `updated_at` is never filled in
/// implicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub status: Option<LeadStatus>,
    pub updated_at: Option<String>,
}

impl LeadPatch {
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            updated_at: None,
        }
    }

    pub fn touched_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.updated_at.is_none()
    }

    pub(crate) fn apply_to(&self, lead: &Lead) -> Lead {
        let mut patched = lead.clone();
        if let Some(status) = &self.status {
            patched.status = status.clone();
        }
        if let Some(updated_at) = &self.updated_at {
            patched.updated_at = updated_at.clone();
        }
        patched
    }
}
