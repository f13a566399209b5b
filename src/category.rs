// Category labels and the policy for accepting them

use serde::{Deserialize, Serialize};

/// Labels offered when nothing else is configured
pub const DEFAULT_LABELS: [&str; 5] = ["Personal", "Work", "Study", "Health", "Other"];

/// Whether categories outside `labels` are accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryPolicy {
    /// Any string is a valid category
    #[default]
    Open,
    /// Only the configured labels are valid
    Closed,
}

/// The configured category set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Categories {
    pub policy: CategoryPolicy,
    pub labels: Vec<String>,
    /// Category used when a caller does not pick one
    pub default: String,
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            policy: CategoryPolicy::Open,
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
            default: DEFAULT_LABELS[0].to_string(),
        }
    }
}

impl Categories {
    pub fn closed(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let default = labels.first().cloned().unwrap_or_default();
        Self {
            policy: CategoryPolicy::Closed,
            labels,
            default,
        }
    }

    pub fn accepts(&self, category: &str) -> bool {
        match self.policy {
            CategoryPolicy::Open => true,
            CategoryPolicy::Closed => self.labels.iter().any(|label| label == category),
        }
    }
}
