//! Matching of stored context values against claimed values

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of context value, each with its own matching rule
///
/// Every variant is total: malformed or empty input yields `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMatcher {
    /// Stored value is a JSON array of strings; claimed value must be a member
    SerializedList,
    /// Stored value must equal the claimed value
    Exact,
    /// Stored values starting with `[` are lists, anything else is exact
    ListOrScalar,
}

impl ContextMatcher {
    /// Whether `stored` covers `claimed`
    pub fn matches(&self, stored: &str, claimed: &str) -> bool {
        match self {
            ContextMatcher::SerializedList => list_contains(stored, claimed),
            ContextMatcher::Exact => exact(stored, claimed),
            ContextMatcher::ListOrScalar => {
                if stored.trim_start().starts_with('[') {
                    list_contains(stored, claimed)
                } else {
                    exact(stored, claimed)
                }
            }
        }
    }

    /// Whether `stored` is parseable for this kind, without logging
    pub fn is_well_formed(&self, stored: &str) -> bool {
        let is_list = || serde_json::from_str::<Vec<String>>(stored).is_ok();
        match self {
            ContextMatcher::SerializedList => is_list(),
            ContextMatcher::Exact => !stored.trim().is_empty(),
            ContextMatcher::ListOrScalar => {
                if stored.trim_start().starts_with('[') {
                    is_list()
                } else {
                    !stored.trim().is_empty()
                }
            }
        }
    }
}

/// Both kinds compare trimmed, non-empty values
fn same_value(stored: &str, claimed: &str) -> bool {
    let stored = stored.trim();
    !stored.is_empty() && stored == claimed.trim()
}

fn exact(stored: &str, claimed: &str) -> bool {
    same_value(stored, claimed)
}

fn list_contains(stored: &str, claimed: &str) -> bool {
    match parse_list(stored) {
        Some(values) => values.iter().any(|v| same_value(v, claimed)),
        None => false,
    }
}

/// Parse a serialized list of strings; `None` if malformed
pub(crate) fn parse_list(stored: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(stored) {
        Ok(values) => Some(values),
        Err(e) => {
            debug!(stored, error = %e, "malformed context value");
            None
        }
    }
}
