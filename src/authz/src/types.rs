//! Core authorization types

use crate::error::AuthzError;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of a registered functionality (e.g. "invoice")
pub type FunctionalityName = String;

/// Name of a context dimension (e.g. "DEPARTMENT")
pub type ContextKey = String;

/// Operation a privilege can be granted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    /// All operations, in declaration order
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    /// Upper-case storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Read => "READ",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuthzError::InvalidInput(format!("Unknown operation: {}", s)))
    }
}

/// Permission identifier: an operation on a functionality
///
/// Compared structurally. The `"<OPERATION>.<functionality>"` string form
/// (e.g. `READ.invoice`) exists only for storage and logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    pub functionality: FunctionalityName,
    pub operation: Operation,
}

impl Permission {
    /// Create a new permission
    pub fn new(functionality: impl Into<String>, operation: Operation) -> Self {
        Self {
            functionality: functionality.into(),
            operation,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.operation, self.functionality)
    }
}

impl FromStr for Permission {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (operation, functionality) = s
            .split_once('.')
            .ok_or_else(|| AuthzError::InvalidPermission(s.to_string()))?;

        if functionality.is_empty() {
            return Err(AuthzError::InvalidPermission(s.to_string()));
        }

        let operation = operation
            .parse::<Operation>()
            .map_err(|_| AuthzError::InvalidPermission(s.to_string()))?;

        Ok(Self::new(functionality, operation))
    }
}

impl TryFrom<String> for Permission {
    type Error = AuthzError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.to_string()
    }
}

/// Canonical form of a context key: trimmed, upper-cased
pub fn normalize_key(key: &str) -> ContextKey {
    key.trim().to_ascii_uppercase()
}

/// Context values indexed by normalized key; one value per key
pub type ContextValues = BTreeMap<ContextKey, String>;

/// Deserialize a context map, normalizing keys in document order
///
/// Keys differing only by case collapse to one entry; the last one wins.
pub(crate) fn deserialize_context_values<'de, D>(deserializer: D) -> Result<ContextValues, D::Error>
where
    D: Deserializer<'de>,
{
    struct ContextValuesVisitor;

    impl<'de> Visitor<'de> for ContextValuesVisitor {
        type Value = ContextValues;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of context keys to values")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut values = ContextValues::new();
            while let Some((key, value)) = access.next_entry::<String, String>()? {
                values.insert(normalize_key(&key), value);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_map(ContextValuesVisitor)
}

/// Target of an access check (the record being read, updated...)
///
/// Attribute keys are normalized on insert, so lookups are
/// case-insensitive and each key holds a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTarget {
    /// Optional record identifier, used as the claimed value for `ID`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Context attribute values of the target (e.g. department)
    #[serde(default, deserialize_with = "deserialize_context_values")]
    attributes: ContextValues,
}

impl AccessTarget {
    /// Create an empty target
    pub fn new() -> Self {
        Self::default()
    }

    /// Target identified by record id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a context attribute, replacing any value under the same key
    pub fn with_attribute(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.attributes.insert(normalize_key(key.as_ref()), value.into());
        self
    }

    /// Attributes by normalized key
    pub fn attributes(&self) -> &ContextValues {
        &self.attributes
    }

    /// Attribute value for a context key. `ID` falls back to the record id.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        match self.attributes.get(&key) {
            Some(value) => Some(value.as_str()),
            None if key == "ID" => self.id.as_deref(),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_display_and_parse() {
        let permission = Permission::new("invoice", Operation::Read);
        assert_eq!(permission.to_string(), "READ.invoice");

        let parsed: Permission = "read.invoice".parse().unwrap();
        assert_eq!(parsed, permission);
    }

    #[test]
    fn test_permission_functionality_may_contain_dots() {
        let parsed: Permission = "UPDATE.billing.invoice".parse().unwrap();
        assert_eq!(parsed.functionality, "billing.invoice");
        assert_eq!(parsed.operation, Operation::Update);
    }

    #[test]
    fn test_invalid_permission_strings() {
        assert!("invoice".parse::<Permission>().is_err());
        assert!("READ.".parse::<Permission>().is_err());
        assert!("PUBLISH.invoice".parse::<Permission>().is_err());
        assert!("".parse::<Permission>().is_err());
    }

    #[test]
    fn test_permission_serde_as_string() {
        let permission = Permission::new("invoice", Operation::Delete);
        let json = serde_json::to_string(&permission).unwrap();
        assert_eq!(json, "\"DELETE.invoice\"");

        let back: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, permission);
    }

    #[test]
    fn test_target_attribute_lookup() {
        let target = AccessTarget::new()
            .with_id("42")
            .with_attribute("department", "10");

        assert_eq!(target.attribute("DEPARTMENT"), Some("10"));
        assert_eq!(target.attribute("Department"), Some("10"));
        assert_eq!(target.attribute("id"), Some("42"));
        assert_eq!(target.attribute("region"), None);
    }

    #[test]
    fn test_target_keys_collapse_by_case() {
        let target = AccessTarget::new()
            .with_attribute("department", "10")
            .with_attribute("DEPARTMENT", "30");

        assert_eq!(target.attributes().len(), 1);
        assert_eq!(target.attribute("department"), Some("30"));
    }

    #[test]
    fn test_target_deserialize_normalizes_keys() {
        let target: AccessTarget =
            serde_json::from_str(r#"{"attributes": {"DEPARTMENT": "30", "department": "10"}}"#)
                .unwrap();

        assert_eq!(target.attributes().len(), 1);
        assert_eq!(target.attribute("Department"), Some("10"));
    }
}
