//! Built-in strategies

use super::{ContextMatcher, ContextStrategy};

/// Record identity: stored values are serialized id lists
#[derive(Debug, Clone, Copy, Default)]
pub struct IdContextStrategy;

impl IdContextStrategy {
    pub const KEY: &'static str = "ID";
}

impl ContextStrategy for IdContextStrategy {
    fn context_key(&self) -> &str {
        Self::KEY
    }

    fn matcher(&self) -> ContextMatcher {
        ContextMatcher::SerializedList
    }
}

/// Department: stored values are single codes or serialized code lists
#[derive(Debug, Clone, Copy, Default)]
pub struct DepartmentContextStrategy;

impl DepartmentContextStrategy {
    pub const KEY: &'static str = "DEPARTMENT";
}

impl ContextStrategy for DepartmentContextStrategy {
    fn context_key(&self) -> &str {
        Self::KEY
    }

    fn matcher(&self) -> ContextMatcher {
        ContextMatcher::ListOrScalar
    }
}

/// Any other business dimension, with a chosen matching rule
#[derive(Debug, Clone)]
pub struct AttributeContextStrategy {
    key: String,
    matcher: ContextMatcher,
}

impl AttributeContextStrategy {
    pub fn new(key: impl Into<String>, matcher: ContextMatcher) -> Self {
        Self {
            key: key.into().to_ascii_uppercase(),
            matcher,
        }
    }
}

impl ContextStrategy for AttributeContextStrategy {
    fn context_key(&self) -> &str {
        &self.key
    }

    fn matcher(&self) -> ContextMatcher {
        self.matcher
    }
}
