//! Engine configuration

use crate::types::Operation;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable enabling every operation
pub const ENV_ALLOW_ALL: &str = "CTXAUTH_ALLOW_ALL";
pub const ENV_ALLOW_CREATE: &str = "CTXAUTH_ALLOW_CREATE";
pub const ENV_ALLOW_READ: &str = "CTXAUTH_ALLOW_READ";
pub const ENV_ALLOW_UPDATE: &str = "CTXAUTH_ALLOW_UPDATE";
pub const ENV_ALLOW_DELETE: &str = "CTXAUTH_ALLOW_DELETE";

/// Administrative "allow everything" switches
///
/// For bootstrap and test environments only. All off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideFlags {
    pub allow_all: bool,
    pub allow_create: bool,
    pub allow_read: bool,
    pub allow_update: bool,
    pub allow_delete: bool,
}

impl OverrideFlags {
    /// Every operation allowed
    pub fn all() -> Self {
        Self {
            allow_all: true,
            ..Default::default()
        }
    }

    /// Whether `operation` is unconditionally allowed
    pub fn allows(&self, operation: Operation) -> bool {
        self.allow_all
            || match operation {
                Operation::Create => self.allow_create,
                Operation::Read => self.allow_read,
                Operation::Update => self.allow_update,
                Operation::Delete => self.allow_delete,
            }
    }

    pub fn any_enabled(&self) -> bool {
        self.allow_all || self.allow_create || self.allow_read || self.allow_update || self.allow_delete
    }
}

/// Authorization engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Escape hatch flags
    pub overrides: OverrideFlags,
}

impl EngineConfig {
    /// Load from the process environment
    ///
    /// Flags accept `1`, `true`, `yes` or `on` (case-insensitive); anything
    /// else, including absence, is off.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).map(|v| parse_flag(&v)).unwrap_or(false);

        let config = Self {
            overrides: OverrideFlags {
                allow_all: flag(ENV_ALLOW_ALL),
                allow_create: flag(ENV_ALLOW_CREATE),
                allow_read: flag(ENV_ALLOW_READ),
                allow_update: flag(ENV_ALLOW_UPDATE),
                allow_delete: flag(ENV_ALLOW_DELETE),
            },
        };

        if config.overrides.any_enabled() {
            warn!(overrides = ?config.overrides, "authorization overrides enabled from environment");
        }

        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
