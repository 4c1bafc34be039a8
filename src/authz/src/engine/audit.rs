//! Structured audit records for access decisions
//!
//! Every decision produces exactly one event on the `ctxauth::audit` target.
//! Route that target to a dedicated sink through the subscriber's filter.

use super::decision::{AccessDecision, DecisionReason};
use crate::types::AccessTarget;
use serde::Serialize;
use tracing::{info, warn};

/// Tracing target for audit events
pub const AUDIT_TARGET: &str = "ctxauth::audit";

/// Flattened view of a decision for the audit log
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord<'a> {
    pub decision_id: &'a str,
    pub allowed: bool,
    pub principal: Option<&'a str>,
    pub permission: String,
    pub reason: &'a DecisionReason,
    pub target_id: Option<&'a str>,
}

impl<'a> AuditRecord<'a> {
    pub fn new(decision: &'a AccessDecision, target: Option<&'a AccessTarget>) -> Self {
        Self {
            decision_id: &decision.id,
            allowed: decision.allowed,
            principal: decision.principal.as_deref(),
            permission: decision.permission.to_string(),
            reason: &decision.reason,
            target_id: target.and_then(|t| t.id.as_deref()),
        }
    }

    /// Write the record to the audit target
    ///
    /// Overrides and unknown context keys are logged at warn, the rest at info.
    pub fn emit(&self) {
        let outcome = if self.allowed { "ALLOW" } else { "DENY" };
        let principal = self.principal.unwrap_or("-");
        let target_id = self.target_id.unwrap_or("-");

        match self.reason {
            DecisionReason::Override | DecisionReason::UnknownContextKey { .. } => warn!(
                target: AUDIT_TARGET,
                decision_id = self.decision_id,
                outcome,
                principal,
                permission = %self.permission,
                target_id,
                reason = %self.reason,
                "access decision"
            ),
            _ => info!(
                target: AUDIT_TARGET,
                decision_id = self.decision_id,
                outcome,
                principal,
                permission = %self.permission,
                target_id,
                reason = %self.reason,
                "access decision"
            ),
        }
    }
}
