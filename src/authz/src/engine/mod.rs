//! Authorization decision engine
//!
//! Combines the principal's granted permissions with context strategies to
//! answer `can_create / can_read / can_update / can_delete`.

pub mod audit;
pub mod config;
pub mod decision;

pub use audit::{AuditRecord, AUDIT_TARGET};
pub use config::{EngineConfig, OverrideFlags};
pub use decision::{AccessDecision, DecisionReason};

use crate::model::Grant;
use crate::principal::{Principal, PrincipalProvider};
use crate::strategy::StrategyRegistry;
use crate::types::{AccessTarget, Operation, Permission};

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decision engine
///
/// # Pipeline
///
/// ```text
/// Override flags → Principal → Permission set → Context strategies → Decision
///                                                                       ↓
///                                                                  [Audit Log]
/// ```
///
/// Immutable after construction; share through `Arc`. Every call recomputes
/// from its inputs and ends in an [`AccessDecision`], never an error. Any
/// missing, unknown or malformed input denies.
pub struct AuthzEngine {
    config: EngineConfig,
    strategies: Arc<StrategyRegistry>,
    principals: Arc<dyn PrincipalProvider>,
}

impl AuthzEngine {
    pub fn new(
        config: EngineConfig,
        strategies: Arc<StrategyRegistry>,
        principals: Arc<dyn PrincipalProvider>,
    ) -> Self {
        if config.overrides.any_enabled() {
            warn!(overrides = ?config.overrides, "AuthzEngine created with authorization overrides");
        }

        info!(strategies = strategies.len(), "AuthzEngine initialized");

        Self {
            config,
            strategies,
            principals,
        }
    }

    /// Engine with default config and the built-in strategies
    pub fn with_defaults(principals: Arc<dyn PrincipalProvider>) -> Self {
        Self::new(
            EngineConfig::default(),
            Arc::new(StrategyRegistry::with_defaults()),
            principals,
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn can_create(&self, functionality: &str, target: Option<&AccessTarget>) -> bool {
        self.can(functionality, Operation::Create, target)
    }

    pub fn can_read(&self, functionality: &str, target: Option<&AccessTarget>) -> bool {
        self.can(functionality, Operation::Read, target)
    }

    pub fn can_update(&self, functionality: &str, target: Option<&AccessTarget>) -> bool {
        self.can(functionality, Operation::Update, target)
    }

    pub fn can_delete(&self, functionality: &str, target: Option<&AccessTarget>) -> bool {
        self.can(functionality, Operation::Delete, target)
    }

    /// Whether the current principal may perform `operation` on `functionality`
    pub fn can(&self, functionality: &str, operation: Operation, target: Option<&AccessTarget>) -> bool {
        self.decide(&Permission::new(functionality, operation), target)
            .allowed
    }

    /// Full decision for the current principal
    pub fn decide(&self, permission: &Permission, target: Option<&AccessTarget>) -> AccessDecision {
        let principal = self.principals.current();
        self.decide_for(principal.as_ref(), permission, target)
    }

    /// Full decision for an explicit principal
    pub fn decide_for(
        &self,
        principal: Option<&Principal>,
        permission: &Permission,
        target: Option<&AccessTarget>,
    ) -> AccessDecision {
        let decision = self.evaluate(principal, permission, target);
        AuditRecord::new(&decision, target).emit();
        decision
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        permission: &Permission,
        target: Option<&AccessTarget>,
    ) -> AccessDecision {
        let principal_id = principal.map(|p| p.id.clone());

        // Step 1: administrative override
        if self.config.overrides.allows(permission.operation) {
            return AccessDecision::allow(principal_id, permission.clone(), DecisionReason::Override);
        }

        // Step 2: principal
        let Some(principal) = principal else {
            debug!(permission = %permission, "no principal");
            return AccessDecision::deny(None, permission.clone(), DecisionReason::MissingPrincipal);
        };

        // Step 3: coarse permission check
        if !principal.has_permission(permission) {
            debug!(principal = %principal.id, permission = %permission, "permission not granted");
            return AccessDecision::deny(
                principal_id,
                permission.clone(),
                DecisionReason::PermissionNotGranted,
            );
        }

        // Step 4: context check, only against a concrete target
        let Some(target) = target else {
            return AccessDecision::allow(principal_id, permission.clone(), DecisionReason::Granted);
        };

        let mut last_failure = None;

        for grant in principal.grants_for(permission) {
            if grant.is_unrestricted() {
                return AccessDecision::allow(principal_id, permission.clone(), DecisionReason::Granted);
            }

            match self.check_grant(principal, grant, target) {
                Ok(()) => {
                    return AccessDecision::allow(
                        principal_id,
                        permission.clone(),
                        DecisionReason::ContextMatched {
                            source: grant.source.clone(),
                        },
                    );
                }
                Err(reason) => {
                    debug!(
                        principal = %principal.id,
                        permission = %permission,
                        source = ?grant.source,
                        reason = %reason,
                        "grant rejected by context"
                    );
                    last_failure = Some(reason);
                }
            }
        }

        match last_failure {
            Some(reason) => AccessDecision::deny(principal_id, permission.clone(), reason),
            // Permission held without grant records: nothing restricts it
            None => AccessDecision::allow(principal_id, permission.clone(), DecisionReason::Granted),
        }
    }

    /// Every context key of the grant must match (AND); within a key any
    /// stored value may match (OR).
    fn check_grant(
        &self,
        principal: &Principal,
        grant: &Grant,
        target: &AccessTarget,
    ) -> std::result::Result<(), DecisionReason> {
        for context in &grant.contexts {
            let key = context.context_key.as_str();

            let Some(strategy) = self.strategies.get_strategy(key) else {
                return Err(DecisionReason::UnknownContextKey {
                    context_key: key.to_string(),
                });
            };

            let Some(claimed) = target.attribute(key).or_else(|| principal.claim(key)) else {
                return Err(DecisionReason::MissingClaim {
                    context_key: key.to_string(),
                });
            };

            if context.values.iter().any(|stored| strategy.matches(stored, claimed)) {
                continue;
            }

            if !context.values.is_empty()
                && !context.values.iter().any(|stored| strategy.is_well_formed(stored))
            {
                return Err(DecisionReason::MalformedContextValue {
                    context_key: key.to_string(),
                });
            }

            return Err(DecisionReason::ContextMismatch {
                context_key: key.to_string(),
                claimed: claimed.to_string(),
            });
        }

        Ok(())
    }
}
