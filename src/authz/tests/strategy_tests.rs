//! Context Strategy Tests
//!
//! Matching rules, value resolution and registry lookup.

use ctxauth_authz::context::{ContextRecord, InMemoryContextRepository};
use ctxauth_authz::strategy::{
    AttributeContextStrategy, ContextMatcher, ContextStrategy, DepartmentContextStrategy,
    IdContextStrategy, StrategyRegistry,
};
use proptest::prelude::*;
use std::sync::Arc;

async fn departments() -> InMemoryContextRepository {
    let repository = InMemoryContextRepository::new();
    repository
        .insert("DEPARTMENT", ContextRecord::new("10", "Sales"))
        .await;
    repository
        .insert("DEPARTMENT", ContextRecord::new("20", "Finance"))
        .await;
    repository
}

// ============================================================================
// REGISTRY
// ============================================================================

#[test]
fn test_default_registry_keys() {
    let registry = StrategyRegistry::with_defaults();

    assert_eq!(registry.len(), 2);
    assert!(registry.has_strategy("ID"));
    assert!(registry.has_strategy("department"));
    assert!(registry.get_strategy("REGION").is_none());
}

#[test]
fn test_duplicate_key_last_wins() {
    let registry = StrategyRegistry::new(vec![
        Arc::new(DepartmentContextStrategy) as Arc<dyn ContextStrategy>,
        Arc::new(AttributeContextStrategy::new("department", ContextMatcher::Exact)),
    ]);

    assert_eq!(registry.len(), 1);
    let strategy = registry.get_strategy("DEPARTMENT").unwrap();
    assert_eq!(strategy.matcher(), ContextMatcher::Exact);
}

#[test]
fn test_get_all_strategies_is_a_copy() {
    let registry = StrategyRegistry::with_defaults();
    let mut all = registry.get_all_strategies();
    all.clear();

    assert_eq!(registry.len(), 2);
}

// ============================================================================
// MATCHING
// ============================================================================

#[test]
fn test_id_strategy_requires_list() {
    let strategy = IdContextStrategy;

    assert!(strategy.matches(r#"["5"]"#, "5"));
    assert!(!strategy.matches("5", "5"));
    assert!(!strategy.matches(r#"["5""#, "5"));
    assert!(!strategy.is_well_formed("5"));
}

#[test]
fn test_department_strategy_scalar_and_list() {
    let strategy = DepartmentContextStrategy;

    assert!(strategy.matches("10", "10"));
    assert!(strategy.matches(" 10 ", "10"));
    assert!(strategy.matches(r#"["10","20"]"#, "20"));
    assert!(!strategy.matches("", ""));
    assert!(!strategy.matches("[10", "10"));
}

// ============================================================================
// RESOLUTION
// ============================================================================

#[tokio::test]
async fn test_resolve_keeps_unknown_ids() {
    let repository = departments().await;
    let raw = vec![r#"["20","99"]"#.to_string(), "10".to_string(), "20".to_string()];

    let resolved = DepartmentContextStrategy
        .resolve_context_values(&raw, &repository)
        .await
        .unwrap();

    let values: Vec<_> = resolved.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, vec!["20", "99", "10"]);
    assert_eq!(resolved[0].label, "Finance");
    assert!(!resolved[1].found);
    assert_eq!(resolved[1].label, "99");
}

#[tokio::test]
async fn test_resolve_empty_input() {
    let repository = departments().await;

    let resolved = IdContextStrategy
        .resolve_context_values(&[], &repository)
        .await
        .unwrap();
    assert!(resolved.is_empty());
}

// ============================================================================
// PROPERTY-BASED TESTS (PROPTEST)
// ============================================================================

fn matchers() -> impl Strategy<Value = ContextMatcher> {
    prop_oneof![
        Just(ContextMatcher::SerializedList),
        Just(ContextMatcher::Exact),
        Just(ContextMatcher::ListOrScalar),
    ]
}

proptest! {
    #[test]
    fn test_matching_is_total(matcher in matchers(), stored in ".*", claimed in ".*") {
        // Any input must produce an answer without panicking
        let _ = matcher.matches(&stored, &claimed);
        let _ = matcher.is_well_formed(&stored);
    }

    #[test]
    fn test_malformed_never_matches(matcher in matchers(), stored in ".*", claimed in ".*") {
        if !matcher.is_well_formed(&stored) {
            prop_assert!(!matcher.matches(&stored, &claimed));
        }
    }

    #[test]
    fn test_serialized_list_membership(
        values in prop::collection::vec("[a-z0-9]{1,8}", 1..10),
        probe in "[a-z0-9]{1,8}"
    ) {
        let stored = serde_json::to_string(&values).unwrap();

        prop_assert!(ContextMatcher::SerializedList.matches(&stored, &values[0]));
        prop_assert_eq!(
            ContextMatcher::SerializedList.matches(&stored, &probe),
            values.contains(&probe)
        );
    }

    #[test]
    fn test_unregistered_key_has_no_strategy(key in "[A-Z]{3,12}") {
        let registry = StrategyRegistry::with_defaults();
        prop_assume!(key != "ID" && key != "DEPARTMENT");

        prop_assert!(!registry.has_strategy(&key));
    }
}
