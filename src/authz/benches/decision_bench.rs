//! Decision engine benchmarks
//!
//! Measures a single decision with no target, with one context restriction
//! and with many grants to scan.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ctxauth_authz::{
    model::{Grant, GrantSource, PrivilegeOperationContext},
    AccessTarget, AuthzEngine, ContextMatcher, Operation, Permission, Principal,
    StaticPrincipalProvider,
};
use std::sync::Arc;

fn principal_with_grants(count: usize) -> Principal {
    let permission = Permission::new("invoice", Operation::Read);
    (0..count).fold(Principal::new("bench"), |principal, i| {
        principal.with_grant(
            Grant::new(permission.clone(), GrantSource::Role(format!("role-{}", i)))
                .with_context(PrivilegeOperationContext::new(
                    "DEPARTMENT",
                    [format!("{}", i * 10)],
                )),
        )
    })
}

fn bench_coarse_check(c: &mut Criterion) {
    let engine = AuthzEngine::with_defaults(Arc::new(StaticPrincipalProvider::new(
        principal_with_grants(1),
    )));

    c.bench_function("coarse_check", |b| {
        b.iter(|| engine.can_read(black_box("invoice"), None))
    });
}

fn bench_context_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_check");

    for grant_count in [1, 10, 100].iter() {
        let engine = AuthzEngine::with_defaults(Arc::new(StaticPrincipalProvider::new(
            principal_with_grants(*grant_count),
        )));
        // Last grant matches, so every grant is scanned
        let target = AccessTarget::new()
            .with_attribute("DEPARTMENT", format!("{}", (grant_count - 1) * 10));

        group.bench_with_input(
            BenchmarkId::new("grants", grant_count),
            grant_count,
            |b, _| b.iter(|| engine.can_read(black_box("invoice"), Some(black_box(&target)))),
        );
    }

    group.finish();
}

fn bench_list_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_matching");

    for size in [10, 100, 1000].iter() {
        let ids: Vec<String> = (0..*size).map(|i| i.to_string()).collect();
        let stored = serde_json::to_string(&ids).unwrap_or_default();
        let probe = (size - 1).to_string();

        group.bench_with_input(BenchmarkId::new("ids", size), size, |b, _| {
            b.iter(|| ContextMatcher::SerializedList.matches(black_box(&stored), black_box(&probe)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_coarse_check,
    bench_context_check,
    bench_list_matching
);
criterion_main!(benches);
