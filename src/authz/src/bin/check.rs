//! # ctxauth-check
//!
//! Evaluates one access decision against a JSON catalog snapshot.
//!
//! ## Fixture format
//!
//! ```json
//! {
//!   "config": { "overrides": { "allow_all": false } },
//!   "privileges": [{ "name": "invoice", "type": "SYSTEM" }],
//!   "roles": [{ "name": "clerk", "privileges": [...] }],
//!   "users": [{ "code": "alice", "name": "Alice", "roles": [{ "name": "clerk" }] }]
//! }
//! ```
//!
//! Roles listed on a user by name are expanded from the top-level `roles`.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG` - Log level (default: info)
//! - `CTXAUTH_ALLOW_ALL`, `CTXAUTH_ALLOW_<OPERATION>` - Overrides, merged
//!   with the fixture's `config`
//!
//! Exit code 0 on allow, 1 on deny.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use ctxauth_authz::{
    catalog::CatalogSnapshot, AccessTarget, AuthzEngine, EngineConfig, InMemoryCatalog,
    Operation, OverrideFlags, Permission, PermissionCatalog, Principal, StaticPrincipalProvider,
    StrategyRegistry,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ctxauth-check", version, about = "Evaluate an access decision against a catalog snapshot")]
struct Args {
    /// Catalog fixture (JSON)
    #[arg(short, long)]
    fixture: PathBuf,

    /// User code of the principal
    #[arg(short, long)]
    user: String,

    /// Functionality name
    #[arg(long)]
    functionality: String,

    /// Operation (create, read, update, delete)
    #[arg(long)]
    operation: String,

    /// Target record id
    #[arg(long)]
    target_id: Option<String>,

    /// Target attribute, `KEY=VALUE` (repeatable)
    #[arg(long = "attr", value_parser = parse_pair)]
    attributes: Vec<(String, String)>,

    /// Principal claim, `KEY=VALUE` (repeatable)
    #[arg(long = "claim", value_parser = parse_pair)]
    claims: Vec<(String, String)>,
}

/// `config` section of the fixture; the rest is the catalog snapshot
#[derive(Debug, Deserialize)]
struct FixtureConfig {
    #[serde(default)]
    config: EngineConfig,
}

fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn merge(a: OverrideFlags, b: OverrideFlags) -> OverrideFlags {
    OverrideFlags {
        allow_all: a.allow_all || b.allow_all,
        allow_create: a.allow_create || b.allow_create,
        allow_read: a.allow_read || b.allow_read,
        allow_update: a.allow_update || b.allow_update,
        allow_delete: a.allow_delete || b.allow_delete,
    }
}

async fn load_principal(catalog: &InMemoryCatalog, code: &str) -> Result<Option<Principal>> {
    let mut user = catalog
        .find_user(code)
        .await?
        .ok_or_else(|| anyhow!("unknown user '{}'", code))?;

    let mut roles = Vec::new();
    for role in user.roles.drain() {
        match catalog.find_role(&role.name).await? {
            Some(full) => roles.push(full),
            None => roles.push(role),
        }
    }
    user.roles.extend(roles);

    Ok(Principal::from_user(&user))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    info!("ctxauth-check v{}", ctxauth_authz::VERSION);

    let raw = std::fs::read_to_string(&args.fixture)
        .with_context(|| format!("reading {}", args.fixture.display()))?;
    let fixture: FixtureConfig = serde_json::from_str(&raw).context("parsing fixture config")?;
    let snapshot = CatalogSnapshot::from_json(&raw).context("parsing fixture catalog")?;

    let operation: Operation = args.operation.parse()?;
    if args.functionality.trim().is_empty() {
        bail!("functionality cannot be empty");
    }

    let catalog = InMemoryCatalog::from_snapshot(snapshot)?;
    let principal = load_principal(&catalog, &args.user).await?.map(|mut p| {
        for (key, value) in &args.claims {
            p = p.with_claim(key.clone(), value.clone());
        }
        p
    });

    let env_config = EngineConfig::from_env();
    let config = EngineConfig {
        overrides: merge(fixture.config.overrides, env_config.overrides),
    };

    let provider = match principal {
        Some(principal) => StaticPrincipalProvider::new(principal),
        None => StaticPrincipalProvider::anonymous(),
    };
    let engine = AuthzEngine::new(
        config,
        Arc::new(StrategyRegistry::with_defaults()),
        Arc::new(provider),
    );

    let target = if args.target_id.is_some() || !args.attributes.is_empty() {
        let mut target = AccessTarget::new();
        target.id = args.target_id.clone();
        for (key, value) in &args.attributes {
            target = target.with_attribute(key.clone(), value.clone());
        }
        Some(target)
    } else {
        None
    };

    let permission = Permission::new(args.functionality.trim(), operation);
    let decision = engine.decide(&permission, target.as_ref());

    println!("{}", serde_json::to_string_pretty(&decision)?);

    if !decision.allowed {
        std::process::exit(1);
    }
    Ok(())
}
