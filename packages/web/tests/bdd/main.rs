//! Cucumber harness for the web steps
//!
//! Scenarios drive the in-memory browser from `tests/common`. The after hook
//! returns the search context to the page and fails the scenario on any
//! soft-assertion failure left unchecked.
//!
//! ```bash
//! RUST_LOG=stepweave_web=debug cargo test -p stepweave-web --test bdd
//! ```

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

#[path = "../common/mod.rs"]
mod common;
mod steps;
mod world;

use std::path::Path;

use cucumber::World;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .init();

    let features = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/features");
    assert!(features.is_dir(), "no feature files at {}", features.display());

    world::WebWorld::cucumber()
        .after(|_feature, _rule, _scenario, _finished, world| {
            Box::pin(async move {
                if let Some(world) = world {
                    if let Err(failures) = world.finish_scenario().await {
                        panic!("{failures}");
                    }
                }
            })
        })
        .with_default_cli()
        .run_and_exit(features)
        .await;
}
