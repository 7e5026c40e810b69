//! Cucumber harness for the HTTP steps
//!
//! Each scenario gets its own wiremock server through the background step.
//! When a scenario ends, the session is reset and soft-assertion failures
//! that no step checked fail the scenario.
//!
//! ```bash
//! RUST_LOG=stepweave_http=debug cargo test -p stepweave-http --test bdd
//! ```

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

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

    world::HttpWorld::cucumber()
        // Mock servers bind real ports; one scenario at a time keeps logs readable
        .max_concurrent_scenarios(1)
        .after(|_feature, _rule, _scenario, _finished, world| {
            Box::pin(async move {
                if let Some(world) = world {
                    if let Err(failures) = world.finish_scenario() {
                        panic!("{failures}");
                    }
                }
            })
        })
        .with_default_cli()
        .run_and_exit(features)
        .await;
}
