//! bpm-testkit: Test infrastructure for process assertion tests.
//!
//! Provides an in-memory [`TestEngine`] that answers the full engine query
//! surface from declared fixture state, fixture builders for instances,
//! tasks and jobs, and small helpers shared by test suites.
//!
//! ## Usage
//!
//! ```no_run
//! use bpm_testkit::{InstanceFixture, TaskFixture, TestEngine};
//! use serde_json::json;
//!
//! let engine = TestEngine::new();
//! let instance = engine.add_instance(
//!     InstanceFixture::new("invoice:1:deadbeef")
//!         .business_key("INV-42")
//!         .passed(["prepare_invoice"])
//!         .waiting_at("approve_invoice")
//!         .task(TaskFixture::new("approve_invoice").candidate_group("accounting"))
//!         .variable("amount", json!(42)),
//! );
//! ```

use std::sync::Once;
use std::time::Duration;

use anyhow::{anyhow, Result};

pub mod engine;
pub mod fixtures;

pub use engine::TestEngine;
pub use fixtures::{InstanceFixture, JobFixture, TaskFixture};

// Re-export the client crate so test suites only need one dependency.
pub use bpm_client;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,bpm_assert=debug,bpm_client=debug,bpm_testkit=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Wait for a live engine to answer queries.
///
/// Polls the process definition endpoint until it responds with 200 OK.
/// Times out after the specified duration.
pub async fn wait_for_engine(base_url: &str, timeout: Duration) -> Result<()> {
    let url = format!("{}/process-definition", base_url.trim_end_matches('/'));
    let client = reqwest::Client::new();
    let start = std::time::Instant::now();

    tracing::info!(%url, "Waiting for engine to become available...");

    loop {
        let last_failure = match client
            .get(&url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("Engine is available");
                return Ok(());
            }
            Ok(resp) => format!("status: {}", resp.status()),
            Err(e) => format!("error: {}", e),
        };

        if start.elapsed() > timeout {
            return Err(anyhow!(
                "Timeout waiting for engine at {} ({})",
                url,
                last_failure
            ));
        }

        tracing::debug!(%url, %last_failure, "Engine not ready yet");
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
