//! Common test utilities for the assertion suite.

use bpm_testkit::{init_tracing, InstanceFixture, TestEngine};

const DEFINITION_ID: &str = "invoice:1:first-deployment";

/// Create a fresh engine with tracing initialized.
pub fn engine() -> TestEngine {
    init_tracing();
    TestEngine::new()
}

/// A started instance of the stock invoice process, ready for further
/// declarations.
pub fn invoice_instance() -> InstanceFixture {
    InstanceFixture::new(DEFINITION_ID)
}
