//! Fluent assertions for process instances running in an external workflow
//! engine.
//!
//! - [`assert_that`] opens a [`ProcessInstanceAssert`] over an engine handle
//!   and a process instance snapshot
//! - every assertion re-queries the engine, narrowed to the instance under
//!   test, and panics with a readable diagnostic on failure
//! - [`TaskAssert`], [`JobAssert`] and [`VariablesAssert`] continue the chain
//!   into the instance's tasks, jobs and variables
//!
//! ```no_run
//! use bpm_assert::assert_that;
//! use bpm_testkit::{InstanceFixture, TestEngine};
//! use serde_json::json;
//!
//! # async fn demo() {
//! let engine = TestEngine::new();
//! let instance = engine.add_instance(
//!     InstanceFixture::new("invoice:1:d34d")
//!         .waiting_at("approve_invoice")
//!         .variable("amount", json!(30)),
//! );
//!
//! assert_that(&engine, &instance)
//!     .is_active()
//!     .await
//!     .is_waiting_at(&["approve_invoice"])
//!     .await
//!     .has_variables(&["amount"])
//!     .await;
//! # }
//! ```

pub mod job;
pub mod process_instance;
mod support;
pub mod task;
pub mod variables;

pub use bpm_client;
pub use bpm_client::{ProcessEngine, ProcessInstance};
pub use job::JobAssert;
pub use process_instance::ProcessInstanceAssert;
pub use task::TaskAssert;
pub use variables::VariablesAssert;

/// Start asserting on the given process instance.
pub fn assert_that<'a>(
    engine: &'a dyn ProcessEngine,
    process_instance: &ProcessInstance,
) -> ProcessInstanceAssert<'a> {
    ProcessInstanceAssert::assert_that(engine, process_instance)
}
