//! Passed-activity assertions
//!
//! Covers the has-passed family, which reads finished historic activity
//! instances rather than runtime state.

mod common;

use bpm_assert::assert_that;

/// Declared passed activities are found, declared wait states are not.
#[tokio::test]
async fn reports_declared_passed_activities() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .passed(["prepare_invoice", "check_invoice"])
            .waiting_at("approve_invoice"),
    );

    assert_that(&engine, &instance)
        .has_passed(&["prepare_invoice"])
        .await
        .has_passed(&["prepare_invoice", "check_invoice"])
        .await
        .has_not_passed(&["approve_invoice"])
        .await;
}

/// An activity the instance is still waiting at has not been passed yet.
#[tokio::test]
async fn a_current_wait_state_does_not_count_as_passed() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance)
        .has_not_passed(&["approve_invoice"])
        .await;
}

/// History outlives the runtime state of an ended instance.
#[tokio::test]
async fn passed_activities_survive_the_end_of_the_instance() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .passed(["prepare_invoice", "approve_invoice", "archive_invoice"])
            .ended(),
    );

    assert_that(&engine, &instance)
        .has_passed(&["prepare_invoice", "archive_invoice"])
        .await;
}

/// The failure diagnostic lists what actually ran, in end-time order, and
/// points at the engine's history level.
#[tokio::test]
#[should_panic(
    expected = "to have passed activities [\"approve_invoice\"] at least once, but actually we found that it passed [\"prepare_invoice\", \"check_invoice\"]. (Please make sure you have set the history service of the engine to at least 'activity'"
)]
async fn failing_check_reports_the_passed_activities_in_order() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance().passed(["prepare_invoice", "check_invoice"]),
    );

    assert_that(&engine, &instance)
        .has_passed(&["approve_invoice"])
        .await;
}

/// The negative form fails once the activity shows up in history.
#[tokio::test]
#[should_panic(expected = "NOT to have passed activities [\"check_invoice\"]")]
async fn failing_negative_check_names_the_passed_activity() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance().passed(["prepare_invoice", "check_invoice"]),
    );

    assert_that(&engine, &instance)
        .has_not_passed(&["check_invoice"])
        .await;
}
