//! Waiting-state assertions
//!
//! Covers the is-waiting-at family against declared engine state, including
//! the expected-vs-actual diagnostics on failure.

mod common;

use bpm_assert::assert_that;

/// A declared wait state passes the positive, negative and exact checks.
#[tokio::test]
async fn reports_a_declared_wait_state() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance)
        .is_waiting_at(&["approve_invoice"])
        .await
        .is_not_waiting_at(&["prepare_invoice"])
        .await
        .is_waiting_at_exactly(&["approve_invoice"])
        .await;
}

/// A subset of the active activities satisfies the non-exact check.
#[tokio::test]
async fn accepts_a_subset_of_parallel_wait_states() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .waiting_at("approve_invoice")
            .waiting_at("register_payment"),
    );

    assert_that(&engine, &instance)
        .is_waiting_at(&["approve_invoice"])
        .await
        .is_waiting_at(&["register_payment", "approve_invoice"])
        .await;
}

/// The exact check compares as a set, not in declaration order.
#[tokio::test]
async fn exact_check_ignores_declaration_order() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .waiting_at("register_payment")
            .waiting_at("approve_invoice"),
    );

    assert_that(&engine, &instance)
        .is_waiting_at_exactly(&["approve_invoice", "register_payment"])
        .await;
}

/// A failing positive check names both the expected and actual activities.
#[tokio::test]
#[should_panic(
    expected = "to be waiting at [\"prepare_invoice\"], but it is actually waiting at [\"approve_invoice\"]."
)]
async fn failing_check_reports_expected_and_actual() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance)
        .is_waiting_at(&["prepare_invoice"])
        .await;
}

/// A failing negative check calls out the unwanted activity.
#[tokio::test]
#[should_panic(expected = "NOT to be waiting at [\"approve_invoice\"]")]
async fn failing_negative_check_reports_the_unwanted_activity() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance)
        .is_not_waiting_at(&["approve_invoice"])
        .await;
}

/// The exact check fails when the engine reports additional wait states.
#[tokio::test]
#[should_panic(expected = "to be waiting at exactly [\"approve_invoice\"]")]
async fn exact_check_rejects_additional_wait_states() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .waiting_at("approve_invoice")
            .waiting_at("register_payment"),
    );

    assert_that(&engine, &instance)
        .is_waiting_at_exactly(&["approve_invoice"])
        .await;
}

/// The exact-negative combination is rejected outright.
#[tokio::test]
#[should_panic(expected = "unsupported operation: is_not_waiting_at_exactly")]
async fn exact_negative_check_is_unsupported() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance)
        .is_not_waiting_at_exactly(&["prepare_invoice"])
        .await;
}

/// An empty expectation list is a caller error, not an engine state.
#[tokio::test]
#[should_panic(expected = "Expecting list of activityIds not to be empty")]
async fn empty_expectation_list_is_rejected() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance).is_waiting_at(&[]).await;
}

/// Asserting wait states on an ended instance fails on the missing runtime
/// row, not on the activity comparison.
#[tokio::test]
#[should_panic(expected = "to be still running, but it is not!")]
async fn ended_instances_are_no_longer_waiting() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .passed(["approve_invoice"])
            .ended(),
    );

    assert_that(&engine, &instance)
        .is_waiting_at(&["approve_invoice"])
        .await;
}
