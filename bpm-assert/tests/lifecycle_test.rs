//! Lifecycle assertions
//!
//! Covers is-started, is-ended, is-not-ended, is-suspended and is-active,
//! which combine runtime presence with the historic record.

mod common;

use bpm_assert::{assert_that, ProcessInstance};

/// A live instance is started, active and not ended.
#[tokio::test]
async fn a_live_instance_is_started_and_active() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance)
        .is_started()
        .await
        .is_not_ended()
        .await
        .is_active()
        .await;
}

/// Started keeps holding once the instance ended; ended starts holding.
#[tokio::test]
async fn an_ended_instance_is_still_started() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .passed(["prepare_invoice", "archive_invoice"])
            .ended(),
    );

    assert_that(&engine, &instance)
        .is_started()
        .await
        .is_ended()
        .await;
}

/// A suspended instance is suspended but not ended.
#[tokio::test]
async fn a_suspended_instance_is_reported_suspended() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .waiting_at("approve_invoice")
            .suspended(),
    );

    assert_that(&engine, &instance)
        .is_started()
        .await
        .is_not_ended()
        .await
        .is_suspended()
        .await;
}

/// An instance the engine has never seen is not started.
#[tokio::test]
#[should_panic(expected = "to be started, but it is not!")]
async fn an_unknown_instance_is_not_started() {
    let engine = common::engine();
    let ghost = ProcessInstance {
        id: "never-started".to_string(),
        process_definition_id: "invoice:1:first-deployment".to_string(),
        business_key: None,
        suspended: false,
        ended: false,
    };

    assert_that(&engine, &ghost).is_started().await;
}

/// The ended diagnostic points at the engine's history level.
#[tokio::test]
#[should_panic(
    expected = "to be ended, but it is not! (Please make sure you have set the history service"
)]
async fn a_live_instance_is_not_ended_yet() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance).is_ended().await;
}

/// The not-ended expectation fails once the runtime row is gone.
#[tokio::test]
#[should_panic(expected = "not to be ended, but it is!")]
async fn an_ended_instance_fails_the_not_ended_check() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().ended());

    assert_that(&engine, &instance).is_not_ended().await;
}

/// A running instance is not suspended by default.
#[tokio::test]
#[should_panic(expected = "to be suspended, but it is not!")]
async fn a_running_instance_is_not_suspended() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("approve_invoice"));

    assert_that(&engine, &instance).is_suspended().await;
}

/// A suspended instance is no longer active.
#[tokio::test]
#[should_panic(expected = "not to be suspended, but it is!")]
async fn a_suspended_instance_is_not_active() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .waiting_at("approve_invoice")
            .suspended(),
    );

    assert_that(&engine, &instance).is_active().await;
}

/// Activity checks on an ended instance fail on the missing runtime row.
#[tokio::test]
#[should_panic(expected = "to be still running, but it is not!")]
async fn an_ended_instance_is_not_active() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().ended());

    assert_that(&engine, &instance).is_active().await;
}
