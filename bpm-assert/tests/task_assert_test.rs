//! Chained task assertions
//!
//! Covers the task entry points on the process instance assert and the
//! TaskAssert checks they lead into.

mod common;

use bpm_assert::assert_that;
use bpm_assert::bpm_client::query::TaskQuery;
use bpm_testkit::TaskFixture;
use chrono::{TimeZone, Utc};
use serde_json::json;

/// The single declared task is found and all its fields check out.
#[tokio::test]
async fn inspects_the_only_task_of_the_instance() {
    let due = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance().task(
            TaskFixture::new("approve_invoice")
                .id("t-1")
                .name("Approve invoice")
                .description("Check the amounts and approve")
                .assignee("fozzie")
                .due_date(due)
                .priority(50),
        ),
    );

    assert_that(&engine, &instance)
        .task()
        .await
        .is_not_null()
        .await
        .has_id("t-1")
        .await
        .has_definition_key("approve_invoice")
        .await
        .has_name("Approve invoice")
        .await
        .has_description("Check the amounts and approve")
        .await
        .is_assigned_to("fozzie")
        .await
        .has_due_date(due)
        .await
        .has_priority(50)
        .await;
}

/// The key entry point narrows between several tasks.
#[tokio::test]
async fn narrows_by_task_definition_key() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .task(TaskFixture::new("approve_invoice").assignee("fozzie"))
            .task(TaskFixture::new("register_payment")),
    );

    assert_that(&engine, &instance)
        .task_by_key("approve_invoice")
        .await
        .is_assigned_to("fozzie")
        .await;
    assert_that(&engine, &instance)
        .task_by_key("register_payment")
        .await
        .is_not_assigned()
        .await;
}

/// A caller-supplied query is narrowed to the instance before running.
#[tokio::test]
async fn narrows_a_caller_supplied_query() {
    let engine = common::engine();
    let noise = engine.add_instance(
        common::invoice_instance().task(TaskFixture::new("approve_invoice").assignee("kermit")),
    );
    let instance = engine.add_instance(
        common::invoice_instance()
            .task(TaskFixture::new("approve_invoice").assignee("fozzie"))
            .task(TaskFixture::new("register_payment")),
    );

    assert_that(&engine, &instance)
        .task_matching(TaskQuery::default().unassigned())
        .await
        .has_definition_key("register_payment")
        .await;
    assert_that(&engine, &noise)
        .task_matching(TaskQuery::default().assignee("kermit"))
        .await
        .is_not_null()
        .await;
}

/// Candidate groups are reachable through the chained assert.
#[tokio::test]
async fn reports_declared_candidate_groups() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .task(TaskFixture::new("approve_invoice").candidate_group("accounting")),
    );

    assert_that(&engine, &instance)
        .task()
        .await
        .has_candidate_group("accounting")
        .await;
}

/// A missing candidate group names the group in the diagnostic.
#[tokio::test]
#[should_panic(
    expected = "to have candidate group 'management', but found it not to have that candidate group!"
)]
async fn failing_candidate_group_check_names_the_group() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .task(TaskFixture::new("approve_invoice").candidate_group("accounting")),
    );

    assert_that(&engine, &instance)
        .task()
        .await
        .has_candidate_group("management")
        .await;
}

/// Without a matching task the subject is null, and says so when asserted on.
#[tokio::test]
async fn a_missing_task_is_null() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .waiting_at("wait_for_payment")
            .variable("amount", json!(30)),
    );

    assert_that(&engine, &instance).task().await.is_null().await;
    assert_that(&engine, &instance)
        .task_by_key("approve_invoice")
        .await
        .is_null()
        .await;
}

/// Stateful checks on a null task fail with the not-null diagnostic.
#[tokio::test]
#[should_panic(expected = "Expecting actual Task not to be null, but it is!")]
async fn asserting_on_a_missing_task_fails() {
    let engine = common::engine();
    let instance = engine.add_instance(common::invoice_instance().waiting_at("wait_for_payment"));

    assert_that(&engine, &instance)
        .task()
        .await
        .has_name("Approve invoice")
        .await;
}

/// More than one match is a caller error, not an assertion failure.
#[tokio::test]
#[should_panic(expected = "Query for one task matched 2 results")]
async fn more_than_one_task_aborts_the_chain() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .task(TaskFixture::new("approve_invoice"))
            .task(TaskFixture::new("register_payment")),
    );

    assert_that(&engine, &instance).task().await;
}

/// A failing field check reports expected and actual values.
#[tokio::test]
#[should_panic(expected = "to have name 'Review invoice', but found it to have 'Approve invoice'!")]
async fn failing_name_check_reports_both_names() {
    let engine = common::engine();
    let instance = engine.add_instance(
        common::invoice_instance()
            .task(TaskFixture::new("approve_invoice").name("Approve invoice")),
    );

    assert_that(&engine, &instance)
        .task()
        .await
        .has_name("Review invoice")
        .await;
}

/// An unassigned task renders its assignee as null in the diagnostic.
#[tokio::test]
#[should_panic(expected = "to be assigned to user 'fozzie', but found it to be assigned to user 'null'!")]
async fn failing_assignment_check_renders_null() {
    let engine = common::engine();
    let instance =
        engine.add_instance(common::invoice_instance().task(TaskFixture::new("approve_invoice")));

    assert_that(&engine, &instance)
        .task()
        .await
        .is_assigned_to("fozzie")
        .await;
}
