//! Shared failure plumbing for the assertion types.

use bpm_client::EngineError;
use chrono::{DateTime, Utc};

/// Abort the test when the engine itself failed to answer a query.
///
/// Engine trouble is not an assertion outcome, so the panic names the query
/// instead of pretending expected state was missing.
pub(crate) fn query_failed(kind: &str, err: EngineError) -> ! {
    panic!("Process engine query '{kind}' failed: {err}")
}

/// Guard for the activity id lists taken by the waiting-at and has-passed
/// families.
pub(crate) fn expect_activity_ids(activity_ids: &[&str]) {
    if activity_ids.is_empty() || activity_ids.iter().any(|id| id.is_empty()) {
        panic!(
            "Expecting list of activityIds not to be empty and not to contain empty values: {:?}.",
            activity_ids
        );
    }
}

/// Render an optional field the way it appears inside failure messages.
pub(crate) fn display_or_null(value: Option<&str>) -> String {
    value.unwrap_or("null").to_string()
}

/// Renders an optional timestamp the way the engine prints it, with `null`
/// standing in for an absent value.
pub(crate) fn display_date(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(date) => date.to_rfc3339(),
        None => "null".to_string(),
    }
}
