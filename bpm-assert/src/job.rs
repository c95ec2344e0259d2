//! Assertions on a job.

use bpm_client::query::JobQuery;
use bpm_client::{single_result, Job, ProcessEngine};
use chrono::{DateTime, Utc};

use crate::support::{display_date, display_or_null, query_failed};

/// Fluent assertions on the one job selected by a chained
/// [`ProcessInstanceAssert`](crate::ProcessInstanceAssert) entry point.
///
/// The subject may be absent when no job matched. Stateful assertions
/// refresh the job through the engine before comparing, so a timer that
/// fired in the meantime fails the assertion rather than passing on a
/// stale snapshot.
pub struct JobAssert<'a> {
    engine: &'a dyn ProcessEngine,
    actual: Option<Job>,
}

fn subject(job: &Job) -> String {
    format!(
        "actual Job {{id='{}', processInstanceId='{}'}}",
        job.id, job.process_instance_id
    )
}

impl<'a> JobAssert<'a> {
    /// Start asserting on the given job, or on its absence.
    pub fn assert_that(engine: &'a dyn ProcessEngine, actual: Option<Job>) -> Self {
        Self { engine, actual }
    }

    fn existing(&self) -> &Job {
        match &self.actual {
            Some(job) => job,
            None => panic!("Expecting actual Job not to be null, but it is!"),
        }
    }

    async fn refreshed(&self) -> Job {
        let job = self.existing();
        let query = JobQuery::default()
            .process_instance_id(&job.process_instance_id)
            .job_id(&job.id);
        let rows = self
            .engine
            .find_jobs(&query)
            .await
            .unwrap_or_else(|e| query_failed("job", e));
        match single_result("job", rows).unwrap_or_else(|e| query_failed("job", e)) {
            Some(current) => current,
            None => panic!(
                "Expecting {} to be still available, but it is not!",
                subject(job)
            ),
        }
    }

    /// Verifies that a job was actually selected.
    pub async fn is_not_null(&self) -> &Self {
        self.existing();
        self
    }

    /// Verifies that no job was selected.
    pub async fn is_null(&self) -> &Self {
        if let Some(job) = &self.actual {
            panic!("Expecting {} to be null, but it is not!", subject(job));
        }
        self
    }

    /// Verifies that the job has the given id.
    pub async fn has_id(&self, id: &str) -> &Self {
        let current = self.refreshed().await;
        if current.id != id {
            panic!(
                "Expecting {} to have id '{}', but found it to have '{}'!",
                subject(&current),
                id,
                current.id
            );
        }
        self
    }

    /// Verifies that the job is due at the given date.
    pub async fn has_due_date(&self, due_date: DateTime<Utc>) -> &Self {
        let current = self.refreshed().await;
        if current.due_date != Some(due_date) {
            panic!(
                "Expecting {} to have due date '{}', but found it to have '{}'!",
                subject(&current),
                due_date.to_rfc3339(),
                display_date(current.due_date.as_ref())
            );
        }
        self
    }

    /// Verifies that the job has the given number of retries left.
    pub async fn has_retries(&self, retries: i32) -> &Self {
        let current = self.refreshed().await;
        if current.retries != retries {
            panic!(
                "Expecting {} to have {} retries, but found it to have {}!",
                subject(&current),
                retries,
                current.retries
            );
        }
        self
    }

    /// Verifies that the job failed with an exception message.
    pub async fn has_exception_message(&self) -> &Self {
        let current = self.refreshed().await;
        if current.exception_message.is_none() {
            panic!(
                "Expecting {} to have an exception message, but found it to have none!",
                subject(&current)
            );
        }
        self
    }

    /// Verifies that the job belongs to the given deployment.
    pub async fn has_deployment_id(&self, deployment_id: &str) -> &Self {
        let current = self.refreshed().await;
        if current.deployment_id.as_deref() != Some(deployment_id) {
            panic!(
                "Expecting {} to have deployment id '{}', but found it to have '{}'!",
                subject(&current),
                deployment_id,
                display_or_null(current.deployment_id.as_deref())
            );
        }
        self
    }
}
