//! Assertions on a task.

use bpm_client::query::TaskQuery;
use bpm_client::{single_result, ProcessEngine, Task};
use chrono::{DateTime, Utc};

use crate::support::{display_date, display_or_null, query_failed};

/// Fluent assertions on the one task selected by a chained
/// [`ProcessInstanceAssert`](crate::ProcessInstanceAssert) entry point.
///
/// The subject may be absent when no task matched; asserting live state on
/// an absent task fails with a not-null diagnostic. Stateful assertions
/// refresh the task through the engine before comparing.
pub struct TaskAssert<'a> {
    engine: &'a dyn ProcessEngine,
    actual: Option<Task>,
}

fn subject(task: &Task) -> String {
    format!(
        "actual Task {{id='{}', taskDefinitionKey='{}', name='{}'}}",
        task.id,
        task.task_definition_key,
        display_or_null(task.name.as_deref())
    )
}

impl<'a> TaskAssert<'a> {
    /// Start asserting on the given task, or on its absence.
    pub fn assert_that(engine: &'a dyn ProcessEngine, actual: Option<Task>) -> Self {
        Self { engine, actual }
    }

    fn existing(&self) -> &Task {
        match &self.actual {
            Some(task) => task,
            None => panic!("Expecting actual Task not to be null, but it is!"),
        }
    }

    /// The task as the engine sees it right now.
    async fn refreshed(&self) -> Task {
        let task = self.existing();
        let query = TaskQuery::default()
            .process_instance_id(&task.process_instance_id)
            .task_id(&task.id);
        let rows = self
            .engine
            .find_tasks(&query)
            .await
            .unwrap_or_else(|e| query_failed("task", e));
        match single_result("task", rows).unwrap_or_else(|e| query_failed("task", e)) {
            Some(current) => current,
            None => panic!(
                "Expecting {} to be still available, but it is not!",
                subject(task)
            ),
        }
    }

    /// Verifies that a task was actually selected.
    pub async fn is_not_null(&self) -> &Self {
        self.existing();
        self
    }

    /// Verifies that no task was selected.
    pub async fn is_null(&self) -> &Self {
        if let Some(task) = &self.actual {
            panic!("Expecting {} to be null, but it is not!", subject(task));
        }
        self
    }

    /// Verifies that the task has the given id.
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

    /// Verifies that the task has the given task definition key.
    pub async fn has_definition_key(&self, task_definition_key: &str) -> &Self {
        let current = self.refreshed().await;
        if current.task_definition_key != task_definition_key {
            panic!(
                "Expecting {} to have definition key '{}', but found it to have '{}'!",
                subject(&current),
                task_definition_key,
                current.task_definition_key
            );
        }
        self
    }

    /// Verifies that the task has the given name.
    pub async fn has_name(&self, name: &str) -> &Self {
        let current = self.refreshed().await;
        if current.name.as_deref() != Some(name) {
            panic!(
                "Expecting {} to have name '{}', but found it to have '{}'!",
                subject(&current),
                name,
                display_or_null(current.name.as_deref())
            );
        }
        self
    }

    /// Verifies that the task has the given description.
    pub async fn has_description(&self, description: &str) -> &Self {
        let current = self.refreshed().await;
        if current.description.as_deref() != Some(description) {
            panic!(
                "Expecting {} to have description '{}', but found it to have '{}'!",
                subject(&current),
                description,
                display_or_null(current.description.as_deref())
            );
        }
        self
    }

    /// Verifies that the task is currently assigned to the given user.
    pub async fn is_assigned_to(&self, user_id: &str) -> &Self {
        let current = self.refreshed().await;
        if current.assignee.as_deref() != Some(user_id) {
            panic!(
                "Expecting {} to be assigned to user '{}', but found it to be assigned to user '{}'!",
                subject(&current),
                user_id,
                display_or_null(current.assignee.as_deref())
            );
        }
        self
    }

    /// Verifies that the task is currently not assigned to any user.
    pub async fn is_not_assigned(&self) -> &Self {
        let current = self.refreshed().await;
        if let Some(assignee) = &current.assignee {
            panic!(
                "Expecting {} not to be assigned, but found it to be assigned to user '{}'!",
                subject(&current),
                assignee
            );
        }
        self
    }

    /// Verifies that the task is currently waiting to be assigned to a user
    /// of the given candidate group.
    pub async fn has_candidate_group(&self, candidate_group_id: &str) -> &Self {
        let current = self.refreshed().await;
        let query = TaskQuery::default()
            .process_instance_id(&current.process_instance_id)
            .task_id(&current.id)
            .candidate_group(candidate_group_id);
        let rows = self
            .engine
            .find_tasks(&query)
            .await
            .unwrap_or_else(|e| query_failed("task", e));
        if rows.is_empty() {
            panic!(
                "Expecting {} to have candidate group '{}', but found it not to have that candidate group!",
                subject(&current),
                candidate_group_id
            );
        }
        self
    }

    /// Verifies that the task is due at the given date.
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

    /// Verifies that the task has the given priority.
    pub async fn has_priority(&self, priority: i32) -> &Self {
        let current = self.refreshed().await;
        if current.priority != priority {
            panic!(
                "Expecting {} to have priority {}, but found it to have {}!",
                subject(&current),
                priority,
                current.priority
            );
        }
        self
    }
}
