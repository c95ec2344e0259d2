//! Fixture builders for declaring engine state.
//!
//! A fixture declares the state a test expects the engine to be in: which
//! activities an instance is waiting at, what it has passed, which variables
//! it holds, which tasks and jobs exist. The builders only collect that
//! declaration; [`TestEngine`](crate::TestEngine) materializes it into
//! runtime and historic rows when the fixture is added.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Declared state of one process instance.
#[derive(Debug, Clone)]
pub struct InstanceFixture {
    pub(crate) id: String,
    pub(crate) process_definition_id: String,
    pub(crate) business_key: Option<String>,
    pub(crate) waiting_at: Vec<String>,
    pub(crate) passed: Vec<String>,
    pub(crate) variables: BTreeMap<String, Value>,
    pub(crate) tasks: Vec<TaskFixture>,
    pub(crate) jobs: Vec<JobFixture>,
    pub(crate) suspended: bool,
    pub(crate) ended: bool,
}

impl InstanceFixture {
    /// Declare a started instance of the given process definition.
    pub fn new(process_definition_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            process_definition_id: process_definition_id.into(),
            business_key: None,
            waiting_at: Vec::new(),
            passed: Vec::new(),
            variables: BTreeMap::new(),
            tasks: Vec::new(),
            jobs: Vec::new(),
            suspended: false,
            ended: false,
        }
    }

    /// Use a fixed instance id instead of a generated one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn business_key(mut self, key: impl Into<String>) -> Self {
        self.business_key = Some(key.into());
        self
    }

    /// Declare the instance to be waiting at the given activity.
    pub fn waiting_at(mut self, activity_id: impl Into<String>) -> Self {
        self.waiting_at.push(activity_id.into());
        self
    }

    /// Declare activities the instance has already passed, in order.
    pub fn passed<I, S>(mut self, activity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passed.extend(activity_ids.into_iter().map(Into::into));
        self
    }

    /// Declare a process variable.
    pub fn variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Declare a user task. The instance is also waiting at the task's
    /// definition key.
    pub fn task(mut self, task: TaskFixture) -> Self {
        self.tasks.push(task);
        self
    }

    /// Declare a job.
    pub fn job(mut self, job: JobFixture) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn suspended(mut self) -> Self {
        self.suspended = true;
        self
    }

    /// Declare the instance as already ended: no runtime state remains, only
    /// history.
    pub fn ended(mut self) -> Self {
        self.ended = true;
        self
    }
}

/// Declared state of one user task.
#[derive(Debug, Clone)]
pub struct TaskFixture {
    pub(crate) id: String,
    pub(crate) task_definition_key: String,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) assignee: Option<String>,
    pub(crate) candidate_groups: Vec<String>,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) priority: i32,
}

impl TaskFixture {
    pub fn new(task_definition_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_definition_key: task_definition_key.into(),
            name: None,
            description: None,
            assignee: None,
            candidate_groups: Vec::new(),
            due_date: None,
            priority: 0,
        }
    }

    /// Use a fixed task id instead of a generated one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn assignee(mut self, user: impl Into<String>) -> Self {
        self.assignee = Some(user.into());
        self
    }

    pub fn candidate_group(mut self, group: impl Into<String>) -> Self {
        self.candidate_groups.push(group.into());
        self
    }

    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Declared state of one job.
#[derive(Debug, Clone)]
pub struct JobFixture {
    pub(crate) id: String,
    pub(crate) activity_id: Option<String>,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) retries: i32,
    pub(crate) exception_message: Option<String>,
    pub(crate) deployment_id: Option<String>,
}

impl JobFixture {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity_id: None,
            due_date: None,
            retries: 3,
            exception_message: None,
            deployment_id: None,
        }
    }

    /// Use a fixed job id instead of a generated one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Bind the job to an execution waiting at the given activity.
    pub fn at_activity(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = Some(activity_id.into());
        self
    }

    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn retries(mut self, retries: i32) -> Self {
        self.retries = retries;
        self
    }

    pub fn exception_message(mut self, message: impl Into<String>) -> Self {
        self.exception_message = Some(message.into());
        self
    }

    pub fn deployment_id(mut self, id: impl Into<String>) -> Self {
        self.deployment_id = Some(id.into());
        self
    }
}

impl Default for JobFixture {
    fn default() -> Self {
        Self::new()
    }
}
