//! In-memory engine double.
//!
//! `TestEngine` answers the full [`ProcessEngine`] query surface from state
//! declared via fixtures. It does not execute processes; adding a fixture
//! materializes both the runtime rows and the historic rows a real engine
//! would have produced on the way to that state, so runtime and history
//! queries stay consistent with each other.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use bpm_client::query::{
    ExecutionQuery, HistoricActivityInstanceQuery, HistoricDetailQuery,
    HistoricProcessInstanceQuery, HistoricTaskInstanceQuery, HistoricVariableInstanceQuery,
    JobQuery, ProcessDefinitionQuery, ProcessInstanceQuery, TaskQuery, VariableInstanceQuery,
};
use bpm_client::types::{
    Execution, HistoricActivityInstance, HistoricDetail, HistoricProcessInstance,
    HistoricTaskInstance, HistoricVariableInstance, Job, ProcessDefinition, ProcessInstance, Task,
    VariableInstance,
};
use bpm_client::{EngineError, ProcessEngine};

use crate::fixtures::InstanceFixture;

#[derive(Debug, Default)]
struct EngineState {
    instances: Vec<ProcessInstance>,
    executions: Vec<Execution>,
    tasks: Vec<Task>,
    jobs: Vec<Job>,
    definitions: Vec<ProcessDefinition>,
    variable_instances: Vec<VariableInstance>,
    historic_instances: Vec<HistoricProcessInstance>,
    historic_activities: Vec<HistoricActivityInstance>,
    historic_tasks: Vec<HistoricTaskInstance>,
    historic_variables: Vec<HistoricVariableInstance>,
    historic_details: Vec<HistoricDetail>,
    /// process instance id -> ids of activities it currently waits at
    active_activities: HashMap<String, Vec<String>>,
    /// process instance id -> runtime variables
    variables: HashMap<String, BTreeMap<String, Value>>,
    /// task id -> candidate groups
    candidate_groups: HashMap<String, Vec<String>>,
}

/// In-memory [`ProcessEngine`] built from declared fixtures.
#[derive(Debug, Default)]
pub struct TestEngine {
    state: Mutex<EngineState>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine pre-populated with the given fixtures.
    pub fn with_instances(fixtures: impl IntoIterator<Item = InstanceFixture>) -> Self {
        let engine = Self::new();
        for fixture in fixtures {
            engine.add_instance(fixture);
        }
        engine
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Materialize a fixture into engine state.
    ///
    /// Returns the process instance view a test hands to `assert_that`. For
    /// an ended fixture the view is the stale snapshot a caller would have
    /// kept from before the instance finished.
    pub fn add_instance(&self, fixture: InstanceFixture) -> ProcessInstance {
        let mut state = self.state();
        let started = Utc::now() - Duration::seconds(60);

        tracing::debug!(
            process_instance_id = %fixture.id,
            process_definition_id = %fixture.process_definition_id,
            ended = fixture.ended,
            "declaring process instance state"
        );

        if !state
            .definitions
            .iter()
            .any(|d| d.id == fixture.process_definition_id)
        {
            let definition = definition_from_id(&fixture.process_definition_id);
            state.definitions.push(definition);
        }

        let instance_state = if fixture.ended {
            "COMPLETED"
        } else if fixture.suspended {
            "SUSPENDED"
        } else {
            "ACTIVE"
        };
        state.historic_instances.push(HistoricProcessInstance {
            id: fixture.id.clone(),
            process_definition_id: fixture.process_definition_id.clone(),
            business_key: fixture.business_key.clone(),
            start_time: started,
            end_time: fixture.ended.then(|| started + Duration::seconds(30)),
            state: Some(instance_state.to_string()),
        });

        // Passed activities become finished historic rows whose end times
        // ascend in declaration order.
        for (i, activity_id) in fixture.passed.iter().enumerate() {
            let begin = started + Duration::seconds(i as i64);
            state.historic_activities.push(HistoricActivityInstance {
                id: Uuid::new_v4().to_string(),
                activity_id: activity_id.clone(),
                activity_name: None,
                activity_type: None,
                process_instance_id: fixture.id.clone(),
                start_time: begin,
                end_time: Some(begin + Duration::seconds(1)),
            });
        }

        for (name, value) in &fixture.variables {
            state.historic_variables.push(HistoricVariableInstance {
                id: Uuid::new_v4().to_string(),
                name: name.clone(),
                process_instance_id: fixture.id.clone(),
                value: value.clone(),
                state: Some("CREATED".to_string()),
            });
            state.historic_details.push(HistoricDetail {
                id: Uuid::new_v4().to_string(),
                process_instance_id: fixture.id.clone(),
                variable_name: Some(name.clone()),
                value: Some(value.clone()),
                time: started,
            });
        }

        if fixture.ended {
            // Only history survives. Declared tasks are recorded as
            // completed ones.
            for task in &fixture.tasks {
                state.historic_tasks.push(HistoricTaskInstance {
                    id: task.id.clone(),
                    process_instance_id: fixture.id.clone(),
                    task_definition_key: task.task_definition_key.clone(),
                    name: task.name.clone(),
                    assignee: task.assignee.clone(),
                    start_time: started,
                    end_time: Some(started + Duration::seconds(30)),
                    delete_reason: Some("completed".to_string()),
                });
            }
            return ProcessInstance {
                id: fixture.id,
                process_definition_id: fixture.process_definition_id,
                business_key: fixture.business_key,
                suspended: false,
                ended: true,
            };
        }

        let instance = ProcessInstance {
            id: fixture.id.clone(),
            process_definition_id: fixture.process_definition_id.clone(),
            business_key: fixture.business_key.clone(),
            suspended: fixture.suspended,
            ended: false,
        };
        state.instances.push(instance.clone());
        state.executions.push(Execution {
            id: fixture.id.clone(),
            process_instance_id: fixture.id.clone(),
            activity_id: None,
            suspended: fixture.suspended,
        });

        // The instance waits at every declared activity, every declared
        // task's definition key, and every activity a job was bound to.
        let mut active = fixture.waiting_at.clone();
        for task in &fixture.tasks {
            if !active.contains(&task.task_definition_key) {
                active.push(task.task_definition_key.clone());
            }
        }
        for job in &fixture.jobs {
            if let Some(activity_id) = &job.activity_id {
                if !active.contains(activity_id) {
                    active.push(activity_id.clone());
                }
            }
        }

        let mut activity_execution: HashMap<String, String> = HashMap::new();
        for activity_id in &active {
            let execution_id = Uuid::new_v4().to_string();
            state.executions.push(Execution {
                id: execution_id.clone(),
                process_instance_id: fixture.id.clone(),
                activity_id: Some(activity_id.clone()),
                suspended: fixture.suspended,
            });
            state.historic_activities.push(HistoricActivityInstance {
                id: Uuid::new_v4().to_string(),
                activity_id: activity_id.clone(),
                activity_name: None,
                activity_type: None,
                process_instance_id: fixture.id.clone(),
                start_time: started + Duration::seconds(fixture.passed.len() as i64),
                end_time: None,
            });
            activity_execution.insert(activity_id.clone(), execution_id);
        }
        state
            .active_activities
            .insert(fixture.id.clone(), active);

        state
            .variables
            .insert(fixture.id.clone(), fixture.variables.clone());
        for (name, value) in &fixture.variables {
            state.variable_instances.push(VariableInstance {
                id: Uuid::new_v4().to_string(),
                name: name.clone(),
                process_instance_id: fixture.id.clone(),
                execution_id: fixture.id.clone(),
                value: value.clone(),
            });
        }

        for task in &fixture.tasks {
            let execution_id = activity_execution
                .get(&task.task_definition_key)
                .cloned()
                .unwrap_or_else(|| fixture.id.clone());
            state.tasks.push(Task {
                id: task.id.clone(),
                process_instance_id: fixture.id.clone(),
                execution_id,
                task_definition_key: task.task_definition_key.clone(),
                name: task.name.clone(),
                description: task.description.clone(),
                assignee: task.assignee.clone(),
                due_date: task.due_date,
                priority: task.priority,
            });
            state
                .candidate_groups
                .insert(task.id.clone(), task.candidate_groups.clone());
            state.historic_tasks.push(HistoricTaskInstance {
                id: task.id.clone(),
                process_instance_id: fixture.id.clone(),
                task_definition_key: task.task_definition_key.clone(),
                name: task.name.clone(),
                assignee: task.assignee.clone(),
                start_time: started,
                end_time: None,
                delete_reason: None,
            });
        }

        for job in &fixture.jobs {
            let execution_id = job
                .activity_id
                .as_ref()
                .and_then(|activity_id| activity_execution.get(activity_id).cloned())
                .unwrap_or_else(|| fixture.id.clone());
            state.jobs.push(Job {
                id: job.id.clone(),
                process_instance_id: fixture.id.clone(),
                execution_id,
                due_date: job.due_date,
                retries: job.retries,
                exception_message: job.exception_message.clone(),
                deployment_id: job.deployment_id.clone(),
                suspended: fixture.suspended,
            });
        }

        instance
    }
}

/// Derive a definition view from a `key:version:id`-shaped definition id.
fn definition_from_id(process_definition_id: &str) -> ProcessDefinition {
    let mut parts = process_definition_id.split(':');
    let key = parts.next().unwrap_or(process_definition_id).to_string();
    let version = parts.next().and_then(|v| v.parse().ok()).unwrap_or(1);
    ProcessDefinition {
        id: process_definition_id.to_string(),
        key,
        name: None,
        version,
    }
}

fn definition_key(process_definition_id: &str) -> &str {
    process_definition_id
        .split(':')
        .next()
        .unwrap_or(process_definition_id)
}

fn matches<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
    filter.as_ref().map_or(true, |want| want == value)
}

fn matches_opt(filter: &Option<String>, value: &Option<String>) -> bool {
    filter
        .as_ref()
        .map_or(true, |want| value.as_deref() == Some(want.as_str()))
}

#[async_trait]
impl ProcessEngine for TestEngine {
    async fn find_process_instances(
        &self,
        query: &ProcessInstanceQuery,
    ) -> Result<Vec<ProcessInstance>, EngineError> {
        let state = self.state();
        Ok(state
            .instances
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.id)
                    && matches_opt(&query.business_key, &row.business_key)
                    && matches(&query.process_definition_id, &row.process_definition_id)
                    && query.process_definition_key.as_ref().map_or(true, |key| {
                        definition_key(&row.process_definition_id) == key
                    })
                    && query.active.map_or(true, |want| want == !row.suspended)
                    && query.suspended.map_or(true, |want| want == row.suspended)
            })
            .cloned()
            .collect())
    }

    async fn find_executions(&self, query: &ExecutionQuery) -> Result<Vec<Execution>, EngineError> {
        let state = self.state();
        Ok(state
            .executions
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.process_instance_id)
                    && matches_opt(&query.activity_id, &row.activity_id)
                    && query.active.map_or(true, |want| want == !row.suspended)
                    && query.suspended.map_or(true, |want| want == row.suspended)
            })
            .cloned()
            .collect())
    }

    async fn find_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, EngineError> {
        let state = self.state();
        Ok(state
            .tasks
            .iter()
            .filter(|row| {
                matches(&query.task_id, &row.id)
                    && matches(&query.process_instance_id, &row.process_instance_id)
                    && matches(&query.task_definition_key, &row.task_definition_key)
                    && matches_opt(&query.assignee, &row.assignee)
                    && matches_opt(&query.name, &row.name)
                    && query.candidate_group.as_ref().map_or(true, |group| {
                        state
                            .candidate_groups
                            .get(&row.id)
                            .is_some_and(|groups| groups.contains(group))
                    })
                    && query
                        .unassigned
                        .map_or(true, |want| want == row.assignee.is_none())
            })
            .cloned()
            .collect())
    }

    async fn find_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, EngineError> {
        let state = self.state();
        Ok(state
            .jobs
            .iter()
            .filter(|row| {
                matches(&query.job_id, &row.id)
                    && matches(&query.process_instance_id, &row.process_instance_id)
                    && matches(&query.execution_id, &row.execution_id)
                    && query.activity_id.as_ref().map_or(true, |activity_id| {
                        state.executions.iter().any(|e| {
                            e.id == row.execution_id
                                && e.activity_id.as_deref() == Some(activity_id.as_str())
                        })
                    })
                    && query
                        .with_exception
                        .map_or(true, |want| want == row.exception_message.is_some())
            })
            .cloned()
            .collect())
    }

    async fn find_process_definitions(
        &self,
        query: &ProcessDefinitionQuery,
    ) -> Result<Vec<ProcessDefinition>, EngineError> {
        let state = self.state();
        Ok(state
            .definitions
            .iter()
            .filter(|row| {
                matches(&query.process_definition_id, &row.id)
                    && matches(&query.key, &row.key)
                    && matches_opt(&query.name, &row.name)
                    && matches(&query.version, &row.version)
            })
            .cloned()
            .collect())
    }

    async fn find_variable_instances(
        &self,
        query: &VariableInstanceQuery,
    ) -> Result<Vec<VariableInstance>, EngineError> {
        let state = self.state();
        Ok(state
            .variable_instances
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.process_instance_id)
                    && matches(&query.variable_name, &row.name)
            })
            .cloned()
            .collect())
    }

    async fn find_historic_process_instances(
        &self,
        query: &HistoricProcessInstanceQuery,
    ) -> Result<Vec<HistoricProcessInstance>, EngineError> {
        let state = self.state();
        Ok(state
            .historic_instances
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.id)
                    && query
                        .finished
                        .map_or(true, |want| want == row.end_time.is_some())
            })
            .cloned()
            .collect())
    }

    async fn find_historic_activity_instances(
        &self,
        query: &HistoricActivityInstanceQuery,
    ) -> Result<Vec<HistoricActivityInstance>, EngineError> {
        let state = self.state();
        let mut rows: Vec<HistoricActivityInstance> = state
            .historic_activities
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.process_instance_id)
                    && matches(&query.activity_id, &row.activity_id)
                    && query
                        .finished
                        .map_or(true, |want| want == row.end_time.is_some())
            })
            .cloned()
            .collect();

        if query.sort_by.as_deref() == Some("endTime") {
            rows.sort_by_key(|row| row.end_time);
            if query.sort_order.as_deref() == Some("desc") {
                rows.reverse();
            }
        }
        Ok(rows)
    }

    async fn find_historic_task_instances(
        &self,
        query: &HistoricTaskInstanceQuery,
    ) -> Result<Vec<HistoricTaskInstance>, EngineError> {
        let state = self.state();
        Ok(state
            .historic_tasks
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.process_instance_id)
                    && matches(&query.task_definition_key, &row.task_definition_key)
                    && query
                        .finished
                        .map_or(true, |want| want == row.end_time.is_some())
            })
            .cloned()
            .collect())
    }

    async fn find_historic_variable_instances(
        &self,
        query: &HistoricVariableInstanceQuery,
    ) -> Result<Vec<HistoricVariableInstance>, EngineError> {
        let state = self.state();
        Ok(state
            .historic_variables
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.process_instance_id)
                    && matches(&query.variable_name, &row.name)
            })
            .cloned()
            .collect())
    }

    async fn find_historic_details(
        &self,
        query: &HistoricDetailQuery,
    ) -> Result<Vec<HistoricDetail>, EngineError> {
        let state = self.state();
        Ok(state
            .historic_details
            .iter()
            .filter(|row| {
                matches(&query.process_instance_id, &row.process_instance_id)
                    && matches_opt(&query.variable_name, &row.variable_name)
            })
            .cloned()
            .collect())
    }

    async fn active_activity_ids(
        &self,
        process_instance_id: &str,
    ) -> Result<Vec<String>, EngineError> {
        let state = self.state();
        Ok(state
            .active_activities
            .get(process_instance_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn process_variables(
        &self,
        process_instance_id: &str,
    ) -> Result<BTreeMap<String, Value>, EngineError> {
        let state = self.state();
        Ok(state
            .variables
            .get(process_instance_id)
            .cloned()
            .unwrap_or_default())
    }
}
