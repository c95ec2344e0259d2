//! Assertions on a process instance.

use bpm_client::query::{
    ExecutionQuery, HistoricActivityInstanceQuery, HistoricDetailQuery,
    HistoricProcessInstanceQuery, HistoricTaskInstanceQuery, HistoricVariableInstanceQuery,
    JobQuery, ProcessDefinitionQuery, ProcessInstanceQuery, TaskQuery, VariableInstanceQuery,
};
use bpm_client::{single_result, ProcessEngine, ProcessInstance};
use tracing::debug;

use crate::job::JobAssert;
use crate::support::{expect_activity_ids, query_failed};
use crate::task::TaskAssert;
use crate::variables::VariablesAssert;

/// Fluent assertions on the runtime and historic state of one process
/// instance.
///
/// Holds the caller's snapshot of the instance and an engine handle; every
/// assertion re-queries the engine, narrowed to this instance, and panics
/// with a readable diagnostic when the expectation does not hold.
pub struct ProcessInstanceAssert<'a> {
    engine: &'a dyn ProcessEngine,
    actual: ProcessInstance,
}

fn subject(instance: &ProcessInstance) -> String {
    format!(
        "actual ProcessInstance {{id='{}', processDefinitionId='{}', businessKey='{}'}}",
        instance.id,
        instance.process_definition_id,
        instance.business_key.as_deref().unwrap_or("null")
    )
}

impl<'a> ProcessInstanceAssert<'a> {
    /// Start asserting on the given process instance.
    pub fn assert_that(engine: &'a dyn ProcessEngine, actual: &ProcessInstance) -> Self {
        debug!(process_instance_id = %actual.id, "asserting on process instance");
        Self {
            engine,
            actual: actual.clone(),
        }
    }

    /// The instance as the engine sees it right now, or `None` once it has
    /// ended.
    async fn current(&self) -> Option<ProcessInstance> {
        let rows = self
            .engine
            .find_process_instances(&self.process_instance_query())
            .await
            .unwrap_or_else(|e| query_failed("process-instance", e));
        single_result("process instance", rows)
            .unwrap_or_else(|e| query_failed("process-instance", e))
    }

    async fn existing_current(&self) -> ProcessInstance {
        match self.current().await {
            Some(current) => current,
            None => panic!(
                "Expecting {} to be still running, but it is not!",
                subject(&self.actual)
            ),
        }
    }

    async fn historic_current(&self) -> Option<bpm_client::HistoricProcessInstance> {
        let rows = self
            .engine
            .find_historic_process_instances(&self.historic_process_instance_query())
            .await
            .unwrap_or_else(|e| query_failed("historic-process-instance", e));
        single_result("historic process instance", rows)
            .unwrap_or_else(|e| query_failed("historic-process-instance", e))
    }

    // -------------------------------------------------------------------------
    // Waiting-at assertions
    // -------------------------------------------------------------------------

    /// Verifies that the process instance is currently waiting at each of
    /// the specified activities (and possibly others).
    pub async fn is_waiting_at(&self, activity_ids: &[&str]) -> &Self {
        self.waiting_at(activity_ids, true, false).await
    }

    /// Verifies that the process instance is currently waiting at none of
    /// the specified activities.
    pub async fn is_not_waiting_at(&self, activity_ids: &[&str]) -> &Self {
        self.waiting_at(activity_ids, false, false).await
    }

    /// Verifies that the process instance is currently waiting at exactly
    /// the specified activities, regardless of order.
    pub async fn is_waiting_at_exactly(&self, activity_ids: &[&str]) -> &Self {
        self.waiting_at(activity_ids, true, true).await
    }

    /// The exact-negative combination has no meaningful reading and always
    /// panics as unsupported.
    pub async fn is_not_waiting_at_exactly(&self, activity_ids: &[&str]) -> &Self {
        self.waiting_at(activity_ids, false, true).await
    }

    async fn waiting_at(&self, activity_ids: &[&str], positive: bool, exactly: bool) -> &Self {
        let current = self.existing_current().await;
        expect_activity_ids(activity_ids);

        let active = self
            .engine
            .active_activity_ids(&self.actual.id)
            .await
            .unwrap_or_else(|e| query_failed("activity-ids", e));

        if exactly {
            if !positive {
                // A "waiting at exactly none of these" check has no sensible
                // reading and is rejected outright.
                panic!("unsupported operation: is_not_waiting_at_exactly");
            }
            let mut expected_sorted: Vec<&str> = activity_ids.to_vec();
            expected_sorted.sort_unstable();
            let mut active_sorted = active.clone();
            active_sorted.sort_unstable();
            if active_sorted != expected_sorted {
                panic!(
                    "Expecting {} to be waiting at exactly {:?}, but it is actually waiting at {:?}.",
                    subject(&current),
                    activity_ids,
                    active
                );
            }
        } else if positive {
            if !activity_ids.iter().all(|id| active.iter().any(|a| a == id)) {
                panic!(
                    "Expecting {} to be waiting at {:?}, but it is actually waiting at {:?}.",
                    subject(&current),
                    activity_ids,
                    active
                );
            }
        } else if activity_ids.iter().any(|id| active.iter().any(|a| a == id)) {
            panic!(
                "Expecting {} NOT to be waiting at {:?}, but it is actually waiting at {:?}.",
                subject(&current),
                activity_ids,
                active
            );
        }
        self
    }

    // -------------------------------------------------------------------------
    // Has-passed assertions
    // -------------------------------------------------------------------------

    /// Verifies that the process instance has passed each of the specified
    /// activities at least once.
    pub async fn has_passed(&self, activity_ids: &[&str]) -> &Self {
        self.passed(activity_ids, true).await
    }

    /// Verifies that the process instance has passed none of the specified
    /// activities.
    pub async fn has_not_passed(&self, activity_ids: &[&str]) -> &Self {
        self.passed(activity_ids, false).await
    }

    async fn passed(&self, activity_ids: &[&str], positive: bool) -> &Self {
        expect_activity_ids(activity_ids);

        let query = self
            .historic_activity_instance_query()
            .finished()
            .order_by_end_time()
            .asc();
        let finished: Vec<String> = self
            .engine
            .find_historic_activity_instances(&query)
            .await
            .unwrap_or_else(|e| query_failed("historic-activity-instance", e))
            .into_iter()
            .map(|row| row.activity_id)
            .collect();

        let hint = "(Please make sure you have set the history service of the engine to at \
                    least 'activity' or a higher level before making use of this assertion!)";
        if positive {
            if !activity_ids
                .iter()
                .all(|id| finished.iter().any(|f| f == id))
            {
                panic!(
                    "Expecting {} to have passed activities {:?} at least once, but actually \
                     we found that it passed {:?}. {}",
                    subject(&self.actual),
                    activity_ids,
                    finished,
                    hint
                );
            }
        } else if activity_ids
            .iter()
            .any(|id| finished.iter().any(|f| f == id))
        {
            panic!(
                "Expecting {} NOT to have passed activities {:?}, but actually we found that \
                 it passed {:?}. {}",
                subject(&self.actual),
                activity_ids,
                finished,
                hint
            );
        }
        self
    }

    // -------------------------------------------------------------------------
    // Variable assertions
    // -------------------------------------------------------------------------

    /// Verifies that the process instance holds process variables with each
    /// of the specified names. An empty list only requires the instance to
    /// hold at least one variable.
    pub async fn has_variables(&self, names: &[&str]) -> &Self {
        self.vars(Some(names)).await
    }

    /// Verifies that the process instance holds no process variables at all.
    pub async fn has_no_variables(&self) -> &Self {
        self.vars(None).await
    }

    async fn vars(&self, names: Option<&[&str]>) -> &Self {
        let current = self.existing_current().await;
        let vars = self
            .engine
            .process_variables(&self.actual.id)
            .await
            .unwrap_or_else(|e| query_failed("variables", e));

        let keys: Vec<&String> = vars.keys().collect();
        let found = if keys.is_empty() {
            "no variables at all.".to_string()
        } else {
            format!("the variables {:?}.", keys)
        };

        match names {
            Some(names) if !names.is_empty() => {
                if !names.iter().all(|name| vars.contains_key(*name)) {
                    panic!(
                        "Expecting {} to hold process variables {:?}, instead we found it to hold {}",
                        subject(&current),
                        names,
                        found
                    );
                }
            }
            Some(_) => {
                if keys.is_empty() {
                    panic!(
                        "Expecting {} to hold process variables, instead we found it to hold {}",
                        subject(&current),
                        found
                    );
                }
            }
            None => {
                if !keys.is_empty() {
                    panic!(
                        "Expecting {} to hold no variables at all, instead we found it to hold {}",
                        subject(&current),
                        found
                    );
                }
            }
        }
        self
    }

    /// Enter a chained assert over the process variables currently held by
    /// the process instance.
    pub async fn variables(&self) -> VariablesAssert {
        let current = self.existing_current().await;
        let vars = self
            .engine
            .process_variables(&self.actual.id)
            .await
            .unwrap_or_else(|e| query_failed("variables", e));
        VariablesAssert::new(subject(&current), vars)
    }

    // -------------------------------------------------------------------------
    // Lifecycle assertions
    // -------------------------------------------------------------------------

    /// Verifies that the process instance is started. Also holds once the
    /// instance has already ended.
    pub async fn is_started(&self) -> &Self {
        if self.current().await.is_none() && self.historic_current().await.is_none() {
            panic!(
                "Expecting {} to be started, but it is not!",
                subject(&self.actual)
            );
        }
        self
    }

    /// Verifies that the process instance is ended: gone from the runtime
    /// database and present in history.
    pub async fn is_ended(&self) -> &Self {
        let message = format!(
            "Expecting {} to be ended, but it is not! (Please make sure you have set the \
             history service of the engine to at least 'activity' or a higher level before \
             making use of this assertion!)",
            subject(&self.actual)
        );
        if self.current().await.is_some() {
            panic!("{message}");
        }
        if self.historic_current().await.is_none() {
            panic!("{message}");
        }
        self
    }

    /// Verifies that the process instance is not ended.
    pub async fn is_not_ended(&self) -> &Self {
        if self.current().await.is_none() {
            panic!(
                "Expecting {} not to be ended, but it is!",
                subject(&self.actual)
            );
        }
        self
    }

    /// Verifies that the process instance is currently suspended.
    pub async fn is_suspended(&self) -> &Self {
        let current = self.existing_current().await;
        if !current.suspended {
            panic!(
                "Expecting {} to be suspended, but it is not!",
                subject(&self.actual)
            );
        }
        self
    }

    /// Verifies that the process instance is currently active: started, not
    /// ended and not suspended.
    pub async fn is_active(&self) -> &Self {
        let current = self.existing_current().await;
        self.is_started().await;
        self.is_not_ended().await;
        if current.suspended {
            panic!(
                "Expecting {} not to be suspended, but it is!",
                subject(&current)
            );
        }
        self
    }

    // -------------------------------------------------------------------------
    // Chained sub-asserts
    // -------------------------------------------------------------------------

    /// Enter a chained assert on the one and only task currently available
    /// in the context of the process instance. The subject is `None` when no
    /// such task exists; more than one match aborts the test.
    pub async fn task(&self) -> TaskAssert<'a> {
        self.task_matching(TaskQuery::default()).await
    }

    /// Enter a chained assert on the one and only task with the given task
    /// definition key currently available in the context of the process
    /// instance.
    pub async fn task_by_key(&self, task_definition_key: &str) -> TaskAssert<'a> {
        self.task_matching(TaskQuery::default().task_definition_key(task_definition_key))
            .await
    }

    /// Enter a chained assert on the one and only task matching the given
    /// query. The query is narrowed to this process instance before it runs.
    pub async fn task_matching(&self, query: TaskQuery) -> TaskAssert<'a> {
        let narrowed = query.process_instance_id(&self.actual.id);
        let rows = self
            .engine
            .find_tasks(&narrowed)
            .await
            .unwrap_or_else(|e| query_failed("task", e));
        let task = single_result("task", rows).unwrap_or_else(|e| query_failed("task", e));
        TaskAssert::assert_that(self.engine, task)
    }

    /// Enter a chained assert on the one and only job currently available in
    /// the context of the process instance.
    pub async fn job(&self) -> JobAssert<'a> {
        self.job_matching(JobQuery::default()).await
    }

    /// Enter a chained assert on the job bound to the execution currently
    /// waiting at the given activity.
    pub async fn job_at(&self, activity_id: &str) -> JobAssert<'a> {
        let query = self.execution_query().activity_id(activity_id).active();
        let rows = self
            .engine
            .find_executions(&query)
            .await
            .unwrap_or_else(|e| query_failed("execution", e));
        let execution =
            single_result("execution", rows).unwrap_or_else(|e| query_failed("execution", e));

        let job = match execution {
            Some(execution) => {
                let rows = self
                    .engine
                    .find_jobs(&self.job_query().execution_id(execution.id))
                    .await
                    .unwrap_or_else(|e| query_failed("job", e));
                single_result("job", rows).unwrap_or_else(|e| query_failed("job", e))
            }
            None => None,
        };
        JobAssert::assert_that(self.engine, job)
    }

    /// Enter a chained assert on the one and only job matching the given
    /// query. The query is narrowed to this process instance before it runs.
    pub async fn job_matching(&self, query: JobQuery) -> JobAssert<'a> {
        let narrowed = query.process_instance_id(&self.actual.id);
        let rows = self
            .engine
            .find_jobs(&narrowed)
            .await
            .unwrap_or_else(|e| query_failed("job", e));
        let job = single_result("job", rows).unwrap_or_else(|e| query_failed("job", e));
        JobAssert::assert_that(self.engine, job)
    }

    // -------------------------------------------------------------------------
    // Narrowed queries
    // -------------------------------------------------------------------------

    /// Process instance query narrowed to this process instance.
    pub fn process_instance_query(&self) -> ProcessInstanceQuery {
        ProcessInstanceQuery::default().process_instance_id(&self.actual.id)
    }

    /// Execution query narrowed to this process instance.
    pub fn execution_query(&self) -> ExecutionQuery {
        ExecutionQuery::default().process_instance_id(&self.actual.id)
    }

    /// Task query narrowed to this process instance.
    pub fn task_query(&self) -> TaskQuery {
        TaskQuery::default().process_instance_id(&self.actual.id)
    }

    /// Job query narrowed to this process instance.
    pub fn job_query(&self) -> JobQuery {
        JobQuery::default().process_instance_id(&self.actual.id)
    }

    /// Variable instance query narrowed to this process instance.
    pub fn variable_instance_query(&self) -> VariableInstanceQuery {
        VariableInstanceQuery::default().process_instance_id(&self.actual.id)
    }

    /// Process definition query narrowed to the definition of this process
    /// instance.
    pub fn process_definition_query(&self) -> ProcessDefinitionQuery {
        ProcessDefinitionQuery::default()
            .process_definition_id(&self.actual.process_definition_id)
    }

    /// Historic process instance query narrowed to this process instance.
    pub fn historic_process_instance_query(&self) -> HistoricProcessInstanceQuery {
        HistoricProcessInstanceQuery::default().process_instance_id(&self.actual.id)
    }

    /// Historic activity instance query narrowed to this process instance.
    pub fn historic_activity_instance_query(&self) -> HistoricActivityInstanceQuery {
        HistoricActivityInstanceQuery::default().process_instance_id(&self.actual.id)
    }

    /// Historic task instance query narrowed to this process instance.
    pub fn historic_task_instance_query(&self) -> HistoricTaskInstanceQuery {
        HistoricTaskInstanceQuery::default().process_instance_id(&self.actual.id)
    }

    /// Historic variable instance query narrowed to this process instance.
    pub fn historic_variable_instance_query(&self) -> HistoricVariableInstanceQuery {
        HistoricVariableInstanceQuery::default().process_instance_id(&self.actual.id)
    }

    /// Historic detail query narrowed to this process instance.
    pub fn historic_detail_query(&self) -> HistoricDetailQuery {
        HistoricDetailQuery::default().process_instance_id(&self.actual.id)
    }
}

#[cfg(test)]
mod tests {
    use bpm_client::ProcessInstance;

    use super::subject;

    #[test]
    fn subject_names_id_definition_and_business_key() {
        let instance = ProcessInstance {
            id: "pi-1".to_string(),
            process_definition_id: "invoice:1:d34d".to_string(),
            business_key: Some("INV-42".to_string()),
            suspended: false,
            ended: false,
        };
        assert_eq!(
            subject(&instance),
            "actual ProcessInstance {id='pi-1', processDefinitionId='invoice:1:d34d', \
             businessKey='INV-42'}"
        );
    }

    #[test]
    fn subject_renders_a_missing_business_key_as_null() {
        let instance = ProcessInstance {
            id: "pi-1".to_string(),
            process_definition_id: "invoice:1:d34d".to_string(),
            business_key: None,
            suspended: false,
            ended: false,
        };
        assert!(subject(&instance).contains("businessKey='null'"));
    }
}
