//! The engine query contract.
//!
//! `ProcessEngine` is the seam between everything built on top (assertions,
//! test doubles) and whatever actually answers queries: the REST binding in
//! this crate, or an in-memory stand-in. All operations are read-only.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::EngineError;
use crate::query::{
    ExecutionQuery, HistoricActivityInstanceQuery, HistoricDetailQuery,
    HistoricProcessInstanceQuery, HistoricTaskInstanceQuery, HistoricVariableInstanceQuery,
    JobQuery, ProcessDefinitionQuery, ProcessInstanceQuery, TaskQuery, VariableInstanceQuery,
};
use crate::types::{
    Execution, HistoricActivityInstance, HistoricDetail, HistoricProcessInstance,
    HistoricTaskInstance, HistoricVariableInstance, Job, ProcessDefinition, ProcessInstance, Task,
    VariableInstance,
};

/// Read-only access to a process engine's query API.
#[async_trait]
pub trait ProcessEngine: Send + Sync {
    /// Find process instances matching the query.
    async fn find_process_instances(
        &self,
        query: &ProcessInstanceQuery,
    ) -> Result<Vec<ProcessInstance>, EngineError>;

    /// Find executions matching the query.
    async fn find_executions(&self, query: &ExecutionQuery) -> Result<Vec<Execution>, EngineError>;

    /// Find user tasks matching the query.
    async fn find_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, EngineError>;

    /// Find jobs matching the query.
    async fn find_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, EngineError>;

    /// Find deployed process definitions matching the query.
    async fn find_process_definitions(
        &self,
        query: &ProcessDefinitionQuery,
    ) -> Result<Vec<ProcessDefinition>, EngineError>;

    /// Find runtime variable instances matching the query.
    async fn find_variable_instances(
        &self,
        query: &VariableInstanceQuery,
    ) -> Result<Vec<VariableInstance>, EngineError>;

    /// Find historic process instances matching the query.
    async fn find_historic_process_instances(
        &self,
        query: &HistoricProcessInstanceQuery,
    ) -> Result<Vec<HistoricProcessInstance>, EngineError>;

    /// Find historic activity instances matching the query, in the order the
    /// query's sort parameters ask for.
    async fn find_historic_activity_instances(
        &self,
        query: &HistoricActivityInstanceQuery,
    ) -> Result<Vec<HistoricActivityInstance>, EngineError>;

    /// Find historic task instances matching the query.
    async fn find_historic_task_instances(
        &self,
        query: &HistoricTaskInstanceQuery,
    ) -> Result<Vec<HistoricTaskInstance>, EngineError>;

    /// Find historic variable instances matching the query.
    async fn find_historic_variable_instances(
        &self,
        query: &HistoricVariableInstanceQuery,
    ) -> Result<Vec<HistoricVariableInstance>, EngineError>;

    /// Find historic detail rows matching the query.
    async fn find_historic_details(
        &self,
        query: &HistoricDetailQuery,
    ) -> Result<Vec<HistoricDetail>, EngineError>;

    /// Ids of the activities a process instance is currently waiting at.
    ///
    /// Empty for an ended or unknown instance.
    async fn active_activity_ids(
        &self,
        process_instance_id: &str,
    ) -> Result<Vec<String>, EngineError>;

    /// Current runtime variables of a process instance, keyed by name.
    async fn process_variables(
        &self,
        process_instance_id: &str,
    ) -> Result<BTreeMap<String, Value>, EngineError>;
}

/// Reduce a query result to at most one row.
///
/// Zero rows is a legitimate "not found"; more than one means the caller's
/// query was not selective enough and is reported as an error rather than
/// silently picking a row.
pub fn single_result<T>(kind: &'static str, mut rows: Vec<T>) -> Result<Option<T>, EngineError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        count => Err(EngineError::NonUniqueResult { kind, count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_result_empty_is_none() {
        let result = single_result::<i32>("task", vec![]).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn single_result_one_row_is_some() {
        let result = single_result("task", vec![7]).unwrap();
        assert_eq!(result, Some(7));
    }

    #[test]
    fn single_result_many_rows_is_an_error() {
        let err = single_result("task", vec![1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NonUniqueResult { kind: "task", count: 3 }
        ));
        assert_eq!(err.to_string(), "Query for one task matched 3 results");
    }
}
