//! REST binding for the engine query API.
//!
//! Speaks the engine's JSON API over HTTP. Every trait method maps to a GET
//! against one query endpoint with the builder serialized into the query
//! string. Non-success responses surface as [`EngineError::Engine`] with the
//! engine's own error body.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::engine::ProcessEngine;
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

/// Variable payload as served by the engine: the value wrapped in an object
/// alongside type metadata this client does not interpret.
#[derive(Debug, Deserialize)]
struct VariablePayload {
    value: Value,
}

/// HTTP client for a running engine's query API.
#[derive(Debug, Clone)]
pub struct RestEngine {
    client: reqwest::Client,
    base_url: String,
}

impl RestEngine {
    /// Create a new client with the given configuration.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new client for the given base URL with default timeouts.
    pub fn connect(base_url: impl Into<String>) -> Result<Self, EngineError> {
        Self::new(EngineConfig {
            base_url: base_url.into(),
            ..EngineConfig::default()
        })
    }

    /// Create a new client configured from the environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::new(EngineConfig::load()?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        kind: &'static str,
        query: &(impl Serialize + ?Sized),
    ) -> Result<T, EngineError> {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query);
        self.execute(request, path, kind).await
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        kind: &'static str,
    ) -> Result<T, EngineError> {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        self.execute(request, path, kind).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
        kind: &'static str,
    ) -> Result<T, EngineError> {
        tracing::debug!(kind, path, "running engine query");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EngineError::Engine {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ProcessEngine for RestEngine {
    async fn find_process_instances(
        &self,
        query: &ProcessInstanceQuery,
    ) -> Result<Vec<ProcessInstance>, EngineError> {
        self.get_json("/process-instance", "process-instance", query)
            .await
    }

    async fn find_executions(&self, query: &ExecutionQuery) -> Result<Vec<Execution>, EngineError> {
        self.get_json("/execution", "execution", query).await
    }

    async fn find_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, EngineError> {
        self.get_json("/task", "task", query).await
    }

    async fn find_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, EngineError> {
        self.get_json("/job", "job", query).await
    }

    async fn find_process_definitions(
        &self,
        query: &ProcessDefinitionQuery,
    ) -> Result<Vec<ProcessDefinition>, EngineError> {
        self.get_json("/process-definition", "process-definition", query)
            .await
    }

    async fn find_variable_instances(
        &self,
        query: &VariableInstanceQuery,
    ) -> Result<Vec<VariableInstance>, EngineError> {
        self.get_json("/variable-instance", "variable-instance", query)
            .await
    }

    async fn find_historic_process_instances(
        &self,
        query: &HistoricProcessInstanceQuery,
    ) -> Result<Vec<HistoricProcessInstance>, EngineError> {
        self.get_json(
            "/history/process-instance",
            "historic-process-instance",
            query,
        )
        .await
    }

    async fn find_historic_activity_instances(
        &self,
        query: &HistoricActivityInstanceQuery,
    ) -> Result<Vec<HistoricActivityInstance>, EngineError> {
        self.get_json(
            "/history/activity-instance",
            "historic-activity-instance",
            query,
        )
        .await
    }

    async fn find_historic_task_instances(
        &self,
        query: &HistoricTaskInstanceQuery,
    ) -> Result<Vec<HistoricTaskInstance>, EngineError> {
        self.get_json("/history/task-instance", "historic-task-instance", query)
            .await
    }

    async fn find_historic_variable_instances(
        &self,
        query: &HistoricVariableInstanceQuery,
    ) -> Result<Vec<HistoricVariableInstance>, EngineError> {
        self.get_json(
            "/history/variable-instance",
            "historic-variable-instance",
            query,
        )
        .await
    }

    async fn find_historic_details(
        &self,
        query: &HistoricDetailQuery,
    ) -> Result<Vec<HistoricDetail>, EngineError> {
        self.get_json("/history/detail", "historic-detail", query)
            .await
    }

    async fn active_activity_ids(
        &self,
        process_instance_id: &str,
    ) -> Result<Vec<String>, EngineError> {
        self.get_resource(
            &format!("/process-instance/{process_instance_id}/activity-ids"),
            "activity-ids",
        )
        .await
    }

    async fn process_variables(
        &self,
        process_instance_id: &str,
    ) -> Result<BTreeMap<String, Value>, EngineError> {
        let payload: BTreeMap<String, VariablePayload> = self
            .get_resource(
                &format!("/process-instance/{process_instance_id}/variables"),
                "variables",
            )
            .await?;

        Ok(payload
            .into_iter()
            .map(|(name, wrapped)| (name, wrapped.value))
            .collect())
    }
}
