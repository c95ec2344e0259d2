//! Runtime-side entity views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A running execution of a process definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstance {
    pub id: String,
    pub process_definition_id: String,
    pub business_key: Option<String>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub ended: bool,
}

/// A path of execution within a process instance.
///
/// The root execution shares its id with the process instance; child
/// executions are created for concurrent paths and scoped activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: String,
    pub process_instance_id: String,
    pub activity_id: Option<String>,
    #[serde(default)]
    pub suspended: bool,
}

/// A user task waiting to be worked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub process_instance_id: String,
    pub execution_id: String,
    pub task_definition_key: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: i32,
}

/// A background job (timer, async continuation, retry) owned by an execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub process_instance_id: String,
    pub execution_id: String,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub retries: i32,
    pub exception_message: Option<String>,
    pub deployment_id: Option<String>,
    #[serde(default)]
    pub suspended: bool,
}

/// A deployed process definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinition {
    pub id: String,
    pub key: String,
    pub name: Option<String>,
    pub version: i32,
}

/// A single process variable as stored by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableInstance {
    pub id: String,
    pub name: String,
    pub process_instance_id: String,
    pub execution_id: String,
    pub value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_instance_decodes_from_engine_payload() {
        let body = r#"{
            "id": "pi-1",
            "processDefinitionId": "invoice:1:d34d",
            "businessKey": null,
            "suspended": false,
            "ended": false
        }"#;
        let instance: ProcessInstance = serde_json::from_str(body).unwrap();
        assert_eq!(instance.id, "pi-1");
        assert_eq!(instance.process_definition_id, "invoice:1:d34d");
        assert_eq!(instance.business_key, None);
        assert!(!instance.suspended);
    }

    #[test]
    fn task_decodes_due_date_and_nullable_fields() {
        let body = r#"{
            "id": "t-1",
            "processInstanceId": "pi-1",
            "executionId": "ex-1",
            "taskDefinitionKey": "approve_invoice",
            "name": "Approve invoice",
            "description": null,
            "assignee": null,
            "dueDate": "2024-05-01T12:00:00Z",
            "priority": 50
        }"#;
        let task: Task = serde_json::from_str(body).unwrap();
        assert_eq!(task.task_definition_key, "approve_invoice");
        assert_eq!(task.name.as_deref(), Some("Approve invoice"));
        assert_eq!(task.assignee, None);
        assert_eq!(task.due_date.map(|d| d.to_rfc3339()), Some("2024-05-01T12:00:00+00:00".to_string()));
        assert_eq!(task.priority, 50);
    }
}
