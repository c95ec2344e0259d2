//! History-side entity views.
//!
//! History rows outlive their runtime counterparts. Whether they exist at all
//! depends on the history level the engine was configured with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Historic record of a process instance, present from the moment it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricProcessInstance {
    pub id: String,
    pub process_definition_id: String,
    pub business_key: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub state: Option<String>,
}

/// Historic record of one activity being entered and (possibly) left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricActivityInstance {
    pub id: String,
    pub activity_id: String,
    pub activity_name: Option<String>,
    pub activity_type: Option<String>,
    pub process_instance_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Historic record of a user task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricTaskInstance {
    pub id: String,
    pub process_instance_id: String,
    pub task_definition_key: String,
    pub name: Option<String>,
    pub assignee: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub delete_reason: Option<String>,
}

/// Historic record of a process variable's latest state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricVariableInstance {
    pub id: String,
    pub name: String,
    pub process_instance_id: String,
    pub value: serde_json::Value,
    pub state: Option<String>,
}

/// Historic detail row: one update to one variable at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricDetail {
    pub id: String,
    pub process_instance_id: String,
    pub variable_name: Option<String>,
    pub value: Option<serde_json::Value>,
    pub time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn historic_activity_decodes_an_open_end_time() {
        let body = r#"{
            "id": "ha-1",
            "activityId": "approve_invoice",
            "activityName": "Approve invoice",
            "activityType": "userTask",
            "processInstanceId": "pi-1",
            "startTime": "2024-05-01T12:00:00Z",
            "endTime": null
        }"#;
        let row: HistoricActivityInstance = serde_json::from_str(body).unwrap();
        assert_eq!(row.activity_id, "approve_invoice");
        assert_eq!(row.end_time, None);
    }

    #[test]
    fn historic_process_instance_decodes_a_finished_row() {
        let body = r#"{
            "id": "pi-1",
            "processDefinitionId": "invoice:1:d34d",
            "businessKey": "INV-42",
            "startTime": "2024-05-01T12:00:00Z",
            "endTime": "2024-05-01T12:05:00Z",
            "state": "COMPLETED"
        }"#;
        let row: HistoricProcessInstance = serde_json::from_str(body).unwrap();
        assert_eq!(row.business_key.as_deref(), Some("INV-42"));
        assert!(row.end_time.is_some());
        assert_eq!(row.state.as_deref(), Some("COMPLETED"));
    }
}
