//! bpm-client: Typed read-only client for a process engine's query API.
//!
//! This crate provides:
//! - Views of engine entities (process instances, executions, tasks, jobs,
//!   definitions, variables and their historic counterparts)
//! - Fluent query builders, one per query endpoint
//! - The [`ProcessEngine`] trait every engine backend implements
//! - [`RestEngine`], the HTTP binding for a running engine
//! - Connection configuration from environment variables

pub mod config;
pub mod engine;
pub mod error;
pub mod query;
pub mod rest;
pub mod types;

pub use config::EngineConfig;
pub use engine::{single_result, ProcessEngine};
pub use error::EngineError;
pub use query::{
    ExecutionQuery, HistoricActivityInstanceQuery, HistoricDetailQuery,
    HistoricProcessInstanceQuery, HistoricTaskInstanceQuery, HistoricVariableInstanceQuery,
    JobQuery, ProcessDefinitionQuery, ProcessInstanceQuery, TaskQuery, VariableInstanceQuery,
};
pub use rest::RestEngine;
pub use types::{
    Execution, HistoricActivityInstance, HistoricDetail, HistoricProcessInstance,
    HistoricTaskInstance, HistoricVariableInstance, Job, ProcessDefinition, ProcessInstance, Task,
    VariableInstance,
};
