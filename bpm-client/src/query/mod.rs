//! Query builders for the engine's query API.
//!
//! Each struct serializes to the query parameters of one list endpoint.
//! Unset filters stay out of the request entirely. Setters consume and
//! return the builder, so queries compose fluently before execution.

mod history;
mod runtime;

pub use history::{
    HistoricActivityInstanceQuery, HistoricDetailQuery, HistoricProcessInstanceQuery,
    HistoricTaskInstanceQuery, HistoricVariableInstanceQuery,
};
pub use runtime::{
    ExecutionQuery, JobQuery, ProcessDefinitionQuery, ProcessInstanceQuery, TaskQuery,
    VariableInstanceQuery,
};
