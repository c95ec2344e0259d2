//! Read-only views of engine entities.
//!
//! Every struct here mirrors a JSON payload served by the engine's query API.
//! Views are fetched on demand, never cached and never written back.

mod history;
mod runtime;

pub use history::{
    HistoricActivityInstance, HistoricDetail, HistoricProcessInstance, HistoricTaskInstance,
    HistoricVariableInstance,
};
pub use runtime::{Execution, Job, ProcessDefinition, ProcessInstance, Task, VariableInstance};
