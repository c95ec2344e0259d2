//! Assertions on the process variables of a process instance.

use std::collections::BTreeMap;

use serde_json::Value;

/// Fluent assertions on the variable map fetched for one process instance.
///
/// Produced by [`ProcessInstanceAssert::variables`](crate::ProcessInstanceAssert::variables);
/// the map is a snapshot, so these checks are synchronous.
pub struct VariablesAssert {
    subject: String,
    vars: BTreeMap<String, Value>,
}

impl VariablesAssert {
    pub(crate) fn new(subject: String, vars: BTreeMap<String, Value>) -> Self {
        Self { subject, vars }
    }

    fn found(&self) -> String {
        if self.vars.is_empty() {
            "no variables at all.".to_string()
        } else {
            format!("the variables {:?}.", self.vars.keys().collect::<Vec<_>>())
        }
    }

    /// Verifies that the process instance holds a variable with each of the
    /// given names.
    pub fn contains_keys(&self, names: &[&str]) -> &Self {
        if !names.iter().all(|name| self.vars.contains_key(*name)) {
            panic!(
                "Expecting {} to hold process variables {:?}, instead we found it to hold {}",
                self.subject,
                names,
                self.found()
            );
        }
        self
    }

    /// Verifies that the process instance holds the given variable with
    /// exactly the given value.
    pub fn contains_entry(&self, name: &str, value: Value) -> &Self {
        match self.vars.get(name) {
            None => panic!(
                "Expecting {} to hold process variable '{}' = {}, but found it to hold no variable with that name!",
                self.subject, name, value
            ),
            Some(actual) if *actual != value => panic!(
                "Expecting {} to hold process variable '{}' = {}, but found it to hold '{}' = {}!",
                self.subject, name, value, name, actual
            ),
            Some(_) => self,
        }
    }

    /// Verifies that the process instance holds no variables at all.
    pub fn is_empty(&self) -> &Self {
        if !self.vars.is_empty() {
            panic!(
                "Expecting {} to hold no variables at all, instead we found it to hold {}",
                self.subject,
                self.found()
            );
        }
        self
    }

    /// Verifies that the process instance holds at least one variable.
    pub fn is_not_empty(&self) -> &Self {
        if self.vars.is_empty() {
            panic!(
                "Expecting {} to hold process variables, instead we found it to hold {}",
                self.subject,
                self.found()
            );
        }
        self
    }

    /// Verifies that the process instance holds exactly the given number of
    /// variables.
    pub fn has_size(&self, expected: usize) -> &Self {
        if self.vars.len() != expected {
            panic!(
                "Expecting {} to hold {} variables, but found it to hold {} variables: {:?}!",
                self.subject,
                expected,
                self.vars.len(),
                self.vars.keys().collect::<Vec<_>>()
            );
        }
        self
    }
}
