//! Evaluation context: the variables expressions are resolved against.

use im::HashMap;

use crate::value::Value;

/// Variables available to expressions during evaluation.
///
/// Backed by a persistent map, so cloning a context to evaluate against a variation of
/// it is cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationContext {
    vars: HashMap<String, Value>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vars(vars: HashMap<String, Value>) -> Self {
        Self { vars }
    }

    /// Set a variable in the environment
    pub fn set_var(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    /// Get a variable from the environment
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn get_var_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.vars.get_mut(name)
    }
}
