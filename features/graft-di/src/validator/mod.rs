use std::collections::BTreeSet;

use crate::{dependency_graph::DependencyGraph, errors::ValidationError, types::ComponentKey};

pub mod completeness;
pub mod cyclic;

/// A check over the built graph, run around the registration pass.
///
/// Validators are independent of each other; each implements the phase it
/// cares about and leaves the other as a no-op.
pub trait DependencyGraphValidator: Send + Sync {
    /// Structural checks before anything is registered
    fn validate_before_configuration(&self, graph: &DependencyGraph) -> Result<(), ValidationError> {
        let _ = graph;
        Ok(())
    }

    /// Checks against the set of keys the visitor actually registered
    fn validate_after_configuration(
        &self,
        graph: &DependencyGraph,
        visited: &BTreeSet<ComponentKey>,
    ) -> Result<(), ValidationError> {
        let _ = (graph, visited);
        Ok(())
    }
}

/// Runs every registered validator, phase by phase, propagating the first
/// failure raised.
pub struct CompositeValidator {
    validators: Vec<Box<dyn DependencyGraphValidator>>,
}

impl CompositeValidator {
    pub fn new() -> CompositeValidator {
        CompositeValidator {
            validators: Vec::new(),
        }
    }

    /// Cyclic and completeness validators, the standard set
    pub fn with_defaults() -> CompositeValidator {
        CompositeValidator::new()
            .add(cyclic::CyclicDependencyValidator)
            .add(completeness::CompletenessValidator)
    }

    pub fn add(mut self, validator: impl DependencyGraphValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn add_boxed(mut self, validator: Box<dyn DependencyGraphValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for CompositeValidator {
    fn default() -> Self {
        CompositeValidator::with_defaults()
    }
}

impl DependencyGraphValidator for CompositeValidator {
    fn validate_before_configuration(&self, graph: &DependencyGraph) -> Result<(), ValidationError> {
        for validator in &self.validators {
            validator.validate_before_configuration(graph)?;
        }
        Ok(())
    }

    fn validate_after_configuration(
        &self,
        graph: &DependencyGraph,
        visited: &BTreeSet<ComponentKey>,
    ) -> Result<(), ValidationError> {
        for validator in &self.validators {
            validator.validate_after_configuration(graph, visited)?;
        }
        Ok(())
    }
}
