use std::{collections::BTreeMap, sync::Arc};

use crate::{
    context::DependencyContext,
    declaration::ComponentDeclaration,
    errors::{ResolutionError, ResolutionFailure},
    types::ComponentKey,
};

pub mod construction;
pub mod factory;

/// Turns declarations into dependency contexts.
///
/// Resolution must be deterministic: the same declarations through the same
/// resolver always yield the same context set.
pub trait DependencyResolver: Send + Sync {
    fn resolve(
        &self,
        declarations: &[ComponentDeclaration],
    ) -> Result<Vec<Arc<DependencyContext>>, ResolutionError>;
}

/// Fans out to every registered resolver and unions the results.
///
/// Failures from all resolvers are batched into one error; two candidates for
/// the same key are rejected here, since no single resolver can see across
/// the union.
pub struct CompositeResolver {
    resolvers: Vec<Box<dyn DependencyResolver>>,
}

impl CompositeResolver {
    pub fn new() -> CompositeResolver {
        CompositeResolver {
            resolvers: Vec::new(),
        }
    }

    /// Construction and factory-method resolvers, the standard set
    pub fn with_defaults() -> CompositeResolver {
        CompositeResolver::new()
            .add(construction::ConstructionResolver)
            .add(factory::FactoryMethodResolver)
    }

    pub fn add(mut self, resolver: impl DependencyResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn add_boxed(mut self, resolver: Box<dyn DependencyResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl Default for CompositeResolver {
    fn default() -> Self {
        CompositeResolver::with_defaults()
    }
}

impl DependencyResolver for CompositeResolver {
    fn resolve(
        &self,
        declarations: &[ComponentDeclaration],
    ) -> Result<Vec<Arc<DependencyContext>>, ResolutionError> {
        let mut by_key: BTreeMap<ComponentKey, Arc<DependencyContext>> = BTreeMap::new();
        let mut failures = Vec::new();

        for resolver in &self.resolvers {
            match resolver.resolve(declarations) {
                Ok(contexts) => {
                    for context in contexts {
                        let key = context.component_key.clone();
                        if by_key.contains_key(&key) {
                            failures.push(ResolutionFailure::DuplicateCandidate {
                                key,
                                origin: context.origin.clone(),
                            });
                        } else {
                            by_key.insert(key, context);
                        }
                    }
                }
                Err(error) => failures.extend(error.failures),
            }
        }

        if !failures.is_empty() {
            return Err(ResolutionError { failures });
        }

        tracing::debug!("Resolved {} contexts from {} declarations", by_key.len(), declarations.len());
        Ok(by_key.into_values().collect())
    }
}
