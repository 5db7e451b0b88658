use crate::{
    initiator::GraphInitiator,
    resolver::{CompositeResolver, DependencyResolver},
    validator::{CompositeValidator, DependencyGraphValidator},
    visitor::{ConfigurationVisitor, PostRegisterHook},
};

/// Configuration surface for an initialization pass.
///
/// Adding any resolver or validator replaces the default set for that seam,
/// so callers can substitute as well as extend. With nothing added, the
/// standard resolvers (construction, factory-method) and validators (cyclic,
/// completeness) are registered.
pub struct InitiatorBuilder {
    resolvers: Vec<Box<dyn DependencyResolver>>,
    validators: Vec<Box<dyn DependencyGraphValidator>>,
    post_register: Option<PostRegisterHook>,
}

impl InitiatorBuilder {
    pub fn new() -> InitiatorBuilder {
        InitiatorBuilder {
            resolvers: Vec::new(),
            validators: Vec::new(),
            post_register: None,
        }
    }

    pub fn add_resolver(mut self, resolver: impl DependencyResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn add_validator(mut self, validator: impl DependencyGraphValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Replaces the default post-register hook of the configuration visitor
    pub fn post_register(mut self, hook: PostRegisterHook) -> Self {
        self.post_register = Some(hook);
        self
    }

    pub fn build(self) -> GraphInitiator {
        let resolver = if self.resolvers.is_empty() {
            CompositeResolver::with_defaults()
        } else {
            self.resolvers
                .into_iter()
                .fold(CompositeResolver::new(), CompositeResolver::add_boxed)
        };

        let validators = if self.validators.is_empty() {
            CompositeValidator::with_defaults()
        } else {
            self.validators
                .into_iter()
                .fold(CompositeValidator::new(), CompositeValidator::add_boxed)
        };

        let visitor = match self.post_register {
            Some(hook) => ConfigurationVisitor::with_post_register(hook),
            None => ConfigurationVisitor::new(),
        };

        GraphInitiator {
            resolver,
            validators,
            visitor,
        }
    }
}

impl Default for InitiatorBuilder {
    fn default() -> Self {
        InitiatorBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{
        container::ComponentContainer,
        declaration::ComponentDeclaration,
        dependency_graph::DependencyGraph,
        errors::{InitError, InitializationError, ValidationError},
        types::ComponentKey,
    };

    struct Alpha;

    struct RejectEverything;
    impl DependencyGraphValidator for RejectEverything {
        fn validate_before_configuration(
            &self,
            _graph: &DependencyGraph,
        ) -> Result<(), ValidationError> {
            Err(InitializationError {
                missing: vec![ComponentKey::of::<Alpha>()],
            }
            .into())
        }
    }

    struct Nothing;
    impl DependencyResolver for Nothing {
        fn resolve(
            &self,
            _declarations: &[ComponentDeclaration],
        ) -> Result<Vec<std::sync::Arc<crate::context::DependencyContext>>, crate::errors::ResolutionError>
        {
            Ok(Vec::new())
        }
    }

    #[test]
    fn added_validators_replace_the_defaults() {
        let initiator = InitiatorBuilder::new().add_validator(RejectEverything).build();
        let declarations = vec![ComponentDeclaration::new(ComponentKey::of::<Alpha>())];

        let mut container = ComponentContainer::new();
        let error = initiator
            .initialize(&declarations, &mut container)
            .unwrap_err();
        assert!(matches!(error, InitError::Validation(_)));
    }

    #[test]
    fn added_resolvers_replace_the_defaults() {
        let initiator = InitiatorBuilder::new().add_resolver(Nothing).build();
        let declarations = vec![ComponentDeclaration::new(ComponentKey::of::<Alpha>())];

        let mut container = ComponentContainer::new();
        let graph = initiator.initialize(&declarations, &mut container).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn a_custom_post_register_hook_is_installed() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(BTreeSet::new()));
        let recorded = seen.clone();
        let initiator = InitiatorBuilder::new()
            .post_register(Box::new(move |context, _| {
                recorded.lock().unwrap().insert(context.component_key.clone());
            }))
            .build();

        let declarations = vec![ComponentDeclaration::new(ComponentKey::of::<Alpha>())];
        let mut container = ComponentContainer::new();
        initiator.initialize(&declarations, &mut container).unwrap();

        assert!(seen.lock().unwrap().contains(&ComponentKey::of::<Alpha>()));
    }
}
