use crate::{
    builder::InitiatorBuilder,
    container::ComponentContainer,
    declaration::{ComponentDeclaration, DeclarationProvider},
    dependency_graph::DependencyGraph,
    errors::InitError,
    resolver::{CompositeResolver, DependencyResolver},
    validator::{CompositeValidator, DependencyGraphValidator},
    visitor::ConfigurationVisitor,
};

/// Orchestrates one initialization pass: resolve, build, validate, register,
/// validate again.
///
/// Every step is synchronous and in-memory; any failure surfaces immediately
/// and nothing is retried. A pre-configuration failure aborts before a single
/// provider is registered. The caller owns whatever partial container state a
/// later failure leaves behind, typically by discarding the container.
pub struct GraphInitiator {
    pub(crate) resolver: CompositeResolver,
    pub(crate) validators: CompositeValidator,
    pub(crate) visitor: ConfigurationVisitor,
}

impl GraphInitiator {
    pub fn builder() -> InitiatorBuilder {
        InitiatorBuilder::new()
    }

    /// Resolves the declarations and registers every provider with the given
    /// container.
    ///
    /// The returned graph is an immutable snapshot kept for introspection and
    /// diagnostics; it is not meant to drive a second registration pass.
    pub fn initialize(
        &self,
        declarations: &[ComponentDeclaration],
        container: &mut ComponentContainer,
    ) -> Result<DependencyGraph, InitError> {
        tracing::debug!(
            "Initializing dependency graph from {} declarations",
            declarations.len()
        );

        let contexts = self.resolver.resolve(declarations)?;
        let graph = DependencyGraph::build(contexts);

        self.validators.validate_before_configuration(&graph)?;

        let visited = self.visitor.visit(&graph, container)?;

        self.validators.validate_after_configuration(&graph, &visited)?;

        tracing::debug!(
            "Registered {} of {} components",
            visited.len(),
            graph.len()
        );
        Ok(graph)
    }

    /// Same pass, fed from a declaration provider
    pub fn initialize_from(
        &self,
        provider: &dyn DeclarationProvider,
        container: &mut ComponentContainer,
    ) -> Result<DependencyGraph, InitError> {
        self.initialize(&provider.declarations(), container)
    }
}

impl Default for GraphInitiator {
    fn default() -> Self {
        InitiatorBuilder::new().build()
    }
}
