//! Dependency graph resolution and validation for a component container.
//!
//! Declarations go in, a validated registration plan comes out: declarations
//! are resolved into dependency contexts, the contexts become an immutable
//! graph, the graph is checked for illegal cycles, every provider is
//! registered with the backing container in dependency order, and a final
//! completeness check verifies nothing required was left behind.
//!
//! Cycles are only illegal between immediately resolved components; a
//! dependency declared as delayed resolves through an indirection after
//! construction and may legally close a loop. The whole pass is synchronous
//! and single-threaded - it either completes or fails with the first error
//! worth reporting, batching related problems where that helps (resolution
//! failures, missing components).

pub mod builder;
pub mod container;
pub mod context;
pub mod declaration;
pub mod dependency_graph;
pub mod errors;
pub mod initiator;
pub mod resolver;
pub mod types;
pub mod validator;
pub mod visitor;

pub use builder::InitiatorBuilder;
pub use container::{Binding, BindingTarget, BoundProvider, ComponentContainer};
pub use context::{BindingStrategy, DependencyContext, DependencyMap};
pub use declaration::{
    ComponentDeclaration, DeclarationProvider, DeclaredDependency, DeclaredProvider, FactoryMethod,
};
pub use dependency_graph::{DependencyGraph, GraphNode};
pub use errors::{
    ComponentDiscoveryList, ConfigurationError, CycleError, DiscoveredComponent, GraphError,
    InitError, InitializationError, ResolutionError, ResolutionFailure, ValidationError,
};
pub use initiator::GraphInitiator;
pub use resolver::{
    construction::ConstructionResolver, factory::FactoryMethodResolver, CompositeResolver,
    DependencyResolver,
};
pub use types::{
    ComponentInstance, ComponentKey, LifecycleType, MemberType, Origin, ResolutionType, ScopeId,
    SupplierFn, TypeInfo,
};
pub use validator::{
    completeness::CompletenessValidator, cyclic::CyclicDependencyValidator, CompositeValidator,
    DependencyGraphValidator,
};
pub use visitor::{ConfigurationVisitor, PostRegisterHook};
