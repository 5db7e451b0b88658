use std::collections::BTreeSet;

use crate::{
    container::BindingTarget,
    errors::ConfigurationError,
    types::{
        ComponentInstance, ComponentKey, LifecycleType, MemberType, Origin, ResolutionType,
        ScopeId, SupplierFn, TypeInfo,
    },
};

/// Declared dependencies of one context, partitioned by resolution class.
///
/// Value collections are sets: declaring the same edge twice is a no-op, and a
/// key is expected to appear in at most one class per context (the resolvers
/// reject declarations that violate this).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    immediate: BTreeSet<ComponentKey>,
    delayed: BTreeSet<ComponentKey>,
}

impl DependencyMap {
    pub fn new() -> DependencyMap {
        DependencyMap::default()
    }

    pub fn add_immediate(&mut self, key: ComponentKey) {
        self.immediate.insert(key);
    }

    pub fn add_immediate_all(&mut self, keys: impl IntoIterator<Item = ComponentKey>) {
        self.immediate.extend(keys);
    }

    pub fn add_delayed(&mut self, key: ComponentKey) {
        self.delayed.insert(key);
    }

    pub fn add_delayed_all(&mut self, keys: impl IntoIterator<Item = ComponentKey>) {
        self.delayed.extend(keys);
    }

    /// Resolution class the given key was declared under, if any
    pub fn resolution_type(&self, key: &ComponentKey) -> Option<ResolutionType> {
        if self.immediate.contains(key) {
            Some(ResolutionType::Immediate)
        } else if self.delayed.contains(key) {
            Some(ResolutionType::Delayed)
        } else {
            None
        }
    }

    pub fn immediate(&self) -> impl Iterator<Item = &ComponentKey> {
        self.immediate.iter()
    }

    pub fn delayed(&self) -> impl Iterator<Item = &ComponentKey> {
        self.delayed.iter()
    }

    /// All declared dependency keys, both classes
    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> {
        self.immediate.iter().chain(self.delayed.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.delayed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.immediate.len() + self.delayed.len()
    }
}

/// How a context's provider is installed into the backing container.
///
/// A closed set, so the configuration visitor dispatches exhaustively instead
/// of downcasting open context subclasses.
#[derive(Clone)]
pub enum BindingStrategy {
    /// Bind the declared key to a concrete implementation type
    Implementation(TypeInfo),
    /// Bind to an already constructed value
    Instance(ComponentInstance),
    /// Bind to an opaque supplier
    Supplier(SupplierFn),
}
impl std::fmt::Debug for BindingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingStrategy::Implementation(info) => {
                f.debug_tuple("Implementation").field(info).finish()
            }
            BindingStrategy::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
            BindingStrategy::Supplier(_) => f.debug_tuple("Supplier").finish(),
        }
    }
}

/// One resolvable component candidate.
///
/// Immutable once a resolver has produced it; validators and the visitor only
/// read it and write to the backing container.
#[derive(Debug, Clone)]
pub struct DependencyContext {
    pub component_key: ComponentKey,
    pub dependency_map: DependencyMap,
    pub lifecycle_type: LifecycleType,
    pub member_type: MemberType,
    pub strategy: BindingStrategy,
    pub scope: Option<ScopeId>,
    pub priority: Option<i32>,
    pub lazy: bool,
    pub origin: Origin,
    pub process_after_initialization: bool,
    pub post_processor: bool,
}

impl DependencyContext {
    /// True when this context requires `candidate` to exist before its own
    /// construction
    pub fn needs_immediate_resolution(&self, candidate: &ComponentKey) -> bool {
        self.dependency_map.resolution_type(candidate) == Some(ResolutionType::Immediate)
    }

    /// The concrete type this context substitutes for its declared key, if the
    /// binding is implementation backed
    pub fn implementation(&self) -> Option<TypeInfo> {
        match &self.strategy {
            BindingStrategy::Implementation(info) => Some(*info),
            _ => None,
        }
    }

    /// Installs this context's provider into the backing container according
    /// to lifecycle and member type.
    pub fn configure(&self, target: &mut dyn BindingTarget) -> Result<(), ConfigurationError> {
        match self.member_type {
            MemberType::Standalone => self.configure_standalone(target)?,
            MemberType::Composite => self.configure_composite(target)?,
        }

        if let Some(priority) = self.priority {
            target.priority(priority);
        }
        if let Some(scope) = &self.scope {
            target.install_to(scope.clone());
        }
        target.process_after_initialization(self.process_after_initialization);

        Ok(())
    }

    fn configure_standalone(
        &self,
        target: &mut dyn BindingTarget,
    ) -> Result<(), ConfigurationError> {
        match (self.lifecycle_type, &self.strategy) {
            (LifecycleType::Singleton, BindingStrategy::Implementation(info)) => target.to(*info),
            (LifecycleType::Singleton, BindingStrategy::Instance(value)) => {
                target.singleton_value(value.clone())
            }
            (LifecycleType::Singleton, BindingStrategy::Supplier(supplier)) if self.lazy => {
                target.lazy_singleton(supplier.clone())
            }
            (LifecycleType::Singleton, BindingStrategy::Supplier(supplier)) => {
                target.singleton_supplier(supplier.clone())
            }
            (LifecycleType::Prototype, BindingStrategy::Implementation(info)) => {
                target.prototype(*info)
            }
            (LifecycleType::Prototype, BindingStrategy::Supplier(supplier)) => {
                target.prototype_supplier(supplier.clone())
            }
            // A fixed value cannot produce a fresh instance per request
            (LifecycleType::Prototype, BindingStrategy::Instance(_)) => {
                return Err(ConfigurationError::UnsupportedBinding {
                    key: self.component_key.clone(),
                    lifecycle: self.lifecycle_type,
                    member: self.member_type,
                })
            }
        }
        Ok(())
    }

    fn configure_composite(&self, target: &mut dyn BindingTarget) -> Result<(), ConfigurationError> {
        if self.lifecycle_type == LifecycleType::Prototype
            && matches!(self.strategy, BindingStrategy::Instance(_))
        {
            return Err(ConfigurationError::UnsupportedBinding {
                key: self.component_key.clone(),
                lifecycle: self.lifecycle_type,
                member: self.member_type,
            });
        }

        target.collect(self.strategy.clone());
        Ok(())
    }
}
