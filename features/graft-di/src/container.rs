use std::collections::BTreeMap;

use crate::{
    context::BindingStrategy,
    types::{ComponentInstance, ComponentKey, ScopeId, SupplierFn, TypeInfo},
};

/// Container-side write surface for one component key.
///
/// The engine only calls this contract; it never constructs component objects
/// itself.
pub trait BindingTarget {
    /// Bind the key to a concrete implementation type, one shared instance
    fn to(&mut self, implementation: TypeInfo);
    /// Bind the key to an already constructed value
    fn singleton_value(&mut self, value: ComponentInstance);
    /// Bind the key to a supplier invoked once
    fn singleton_supplier(&mut self, supplier: SupplierFn);
    /// Bind the key to a supplier invoked on first request
    fn lazy_singleton(&mut self, supplier: SupplierFn);
    /// Bind the key to a concrete implementation type, one instance per request
    fn prototype(&mut self, implementation: TypeInfo);
    /// Bind the key to a supplier invoked per request
    fn prototype_supplier(&mut self, supplier: SupplierFn);
    /// Contribute to the key's collection binding
    fn collect(&mut self, contribution: BindingStrategy);
    fn priority(&mut self, priority: i32);
    fn install_to(&mut self, scope: ScopeId);
    fn process_after_initialization(&mut self, flag: bool);
}

/// Provider a binding ended up with
#[derive(Clone)]
pub enum BoundProvider {
    Singleton(TypeInfo),
    SingletonValue(ComponentInstance),
    SingletonSupplier(SupplierFn),
    LazySingleton(SupplierFn),
    Prototype(TypeInfo),
    PrototypeSupplier(SupplierFn),
}
impl std::fmt::Debug for BoundProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundProvider::Singleton(info) => f.debug_tuple("Singleton").field(info).finish(),
            BoundProvider::SingletonValue(value) => {
                f.debug_tuple("SingletonValue").field(value).finish()
            }
            BoundProvider::SingletonSupplier(_) => f.debug_tuple("SingletonSupplier").finish(),
            BoundProvider::LazySingleton(_) => f.debug_tuple("LazySingleton").finish(),
            BoundProvider::Prototype(info) => f.debug_tuple("Prototype").field(info).finish(),
            BoundProvider::PrototypeSupplier(_) => f.debug_tuple("PrototypeSupplier").finish(),
        }
    }
}

/// Everything the visitor recorded for one component key
#[derive(Debug, Clone, Default)]
pub struct Binding {
    pub provider: Option<BoundProvider>,
    /// Collection contributions from composite members
    pub contributions: Vec<BindingStrategy>,
    pub priority: Option<i32>,
    pub scope: Option<ScopeId>,
    pub process_after_initialization: bool,
}

/// Mutable view of one binding table entry
pub struct BindingEntry<'a> {
    binding: &'a mut Binding,
}
impl BindingTarget for BindingEntry<'_> {
    fn to(&mut self, implementation: TypeInfo) {
        self.binding.provider = Some(BoundProvider::Singleton(implementation));
    }

    fn singleton_value(&mut self, value: ComponentInstance) {
        self.binding.provider = Some(BoundProvider::SingletonValue(value));
    }

    fn singleton_supplier(&mut self, supplier: SupplierFn) {
        self.binding.provider = Some(BoundProvider::SingletonSupplier(supplier));
    }

    fn lazy_singleton(&mut self, supplier: SupplierFn) {
        self.binding.provider = Some(BoundProvider::LazySingleton(supplier));
    }

    fn prototype(&mut self, implementation: TypeInfo) {
        self.binding.provider = Some(BoundProvider::Prototype(implementation));
    }

    fn prototype_supplier(&mut self, supplier: SupplierFn) {
        self.binding.provider = Some(BoundProvider::PrototypeSupplier(supplier));
    }

    fn collect(&mut self, contribution: BindingStrategy) {
        self.binding.contributions.push(contribution);
    }

    fn priority(&mut self, priority: i32) {
        self.binding.priority = Some(priority);
    }

    fn install_to(&mut self, scope: ScopeId) {
        self.binding.scope = Some(scope);
    }

    fn process_after_initialization(&mut self, flag: bool) {
        self.binding.process_after_initialization = flag;
    }
}

/// Backing container owning the binding table.
///
/// Always an explicitly passed handle, never ambient state, so several
/// containers (one per test, say) can coexist independently. The engine
/// writes bindings during one initialization pass; serializing any
/// re-initialization against the same container is the caller's concern.
#[derive(Debug, Default)]
pub struct ComponentContainer {
    bindings: BTreeMap<ComponentKey, Binding>,
    post_processors: Vec<ComponentKey>,
}

impl ComponentContainer {
    pub fn new() -> ComponentContainer {
        ComponentContainer::default()
    }

    /// Binding target for the given key, created on first use
    pub fn binding_target(&mut self, key: &ComponentKey) -> BindingEntry<'_> {
        BindingEntry {
            binding: self.bindings.entry(key.clone()).or_default(),
        }
    }

    pub fn binding(&self, key: &ComponentKey) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub fn is_registered(&self, key: &ComponentKey) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&ComponentKey, &Binding)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn register_post_processor(&mut self, key: ComponentKey) {
        self.post_processors.push(key);
    }

    pub fn post_processors(&self) -> &[ComponentKey] {
        &self.post_processors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Service;

    #[test]
    fn binding_target_creates_the_entry_on_first_use() {
        let mut container = ComponentContainer::new();
        let key = ComponentKey::of::<Service>();
        assert!(!container.is_registered(&key));

        container.binding_target(&key).to(TypeInfo::of::<Service>());

        assert!(container.is_registered(&key));
        assert!(matches!(
            container.binding(&key).unwrap().provider,
            Some(BoundProvider::Singleton(_))
        ));
    }

    #[test]
    fn collection_contributions_accumulate() {
        let mut container = ComponentContainer::new();
        let key = ComponentKey::of::<Service>();

        let mut target = container.binding_target(&key);
        target.collect(BindingStrategy::Implementation(TypeInfo::of::<Service>()));
        target.collect(BindingStrategy::Implementation(TypeInfo::of::<Service>()));

        assert_eq!(container.binding(&key).unwrap().contributions.len(), 2);
    }
}
