use std::{
    any::{Any, TypeId},
    borrow::Cow,
    cmp::Ordering,
    sync::Arc,
};

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Last path segment of the type name, for compact diagnostics
    pub fn short_name(&self) -> &'static str {
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
// Ordered by name first so iteration order is readable and stable per build
impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_name
            .cmp(other.type_name)
            .then_with(|| self.type_id.cmp(&other.type_id))
    }
}

/// Identity of a component: a type plus an optional qualifier.
///
/// Used as the vertex identity for graph nodes and as map key throughout.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ComponentKey {
    pub type_info: TypeInfo,
    pub qualifier: Option<Cow<'static, str>>,
}
impl ComponentKey {
    pub fn of<T: 'static + ?Sized>() -> ComponentKey {
        ComponentKey {
            type_info: TypeInfo::of::<T>(),
            qualifier: None,
        }
    }

    pub fn qualified<T: 'static + ?Sized>(qualifier: impl Into<Cow<'static, str>>) -> ComponentKey {
        ComponentKey {
            type_info: TypeInfo::of::<T>(),
            qualifier: Some(qualifier.into()),
        }
    }
}
impl std::fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{} ({})", self.type_info, qualifier),
            None => self.type_info.fmt(f),
        }
    }
}

/// Where a declaration came from. Diagnostics only, never control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin(Cow<'static, str>);
impl Origin {
    pub fn new(location: impl Into<Cow<'static, str>>) -> Origin {
        Origin(location.into())
    }

    pub fn unknown() -> Origin {
        Origin(Cow::Borrowed("<unknown>"))
    }
}
impl Default for Origin {
    fn default() -> Self {
        Origin::unknown()
    }
}
impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a container scope a binding can be installed into
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScopeId(Cow<'static, str>);
impl ScopeId {
    pub fn new(name: impl Into<Cow<'static, str>>) -> ScopeId {
        ScopeId(name.into())
    }
}
impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a declared dependency may be satisfied.
///
/// `Immediate` dependencies must exist before their dependent can be
/// constructed. `Delayed` dependencies resolve through an indirection after
/// construction and therefore never force a cycle error.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolutionType {
    Immediate,
    Delayed,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleType {
    Singleton,
    Prototype,
}

/// Whether a component is bound 1:1 or contributes to a collection binding
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberType {
    Standalone,
    Composite,
}

/// An already constructed component value
#[derive(Clone)]
pub struct ComponentInstance {
    pub info: TypeInfo,
    instance: Arc<dyn Any + Send + Sync>,
}
impl ComponentInstance {
    pub fn new<T: Send + Sync + 'static>(instance: T) -> ComponentInstance {
        ComponentInstance {
            info: TypeInfo::of::<T>(),
            instance: Arc::new(instance),
        }
    }

    pub fn downcast<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }
}
impl std::fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ComponentInstance").field(&self.info).finish()
    }
}

/// Opaque provider closure. The engine stores and forwards it to the backing
/// container; it never calls it itself.
pub type SupplierFn = Arc<dyn Fn() -> ComponentInstance + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Service;
    struct OtherService;

    #[test]
    fn keys_are_value_equal() {
        assert_eq!(ComponentKey::of::<Service>(), ComponentKey::of::<Service>());
        assert_ne!(
            ComponentKey::of::<Service>(),
            ComponentKey::of::<OtherService>()
        );
    }

    #[test]
    fn qualifier_distinguishes_keys_of_one_type() {
        assert_ne!(
            ComponentKey::of::<Service>(),
            ComponentKey::qualified::<Service>("secondary")
        );
        assert_eq!(
            ComponentKey::qualified::<Service>("secondary"),
            ComponentKey::qualified::<Service>("secondary")
        );
    }

    #[test]
    fn instance_downcasts_to_its_own_type_only() {
        let instance = ComponentInstance::new(42u32);
        assert_eq!(*instance.downcast::<u32>().unwrap(), 42);
        assert!(instance.downcast::<String>().is_err());
    }

    #[test]
    fn short_name_strips_the_module_path() {
        assert_eq!(TypeInfo::of::<Service>().short_name(), "Service");
    }
}
