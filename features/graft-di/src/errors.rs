use thiserror::Error;

use crate::types::{ComponentKey, LifecycleType, MemberType, Origin};

/// One step of an offending dependency path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredComponent {
    pub type_name: &'static str,
    pub component_key: ComponentKey,
    pub origin: Origin,
}

/// Ordered, immutable path of components reconstructed from a failed
/// validation walk. Implementation backed contexts contribute an extra entry
/// for the concrete type, so the path shows substitution steps as well as
/// declared keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentDiscoveryList {
    entries: Vec<DiscoveredComponent>,
}
impl ComponentDiscoveryList {
    pub fn new(entries: Vec<DiscoveredComponent>) -> ComponentDiscoveryList {
        ComponentDiscoveryList { entries }
    }

    pub fn entries(&self) -> &[DiscoveredComponent] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveredComponent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
impl std::fmt::Display for ComponentDiscoveryList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                f.write_str(" -> ")?;
            }
            f.write_str(entry.type_name)?;
            first = false;
        }
        Ok(())
    }
}

/// A single declaration that could not be turned into a context
#[derive(Error, Debug, Clone)]
pub enum ResolutionFailure {
    #[error("'{key}' declares '{dependency}' as both immediate and delayed (declared at {origin})")]
    ConflictingResolution {
        key: ComponentKey,
        dependency: ComponentKey,
        origin: Origin,
    },
    #[error("'{key}' immediately depends on itself (declared at {origin})")]
    SelfDependency { key: ComponentKey, origin: Origin },
    #[error("'{key}' has more than one candidate (declared at {origin})")]
    DuplicateCandidate { key: ComponentKey, origin: Origin },
}

/// Declarations could not be converted into contexts.
///
/// All failed declarations are collected before this is raised, so one pass
/// reports every malformed declaration at once.
#[derive(Error, Debug, Clone)]
pub struct ResolutionError {
    pub failures: Vec<ResolutionFailure>,
}
impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push(format!(
            "{} declaration(s) could not be resolved:",
            self.failures.len()
        ));
        for failure in &self.failures {
            display.push(format!("- {}", failure));
        }
        f.write_str(&display.join("\n"))
    }
}

/// An illegal cycle among immediately resolved components
#[derive(Error, Debug, Clone)]
#[error("A circular dependency exists through {discovery} (first declared at {origin}) - consider resolving one of the links lazily")]
pub struct CycleError {
    pub discovery: ComponentDiscoveryList,
    pub origin: Origin,
}

/// A specific context failed to configure its binding
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    #[error("'{key}' cannot be bound: a pre-built instance does not support the {lifecycle:?}/{member:?} combination")]
    UnsupportedBinding {
        key: ComponentKey,
        lifecycle: LifecycleType,
        member: MemberType,
    },
}

/// Failures while walking the graph and registering providers
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("Prototype '{key}' is reachable from nothing, so it would never be requested (declared at {origin})")]
    DanglingPrototype { key: ComponentKey, origin: Origin },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Components that were required but never registered.
///
/// Names every missing key, not just the first found.
#[derive(Error, Debug, Clone)]
pub struct InitializationError {
    pub missing: Vec<ComponentKey>,
}
impl std::fmt::Display for InitializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push(format!(
            "{} required component(s) were never registered:",
            self.missing.len()
        ));
        for key in &self.missing {
            display.push(format!("- {}", key));
        }
        f.write_str(&display.join("\n"))
    }
}

/// A validator rejected the graph
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    Initialization(#[from] InitializationError),
}

/// Errors while initializing the dependency graph
#[derive(Error, Debug, Clone)]
pub enum InitError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeInfo;

    struct Service;
    struct Repository;

    fn entry<T: 'static>() -> DiscoveredComponent {
        DiscoveredComponent {
            type_name: TypeInfo::of::<T>().type_name,
            component_key: ComponentKey::of::<T>(),
            origin: Origin::unknown(),
        }
    }

    #[test]
    fn discovery_list_displays_as_a_path() {
        let list = ComponentDiscoveryList::new(vec![
            entry::<Service>(),
            entry::<Repository>(),
            entry::<Service>(),
        ]);
        let rendered = list.to_string();
        assert_eq!(rendered.matches(" -> ").count(), 2);
        assert!(rendered.contains("Service"));
        assert!(rendered.contains("Repository"));
    }

    #[test]
    fn initialization_error_names_every_missing_key() {
        let error = InitializationError {
            missing: vec![ComponentKey::of::<Service>(), ComponentKey::of::<Repository>()],
        };
        let rendered = error.to_string();
        assert!(rendered.contains("2 required component(s)"));
        assert!(rendered.contains("Service"));
        assert!(rendered.contains("Repository"));
    }
}
