use std::sync::Arc;

use crate::{
    context::DependencyContext,
    dependency_graph::{DependencyGraph, GraphNode},
    errors::{ComponentDiscoveryList, CycleError, DiscoveredComponent, ValidationError},
    types::ComponentKey,
    validator::DependencyGraphValidator,
};

/// Rejects cycles that would force a component to exist before itself.
///
/// Only immediate edges make a cycle illegal. A node referenced through
/// nothing but delayed edges resolves after construction, so its whole
/// subtree is skipped - lazy indirection is the normal way to break a
/// circular reference, not an error.
pub struct CyclicDependencyValidator;

impl DependencyGraphValidator for CyclicDependencyValidator {
    fn validate_before_configuration(&self, graph: &DependencyGraph) -> Result<(), ValidationError> {
        for node in graph.nodes() {
            // Roots and leaves cannot sit on a cycle
            if node.is_root() || node.is_leaf() {
                continue;
            }

            if let Some(path) = find_cycle(graph, node) {
                let origin = path
                    .first()
                    .map(|context| context.origin.clone())
                    .unwrap_or_default();
                let discovery = discover_path(&path);
                tracing::error!("Found circular dependency: {}", discovery);
                return Err(CycleError { discovery, origin }.into());
            }
        }
        Ok(())
    }
}

struct Frame {
    key: ComponentKey,
    children: Vec<ComponentKey>,
    next: usize,
}

/// Depth-first walk from `start`, keeping the in-progress path on an explicit
/// frame stack rather than the call stack.
///
/// Returns the offending path, ending with the repeated node, as soon as a
/// cycle closes. The first cycle found wins; enumerating all of them is not
/// attempted, since fixing one usually resolves the rest.
fn find_cycle(graph: &DependencyGraph, start: &GraphNode) -> Option<Vec<Arc<DependencyContext>>> {
    if !graph.needs_immediate_resolution(start.key()) {
        return None;
    }

    let mut frames = vec![Frame {
        key: start.key().clone(),
        children: start.dependencies().iter().cloned().collect(),
        next: 0,
    }];

    while let Some(frame) = frames.last_mut() {
        if frame.next >= frame.children.len() {
            frames.pop();
            continue;
        }

        let child = frame.children[frame.next].clone();
        frame.next += 1;

        // A child already on the path closes a cycle: the path plus that
        // child is the full offending chain
        if frames.iter().any(|open| open.key == child) {
            let mut path: Vec<Arc<DependencyContext>> = frames
                .iter()
                .filter_map(|open| graph.get(&open.key))
                .map(|node| node.context().clone())
                .collect();
            if let Some(repeated) = graph.get(&child) {
                path.push(repeated.context().clone());
            }
            return Some(path);
        }

        // Delayed-only children are legally resolvable after construction
        if !graph.needs_immediate_resolution(&child) {
            continue;
        }

        let Some(child_node) = graph.get(&child) else {
            continue;
        };
        frames.push(Frame {
            key: child,
            children: child_node.dependencies().iter().cloned().collect(),
            next: 0,
        });
    }

    None
}

/// Converts the offending path into its diagnostic form.
///
/// Implementation backed contexts record the concrete type as well as the
/// declared key, so the rendered path shows substitution steps.
fn discover_path(path: &[Arc<DependencyContext>]) -> ComponentDiscoveryList {
    let mut entries = Vec::new();
    for context in path {
        entries.push(DiscoveredComponent {
            type_name: context.component_key.type_info.type_name,
            component_key: context.component_key.clone(),
            origin: context.origin.clone(),
        });

        if let Some(implementation) = context.implementation() {
            if implementation != context.component_key.type_info {
                entries.push(DiscoveredComponent {
                    type_name: implementation.type_name,
                    component_key: context.component_key.clone(),
                    origin: context.origin.clone(),
                });
            }
        }
    }
    ComponentDiscoveryList::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::{BindingStrategy, DependencyMap},
        types::{LifecycleType, MemberType, Origin, ResolutionType, TypeInfo},
    };

    struct Alpha;
    struct AlphaImpl;
    struct Beta;
    struct Gamma;
    struct Delta;

    fn context(
        key: ComponentKey,
        dependencies: &[(ComponentKey, ResolutionType)],
    ) -> Arc<DependencyContext> {
        let mut map = DependencyMap::new();
        for (dependency, resolution) in dependencies {
            match resolution {
                ResolutionType::Immediate => map.add_immediate(dependency.clone()),
                ResolutionType::Delayed => map.add_delayed(dependency.clone()),
            }
        }
        Arc::new(DependencyContext {
            component_key: key.clone(),
            dependency_map: map,
            lifecycle_type: LifecycleType::Singleton,
            member_type: MemberType::Standalone,
            strategy: BindingStrategy::Implementation(key.type_info),
            scope: None,
            priority: None,
            lazy: false,
            origin: Origin::unknown(),
            process_after_initialization: false,
            post_processor: false,
        })
    }

    fn validate(contexts: Vec<Arc<DependencyContext>>) -> Result<(), ValidationError> {
        let graph = DependencyGraph::build(contexts);
        CyclicDependencyValidator.validate_before_configuration(&graph)
    }

    #[test]
    fn acyclic_immediate_chains_pass() {
        validate(vec![
            context(
                ComponentKey::of::<Alpha>(),
                &[(ComponentKey::of::<Beta>(), ResolutionType::Immediate)],
            ),
            context(
                ComponentKey::of::<Beta>(),
                &[(ComponentKey::of::<Gamma>(), ResolutionType::Immediate)],
            ),
            context(ComponentKey::of::<Gamma>(), &[]),
        ])
        .unwrap();
    }

    #[test]
    fn diamonds_are_not_cycles() {
        validate(vec![
            context(
                ComponentKey::of::<Alpha>(),
                &[
                    (ComponentKey::of::<Beta>(), ResolutionType::Immediate),
                    (ComponentKey::of::<Gamma>(), ResolutionType::Immediate),
                ],
            ),
            context(
                ComponentKey::of::<Beta>(),
                &[(ComponentKey::of::<Delta>(), ResolutionType::Immediate)],
            ),
            context(
                ComponentKey::of::<Gamma>(),
                &[(ComponentKey::of::<Delta>(), ResolutionType::Immediate)],
            ),
            context(ComponentKey::of::<Delta>(), &[]),
        ])
        .unwrap();
    }

    #[test]
    fn an_immediate_cycle_fails_with_the_full_path() {
        let error = validate(vec![
            context(
                ComponentKey::of::<Alpha>(),
                &[(ComponentKey::of::<Beta>(), ResolutionType::Immediate)],
            ),
            context(
                ComponentKey::of::<Beta>(),
                &[(ComponentKey::of::<Alpha>(), ResolutionType::Immediate)],
            ),
        ])
        .unwrap_err();

        let ValidationError::Cycle(cycle) = error else {
            panic!("expected a cycle error");
        };
        let keys: Vec<_> = cycle
            .discovery
            .iter()
            .map(|entry| entry.component_key.clone())
            .collect();
        assert_eq!(
            keys,
            vec![
                ComponentKey::of::<Alpha>(),
                ComponentKey::of::<Beta>(),
                ComponentKey::of::<Alpha>(),
            ]
        );
    }

    #[test]
    fn a_delayed_edge_breaks_the_cycle() {
        validate(vec![
            context(
                ComponentKey::of::<Alpha>(),
                &[(ComponentKey::of::<Beta>(), ResolutionType::Immediate)],
            ),
            context(
                ComponentKey::of::<Beta>(),
                &[(ComponentKey::of::<Alpha>(), ResolutionType::Delayed)],
            ),
        ])
        .unwrap();
    }

    #[test]
    fn longer_cycles_are_found_through_intermediate_nodes() {
        let error = validate(vec![
            context(
                ComponentKey::of::<Alpha>(),
                &[(ComponentKey::of::<Beta>(), ResolutionType::Immediate)],
            ),
            context(
                ComponentKey::of::<Beta>(),
                &[(ComponentKey::of::<Gamma>(), ResolutionType::Immediate)],
            ),
            context(
                ComponentKey::of::<Gamma>(),
                &[(ComponentKey::of::<Alpha>(), ResolutionType::Immediate)],
            ),
        ])
        .unwrap_err();

        let ValidationError::Cycle(cycle) = error else {
            panic!("expected a cycle error");
        };
        assert_eq!(cycle.discovery.len(), 4);
    }

    #[test]
    fn implementation_substitution_appears_in_the_discovery_path() {
        let alpha = Arc::new(DependencyContext {
            strategy: BindingStrategy::Implementation(TypeInfo::of::<AlphaImpl>()),
            ..(*context(
                ComponentKey::of::<Alpha>(),
                &[(ComponentKey::of::<Beta>(), ResolutionType::Immediate)],
            ))
            .clone()
        });
        let error = validate(vec![
            alpha,
            context(
                ComponentKey::of::<Beta>(),
                &[(ComponentKey::of::<Alpha>(), ResolutionType::Immediate)],
            ),
        ])
        .unwrap_err();

        let ValidationError::Cycle(cycle) = error else {
            panic!("expected a cycle error");
        };
        let names: Vec<_> = cycle.discovery.iter().map(|entry| entry.type_name).collect();
        assert!(names.contains(&TypeInfo::of::<AlphaImpl>().type_name));
        // Both the declared key and the substituted type are present
        assert!(names.contains(&TypeInfo::of::<Alpha>().type_name));
    }
}
