use std::{
    collections::{BTreeSet, VecDeque},
    sync::Arc,
};

use crate::{
    container::ComponentContainer,
    context::DependencyContext,
    dependency_graph::DependencyGraph,
    errors::GraphError,
    types::{ComponentKey, LifecycleType},
};

/// Runs after each successful registration, with the container available for
/// extra bookkeeping
pub type PostRegisterHook = Box<dyn Fn(&DependencyContext, &mut ComponentContainer) + Send + Sync>;

/// Registers every context with the backing container, dependencies before
/// dependents.
///
/// The sweep starts from root nodes something depends on and releases a
/// dependent only once all of its immediate dependencies are registered.
/// Delayed edges are never traversed: a node referenced only through them is
/// dangling and handled after the sweep - registered directly when it is a
/// singleton, rejected when it is a prototype.
pub struct ConfigurationVisitor {
    post_register: PostRegisterHook,
}

impl ConfigurationVisitor {
    pub fn new() -> ConfigurationVisitor {
        ConfigurationVisitor {
            post_register: Box::new(default_post_register),
        }
    }

    pub fn with_post_register(hook: PostRegisterHook) -> ConfigurationVisitor {
        ConfigurationVisitor {
            post_register: hook,
        }
    }

    /// Walks the graph and registers every provider.
    ///
    /// Returns the set of visited keys - the breadth-first pass plus the
    /// dangling singletons - for the post-configuration validators.
    pub fn visit(
        &self,
        graph: &DependencyGraph,
        container: &mut ComponentContainer,
    ) -> Result<BTreeSet<ComponentKey>, GraphError> {
        let mut visited: BTreeSet<ComponentKey> = BTreeSet::new();

        // Roots something depends on seed the sweep; isolated vertices fall
        // through to dangling handling below
        let mut queue: VecDeque<ComponentKey> = graph
            .nodes()
            .filter(|node| node.is_root() && !node.is_leaf())
            .map(|node| node.key().clone())
            .collect();

        while let Some(key) = queue.pop_front() {
            if visited.contains(&key) {
                continue;
            }
            let Some(node) = graph.get(&key) else {
                continue;
            };

            self.register(node.context(), container)?;
            visited.insert(key.clone());

            for dependent in node.dependents() {
                if visited.contains(dependent) {
                    continue;
                }
                let Some(dependent_node) = graph.get(dependent) else {
                    continue;
                };
                let context = dependent_node.context();
                if !context.needs_immediate_resolution(&key) {
                    continue;
                }
                // Release the dependent once every immediate dependency that
                // resolved to a context has been registered; unresolved keys
                // cannot block it - the completeness check reports those
                let ready = context
                    .dependency_map
                    .immediate()
                    .all(|dependency| visited.contains(dependency) || !graph.contains(dependency));
                if ready {
                    queue.push_back(dependent.clone());
                }
            }
        }

        for node in graph.nodes() {
            if visited.contains(node.key()) {
                continue;
            }
            match node.context().lifecycle_type {
                LifecycleType::Singleton => {
                    tracing::debug!("Registering dangling singleton '{}'", node.key());
                    self.register(node.context(), container)?;
                    visited.insert(node.key().clone());
                }
                LifecycleType::Prototype => {
                    tracing::error!("Prototype '{}' is reachable from nothing", node.key());
                    return Err(GraphError::DanglingPrototype {
                        key: node.key().clone(),
                        origin: node.context().origin.clone(),
                    });
                }
            }
        }

        tracing::debug!("Visited {} of {} nodes", visited.len(), graph.len());
        Ok(visited)
    }

    fn register(
        &self,
        context: &Arc<DependencyContext>,
        container: &mut ComponentContainer,
    ) -> Result<(), GraphError> {
        tracing::debug!("Registering provider for '{}'", context.component_key);
        {
            let mut target = container.binding_target(&context.component_key);
            context.configure(&mut target)?;
        }
        (self.post_register)(context, container);
        Ok(())
    }
}

impl Default for ConfigurationVisitor {
    fn default() -> Self {
        ConfigurationVisitor::new()
    }
}

fn default_post_register(context: &DependencyContext, container: &mut ComponentContainer) {
    if context.post_processor {
        container.register_post_processor(context.component_key.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::{BindingStrategy, DependencyMap},
        types::{MemberType, Origin, ResolutionType},
    };

    struct Config;
    struct Repository;
    struct Service;
    struct Worker;

    fn context(
        key: ComponentKey,
        lifecycle: LifecycleType,
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
            lifecycle_type: lifecycle,
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

    #[test]
    fn dependencies_register_before_their_dependents() {
        let graph = DependencyGraph::build([
            context(
                ComponentKey::of::<Service>(),
                LifecycleType::Singleton,
                &[
                    (ComponentKey::of::<Repository>(), ResolutionType::Immediate),
                    (ComponentKey::of::<Config>(), ResolutionType::Immediate),
                ],
            ),
            context(
                ComponentKey::of::<Repository>(),
                LifecycleType::Singleton,
                &[(ComponentKey::of::<Config>(), ResolutionType::Immediate)],
            ),
            context(ComponentKey::of::<Config>(), LifecycleType::Singleton, &[]),
        ]);

        let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorded = order.clone();
        let visitor = ConfigurationVisitor::with_post_register(Box::new(move |context, _| {
            recorded.lock().unwrap().push(context.component_key.clone());
        }));

        let mut container = ComponentContainer::new();
        let visited = visitor.visit(&graph, &mut container).unwrap();

        assert_eq!(visited.len(), 3);
        let order = order.lock().unwrap();
        let position = |key: &ComponentKey| order.iter().position(|k| k == key).unwrap();
        assert!(position(&ComponentKey::of::<Config>()) < position(&ComponentKey::of::<Repository>()));
        assert!(
            position(&ComponentKey::of::<Repository>()) < position(&ComponentKey::of::<Service>())
        );
    }

    #[test]
    fn dangling_singletons_register_after_the_sweep() {
        let graph = DependencyGraph::build([
            context(ComponentKey::of::<Config>(), LifecycleType::Singleton, &[]),
            context(
                ComponentKey::of::<Service>(),
                LifecycleType::Singleton,
                &[(ComponentKey::of::<Config>(), ResolutionType::Immediate)],
            ),
            // Referenced by nothing, refers to Service only lazily
            context(
                ComponentKey::of::<Worker>(),
                LifecycleType::Singleton,
                &[(ComponentKey::of::<Service>(), ResolutionType::Delayed)],
            ),
        ]);

        let mut container = ComponentContainer::new();
        let visited = ConfigurationVisitor::new()
            .visit(&graph, &mut container)
            .unwrap();

        assert!(visited.contains(&ComponentKey::of::<Worker>()));
        assert!(container.is_registered(&ComponentKey::of::<Worker>()));
    }

    #[test]
    fn an_isolated_singleton_is_visited() {
        let graph = DependencyGraph::build([context(
            ComponentKey::of::<Config>(),
            LifecycleType::Singleton,
            &[],
        )]);

        let mut container = ComponentContainer::new();
        let visited = ConfigurationVisitor::new()
            .visit(&graph, &mut container)
            .unwrap();
        assert!(visited.contains(&ComponentKey::of::<Config>()));
    }

    #[test]
    fn an_isolated_prototype_is_a_defect() {
        let graph = DependencyGraph::build([context(
            ComponentKey::of::<Worker>(),
            LifecycleType::Prototype,
            &[],
        )]);

        let mut container = ComponentContainer::new();
        let error = ConfigurationVisitor::new()
            .visit(&graph, &mut container)
            .unwrap_err();
        assert!(matches!(error, GraphError::DanglingPrototype { .. }));
    }

    #[test]
    fn post_processors_are_recorded_through_the_default_hook() {
        let mut processor = (*context(
            ComponentKey::of::<Service>(),
            LifecycleType::Singleton,
            &[],
        ))
        .clone();
        processor.post_processor = true;

        let graph = DependencyGraph::build([Arc::new(processor)]);
        let mut container = ComponentContainer::new();
        ConfigurationVisitor::new()
            .visit(&graph, &mut container)
            .unwrap();

        assert_eq!(
            container.post_processors(),
            &[ComponentKey::of::<Service>()]
        );
    }
}
