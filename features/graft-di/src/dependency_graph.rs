use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{context::DependencyContext, types::ComponentKey};

/// One vertex of the dependency graph
#[derive(Debug)]
pub struct GraphNode {
    context: Arc<DependencyContext>,
    /// Dependency edges that resolved to a context, both resolution classes
    dependencies: BTreeSet<ComponentKey>,
    /// Reverse edges: contexts that declared a dependency on this node
    dependents: BTreeSet<ComponentKey>,
    /// Declared dependency keys with no matching context
    missing: BTreeSet<ComponentKey>,
}

impl GraphNode {
    pub fn key(&self) -> &ComponentKey {
        &self.context.component_key
    }

    pub fn context(&self) -> &Arc<DependencyContext> {
        &self.context
    }

    /// No resolved dependencies of its own
    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Nothing declared a dependency on this node
    pub fn is_leaf(&self) -> bool {
        self.dependents.is_empty()
    }

    pub fn dependencies(&self) -> &BTreeSet<ComponentKey> {
        &self.dependencies
    }

    pub fn dependents(&self) -> &BTreeSet<ComponentKey> {
        &self.dependents
    }

    pub fn missing(&self) -> &BTreeSet<ComponentKey> {
        &self.missing
    }
}

/// Graph over every resolvable component of one initialization pass.
///
/// Built once, read-only afterwards; validators and the visitor never mutate
/// it. Nodes are kept in key order so every walk over the graph is
/// deterministic.
#[derive(Debug)]
pub struct DependencyGraph {
    nodes: BTreeMap<ComponentKey, GraphNode>,
}

impl DependencyGraph {
    /// Builds the graph from resolved contexts.
    ///
    /// A dependency key with no matching context becomes a recorded missing
    /// edge instead of a build failure, so one pass can report every problem
    /// through the later completeness check.
    pub fn build(contexts: impl IntoIterator<Item = Arc<DependencyContext>>) -> DependencyGraph {
        let mut nodes = BTreeMap::new();
        for context in contexts {
            let key = context.component_key.clone();
            let previous = nodes.insert(
                key,
                GraphNode {
                    context,
                    dependencies: BTreeSet::new(),
                    dependents: BTreeSet::new(),
                    missing: BTreeSet::new(),
                },
            );
            // The resolvers reject duplicate candidates before we get here
            debug_assert!(previous.is_none(), "duplicate context key survived resolution");
        }

        let declared: Vec<(ComponentKey, Vec<ComponentKey>)> = nodes
            .values()
            .map(|node| {
                (
                    node.key().clone(),
                    node.context.dependency_map.keys().cloned().collect(),
                )
            })
            .collect();

        let mut edge_count = 0usize;
        let mut missing_count = 0usize;
        for (from, dependency_keys) in declared {
            for dependency in dependency_keys {
                if nodes.contains_key(&dependency) {
                    if let Some(node) = nodes.get_mut(&from) {
                        node.dependencies.insert(dependency.clone());
                    }
                    if let Some(node) = nodes.get_mut(&dependency) {
                        node.dependents.insert(from.clone());
                    }
                    edge_count += 1;
                } else if let Some(node) = nodes.get_mut(&from) {
                    node.missing.insert(dependency);
                    missing_count += 1;
                }
            }
        }

        tracing::debug!(
            "Built dependency graph with {} nodes, {} edges, {} unresolved keys",
            nodes.len(),
            edge_count,
            missing_count
        );

        DependencyGraph { nodes }
    }

    /// Full vertex set, independent of what any traversal visits
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn get(&self, key: &ComponentKey) -> Option<&GraphNode> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when some dependent requires `key` before its own construction.
    ///
    /// False when every dependent reaches `key` only through delayed edges -
    /// such a node may legally sit on a cycle.
    pub fn needs_immediate_resolution(&self, key: &ComponentKey) -> bool {
        let Some(node) = self.nodes.get(key) else {
            return false;
        };
        node.dependents.iter().any(|dependent| {
            self.nodes
                .get(dependent)
                .is_some_and(|parent| parent.context.needs_immediate_resolution(key))
        })
    }
}
