use std::collections::{BTreeSet, VecDeque};

use crate::{
    dependency_graph::DependencyGraph,
    errors::{InitializationError, ValidationError},
    types::ComponentKey,
    validator::DependencyGraphValidator,
};

/// Verifies that everything required by what got registered was itself
/// registered.
///
/// Walks the full declared dependency closure of every visited node; any key
/// in that closure missing from the visited set - an unvisited context or a
/// key that never resolved to one - is reported. All missing keys are
/// collected before failing, so one run names every problem.
pub struct CompletenessValidator;

impl DependencyGraphValidator for CompletenessValidator {
    fn validate_after_configuration(
        &self,
        graph: &DependencyGraph,
        visited: &BTreeSet<ComponentKey>,
    ) -> Result<(), ValidationError> {
        let mut missing = BTreeSet::new();
        let mut processed = BTreeSet::new();
        let mut queue: VecDeque<ComponentKey> = visited.iter().cloned().collect();

        while let Some(key) = queue.pop_front() {
            if !processed.insert(key.clone()) {
                continue;
            }
            let Some(node) = graph.get(&key) else {
                continue;
            };
            for dependency in node.context().dependency_map.keys() {
                if !visited.contains(dependency) {
                    missing.insert(dependency.clone());
                }
                queue.push_back(dependency.clone());
            }
        }

        if !missing.is_empty() {
            return Err(InitializationError {
                missing: missing.into_iter().collect(),
            }
            .into());
        }
        Ok(())
    }
}
