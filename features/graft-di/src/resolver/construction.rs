use std::sync::Arc;

use crate::{
    context::{BindingStrategy, DependencyContext, DependencyMap},
    declaration::{ComponentDeclaration, DeclaredDependency, DeclaredProvider},
    errors::{ResolutionError, ResolutionFailure},
    resolver::DependencyResolver,
    types::{ComponentKey, Origin, ResolutionType},
};

/// Builds one context per declaration from its own constructor, instance or
/// supplier binding.
pub struct ConstructionResolver;

impl DependencyResolver for ConstructionResolver {
    fn resolve(
        &self,
        declarations: &[ComponentDeclaration],
    ) -> Result<Vec<Arc<DependencyContext>>, ResolutionError> {
        let mut contexts = Vec::new();
        let mut failures = Vec::new();

        for declaration in declarations {
            match resolve_declaration(declaration) {
                Ok(context) => contexts.push(Arc::new(context)),
                Err(declaration_failures) => failures.extend(declaration_failures),
            }
        }

        if !failures.is_empty() {
            return Err(ResolutionError { failures });
        }
        Ok(contexts)
    }
}

fn resolve_declaration(
    declaration: &ComponentDeclaration,
) -> Result<DependencyContext, Vec<ResolutionFailure>> {
    let dependency_map = classify_dependencies(
        &declaration.component_key,
        &declaration.origin,
        &declaration.dependencies,
    )?;

    let strategy = match &declaration.provider {
        DeclaredProvider::Constructor => BindingStrategy::Implementation(
            declaration
                .implementation
                .unwrap_or(declaration.component_key.type_info),
        ),
        DeclaredProvider::Instance(value) => BindingStrategy::Instance(value.clone()),
        DeclaredProvider::Supplier(supplier) => BindingStrategy::Supplier(supplier.clone()),
    };

    Ok(DependencyContext {
        component_key: declaration.component_key.clone(),
        dependency_map,
        lifecycle_type: declaration.lifecycle_type,
        member_type: declaration.member_type,
        strategy,
        scope: declaration.scope.clone(),
        priority: declaration.priority,
        lazy: declaration.lazy,
        origin: declaration.origin.clone(),
        process_after_initialization: declaration.process_after_initialization,
        post_processor: declaration.post_processor,
    })
}

/// Partitions declared dependencies into the two resolution classes.
///
/// A key may appear in at most one class, and nothing may immediately depend
/// on itself; violations are collected, not reported one at a time.
pub(crate) fn classify_dependencies(
    owner: &ComponentKey,
    origin: &Origin,
    dependencies: &[DeclaredDependency],
) -> Result<DependencyMap, Vec<ResolutionFailure>> {
    let mut map = DependencyMap::new();
    let mut failures = Vec::new();

    for dependency in dependencies {
        if dependency.key == *owner && dependency.resolution == ResolutionType::Immediate {
            failures.push(ResolutionFailure::SelfDependency {
                key: owner.clone(),
                origin: origin.clone(),
            });
            continue;
        }

        match map.resolution_type(&dependency.key) {
            Some(existing) if existing != dependency.resolution => {
                failures.push(ResolutionFailure::ConflictingResolution {
                    key: owner.clone(),
                    dependency: dependency.key.clone(),
                    origin: origin.clone(),
                });
            }
            _ => match dependency.resolution {
                ResolutionType::Immediate => map.add_immediate(dependency.key.clone()),
                ResolutionType::Delayed => map.add_delayed(dependency.key.clone()),
            },
        }
    }

    if !failures.is_empty() {
        return Err(failures);
    }
    Ok(map)
}
