use std::sync::Arc;

use crate::{
    context::{BindingStrategy, DependencyContext},
    declaration::{ComponentDeclaration, DeclaredDependency},
    errors::{ResolutionError, ResolutionFailure},
    resolver::{construction::classify_dependencies, DependencyResolver},
    types::MemberType,
};

/// Builds one context per factory method of each declaration.
///
/// The produced component depends immediately on the owning component - a
/// factory method cannot run before its owner exists - plus whatever the
/// method's own parameters declare.
pub struct FactoryMethodResolver;

impl DependencyResolver for FactoryMethodResolver {
    fn resolve(
        &self,
        declarations: &[ComponentDeclaration],
    ) -> Result<Vec<Arc<DependencyContext>>, ResolutionError> {
        let mut contexts = Vec::new();
        let mut failures = Vec::new();

        for declaration in declarations {
            for factory in &declaration.factories {
                if factory.provides == declaration.component_key {
                    failures.push(ResolutionFailure::DuplicateCandidate {
                        key: factory.provides.clone(),
                        origin: factory.origin.clone(),
                    });
                    continue;
                }

                let mut parameters = factory.parameters.clone();
                parameters.push(DeclaredDependency::immediate(
                    declaration.component_key.clone(),
                ));

                match classify_dependencies(&factory.provides, &factory.origin, &parameters) {
                    Ok(dependency_map) => contexts.push(Arc::new(DependencyContext {
                        component_key: factory.provides.clone(),
                        dependency_map,
                        lifecycle_type: factory.lifecycle_type,
                        member_type: MemberType::Standalone,
                        strategy: BindingStrategy::Supplier(factory.supplier.clone()),
                        scope: None,
                        priority: None,
                        lazy: false,
                        origin: factory.origin.clone(),
                        process_after_initialization: false,
                        post_processor: false,
                    })),
                    Err(method_failures) => failures.extend(method_failures),
                }
            }
        }

        if !failures.is_empty() {
            return Err(ResolutionError { failures });
        }
        Ok(contexts)
    }
}
