use crate::types::{
    ComponentInstance, ComponentKey, LifecycleType, MemberType, Origin, ResolutionType, ScopeId,
    SupplierFn, TypeInfo,
};

/// One declared dependency edge of a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub key: ComponentKey,
    pub resolution: ResolutionType,
}
impl DeclaredDependency {
    pub fn immediate(key: ComponentKey) -> DeclaredDependency {
        DeclaredDependency {
            key,
            resolution: ResolutionType::Immediate,
        }
    }

    pub fn delayed(key: ComponentKey) -> DeclaredDependency {
        DeclaredDependency {
            key,
            resolution: ResolutionType::Delayed,
        }
    }
}

/// How a declared candidate provides its value
#[derive(Clone)]
pub enum DeclaredProvider {
    /// Construct through the declared implementation type (or the key's own
    /// type when no implementation is named)
    Constructor,
    /// An already constructed value
    Instance(ComponentInstance),
    /// An opaque supplier closure
    Supplier(SupplierFn),
}

/// A factory method on a declared component, producing another component.
///
/// The produced component implicitly requires the owning component to exist
/// first; its parameters are ordinary immediate dependencies.
#[derive(Clone)]
pub struct FactoryMethod {
    pub provides: ComponentKey,
    pub lifecycle_type: LifecycleType,
    pub parameters: Vec<DeclaredDependency>,
    pub supplier: SupplierFn,
    pub origin: Origin,
}

/// Read-only description of one component candidate, supplied by whatever
/// metadata source feeds the engine.
#[derive(Clone)]
pub struct ComponentDeclaration {
    pub component_key: ComponentKey,
    pub implementation: Option<TypeInfo>,
    pub lifecycle_type: LifecycleType,
    pub member_type: MemberType,
    pub provider: DeclaredProvider,
    pub dependencies: Vec<DeclaredDependency>,
    pub factories: Vec<FactoryMethod>,
    pub scope: Option<ScopeId>,
    pub priority: Option<i32>,
    pub lazy: bool,
    pub origin: Origin,
    pub process_after_initialization: bool,
    pub post_processor: bool,
}

impl ComponentDeclaration {
    pub fn new(component_key: ComponentKey) -> ComponentDeclaration {
        ComponentDeclaration {
            component_key,
            implementation: None,
            lifecycle_type: LifecycleType::Singleton,
            member_type: MemberType::Standalone,
            provider: DeclaredProvider::Constructor,
            dependencies: Vec::new(),
            factories: Vec::new(),
            scope: None,
            priority: None,
            lazy: false,
            origin: Origin::unknown(),
            process_after_initialization: false,
            post_processor: false,
        }
    }

    pub fn implemented_by(mut self, implementation: TypeInfo) -> Self {
        self.implementation = Some(implementation);
        self
    }

    pub fn lifecycle(mut self, lifecycle_type: LifecycleType) -> Self {
        self.lifecycle_type = lifecycle_type;
        self
    }

    pub fn member(mut self, member_type: MemberType) -> Self {
        self.member_type = member_type;
        self
    }

    pub fn provider(mut self, provider: DeclaredProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn depends_on(mut self, dependency: DeclaredDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn factory(mut self, factory: FactoryMethod) -> Self {
        self.factories.push(factory);
        self
    }

    pub fn scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn process_after_initialization(mut self, flag: bool) -> Self {
        self.process_after_initialization = flag;
        self
    }

    pub fn post_processor(mut self, flag: bool) -> Self {
        self.post_processor = flag;
        self
    }
}

/// Source of component declarations.
///
/// Static registration tables, generated code or attribute scanners can all
/// feed the engine through this seam without it knowing the difference.
pub trait DeclarationProvider {
    fn declarations(&self) -> Vec<ComponentDeclaration>;
}

impl DeclarationProvider for Vec<ComponentDeclaration> {
    fn declarations(&self) -> Vec<ComponentDeclaration> {
        self.clone()
    }
}

impl DeclarationProvider for [ComponentDeclaration] {
    fn declarations(&self) -> Vec<ComponentDeclaration> {
        self.to_vec()
    }
}
