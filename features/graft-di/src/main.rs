use graft_di::{
    ComponentContainer, ComponentDeclaration, ComponentInstance, ComponentKey, DeclaredDependency,
    DeclaredProvider, GraphInitiator, Origin,
};

#[derive(Debug)]
struct AppConfig {
    database_url: String,
}

struct Repository;
struct AuditLog;

fn main() {
    let declarations = vec![
        ComponentDeclaration::new(ComponentKey::of::<AppConfig>())
            .provider(DeclaredProvider::Instance(ComponentInstance::new(AppConfig {
                database_url: "sqlite://demo".to_string(),
            })))
            .origin(Origin::new("demo::AppConfig")),
        ComponentDeclaration::new(ComponentKey::of::<Repository>())
            .depends_on(DeclaredDependency::immediate(ComponentKey::of::<AppConfig>()))
            .origin(Origin::new("demo::Repository")),
        // Reaches the repository only lazily, so it may sit anywhere in the graph
        ComponentDeclaration::new(ComponentKey::of::<AuditLog>())
            .depends_on(DeclaredDependency::delayed(ComponentKey::of::<Repository>()))
            .origin(Origin::new("demo::AuditLog")),
    ];

    let mut container = ComponentContainer::new();
    let graph = GraphInitiator::default()
        .initialize(&declarations, &mut container)
        .unwrap();

    println!(
        "registered {} providers over {} graph nodes",
        container.len(),
        graph.len()
    );
    for (key, binding) in container.bindings() {
        println!("  {key} -> {:?}", binding.provider);
    }
}
