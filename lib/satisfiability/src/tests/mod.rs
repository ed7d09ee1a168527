mod abstract_types;
mod lookups;
mod requires_circular;
mod transitions;

use std::error::Error;

use crate::tests::testkit::{init_logger, read_source_schemas};
use crate::{validate_satisfiability, SatisfiabilityOptions, SchemaGraph};

#[test]
fn products_fixture_is_satisfiable() -> Result<(), Box<dyn Error>> {
    init_logger();
    let sources = read_source_schemas("fixture/products");
    let graph = SchemaGraph::from_source_schemas(&sources)?;

    assert_eq!(
        graph.schemas(),
        ["accounts", "inventory", "products", "reviews"]
    );
    assert!(validate_satisfiability(&graph, &SatisfiabilityOptions::default()).is_ok());

    Ok(())
}

#[test]
fn validation_is_repeatable_and_thread_safe() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = testkit::build_graph(&[
        (
            "A",
            r#"
            type Query { productById(id: ID!): Product @lookup }
            type Product { id: ID! name: String! }
            "#,
        ),
        (
            "B",
            r#"
            type Query { products: [Product] }
            type Product { id: ID! price: Float! }
            "#,
        ),
    ])?;

    let first = testkit::run(&graph);
    let second = testkit::run(&graph);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);

    let rendered: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| testkit::run(&graph).to_string()))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_default())
            .collect()
    });

    for log in rendered {
        assert_eq!(log, first.to_string());
    }

    Ok(())
}
