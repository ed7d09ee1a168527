use std::error::Error;

use crate::{
    tests::testkit::{build_graph, init_logger, run},
    SchemaGraph, SchemaGraphError,
};

/// `S0` lists products, every other schema adds fields behind a lookup keyed by a field
/// only those schemas have.
fn foreign_key_graph(schemas: usize) -> Result<SchemaGraph, SchemaGraphError> {
    let mut sources: Vec<(String, String)> = vec![(
        "S0".to_string(),
        r#"
        type Query { products: [Product] }
        type Product { name: String }
        "#
        .to_string(),
    )];

    for i in 1..=schemas {
        sources.push((
            format!("S{}", i),
            r#"
            type Query { productByZ(z: String!): Product @lookup }
            type Product { z: String! price: Float }
            "#
            .to_string(),
        ));
    }

    let sources: Vec<(&str, &str)> = sources
        .iter()
        .map(|(name, sdl)| (name.as_str(), sdl.as_str()))
        .collect();

    build_graph(&sources)
}

#[test]
fn key_only_reachable_through_its_own_lookups() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = foreign_key_graph(2)?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @r"
    Unable to access the field 'Product.z' on path 'S0:Query.products<Product>'.
      Unable to transition between schemas 'S0' and 'S1' for access to field 'S1:Product.z<String>'.
        Unable to satisfy the requirement '{ z }' for lookup 'productByZ' in schema 'S1'.
          Unable to access the required field 'Product.z' on path 'S0:Query.products<Product>'.
            Cycle detected while accessing the field 'Product.z' from schema 'S0'.
      Unable to transition between schemas 'S0' and 'S2' for access to field 'S2:Product.z<String>'.
        Unable to satisfy the requirement '{ z }' for lookup 'productByZ' in schema 'S2'.
          Unable to access the required field 'Product.z' on path 'S0:Query.products<Product>'.
            Cycle detected while accessing the field 'Product.z' from schema 'S0'.

    Unable to access the field 'Product.price' on path 'S0:Query.products<Product>'.
      Unable to transition between schemas 'S0' and 'S1' for access to field 'S1:Product.price<Float>'.
        Unable to satisfy the requirement '{ z }' for lookup 'productByZ' in schema 'S1'.
          Unable to access the required field 'Product.z' on path 'S0:Query.products<Product>'.
            Unable to transition between schemas 'S0' and 'S1' for access to field 'S1:Product.z<String>'.
              Lookup 'productByZ' in schema 'S1' is already being resolved on this path.
            Unable to transition between schemas 'S0' and 'S2' for access to field 'S2:Product.z<String>'.
              Unable to satisfy the requirement '{ z }' for lookup 'productByZ' in schema 'S2'.
                Unable to access the required field 'Product.z' on path 'S0:Query.products<Product>'.
                  Cycle detected while accessing the field 'Product.z' from schema 'S0'.
      Unable to transition between schemas 'S0' and 'S2' for access to field 'S2:Product.price<Float>'.
        Unable to satisfy the requirement '{ z }' for lookup 'productByZ' in schema 'S2'.
          Unable to access the required field 'Product.z' on path 'S0:Query.products<Product>'.
            Unable to transition between schemas 'S0' and 'S1' for access to field 'S1:Product.z<String>'.
              Unable to satisfy the requirement '{ z }' for lookup 'productByZ' in schema 'S1'.
                Unable to access the required field 'Product.z' on path 'S0:Query.products<Product>'.
                  Cycle detected while accessing the field 'Product.z' from schema 'S0'.
            Unable to transition between schemas 'S0' and 'S2' for access to field 'S2:Product.z<String>'.
              Lookup 'productByZ' in schema 'S2' is already being resolved on this path.

    Unable to access the field 'Product.name' on path 'S1:Query.productByZ<Product>'.
      No lookups found for type 'Product' in schema 'S0'.

    Unable to access the field 'Product.name' on path 'S2:Query.productByZ<Product>'.
      No lookups found for type 'Product' in schema 'S0'.
    ");

    Ok(())
}

#[test]
fn report_stays_small_with_many_schemas() -> Result<(), Box<dyn Error>> {
    init_logger();
    let schemas = 9;
    let graph = foreign_key_graph(schemas)?;
    let log = run(&graph);

    assert!(log.has_errors());
    // z and price from S0, then name from every other schema
    assert_eq!(log.len(), 2 + schemas);
    assert!(log.to_string().len() < 200_000);

    Ok(())
}
