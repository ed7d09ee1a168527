use std::error::Error;

use crate::{
    tests::testkit::{build_graph, init_logger, run},
    LogEntryCode,
};

#[test]
fn requirements_depending_on_each_other() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query { productById(id: ID!): Product @lookup }
            type Product {
              id: ID!
              a(b: String @require(field: "b")): String
            }
            "#,
        ),
        (
            "B",
            r#"
            type Query { productById(id: ID!): Product @lookup }
            type Product {
              id: ID!
              b(a: String @require(field: "a")): String
            }
            "#,
        ),
    ])?;
    let log = run(&graph);

    assert!(log.has_errors());
    assert!(log
        .iter()
        .all(|entry| entry.code == LogEntryCode::Unsatisfiable));

    let first = &log.entries()[0];
    assert!(first
        .message
        .starts_with("Unable to access the field 'Product.a' on path 'A:Query.productById<Product>'."));
    assert!(first
        .message
        .contains("Cycle detected in requirement: A:Product.a -> B:Product.b -> A:Product.a."));

    assert!(log.iter().any(|entry| entry
        .message
        .contains("Cycle detected in requirement: B:Product.b -> A:Product.a -> B:Product.b.")));

    Ok(())
}

#[test]
fn field_requiring_itself() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[(
        "A",
        r#"
        type Query { product: Product }
        type Product {
          id: ID!
          price(total: Float @require(field: "price")): Float
        }
        "#,
    )])?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @r"
    Unable to access the field 'Product.price' on path 'A:Query.product<Product>'.
      Unable to satisfy the requirement '{ price }' on field 'A:Product.price<Float>'.
        Unable to access the required field 'Product.price' on path 'A:Query.product<Product>'.
          Cycle detected in requirement: A:Product.price -> A:Product.price.
    ");

    Ok(())
}
