use std::error::Error;

use serde_json::json;

use crate::{
    tests::testkit::{build_graph, init_logger, run},
    LogEntryCode, LogSeverity,
};

#[test]
fn shared_entity_without_lookups() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query { userById(id: ID!): User }
            type User { id: ID! @shareable name: String }
            "#,
        ),
        (
            "B",
            r#"
            type Query { users: [User!]! }
            type User { id: ID! @shareable membershipStatus: String }
            "#,
        ),
    ])?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @r"
    Unable to access the field 'User.membershipStatus' on path 'A:Query.userById<User>'.
      No lookups found for type 'User' in schema 'B'.

    Unable to access the field 'User.name' on path 'B:Query.users<User>'.
      No lookups found for type 'User' in schema 'A'.
    ");

    let first = &log.entries()[0];
    assert_eq!(first.code, LogEntryCode::Unsatisfiable);
    assert_eq!(first.severity, LogSeverity::Error);
    assert_eq!(
        first.extension,
        Some(json!({
            "type": "User",
            "field": "membershipStatus",
            "schema": "A",
            "path": ["A:Query.userById<User>"],
        }))
    );

    Ok(())
}

#[test]
fn lookup_key_needs_a_field_only_the_target_has() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query { productByIdAndSku(id: ID!, sku: String!): Product @lookup }
            type Product { id: ID! sku: String! name: String! }
            "#,
        ),
        (
            "B",
            r#"
            type Query { productById(id: ID!): Product @lookup }
            type Product { id: ID! }
            "#,
        ),
    ])?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @r"
    Unable to access the field 'Product.sku' on path 'B:Query.productById<Product>'.
      Unable to transition between schemas 'B' and 'A' for access to field 'A:Product.sku<String>'.
        Unable to satisfy the requirement '{ id sku }' for lookup 'productByIdAndSku' in schema 'A'.
          Unable to access the required field 'Product.sku' on path 'B:Query.productById<Product>'.
            Cycle detected while accessing the field 'Product.sku' from schema 'B'.

    Unable to access the field 'Product.name' on path 'B:Query.productById<Product>'.
      Unable to transition between schemas 'B' and 'A' for access to field 'A:Product.name<String>'.
        Unable to satisfy the requirement '{ id sku }' for lookup 'productByIdAndSku' in schema 'A'.
          Unable to access the required field 'Product.sku' on path 'B:Query.productById<Product>'.
            Unable to transition between schemas 'B' and 'A' for access to field 'A:Product.sku<String>'.
              Lookup 'productByIdAndSku' in schema 'A' is already being resolved on this path.
    ");

    Ok(())
}

#[test]
fn key_is_collected_through_a_third_schema() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
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
            type Query { productBySku(sku: String!): Product @lookup }
            type Product { sku: String! price: Float! }
            "#,
        ),
        (
            "C",
            r#"
            type Query {
              productById(id: ID!): Product @lookup
              productBySku(sku: String!): Product @lookup
            }
            type Product { id: ID! sku: String! }
            "#,
        ),
    ])?;
    let log = run(&graph);

    assert!(log.is_empty(), "{}", log);

    Ok(())
}

#[test]
fn internal_lookups_are_used_for_transitions() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query { lookups: InternalLookups! }
            type InternalLookups @internal {
              productById(id: ID!): Product @lookup
            }
            type Product { id: ID! name: String! }
            "#,
        ),
        (
            "B",
            r#"
            type Query { products: [Product] }
            type Product { id: ID! }
            "#,
        ),
    ])?;
    let log = run(&graph);

    assert!(log.is_empty(), "{}", log);

    Ok(())
}

#[test]
fn internal_and_inaccessible_fields_are_not_walked() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query { productById(id: ID!): Product @lookup }
            type Product { id: ID! name: String }
            "#,
        ),
        (
            "B",
            r#"
            type Query { products: [Product] }
            type Product {
              id: ID!
              secret: String @inaccessible
              hidden: String @internal
              price: Float
            }
            "#,
        ),
    ])?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @r"
    Unable to access the field 'Product.price' on path 'A:Query.productById<Product>'.
      No lookups found for type 'Product' in schema 'B'.
    ");

    Ok(())
}

#[test]
fn unmapped_lookup_argument_is_a_warning() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[(
        "A",
        r#"
        type Query { productBySku(sku: String! @is(field: "code")): Product @lookup }
        type Product { id: ID! sku: String! }
        "#,
    )])?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @"The argument 'sku' of lookup 'productBySku' in schema 'A' does not map to a field of type 'Product'.");
    assert!(!log.has_errors());
    assert_eq!(log.warnings().count(), 1);
    assert_eq!(log.entries()[0].code, LogEntryCode::LookupArgumentUnmapped);

    Ok(())
}
