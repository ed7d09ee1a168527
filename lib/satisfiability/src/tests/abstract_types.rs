use std::error::Error;

use crate::{
    tests::testkit::{build_graph, init_logger, run},
    SchemaGraph, SchemaGraphError,
};

#[test]
fn interface_member_with_a_type_specific_lookup() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query { animals: [Animal] }
            interface Animal { id: ID! }
            type Cat implements Animal { id: ID! }
            "#,
        ),
        (
            "B",
            r#"
            type Query { catById(id: ID!): Cat @lookup }
            type Cat { id: ID! age: Int }
            "#,
        ),
    ])?;
    let log = run(&graph);

    assert!(log.is_empty(), "{}", log);

    Ok(())
}

#[test]
fn member_is_entered_through_an_interface_lookup() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query { cats: [Cat] }
            type Cat { id: ID! }
            "#,
        ),
        (
            "B",
            r#"
            type Query { animalById(id: ID!): Animal @lookup }
            interface Animal { id: ID! }
            type Cat implements Animal { id: ID! age: Int }
            "#,
        ),
    ])?;
    let log = run(&graph);

    assert!(log.is_empty(), "{}", log);

    Ok(())
}

#[test]
fn union_member_without_lookup() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = build_graph(&[
        (
            "A",
            r#"
            type Query {
              search: [SearchResult]
              bookById(id: ID!): Book @lookup
            }
            union SearchResult = Book | Movie
            type Book { id: ID! title: String }
            type Movie { id: ID! }
            "#,
        ),
        (
            "B",
            r#"
            type Query { bookById(id: ID!): Book @lookup }
            type Book { id: ID! author: String }
            type Movie { id: ID! director: String }
            "#,
        ),
    ])?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @r"
    Unable to access the field 'Movie.director' on path 'A:Query.search<SearchResult>'.
      No lookups found for type 'Movie' in schema 'B'.
    ");

    Ok(())
}

fn interface_field_graph(query_in_b: &str) -> Result<SchemaGraph, SchemaGraphError> {
    let schema_b = format!(
        r#"
        type Query {{ {} }}
        interface Animal {{ id: ID! name: String }}
        type Cat implements Animal {{ id: ID! name: String }}
        "#,
        query_in_b
    );

    build_graph(&[
        (
            "A",
            r#"
            type Query { animals: [Animal] }
            interface Animal { id: ID! }
            type Cat implements Animal { id: ID! }
            "#,
        ),
        ("B", schema_b.as_str()),
    ])
}

#[test]
fn interface_field_through_a_member_lookup() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = interface_field_graph("catById(id: ID!): Cat @lookup")?;
    let log = run(&graph);

    assert!(log.is_empty(), "{}", log);

    Ok(())
}

#[test]
fn interface_field_without_member_lookups() -> Result<(), Box<dyn Error>> {
    init_logger();
    let graph = interface_field_graph("version: String")?;
    let log = run(&graph);

    insta::assert_snapshot!(format!("{}", log), @r"
    Unable to access the field 'Animal.name' on path 'A:Query.animals<Animal>'.
      No lookups found for type 'Animal' in schema 'B'.

    Unable to access the field 'Cat.name' on path 'A:Query.animals<Animal>'.
      No lookups found for type 'Cat' in schema 'B'.
    ");

    Ok(())
}
