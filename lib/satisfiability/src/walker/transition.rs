use tracing::{instrument, trace};

use crate::{
    diagnostics::{
        field_coordinate, lookup_in_progress, no_lookups_found, no_other_schemas_contain_field,
        transition_cycle, unable_to_satisfy_lookup_requirement, unable_to_transition, Explanation,
    },
    graph::{FieldDefinition, Lookup, SchemaGraph},
    walker::{
        context::ValidationContext,
        path::TransitionPath,
        requirement::{can_satisfy, resolve_field_in_schema},
        visited::{VisitedItem, VisitedSet},
    },
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Transition<'a> {
    /// The schema that resolves the field once the transition is done.
    pub schema: &'a str,
    pub lookup: &'a Lookup,
}

/// Looks for a lookup that moves the query from `from_schema` into a schema able to
/// resolve `type_name.field_name`. Schemas are tried in the order they contribute the field,
/// the first usable lookup wins.
/// Fetching the same field from the same schema again further down the chain is a cycle.
#[instrument(level = "trace", skip_all, fields(
    coordinate = format!("{}.{}", type_name, field_name),
    from = from_schema,
    path = %path
))]
pub(crate) fn find_transition<'a>(
    ctx: &ValidationContext<'a>,
    type_name: &'a str,
    field_name: &'a str,
    from_schema: &'a str,
    path: TransitionPath<'a>,
    visited: VisitedSet<'a>,
) -> Result<Transition<'a>, Vec<Explanation>> {
    let graph = ctx.graph;
    let item = VisitedItem::Transition {
        schema: from_schema,
        type_name,
        field_name,
    };

    if visited.contains(&item) {
        trace!("Cycle detected, field is already being fetched from this schema");
        return Err(vec![Explanation::new(transition_cycle(
            type_name,
            field_name,
            from_schema,
        ))]);
    }
    let visited = visited.with(ctx.arena, item);

    let no_other_schemas = || {
        vec![Explanation::new(no_other_schemas_contain_field(
            type_name, field_name,
        ))]
    };

    let Some(definition) = graph.field_definition(type_name, field_name) else {
        return Err(no_other_schemas());
    };

    let targets: Vec<&'a str> = definition
        .sources
        .values()
        .filter(|source| source.schema != from_schema && source.is_resolvable())
        .map(|source| source.schema.as_str())
        .collect();

    if targets.is_empty() {
        return Err(no_other_schemas());
    }

    let mut failures: Vec<Explanation> = Vec::with_capacity(targets.len());

    for target in targets {
        match transition_to(ctx, definition, type_name, from_schema, target, path, visited) {
            Ok(lookup) => {
                trace!(
                    "Transition found, from '{}' to '{}' through '{}'",
                    from_schema,
                    target,
                    lookup
                );
                return Ok(Transition {
                    schema: target,
                    lookup,
                });
            }
            Err(explanation) => failures.push(explanation),
        }
    }

    Err(failures)
}

fn transition_to<'a>(
    ctx: &ValidationContext<'a>,
    definition: &'a FieldDefinition,
    type_name: &'a str,
    from_schema: &'a str,
    target: &'a str,
    path: TransitionPath<'a>,
    visited: VisitedSet<'a>,
) -> Result<&'a Lookup, Explanation> {
    let coordinate = || {
        field_coordinate(
            target,
            type_name,
            &definition.name,
            &definition.output_type,
        )
    };

    // Requirements of the target field are resolved from where the query currently stands
    if let Err(causes) = resolve_field_in_schema(
        ctx,
        type_name,
        &definition.name,
        target,
        from_schema,
        path,
        visited,
    ) {
        return Err(Explanation::with_causes(
            unable_to_transition(from_schema, target, &coordinate()),
            causes,
        ));
    }

    let candidates = lookup_candidates(ctx.graph, type_name, target);
    if candidates.is_empty() {
        return Err(Explanation::new(no_lookups_found(type_name, target)));
    }

    let mut failures: Vec<Explanation> = vec![];

    for (at_type, lookup) in candidates {
        let item = VisitedItem::Lookup {
            schema: &lookup.schema,
            declaring_type: &lookup.declaring_type,
            field_name: &lookup.field_name,
        };

        if visited.contains(&item) {
            trace!(
                "Ignoring lookup '{}' in schema '{}', it is already in progress",
                lookup,
                lookup.schema
            );
            failures.push(Explanation::new(lookup_in_progress(
                &lookup.to_string(),
                &lookup.schema,
            )));
            continue;
        }

        match can_satisfy(
            ctx,
            lookup.key.nodes(),
            from_schema,
            at_type,
            path,
            visited.with(ctx.arena, item),
        ) {
            Ok(()) => return Ok(lookup),
            Err(causes) => failures.push(Explanation::with_causes(
                unable_to_satisfy_lookup_requirement(&lookup.key, &lookup.to_string(), target),
                causes,
            )),
        }
    }

    Err(Explanation::with_causes(
        unable_to_transition(from_schema, target, &coordinate()),
        failures,
    ))
}

/// Lookups of `target` able to resolve `type_name`, each with the type its key is read on.
/// An abstract type can also be entered through lookups of its possible types.
/// Public lookups are tried before internal ones.
fn lookup_candidates<'a>(
    graph: &'a SchemaGraph,
    type_name: &'a str,
    target: &'a str,
) -> Vec<(&'a str, &'a Lookup)> {
    let mut candidates: Vec<(&'a str, &'a Lookup)> = graph
        .lookups(type_name, target)
        .into_iter()
        .map(|lookup| (type_name, lookup))
        .collect();

    for possible_type in graph
        .possible_types_in(type_name, target)
        .into_iter()
        .filter(|possible_type| graph.has_lookups_in(possible_type, target))
    {
        for lookup in graph.lookups(possible_type, target) {
            if !candidates.iter().any(|(_, l)| std::ptr::eq(*l, lookup)) {
                candidates.push((possible_type, lookup));
            }
        }
    }

    candidates.sort_by_key(|(_, lookup)| lookup.internal);
    candidates
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use bumpalo::Bump;

    use super::find_transition;
    use crate::{
        tests::testkit::{build_graph, init_logger},
        walker::{context::ValidationContext, path::TransitionPath, visited::VisitedSet},
        SatisfiabilityOptions,
    };

    #[test]
    fn public_lookup_is_preferred_over_internal_one() -> Result<(), Box<dyn Error>> {
        init_logger();
        let graph = build_graph(&[
            (
                "A",
                r#"
                type Query {
                  internalProductById(id: ID!): Product @lookup @internal
                  productById(id: ID!): Product @lookup
                }
                type Product { id: ID! name: String }
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
        let options = SatisfiabilityOptions::default();
        let arena = Bump::new();
        let ctx = ValidationContext::new(&graph, &options, &arena);

        let transition = find_transition(
            &ctx,
            "Product",
            "name",
            "B",
            TransitionPath::default(),
            VisitedSet::default(),
        )
        .map_err(|causes| format!("{:?}", causes))?;

        insta::assert_snapshot!(
            format!("{} in {}", transition.lookup, transition.schema),
            @"productById in A"
        );

        Ok(())
    }
}
