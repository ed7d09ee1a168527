use tracing::{instrument, trace};

use crate::{
    diagnostics::{
        composite_field_without_selection, field_coordinate, leaf_field_with_selection,
        max_depth_exceeded, no_other_schemas_contain_field, requirement_cycle,
        unable_to_access_required_field, unable_to_satisfy_field_requirement, Explanation,
    },
    selection::SelectionNode,
    walker::{
        context::ValidationContext,
        path::TransitionPath,
        transition::find_transition,
        visited::{VisitedItem, VisitedSet},
    },
};

/// Checks that every field of a selection can be obtained from `from_schema`, standing on `at_type`.
/// All selections are checked, so the error holds one explanation per failing field.
#[instrument(level = "trace", skip_all, fields(
    schema = from_schema,
    type_name = at_type,
    path = %path,
    depth = visited.depth()
))]
pub(crate) fn can_satisfy<'a>(
    ctx: &ValidationContext<'a>,
    selections: &'a [SelectionNode],
    from_schema: &'a str,
    at_type: &'a str,
    path: TransitionPath<'a>,
    visited: VisitedSet<'a>,
) -> Result<(), Vec<Explanation>> {
    if visited.depth() >= ctx.options.max_depth {
        trace!("Giving up, depth limit reached");
        return Err(vec![Explanation::new(max_depth_exceeded(
            ctx.options.max_depth,
            &path.to_string(),
        ))]);
    }

    let mut failures: Vec<Explanation> = vec![];

    for selection in selections {
        if let Err(causes) = satisfy_selection(ctx, selection, from_schema, at_type, path, visited) {
            failures.push(Explanation::with_causes(
                unable_to_access_required_field(
                    at_type,
                    &selection.field_name,
                    from_schema,
                    &path.to_string(),
                ),
                causes,
            ));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

fn satisfy_selection<'a>(
    ctx: &ValidationContext<'a>,
    selection: &'a SelectionNode,
    from_schema: &'a str,
    at_type: &'a str,
    path: TransitionPath<'a>,
    visited: VisitedSet<'a>,
) -> Result<(), Vec<Explanation>> {
    let graph = ctx.graph;
    let field_name = selection.field_name.as_str();

    let Some(definition) = graph.field_definition(at_type, field_name) else {
        return Err(vec![Explanation::new(no_other_schemas_contain_field(
            at_type, field_name,
        ))]);
    };
    let output_type = definition.output_type.as_str();

    match (selection.is_leaf(), graph.is_composite_type(output_type)) {
        (true, true) => {
            return Err(vec![Explanation::new(composite_field_without_selection(
                at_type,
                field_name,
                output_type,
            ))]);
        }
        (false, false) => {
            return Err(vec![Explanation::new(leaf_field_with_selection(
                at_type,
                field_name,
                output_type,
            ))]);
        }
        (true, false) | (false, true) => {}
    }

    let field_schema = if graph.is_resolvable_in(at_type, field_name, from_schema) {
        resolve_field_in_schema(
            ctx,
            at_type,
            field_name,
            from_schema,
            from_schema,
            path,
            visited,
        )?;
        from_schema
    } else {
        find_transition(ctx, at_type, field_name, from_schema, path, visited)?.schema
    };

    if selection.is_leaf() {
        return Ok(());
    }

    let path = path.advance(ctx.arena, field_schema, at_type, field_name, output_type);
    can_satisfy(
        ctx,
        &selection.selections,
        field_schema,
        output_type,
        path,
        visited,
    )
}

/// Resolves the `@require` selection of a field `field_schema` resolves,
/// starting from `origin_schema`, where the query currently stands.
/// A field already being resolved higher up in the chain is a cycle.
#[instrument(level = "trace", skip_all, fields(
    coordinate = format!("{}:{}.{}", field_schema, type_name, field_name),
    origin = origin_schema
))]
pub(crate) fn resolve_field_in_schema<'a>(
    ctx: &ValidationContext<'a>,
    type_name: &'a str,
    field_name: &'a str,
    field_schema: &'a str,
    origin_schema: &'a str,
    path: TransitionPath<'a>,
    visited: VisitedSet<'a>,
) -> Result<(), Vec<Explanation>> {
    let Some(field) = ctx.graph.field(type_name, field_name, field_schema) else {
        return Ok(());
    };
    let Some(requirement) = field.source.requirement.as_ref() else {
        return Ok(());
    };

    let item = VisitedItem::Requirement {
        schema: field_schema,
        type_name,
        field_name,
    };

    if visited.contains(&item) {
        trace!("Cycle detected, field is already being resolved");
        return Err(vec![Explanation::new(requirement_cycle(
            &visited.cycle(&item),
        ))]);
    }

    can_satisfy(
        ctx,
        requirement.selection.nodes(),
        origin_schema,
        type_name,
        path,
        visited.with(ctx.arena, item),
    )
    .map_err(|causes| {
        vec![Explanation::with_causes(
            unable_to_satisfy_field_requirement(
                &requirement.selection,
                &field_coordinate(
                    field_schema,
                    type_name,
                    field_name,
                    &field.definition.output_type,
                ),
            ),
            causes,
        )]
    })
}
