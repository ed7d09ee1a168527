use serde_json::json;
use tracing::instrument;

use crate::{
    diagnostics::lookup_argument_unmapped,
    graph::SchemaGraph,
    log::{CompositionLog, LogEntry, LogEntryCode},
    selection::SelectionNode,
    walker::context::ValidationContext,
};

/// Warns about lookup arguments whose mapping names a field the returned type
/// does not have in the lookup's schema.
#[instrument(level = "trace", skip_all)]
pub(crate) fn check_lookup_arguments(ctx: &ValidationContext<'_>, log: &mut CompositionLog) {
    let graph = ctx.graph;

    for lookup in graph.all_lookups() {
        for argument in lookup.arguments.iter() {
            if maps_to_fields(graph, argument.field.nodes(), &lookup.type_name, &lookup.schema) {
                continue;
            }

            log.push(
                LogEntry::warning(
                    LogEntryCode::LookupArgumentUnmapped,
                    lookup_argument_unmapped(
                        &argument.name,
                        &lookup.to_string(),
                        &lookup.schema,
                        &lookup.type_name,
                    ),
                )
                .with_extension(json!({
                    "lookup": lookup.to_string(),
                    "argument": argument.name,
                    "schema": lookup.schema,
                    "type": lookup.type_name,
                })),
            );
        }
    }
}

fn maps_to_fields(
    graph: &SchemaGraph,
    selections: &[SelectionNode],
    type_name: &str,
    schema: &str,
) -> bool {
    selections.iter().all(|selection| {
        match graph.field(type_name, &selection.field_name, schema) {
            Some(field) => {
                selection.is_leaf()
                    || maps_to_fields(
                        graph,
                        &selection.selections,
                        &field.definition.output_type,
                        schema,
                    )
            }
            None => false,
        }
    })
}
