use serde_json::json;
use tracing::{instrument, trace};

use crate::{
    diagnostics::node_type_without_lookup,
    graph::TypeKind,
    log::{CompositionLog, LogEntry, LogEntryCode},
    walker::context::ValidationContext,
};

/// Every object type implementing the node interface has to be resolvable by its `id`
/// through a lookup of at least one source schema.
#[instrument(level = "trace", skip_all, fields(interface = ctx.options.node_interface_name))]
pub(crate) fn check_node_lookups(ctx: &ValidationContext<'_>, log: &mut CompositionLog) {
    let graph = ctx.graph;
    let interface = ctx.options.node_interface_name.as_str();

    if graph.type_kind(interface) != Some(TypeKind::Interface) {
        trace!("No '{}' interface in the composite schema", interface);
        return;
    }

    for type_name in graph.implementing_types(interface) {
        let has_lookup_by_id = graph.contributing_schemas(type_name).any(|schema| {
            graph
                .lookups(type_name, schema)
                .iter()
                .any(|lookup| lookup.is_by_id())
        });

        if !has_lookup_by_id {
            log.push(
                LogEntry::error(
                    LogEntryCode::NodeTypeWithoutLookup,
                    node_type_without_lookup(type_name, interface),
                )
                .with_extension(json!({
                    "type": type_name,
                    "interface": interface,
                })),
            );
        }
    }
}
