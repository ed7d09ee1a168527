pub(crate) mod context;
mod lookup_arguments;
mod node_identification;
pub(crate) mod path;
pub(crate) mod requirement;
pub(crate) mod transition;
pub(crate) mod visited;

use std::collections::{HashSet, VecDeque};

use bumpalo::Bump;
use serde_json::json;
use tracing::{debug, instrument, trace};

use crate::{
    config::SatisfiabilityOptions,
    diagnostics::{unable_to_access_field, Explanation},
    graph::{FieldDefinition, FieldFlags, SchemaGraph, TypeKind},
    log::{CompositionLog, LogEntry, LogEntryCode},
};
use context::ValidationContext;
use lookup_arguments::check_lookup_arguments;
use node_identification::check_node_lookups;
use path::TransitionPath;
use requirement::resolve_field_in_schema;
use transition::find_transition;
use visited::VisitedSet;

/// A composite type, as seen by one source schema, and how the walk got there.
type WorkItem<'a> = (&'a str, &'a str, TransitionPath<'a>);

/// Proves that every field of the composite schema can be reached from every source schema
/// that leads to its type. The graph is only read, so one graph can be validated from
/// many threads at the same time.
pub struct SatisfiabilityValidator<'a> {
    graph: &'a SchemaGraph,
    options: SatisfiabilityOptions,
}

impl<'a> SatisfiabilityValidator<'a> {
    pub fn new(graph: &'a SchemaGraph) -> Self {
        Self::with_options(graph, SatisfiabilityOptions::default())
    }

    pub fn with_options(graph: &'a SchemaGraph, options: SatisfiabilityOptions) -> Self {
        Self { graph, options }
    }

    /// Runs all checks and returns every entry, warnings included.
    #[instrument(level = "trace", skip_all, fields(schemas = self.graph.schemas().len()))]
    pub fn run(&self) -> CompositionLog {
        let arena = Bump::new();
        let ctx = ValidationContext::new(self.graph, &self.options, &arena);
        let mut log = CompositionLog::default();

        check_lookup_arguments(&ctx, &mut log);

        if self.options.enable_global_object_identification {
            check_node_lookups(&ctx, &mut log);
        }

        walk(&ctx, &mut log);

        debug!(
            entries = log.len(),
            errors = log.errors().count(),
            "satisfiability validation finished"
        );

        log
    }

    /// Fails when at least one error was logged, warnings alone pass.
    pub fn validate(&self) -> Result<(), CompositionLog> {
        let log = self.run();

        if log.has_errors() {
            Err(log)
        } else {
            Ok(())
        }
    }
}

pub fn validate_satisfiability(
    graph: &SchemaGraph,
    options: &SatisfiabilityOptions,
) -> Result<(), CompositionLog> {
    SatisfiabilityValidator::with_options(graph, options.clone()).validate()
}

/// Breadth-first walk over (type, schema) pairs, starting at the root types of every schema.
/// Each pair is walked once, through the first path that reaches it.
#[instrument(level = "trace", skip_all)]
fn walk<'a>(ctx: &ValidationContext<'a>, log: &mut CompositionLog) {
    let graph = ctx.graph;
    let mut seen: HashSet<(&'a str, &'a str)> = HashSet::new();
    let mut queue: VecDeque<WorkItem<'a>> = VecDeque::new();

    for (_, root_type) in graph.root_types().iter() {
        for schema in graph.contributing_schemas(root_type) {
            if seen.insert((root_type, schema)) {
                queue.push_back((root_type, schema, TransitionPath::default()));
            }
        }
    }

    while let Some((type_name, schema, path)) = queue.pop_front() {
        for (next_type, next_schema, next_path) in walk_type(ctx, type_name, schema, path, log) {
            if seen.insert((next_type, next_schema)) {
                queue.push_back((next_type, next_schema, next_path));
            } else {
                trace!("Already walked '{}' in schema '{}'", next_type, next_schema);
            }
        }
    }
}

/// Checks the fields of one type in one schema, returns the types to walk next.
#[instrument(level = "trace", skip_all, fields(type_name = type_name, schema = schema, path = %path))]
fn walk_type<'a>(
    ctx: &ValidationContext<'a>,
    type_name: &'a str,
    schema: &'a str,
    path: TransitionPath<'a>,
    log: &mut CompositionLog,
) -> Vec<WorkItem<'a>> {
    let graph = ctx.graph;
    let mut next: Vec<WorkItem<'a>> = vec![];

    let Some(definition) = graph.definition(type_name) else {
        return next;
    };

    let is_root = graph.root_types().iter().any(|(_, root)| root == type_name);

    match definition.kind {
        TypeKind::Object | TypeKind::Interface => {
            for field in definition.fields.values() {
                if !field.is_public() {
                    continue;
                }

                // Root fields are entry points, only the schema's own public ones are reachable.
                if is_root && !is_entry_point(graph, type_name, &field.name, schema) {
                    continue;
                }

                match access_field(ctx, type_name, field, schema, path) {
                    Ok(target) => {
                        let output_type = field.output_type.as_str();

                        if graph.is_composite_type(output_type)
                            && graph.is_defined_in(output_type, target)
                        {
                            next.push((
                                output_type,
                                target,
                                path.advance(ctx.arena, target, type_name, &field.name, output_type),
                            ));
                        }
                    }
                    Err(causes) => {
                        log_unreachable_field(ctx, log, type_name, field, schema, path, causes)
                    }
                }
            }
        }
        TypeKind::Union => {}
        TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => return next,
    }

    for possible_type in graph.possible_types_in(type_name, schema) {
        next.push((possible_type, schema, path));
    }

    next
}

fn is_entry_point(graph: &SchemaGraph, type_name: &str, field_name: &str, schema: &str) -> bool {
    graph
        .field(type_name, field_name, schema)
        .is_some_and(|field| {
            field.source.is_resolvable()
                && !field
                    .source
                    .flags
                    .intersects(FieldFlags::INTERNAL | FieldFlags::INACCESSIBLE)
        })
}

/// Returns the schema that ends up resolving the field.
fn access_field<'a>(
    ctx: &ValidationContext<'a>,
    type_name: &'a str,
    field: &'a FieldDefinition,
    schema: &'a str,
    path: TransitionPath<'a>,
) -> Result<&'a str, Vec<Explanation>> {
    let graph = ctx.graph;

    if graph.is_resolvable_in(type_name, &field.name, schema) {
        resolve_field_in_schema(
            ctx,
            type_name,
            &field.name,
            schema,
            schema,
            path,
            VisitedSet::default(),
        )?;

        return Ok(schema);
    }

    let transition = find_transition(
        ctx,
        type_name,
        &field.name,
        schema,
        path,
        VisitedSet::default(),
    )?;
    trace!(
        "'{}.{}' is resolved by '{}' through '{}'",
        type_name,
        field.name,
        transition.schema,
        transition.lookup
    );

    Ok(transition.schema)
}

fn log_unreachable_field<'a>(
    ctx: &ValidationContext<'a>,
    log: &mut CompositionLog,
    type_name: &str,
    field: &FieldDefinition,
    schema: &str,
    path: TransitionPath<'a>,
    causes: Vec<Explanation>,
) {
    let rendered_path = path.to_string();
    let explanation = Explanation::with_causes(
        unable_to_access_field(type_name, &field.name, schema, &rendered_path),
        causes,
    );

    let segments: Vec<String> = path
        .segments(ctx.arena)
        .iter()
        .map(|segment| segment.to_string())
        .collect();

    debug!(
        "'{}.{}' is not reachable from schema '{}'",
        type_name, field.name, schema
    );

    log.push(
        LogEntry::error(LogEntryCode::Unsatisfiable, explanation.to_string()).with_extension(
            json!({
                "type": type_name,
                "field": field.name,
                "schema": schema,
                "path": segments,
            }),
        ),
    );
}
