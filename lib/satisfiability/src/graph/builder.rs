use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use tracing::{instrument, trace};

use crate::graph::{
    error::SchemaGraphError, lookup::Lookup, FieldDefinition, FieldFlags, FieldSource,
    OperationKind, RootTypes, SchemaGraph, TypeDefinition, TypeFlags, TypeKind, TypeSource,
    BUILTIN_SCALARS,
};

/// Collects the per source schema view of every type, field and lookup,
/// and turns it into a [`SchemaGraph`] with all indices precomputed.
#[derive(Debug, Default)]
pub struct SchemaGraphBuilder {
    definitions: IndexMap<String, TypeDefinition>,
    schemas: Vec<String>,
    /// operation -> (type name, schema that declared it)
    declared_roots: HashMap<OperationKind, (String, String)>,
    lookups: Vec<Lookup>,
}

impl SchemaGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schema(&mut self, schema: &str) -> &mut Self {
        if !self.schemas.iter().any(|s| s == schema) {
            self.schemas.push(schema.to_string());
        }

        self
    }

    /// Overrides all root operation types at once.
    pub fn root_types(&mut self, root_types: RootTypes) -> &mut Self {
        self.declared_roots.clear();
        for (kind, type_name) in root_types.iter() {
            self.declared_roots
                .insert(kind, (type_name.to_string(), String::new()));
        }

        self
    }

    /// Records the root operation type a source schema declares in its `schema { }` definition.
    /// Two schemas naming different types for the same operation is an error.
    pub fn declare_root_type(
        &mut self,
        schema: &str,
        kind: OperationKind,
        type_name: &str,
    ) -> Result<&mut Self, SchemaGraphError> {
        if let Some((existing, _)) = self.declared_roots.get(&kind) {
            if existing != type_name {
                return Err(SchemaGraphError::RootTypeMismatch {
                    kind,
                    schema: schema.to_string(),
                    type_name: type_name.to_string(),
                    existing: existing.clone(),
                });
            }

            return Ok(self);
        }

        self.declared_roots
            .insert(kind, (type_name.to_string(), schema.to_string()));

        Ok(self)
    }

    pub fn add_type(
        &mut self,
        schema: &str,
        type_name: &str,
        kind: TypeKind,
    ) -> Result<&mut TypeSource, SchemaGraphError> {
        self.add_schema(schema);

        let definition = self
            .definitions
            .entry(type_name.to_string())
            .or_insert_with(|| TypeDefinition {
                name: type_name.to_string(),
                kind,
                fields: IndexMap::new(),
                sources: IndexMap::new(),
            });

        if definition.kind != kind {
            return Err(SchemaGraphError::KindMismatch {
                type_name: type_name.to_string(),
                schema: schema.to_string(),
                existing: definition.kind,
                conflicting: kind,
            });
        }

        Ok(definition
            .sources
            .entry(schema.to_string())
            .or_insert_with(|| TypeSource::new(schema)))
    }

    /// Adds a field to a type the schema already contributes.
    /// The output type is the named type, without list and non-null wrappers.
    pub fn add_field(
        &mut self,
        schema: &str,
        type_name: &str,
        field_name: &str,
        output_type: &str,
    ) -> Result<&mut FieldSource, SchemaGraphError> {
        let Some(definition) = self
            .definitions
            .get_mut(type_name)
            .filter(|d| d.sources.contains_key(schema))
        else {
            return Err(SchemaGraphError::TypeNotInSchema {
                type_name: type_name.to_string(),
                schema: schema.to_string(),
            });
        };

        let field = definition
            .fields
            .entry(field_name.to_string())
            .or_insert_with(|| FieldDefinition {
                name: field_name.to_string(),
                output_type: output_type.to_string(),
                sources: IndexMap::new(),
            });

        Ok(field
            .sources
            .entry(schema.to_string())
            .or_insert_with(|| FieldSource::new(schema)))
    }

    pub fn add_lookup(&mut self, lookup: Lookup) -> &mut Self {
        self.lookups.push(lookup);
        self
    }

    #[instrument(level = "trace", skip_all, fields(schemas = self.schemas.len(), types = self.definitions.len()))]
    pub fn build(self) -> Result<SchemaGraph, SchemaGraphError> {
        let SchemaGraphBuilder {
            mut definitions,
            schemas,
            declared_roots,
            lookups,
        } = self;

        let root_types = resolve_root_types(&definitions, &declared_roots)?;
        propagate_type_flags(&mut definitions);
        ensure_output_types(&definitions)?;
        let possible_types = collect_possible_types(&definitions);

        let mut graph = SchemaGraph {
            definitions,
            schemas,
            root_types,
            lookups: Vec::with_capacity(lookups.len()),
            lookups_by_type: HashMap::new(),
            possible_types,
        };

        for mut lookup in lookups {
            if !graph.is_composite_type(&lookup.type_name) {
                return Err(SchemaGraphError::InvalidLookupType {
                    schema: lookup.schema,
                    field_name: lookup.field_name,
                    type_name: lookup.type_name,
                });
            }

            match find_lookup_path(&graph, &lookup) {
                Some((path, internal)) => {
                    lookup.path = path;
                    lookup.internal |= internal;
                    graph.lookups.push(lookup);
                }
                None => {
                    trace!(
                        "Ignoring lookup '{}' in schema '{}', type '{}' is not reachable from the query root",
                        lookup.field_name,
                        lookup.schema,
                        lookup.declaring_type
                    );
                }
            }
        }

        graph.lookups_by_type = index_lookups(&graph);

        Ok(graph)
    }
}

fn resolve_root_types(
    definitions: &IndexMap<String, TypeDefinition>,
    declared_roots: &HashMap<OperationKind, (String, String)>,
) -> Result<RootTypes, SchemaGraphError> {
    let declared = |kind: OperationKind| declared_roots.get(&kind).map(|(name, _)| name.clone());
    let is_object = |name: &str| {
        definitions
            .get(name)
            .is_some_and(|d| d.kind == TypeKind::Object)
    };

    let query = declared(OperationKind::Query).unwrap_or_else(|| "Query".to_string());
    if !is_object(&query) {
        return Err(SchemaGraphError::MissingRootType {
            kind: OperationKind::Query,
            type_name: query,
        });
    }

    let optional_root = |kind: OperationKind, default: &str| match declared(kind) {
        Some(name) if is_object(&name) => Ok(Some(name)),
        Some(name) => Err(SchemaGraphError::MissingRootType {
            kind,
            type_name: name,
        }),
        None => Ok(is_object(default).then(|| default.to_string())),
    };

    Ok(RootTypes {
        query,
        mutation: optional_root(OperationKind::Mutation, "Mutation")?,
        subscription: optional_root(OperationKind::Subscription, "Subscription")?,
    })
}

/// Fields declared on an internal or inaccessible type carry the flag of their type.
fn propagate_type_flags(definitions: &mut IndexMap<String, TypeDefinition>) {
    for definition in definitions.values_mut() {
        let TypeDefinition {
            fields, sources, ..
        } = definition;

        for type_source in sources.values() {
            let mut inherited = FieldFlags::empty();
            if type_source.flags.contains(TypeFlags::INTERNAL) {
                inherited |= FieldFlags::INTERNAL;
            }
            if type_source.flags.contains(TypeFlags::INACCESSIBLE) {
                inherited |= FieldFlags::INACCESSIBLE;
            }

            if inherited.is_empty() {
                continue;
            }

            for field in fields.values_mut() {
                if let Some(field_source) = field.sources.get_mut(&type_source.schema) {
                    field_source.flags |= inherited;
                }
            }
        }
    }
}

fn ensure_output_types(
    definitions: &IndexMap<String, TypeDefinition>,
) -> Result<(), SchemaGraphError> {
    for definition in definitions.values() {
        for field in definition.fields.values() {
            let known = BUILTIN_SCALARS.contains(&field.output_type.as_str())
                || definitions.contains_key(&field.output_type);

            if !known {
                return Err(SchemaGraphError::UnknownOutputType {
                    type_name: definition.name.clone(),
                    field_name: field.name.clone(),
                    output_type: field.output_type.clone(),
                });
            }
        }
    }

    Ok(())
}

fn collect_possible_types(
    definitions: &IndexMap<String, TypeDefinition>,
) -> HashMap<String, Vec<String>> {
    let mut possible_types: HashMap<String, Vec<String>> = HashMap::new();
    let mut push = |abstract_type: &str, member: &str| {
        let members = possible_types.entry(abstract_type.to_string()).or_default();
        if !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
    };

    for definition in definitions.values() {
        match definition.kind {
            TypeKind::Object => {
                for source in definition.sources.values() {
                    for interface in source.interfaces.iter() {
                        push(interface, &definition.name);
                    }
                }
            }
            TypeKind::Union => {
                for source in definition.sources.values() {
                    for member in source.possible_types.iter() {
                        push(&definition.name, member);
                    }
                }
            }
            TypeKind::Interface | TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => {}
        }
    }

    possible_types
}

/// Finds the shortest chain of argument-less object fields leading from the query root
/// to the type declaring the lookup, within the lookup's schema.
/// The flag tells whether any field on the way is internal.
fn find_lookup_path(graph: &SchemaGraph, lookup: &Lookup) -> Option<(Vec<String>, bool)> {
    let root = graph.root_types.query.as_str();
    if lookup.declaring_type == root {
        return Some((vec![], false));
    }

    let mut seen: HashSet<&str> = HashSet::from([root]);
    let mut queue: VecDeque<(&str, Vec<String>, bool)> = VecDeque::from([(root, vec![], false)]);

    while let Some((type_name, path, internal)) = queue.pop_front() {
        let Some(definition) = graph.definition(type_name) else {
            continue;
        };

        for field in definition.fields.values() {
            let Some(source) = field.source(&lookup.schema) else {
                continue;
            };

            let walkable = source.is_resolvable()
                && source.arguments.is_empty()
                && graph.type_kind(&field.output_type) == Some(TypeKind::Object)
                && graph.is_defined_in(&field.output_type, &lookup.schema);

            if !walkable || !seen.insert(field.output_type.as_str()) {
                continue;
            }

            let mut next_path = path.clone();
            next_path.push(field.name.clone());
            let next_internal = internal || source.flags.contains(FieldFlags::INTERNAL);

            if field.output_type == lookup.declaring_type {
                return Some((next_path, next_internal));
            }

            queue.push_back((field.output_type.as_str(), next_path, next_internal));
        }
    }

    None
}

/// Indexes every lookup under its return type, and under each possible type of an abstract
/// return type, in the lookup's schema. Public lookups precede internal ones.
fn index_lookups(graph: &SchemaGraph) -> HashMap<(String, String), Vec<usize>> {
    let mut index: HashMap<(String, String), Vec<usize>> = HashMap::new();

    for (i, lookup) in graph.lookups.iter().enumerate() {
        index
            .entry((lookup.type_name.clone(), lookup.schema.clone()))
            .or_default()
            .push(i);

        for possible_type in graph.possible_types_in(&lookup.type_name, &lookup.schema) {
            index
                .entry((possible_type.to_string(), lookup.schema.clone()))
                .or_default()
                .push(i);
        }
    }

    for indices in index.values_mut() {
        indices.sort_by_key(|i| graph.lookups[*i].internal);
    }

    index
}
