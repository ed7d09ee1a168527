pub(crate) mod builder;
pub(crate) mod directives;
pub(crate) mod error;
pub(crate) mod ingest;
pub(crate) mod lookup;
pub(crate) mod transition_graph;


use std::collections::HashMap;

use bitflags::bitflags;
use indexmap::IndexMap;

use crate::selection::FieldSelection;

pub use builder::SchemaGraphBuilder;
pub use error::SchemaGraphError;
pub use ingest::SourceSchema;
pub use lookup::{Lookup, LookupArgument};
pub use transition_graph::{GraphEdge, GraphNode, TransitionGraph};

static BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum TypeKind {
    #[strum(serialize = "object")]
    Object,
    #[strum(serialize = "interface")]
    Interface,
    #[strum(serialize = "union")]
    Union,
    #[strum(serialize = "scalar")]
    Scalar,
    #[strum(serialize = "enum")]
    Enum,
    #[strum(serialize = "input object")]
    InputObject,
}

impl TypeKind {
    /// Object, interface and union types, the ones that carry a selection set.
    pub fn is_composite(&self) -> bool {
        match self {
            TypeKind::Object | TypeKind::Interface | TypeKind::Union => true,
            TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum OperationKind {
    #[strum(serialize = "query")]
    Query,
    #[strum(serialize = "mutation")]
    Mutation,
    #[strum(serialize = "subscription")]
    Subscription,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootTypes {
    pub query: String,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

impl Default for RootTypes {
    fn default() -> Self {
        Self {
            query: "Query".to_string(),
            mutation: None,
            subscription: None,
        }
    }
}

impl RootTypes {
    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, &str)> {
        std::iter::once((OperationKind::Query, self.query.as_str()))
            .chain(
                self.mutation
                    .as_deref()
                    .map(|name| (OperationKind::Mutation, name)),
            )
            .chain(
                self.subscription
                    .as_deref()
                    .map(|name| (OperationKind::Subscription, name)),
            )
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        const INTERNAL = 1 << 0;
        const INACCESSIBLE = 1 << 1;
        const SHAREABLE = 1 << 2;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        const INTERNAL = 1 << 0;
        const INACCESSIBLE = 1 << 1;
        const EXTERNAL = 1 << 2;
        const SHAREABLE = 1 << 3;
        const LOOKUP = 1 << 4;
    }
}

/// A named type of the composite schema, with the view every source schema has of it.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    /// Union of the fields declared by all source schemas, in declaration order.
    pub fields: IndexMap<String, FieldDefinition>,
    pub sources: IndexMap<String, TypeSource>,
}

impl TypeDefinition {
    pub fn source(&self, schema: &str) -> Option<&TypeSource> {
        self.sources.get(schema)
    }
}

#[derive(Debug, Clone)]
pub struct TypeSource {
    pub schema: String,
    pub flags: TypeFlags,
    pub keys: Vec<FieldSelection>,
    /// Interfaces this type implements in the source schema.
    pub interfaces: Vec<String>,
    /// Union members, as declared by the source schema.
    pub possible_types: Vec<String>,
}

impl TypeSource {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            flags: TypeFlags::empty(),
            keys: vec![],
            interfaces: vec![],
            possible_types: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    /// Name of the named type the field returns, list and non-null wrappers removed.
    pub output_type: String,
    pub sources: IndexMap<String, FieldSource>,
}

impl FieldDefinition {
    pub fn source(&self, schema: &str) -> Option<&FieldSource> {
        self.sources.get(schema)
    }

    /// Internal and inaccessible fields are not part of the client facing schema.
    pub fn is_public(&self) -> bool {
        self.sources.values().any(|source| {
            !source
                .flags
                .intersects(FieldFlags::INTERNAL | FieldFlags::INACCESSIBLE)
        })
    }
}

#[derive(Debug, Clone)]
pub struct FieldSource {
    pub schema: String,
    pub flags: FieldFlags,
    pub arguments: Vec<String>,
    pub requirement: Option<FieldRequirement>,
}

impl FieldSource {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            flags: FieldFlags::empty(),
            arguments: vec![],
            requirement: None,
        }
    }

    /// External fields are declared, but not resolved, by the source schema.
    pub fn is_resolvable(&self) -> bool {
        !self.flags.contains(FieldFlags::EXTERNAL)
    }
}

/// Data a field needs before the source schema can resolve it,
/// collected from the `@require` directives on its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRequirement {
    pub arguments: Vec<String>,
    pub selection: FieldSelection,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldInfo<'a> {
    pub definition: &'a FieldDefinition,
    pub source: &'a FieldSource,
}

/// The merged, read-only view of all source schemas the validator works on.
/// All indices are computed once, when the graph is built.
#[derive(Debug)]
pub struct SchemaGraph {
    definitions: IndexMap<String, TypeDefinition>,
    schemas: Vec<String>,
    root_types: RootTypes,
    lookups: Vec<Lookup>,
    /// (type_name, schema) -> indices in `lookups`, public lookups first.
    lookups_by_type: HashMap<(String, String), Vec<usize>>,
    /// abstract type -> object types implementing it (or members of it), in any schema.
    possible_types: HashMap<String, Vec<String>>,
}

impl SchemaGraph {
    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.values()
    }

    pub fn definition(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(type_name)
    }

    pub fn type_kind(&self, type_name: &str) -> Option<TypeKind> {
        if BUILTIN_SCALARS.contains(&type_name) {
            return Some(TypeKind::Scalar);
        }

        self.definitions.get(type_name).map(|d| d.kind)
    }

    pub fn is_composite_type(&self, type_name: &str) -> bool {
        self.type_kind(type_name).is_some_and(|k| k.is_composite())
    }

    /// Source schema names, in the order they were registered.
    pub fn schemas(&self) -> &[String] {
        &self.schemas
    }

    pub fn root_types(&self) -> &RootTypes {
        &self.root_types
    }

    pub fn all_lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    /// Lookups of `schema` able to resolve `type_name`, including lookups returning
    /// an interface or union the type belongs to. Public lookups come first,
    /// each group in declaration order.
    pub fn lookups(&self, type_name: &str, schema: &str) -> Vec<&Lookup> {
        self.lookups_by_type
            .get(&(type_name.to_string(), schema.to_string()))
            .map(|indices| indices.iter().map(|i| &self.lookups[*i]).collect())
            .unwrap_or_default()
    }

    pub fn has_lookups_in(&self, type_name: &str, schema: &str) -> bool {
        self.lookups_by_type
            .get(&(type_name.to_string(), schema.to_string()))
            .is_some_and(|indices| !indices.is_empty())
    }

    pub fn keys(&self, type_name: &str, schema: &str) -> &[FieldSelection] {
        self.definitions
            .get(type_name)
            .and_then(|d| d.source(schema))
            .map(|s| s.keys.as_slice())
            .unwrap_or_default()
    }

    pub fn field_definition(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.definitions
            .get(type_name)
            .and_then(|d| d.fields.get(field_name))
    }

    pub fn field(&self, type_name: &str, field_name: &str, schema: &str) -> Option<FieldInfo<'_>> {
        let definition = self.field_definition(type_name, field_name)?;
        let source = definition.source(schema)?;

        Some(FieldInfo { definition, source })
    }

    /// Whether `schema` declares the field and is able to resolve it itself.
    pub fn is_resolvable_in(&self, type_name: &str, field_name: &str, schema: &str) -> bool {
        self.field(type_name, field_name, schema)
            .is_some_and(|info| info.source.is_resolvable())
    }

    pub fn is_defined_in(&self, type_name: &str, schema: &str) -> bool {
        self.definitions
            .get(type_name)
            .is_some_and(|d| d.sources.contains_key(schema))
    }

    pub fn contributing_schemas(&self, type_name: &str) -> impl Iterator<Item = &str> {
        self.definitions
            .get(type_name)
            .into_iter()
            .flat_map(|d| d.sources.keys().map(String::as_str))
    }

    /// Object types implementing an interface, or the members of a union, across all schemas.
    pub fn implementing_types(&self, abstract_type: &str) -> &[String] {
        self.possible_types
            .get(abstract_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Possible types of an abstract type, as seen by one source schema.
    pub fn possible_types_in(&self, abstract_type: &str, schema: &str) -> Vec<&str> {
        let Some(definition) = self.definitions.get(abstract_type) else {
            return vec![];
        };

        match definition.kind {
            TypeKind::Union => definition
                .source(schema)
                .map(|s| s.possible_types.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            TypeKind::Interface => self
                .implementing_types(abstract_type)
                .iter()
                .filter(|name| self.implements_in(name, abstract_type, schema))
                .map(String::as_str)
                .collect(),
            TypeKind::Object | TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => {
                vec![]
            }
        }
    }

    pub fn implements_in(&self, type_name: &str, interface: &str, schema: &str) -> bool {
        self.definitions
            .get(type_name)
            .and_then(|d| d.source(schema))
            .is_some_and(|s| s.interfaces.iter().any(|i| i == interface))
    }
}
