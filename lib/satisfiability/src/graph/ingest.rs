use graphql_parser::schema::{
    parse_schema, Definition, Directive, Field, Type, TypeDefinition as SdlTypeDefinition,
    TypeExtension,
};
use tracing::instrument;

use crate::{
    graph::{
        builder::SchemaGraphBuilder,
        directives::{
            CompositeSchemaDirective, ExternalDirective, InaccessibleDirective, InternalDirective,
            IsDirective, KeyDirective, LookupDirective, RequireDirective, ShareableDirective,
        },
        error::SchemaGraphError,
        lookup::{Lookup, LookupArgument},
        FieldFlags, FieldRequirement, OperationKind, SchemaGraph, TypeFlags, TypeKind,
    },
    selection::FieldSelection,
};

/// The SDL of one source schema, as authored by its owner.
#[derive(Debug, Clone)]
pub struct SourceSchema {
    pub name: String,
    pub sdl: String,
}

impl SourceSchema {
    pub fn new(name: impl Into<String>, sdl: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sdl: sdl.into(),
        }
    }
}

impl SchemaGraph {
    #[instrument(level = "trace", skip_all, fields(schemas = sources.len()))]
    pub fn from_source_schemas(sources: &[SourceSchema]) -> Result<SchemaGraph, SchemaGraphError> {
        let mut builder = SchemaGraphBuilder::new();

        for source in sources {
            ingest_source_schema(&mut builder, source)?;
        }

        builder.build()
    }
}

fn ingest_source_schema(
    builder: &mut SchemaGraphBuilder,
    source: &SourceSchema,
) -> Result<(), SchemaGraphError> {
    let document =
        parse_schema::<String>(&source.sdl).map_err(|e| SchemaGraphError::ParseSchema {
            schema: source.name.clone(),
            message: e.to_string(),
        })?;

    let schema = source.name.as_str();
    builder.add_schema(schema);

    for definition in document.definitions.iter() {
        match definition {
            Definition::SchemaDefinition(schema_definition) => {
                let roots = [
                    (OperationKind::Query, &schema_definition.query),
                    (OperationKind::Mutation, &schema_definition.mutation),
                    (OperationKind::Subscription, &schema_definition.subscription),
                ];

                for (kind, type_name) in roots {
                    if let Some(type_name) = type_name {
                        builder.declare_root_type(schema, kind, type_name)?;
                    }
                }
            }
            Definition::TypeDefinition(type_definition) => match type_definition {
                SdlTypeDefinition::Object(object) => {
                    let flags = register_type(
                        builder,
                        schema,
                        &object.name,
                        TypeKind::Object,
                        &object.directives,
                        &object.implements_interfaces,
                        &[],
                    )?;
                    register_fields(builder, schema, &object.name, flags, &object.fields)?;
                }
                SdlTypeDefinition::Interface(interface) => {
                    let flags = register_type(
                        builder,
                        schema,
                        &interface.name,
                        TypeKind::Interface,
                        &interface.directives,
                        &[],
                        &[],
                    )?;
                    register_fields(builder, schema, &interface.name, flags, &interface.fields)?;
                }
                SdlTypeDefinition::Union(union_type) => {
                    register_type(
                        builder,
                        schema,
                        &union_type.name,
                        TypeKind::Union,
                        &union_type.directives,
                        &[],
                        &union_type.types,
                    )?;
                }
                SdlTypeDefinition::Scalar(scalar) => {
                    register_type(
                        builder,
                        schema,
                        &scalar.name,
                        TypeKind::Scalar,
                        &scalar.directives,
                        &[],
                        &[],
                    )?;
                }
                SdlTypeDefinition::Enum(enum_type) => {
                    register_type(
                        builder,
                        schema,
                        &enum_type.name,
                        TypeKind::Enum,
                        &enum_type.directives,
                        &[],
                        &[],
                    )?;
                }
                SdlTypeDefinition::InputObject(input_object) => {
                    register_type(
                        builder,
                        schema,
                        &input_object.name,
                        TypeKind::InputObject,
                        &input_object.directives,
                        &[],
                        &[],
                    )?;
                }
            },
            Definition::TypeExtension(type_extension) => match type_extension {
                TypeExtension::Object(object) => {
                    let flags = register_type(
                        builder,
                        schema,
                        &object.name,
                        TypeKind::Object,
                        &object.directives,
                        &object.implements_interfaces,
                        &[],
                    )?;
                    register_fields(builder, schema, &object.name, flags, &object.fields)?;
                }
                TypeExtension::Interface(interface) => {
                    let flags = register_type(
                        builder,
                        schema,
                        &interface.name,
                        TypeKind::Interface,
                        &interface.directives,
                        &[],
                        &[],
                    )?;
                    register_fields(builder, schema, &interface.name, flags, &interface.fields)?;
                }
                TypeExtension::Union(union_type) => {
                    register_type(
                        builder,
                        schema,
                        &union_type.name,
                        TypeKind::Union,
                        &union_type.directives,
                        &[],
                        &union_type.types,
                    )?;
                }
                TypeExtension::Scalar(scalar) => {
                    register_type(
                        builder,
                        schema,
                        &scalar.name,
                        TypeKind::Scalar,
                        &scalar.directives,
                        &[],
                        &[],
                    )?;
                }
                TypeExtension::Enum(enum_type) => {
                    register_type(
                        builder,
                        schema,
                        &enum_type.name,
                        TypeKind::Enum,
                        &enum_type.directives,
                        &[],
                        &[],
                    )?;
                }
                TypeExtension::InputObject(input_object) => {
                    register_type(
                        builder,
                        schema,
                        &input_object.name,
                        TypeKind::InputObject,
                        &input_object.directives,
                        &[],
                        &[],
                    )?;
                }
            },
            _ => {}
        }
    }

    Ok(())
}

/// Returns the flags the type has in this schema once the directives are applied.
fn register_type(
    builder: &mut SchemaGraphBuilder,
    schema: &str,
    type_name: &str,
    kind: TypeKind,
    directives: &[Directive<'_, String>],
    interfaces: &[String],
    members: &[String],
) -> Result<TypeFlags, SchemaGraphError> {
    let source = builder.add_type(schema, type_name, kind)?;

    if InternalDirective::present(directives) {
        source.flags |= TypeFlags::INTERNAL;
    }
    if InaccessibleDirective::present(directives) {
        source.flags |= TypeFlags::INACCESSIBLE;
    }
    if ShareableDirective::present(directives) {
        source.flags |= TypeFlags::SHAREABLE;
    }

    for key in KeyDirective::find_all(directives) {
        let fields = key
            .fields
            .ok_or_else(|| SchemaGraphError::MissingDirectiveArgument {
                schema: schema.to_string(),
                directive: KeyDirective::NAME,
                coordinate: type_name.to_string(),
                argument: "fields",
            })?;

        source
            .keys
            .push(parse_selection(schema, KeyDirective::NAME, type_name, &fields)?);
    }

    for interface in interfaces {
        if !source.interfaces.contains(interface) {
            source.interfaces.push(interface.clone());
        }
    }

    for member in members {
        if !source.possible_types.contains(member) {
            source.possible_types.push(member.clone());
        }
    }

    Ok(source.flags)
}

fn register_fields(
    builder: &mut SchemaGraphBuilder,
    schema: &str,
    type_name: &str,
    type_flags: TypeFlags,
    fields: &[Field<'_, String>],
) -> Result<(), SchemaGraphError> {
    for field in fields {
        let coordinate = format!("{}.{}", type_name, field.name);
        let output_type = named_type(&field.field_type);

        let mut flags = FieldFlags::empty();
        if InternalDirective::present(&field.directives) {
            flags |= FieldFlags::INTERNAL;
        }
        if InaccessibleDirective::present(&field.directives) {
            flags |= FieldFlags::INACCESSIBLE;
        }
        if ExternalDirective::present(&field.directives) {
            flags |= FieldFlags::EXTERNAL;
        }
        if ShareableDirective::present(&field.directives) {
            flags |= FieldFlags::SHAREABLE;
        }

        let mut requirement: Option<FieldRequirement> = None;
        for argument in field.arguments.iter() {
            let Some(require) = RequireDirective::find(&argument.directives) else {
                continue;
            };

            let argument_coordinate = format!("{}({}:)", coordinate, argument.name);
            let selection_str =
                require
                    .field
                    .ok_or_else(|| SchemaGraphError::MissingDirectiveArgument {
                        schema: schema.to_string(),
                        directive: RequireDirective::NAME,
                        coordinate: argument_coordinate.clone(),
                        argument: "field",
                    })?;
            let selection = parse_selection(
                schema,
                RequireDirective::NAME,
                &argument_coordinate,
                &selection_str,
            )?;

            let entry = requirement.get_or_insert_with(|| FieldRequirement {
                arguments: vec![],
                selection: FieldSelection::default(),
            });
            entry.arguments.push(argument.name.clone());
            entry.selection.merge(selection);
        }

        let lookup = if LookupDirective::present(&field.directives) {
            flags |= FieldFlags::LOOKUP;
            let internal = flags.contains(FieldFlags::INTERNAL)
                || type_flags.contains(TypeFlags::INTERNAL);

            Some(
                Lookup::new(
                    schema,
                    type_name,
                    field.name.as_str(),
                    output_type,
                    lookup_arguments(schema, &coordinate, field)?,
                )
                .with_internal(internal),
            )
        } else {
            None
        };

        let source = builder.add_field(schema, type_name, &field.name, output_type)?;
        source.flags |= flags;
        source.arguments = field.arguments.iter().map(|a| a.name.clone()).collect();
        if requirement.is_some() {
            source.requirement = requirement;
        }

        if let Some(lookup) = lookup {
            builder.add_lookup(lookup);
        }
    }

    Ok(())
}

/// Maps each argument of a lookup field to a field of the returned type,
/// through `@is(field:)` or by the argument name.
fn lookup_arguments(
    schema: &str,
    coordinate: &str,
    field: &Field<'_, String>,
) -> Result<Vec<LookupArgument>, SchemaGraphError> {
    let mut arguments = Vec::with_capacity(field.arguments.len());

    for argument in field.arguments.iter() {
        let argument_coordinate = format!("{}({}:)", coordinate, argument.name);
        let mapping = match IsDirective::find(&argument.directives) {
            Some(IsDirective {
                field: Some(mapping),
            }) => mapping,
            Some(IsDirective { field: None }) => {
                return Err(SchemaGraphError::MissingDirectiveArgument {
                    schema: schema.to_string(),
                    directive: IsDirective::NAME,
                    coordinate: argument_coordinate,
                    argument: "field",
                })
            }
            None => argument.name.clone(),
        };

        arguments.push(LookupArgument {
            name: argument.name.clone(),
            field: parse_selection(schema, IsDirective::NAME, &argument_coordinate, &mapping)?,
        });
    }

    Ok(arguments)
}

fn parse_selection(
    schema: &str,
    directive: &'static str,
    coordinate: &str,
    input: &str,
) -> Result<FieldSelection, SchemaGraphError> {
    FieldSelection::parse(input).map_err(|source| SchemaGraphError::InvalidSelection {
        schema: schema.to_string(),
        directive,
        coordinate: coordinate.to_string(),
        source,
    })
}

fn named_type<'a>(field_type: &'a Type<'_, String>) -> &'a str {
    match field_type {
        Type::NamedType(name) => name,
        Type::ListType(inner) | Type::NonNullType(inner) => named_type(inner),
    }
}
