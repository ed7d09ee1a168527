use crate::{
    graph::{OperationKind, TypeKind},
    selection::SelectionError,
};

#[derive(thiserror::Error, Debug)]
pub enum SchemaGraphError {
    #[error("Failed to parse source schema '{schema}': {message}")]
    ParseSchema { schema: String, message: String },
    #[error("Type '{type_name}' is already defined as {existing} but source schema '{schema}' defines it as {conflicting}")]
    KindMismatch {
        type_name: String,
        schema: String,
        existing: TypeKind,
        conflicting: TypeKind,
    },
    #[error("Type '{type_name}' is not defined in source schema '{schema}'")]
    TypeNotInSchema { type_name: String, schema: String },
    #[error("Type '{output_type}' of field '{type_name}.{field_name}' is not defined")]
    UnknownOutputType {
        type_name: String,
        field_name: String,
        output_type: String,
    },
    #[error("Root {kind} type '{type_name}' is not defined")]
    MissingRootType {
        kind: OperationKind,
        type_name: String,
    },
    #[error("Source schema '{schema}' declares '{type_name}' as the root {kind} type, but '{existing}' was declared before")]
    RootTypeMismatch {
        kind: OperationKind,
        schema: String,
        type_name: String,
        existing: String,
    },
    #[error("Invalid field selection in @{directive} on '{coordinate}' in source schema '{schema}': {source}")]
    InvalidSelection {
        schema: String,
        directive: &'static str,
        coordinate: String,
        #[source]
        source: SelectionError,
    },
    #[error("Directive @{directive} on '{coordinate}' in source schema '{schema}' is missing the '{argument}' argument")]
    MissingDirectiveArgument {
        schema: String,
        directive: &'static str,
        coordinate: String,
        argument: &'static str,
    },
    #[error("Lookup '{field_name}' in source schema '{schema}' returns '{type_name}' which is not a composite type")]
    InvalidLookupType {
        schema: String,
        field_name: String,
        type_name: String,
    },
}
