use std::fmt::Display;

use crate::selection::FieldSelection;

/// Maps one lookup argument to the field (or nested field) of the resolved type it represents,
/// either through `@is(field:)` or by the argument name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupArgument {
    pub name: String,
    pub field: FieldSelection,
}

/// A field that resolves an entity of `type_name` given its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub schema: String,
    /// The type holding the lookup field, the query root or a nested "lookup holder" type.
    pub declaring_type: String,
    pub field_name: String,
    pub type_name: String,
    pub arguments: Vec<LookupArgument>,
    /// All argument mappings merged into one selection.
    pub key: FieldSelection,
    /// Field names leading from the query root to `declaring_type`.
    pub path: Vec<String>,
    /// Internal lookups are only used when no public lookup can be used.
    pub internal: bool,
}

impl Lookup {
    pub fn new(
        schema: impl Into<String>,
        declaring_type: impl Into<String>,
        field_name: impl Into<String>,
        type_name: impl Into<String>,
        arguments: Vec<LookupArgument>,
    ) -> Self {
        let mut key = FieldSelection::default();
        for argument in arguments.iter() {
            key.merge(argument.field.clone());
        }

        Self {
            schema: schema.into(),
            declaring_type: declaring_type.into(),
            field_name: field_name.into(),
            type_name: type_name.into(),
            arguments,
            key,
            path: vec![],
            internal: false,
        }
    }

    pub fn with_internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }

    /// A lookup taking exactly one argument that maps to the `id` field.
    pub fn is_by_id(&self) -> bool {
        self.arguments.len() == 1 && self.key.is_single_leaf("id")
    }
}

impl Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in self.path.iter() {
            write!(f, "{}.", segment)?;
        }

        write!(f, "{}", self.field_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Lookup, LookupArgument};
    use crate::selection::FieldSelection;

    fn argument(name: &str, field: &str) -> LookupArgument {
        LookupArgument {
            name: name.to_string(),
            field: FieldSelection::parse(field).unwrap(),
        }
    }

    #[test]
    fn key_is_merged_from_arguments() {
        let lookup = Lookup::new(
            "a",
            "Query",
            "productByCategory",
            "Product",
            vec![
                argument("categoryId", "category.id"),
                argument("tag", "category.tag"),
            ],
        );

        assert_eq!(lookup.key.to_string(), "{ category { id tag } }");
        assert!(!lookup.is_by_id());
    }

    #[test]
    fn by_id() {
        let lookup = Lookup::new("a", "Query", "catById", "Cat", vec![argument("id", "id")]);
        assert!(lookup.is_by_id());

        let lookup = Lookup::new("a", "Query", "catByName", "Cat", vec![argument("name", "name")]);
        assert!(!lookup.is_by_id());
    }

    #[test]
    fn display_includes_path() {
        let mut lookup = Lookup::new("a", "Lookups", "userById", "User", vec![argument("id", "id")]);
        assert_eq!(lookup.to_string(), "userById");

        lookup.path = vec!["lookups".to_string()];
        assert_eq!(lookup.to_string(), "lookups.userById");
    }
}
