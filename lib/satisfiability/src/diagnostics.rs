use std::fmt::Display;

use crate::selection::FieldSelection;

/// One line of a failure report, with the failures that caused it nested below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub message: String,
    pub causes: Vec<Explanation>,
}

impl Explanation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: vec![],
        }
    }

    pub fn with_causes(message: impl Into<String>, causes: Vec<Explanation>) -> Self {
        Self {
            message: message.into(),
            causes,
        }
    }

    fn write_indented(&self, depth: usize, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if depth > 0 {
            writeln!(f)?;
        }
        write!(f, "{:indent$}{}", "", self.message, indent = depth * 2)?;

        for cause in self.causes.iter() {
            cause.write_indented(depth + 1, f)?;
        }

        Ok(())
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_indented(0, f)
    }
}

/// `schema:Type.field<ReturnType>`
pub(crate) fn field_coordinate(
    schema: &str,
    type_name: &str,
    field_name: &str,
    output_type: &str,
) -> String {
    format!("{}:{}.{}<{}>", schema, type_name, field_name, output_type)
}

pub(crate) fn unable_to_access_field(
    type_name: &str,
    field_name: &str,
    schema: &str,
    path: &str,
) -> String {
    if path.is_empty() {
        format!(
            "Unable to access the field '{}.{}' in schema '{}'.",
            type_name, field_name, schema
        )
    } else {
        format!(
            "Unable to access the field '{}.{}' on path '{}'.",
            type_name, field_name, path
        )
    }
}

pub(crate) fn unable_to_access_required_field(
    type_name: &str,
    field_name: &str,
    schema: &str,
    path: &str,
) -> String {
    if path.is_empty() {
        format!(
            "Unable to access the required field '{}.{}' in schema '{}'.",
            type_name, field_name, schema
        )
    } else {
        format!(
            "Unable to access the required field '{}.{}' on path '{}'.",
            type_name, field_name, path
        )
    }
}

pub(crate) fn unable_to_transition(from_schema: &str, to_schema: &str, coordinate: &str) -> String {
    format!(
        "Unable to transition between schemas '{}' and '{}' for access to field '{}'.",
        from_schema, to_schema, coordinate
    )
}

pub(crate) fn unable_to_satisfy_lookup_requirement(
    key: &FieldSelection,
    lookup: &str,
    schema: &str,
) -> String {
    format!(
        "Unable to satisfy the requirement '{}' for lookup '{}' in schema '{}'.",
        key, lookup, schema
    )
}

pub(crate) fn unable_to_satisfy_field_requirement(
    requirement: &FieldSelection,
    coordinate: &str,
) -> String {
    format!(
        "Unable to satisfy the requirement '{}' on field '{}'.",
        requirement, coordinate
    )
}

pub(crate) fn no_lookups_found(type_name: &str, schema: &str) -> String {
    format!(
        "No lookups found for type '{}' in schema '{}'.",
        type_name, schema
    )
}

pub(crate) fn no_other_schemas_contain_field(type_name: &str, field_name: &str) -> String {
    format!(
        "No other schemas contain the field '{}.{}'.",
        type_name, field_name
    )
}

pub(crate) fn transition_cycle(type_name: &str, field_name: &str, schema: &str) -> String {
    format!(
        "Cycle detected while accessing the field '{}.{}' from schema '{}'.",
        type_name, field_name, schema
    )
}

pub(crate) fn lookup_in_progress(lookup: &str, schema: &str) -> String {
    format!(
        "Lookup '{}' in schema '{}' is already being resolved on this path.",
        lookup, schema
    )
}

pub(crate) fn requirement_cycle(chain: &[String]) -> String {
    format!("Cycle detected in requirement: {}.", chain.join(" -> "))
}

pub(crate) fn leaf_field_with_selection(type_name: &str, field_name: &str, output_type: &str) -> String {
    format!(
        "The required field '{}.{}' returns the leaf type '{}' and can not have a sub-selection.",
        type_name, field_name, output_type
    )
}

pub(crate) fn composite_field_without_selection(
    type_name: &str,
    field_name: &str,
    output_type: &str,
) -> String {
    format!(
        "The required field '{}.{}' returns the composite type '{}' and needs a sub-selection.",
        type_name, field_name, output_type
    )
}

pub(crate) fn max_depth_exceeded(max_depth: usize, path: &str) -> String {
    format!(
        "Maximum resolution depth of {} exceeded on path '{}'.",
        max_depth, path
    )
}

pub(crate) fn node_type_without_lookup(type_name: &str, interface: &str) -> String {
    format!(
        "Type '{}' implements the '{}' interface, but does not have a lookup by ID.",
        type_name, interface
    )
}

pub(crate) fn lookup_argument_unmapped(
    argument: &str,
    lookup: &str,
    schema: &str,
    type_name: &str,
) -> String {
    format!(
        "The argument '{}' of lookup '{}' in schema '{}' does not map to a field of type '{}'.",
        argument, lookup, schema, type_name
    )
}

#[cfg(test)]
mod tests {
    use super::Explanation;

    #[test]
    fn nested_explanations_are_indented() {
        let explanation = Explanation::with_causes(
            "top.",
            vec![
                Explanation::with_causes("first.", vec![Explanation::new("deep.")]),
                Explanation::new("second."),
            ],
        );

        insta::assert_snapshot!(format!("{}", explanation), @r"
        top.
          first.
            deep.
          second.
        ");
    }
}
