use std::fmt::{Display, Formatter, Result as FmtResult};

use graphql_parser::query::{parse_query, Definition, OperationDefinition, Selection, SelectionSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("field selection is empty")]
    Empty,
    #[error("failed to parse field selection '{input}': {message}")]
    Syntax { input: String, message: String },
    #[error("field selection '{0}' must be a single selection set")]
    NotASelectionSet(String),
    #[error("field selection '{0}' contains fragments, only fields are supported")]
    UnsupportedFragment(String),
}

/// A single field inside a requirement tree.
/// A node without sub-selections is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionNode {
    pub field_name: String,
    pub selections: Vec<SelectionNode>,
}

impl SelectionNode {
    pub fn leaf(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            selections: vec![],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.selections.is_empty()
    }

    fn merge(&mut self, other: SelectionNode) {
        for selection in other.selections {
            merge_into(&mut self.selections, selection);
        }
    }
}

fn merge_into(nodes: &mut Vec<SelectionNode>, node: SelectionNode) {
    match nodes.iter_mut().find(|n| n.field_name == node.field_name) {
        Some(existing) => existing.merge(node),
        None => nodes.push(node),
    }
}

/// A parsed `@key(fields:)`, `@require(field:)` or `@is(field:)` selection.
///
/// Both the selection set form (`"id sku"`, `"{ name, price }"`, `"category { id tag }"`)
/// and the dotted path form (`"category.id"`) are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldSelection {
    nodes: Vec<SelectionNode>,
}

impl FieldSelection {
    pub fn parse(input: &str) -> Result<Self, SelectionError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(SelectionError::Empty);
        }

        if !trimmed.contains('{') && trimmed.contains('.') {
            return Self::parse_path(trimmed);
        }

        let selection_set_str = if trimmed.starts_with('{') {
            trimmed.to_string()
        } else {
            format!("{{{trimmed}}}")
        };

        let document =
            parse_query::<String>(&selection_set_str).map_err(|e| SelectionError::Syntax {
                input: input.to_string(),
                message: e.to_string(),
            })?;

        match document.definitions.as_slice() {
            [Definition::Operation(OperationDefinition::SelectionSet(selection_set))] => {
                let nodes = convert_selection_set(input, selection_set)?;
                if nodes.is_empty() {
                    return Err(SelectionError::Empty);
                }
                Ok(Self { nodes })
            }
            _ => Err(SelectionError::NotASelectionSet(input.to_string())),
        }
    }

    fn parse_path(input: &str) -> Result<Self, SelectionError> {
        let mut segments = input.split('.').map(str::trim).rev();
        let invalid = |segment: &str| {
            segment.is_empty()
                || !segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        };

        let Some(last) = segments.next().filter(|s| !invalid(*s)) else {
            return Err(SelectionError::Syntax {
                input: input.to_string(),
                message: "invalid path segment".to_string(),
            });
        };

        let mut node = SelectionNode::leaf(last);
        for segment in segments {
            if invalid(segment) {
                return Err(SelectionError::Syntax {
                    input: input.to_string(),
                    message: format!("invalid path segment '{segment}'"),
                });
            }

            node = SelectionNode {
                field_name: segment.to_string(),
                selections: vec![node],
            };
        }

        Ok(Self { nodes: vec![node] })
    }

    pub fn nodes(&self) -> &[SelectionNode] {
        &self.nodes
    }

    /// Merges another selection into this one, unifying fields with the same name.
    /// Used to assemble a lookup key out of the individual argument mappings.
    pub fn merge(&mut self, other: FieldSelection) {
        for node in other.nodes {
            merge_into(&mut self.nodes, node);
        }
    }

    /// Whether this selection is exactly one leaf field with the given name.
    pub fn is_single_leaf(&self, field_name: &str) -> bool {
        matches!(self.nodes.as_slice(), [node] if node.is_leaf() && node.field_name == field_name)
    }
}

fn convert_selection_set(
    input: &str,
    selection_set: &SelectionSet<'_, String>,
) -> Result<Vec<SelectionNode>, SelectionError> {
    let mut nodes: Vec<SelectionNode> = Vec::with_capacity(selection_set.items.len());

    for item in selection_set.items.iter() {
        match item {
            Selection::Field(field) => {
                let node = SelectionNode {
                    field_name: field.name.clone(),
                    selections: convert_selection_set(input, &field.selection_set)?,
                };
                merge_into(&mut nodes, node);
            }
            Selection::FragmentSpread(_) | Selection::InlineFragment(_) => {
                return Err(SelectionError::UnsupportedFragment(input.to_string()));
            }
        }
    }

    Ok(nodes)
}

fn fmt_nodes(nodes: &[SelectionNode], f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "{{")?;
    for node in nodes {
        write!(f, " {}", node.field_name)?;
        if !node.is_leaf() {
            write!(f, " ")?;
            fmt_nodes(&node.selections, f)?;
        }
    }
    write!(f, " }}")
}

impl Display for FieldSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_nodes(&self.nodes, f)
    }
}
