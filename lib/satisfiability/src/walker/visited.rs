use std::fmt::Display;

use bumpalo::Bump;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VisitedItem<'a> {
    /// A field whose `@require` selection is being resolved.
    Requirement {
        schema: &'a str,
        type_name: &'a str,
        field_name: &'a str,
    },
    /// A field that is being fetched from another schema, starting at `schema`.
    Transition {
        schema: &'a str,
        type_name: &'a str,
        field_name: &'a str,
    },
    /// A lookup whose key is being resolved.
    Lookup {
        schema: &'a str,
        declaring_type: &'a str,
        field_name: &'a str,
    },
}

impl Display for VisitedItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitedItem::Requirement {
                schema,
                type_name,
                field_name,
            } => write!(f, "{}:{}.{}", schema, type_name, field_name),
            VisitedItem::Transition {
                schema,
                type_name,
                field_name,
            } => write!(f, "{}:{}.{} (transition)", schema, type_name, field_name),
            VisitedItem::Lookup {
                schema,
                declaring_type,
                field_name,
            } => write!(f, "{}:{}.{} (lookup)", schema, declaring_type, field_name),
        }
    }
}

#[derive(Debug)]
struct VisitedNode<'a> {
    item: VisitedItem<'a>,
    prev: Option<&'a VisitedNode<'a>>,
}

/// Items of the resolution chain that is currently in progress.
/// Every recursive call gets its own extended copy, siblings never see each other's items.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct VisitedSet<'a> {
    head: Option<&'a VisitedNode<'a>>,
    depth: usize,
}

impl<'a> VisitedSet<'a> {
    pub fn with(&self, arena: &'a Bump, item: VisitedItem<'a>) -> VisitedSet<'a> {
        let node = arena.alloc(VisitedNode {
            item,
            prev: self.head,
        });

        VisitedSet {
            head: Some(node),
            depth: self.depth + 1,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn iter(&self) -> impl Iterator<Item = &'a VisitedItem<'a>> {
        std::iter::successors(self.head, |node| node.prev).map(|node| &node.item)
    }

    pub fn contains(&self, item: &VisitedItem<'_>) -> bool {
        self.iter().any(|visited| visited == item)
    }

    /// The requirements from the first occurrence of `item` up to the most recent one,
    /// closed with `item` again.
    pub fn cycle(&self, item: &VisitedItem<'a>) -> Vec<String> {
        let mut chain: Vec<String> = vec![item.to_string()];

        for visited in self.iter() {
            if let VisitedItem::Requirement { .. } = visited {
                chain.push(visited.to_string());
            }

            if visited == item {
                break;
            }
        }

        chain.reverse();
        chain
    }
}
