use std::{
    collections::HashMap,
    fmt::{Debug, Display},
};

use petgraph::{
    dot::Dot,
    graph::{Graph, NodeIndex},
    visit::EdgeRef,
    Direction,
};

use crate::{
    graph::{lookup::Lookup, SchemaGraph},
    selection::FieldSelection,
};

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
    Root(String),
    /// A composite type, as seen by one source schema.
    SchemaType { type_name: String, schema: String },
}

impl GraphNode {
    pub fn schema_type(type_name: &str, schema: &str) -> Self {
        GraphNode::SchemaType {
            type_name: type_name.to_string(),
            schema: schema.to_string(),
        }
    }

    pub fn id(&self) -> String {
        match self {
            GraphNode::Root(name) => format!("root({})", name),
            GraphNode::SchemaType { type_name, schema } => format!("{}/{}", type_name, schema),
        }
    }
}

impl Debug for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl Display for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum GraphEdge {
    /// From a root node into the root type of a source schema.
    Entry(String),
    Field {
        field_name: String,
        requirement: Option<FieldSelection>,
    },
    /// From an abstract type into one of its possible types, within the same schema.
    PossibleType(String),
    /// Moves to another schema's view of the same type.
    Lookup {
        lookup: String,
        key: FieldSelection,
        internal: bool,
    },
}

impl GraphEdge {
    fn lookup(lookup: &Lookup) -> Self {
        GraphEdge::Lookup {
            lookup: lookup.to_string(),
            key: lookup.key.clone(),
            internal: lookup.internal,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, GraphEdge::Lookup { .. })
    }
}

impl Debug for GraphEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphEdge::Entry(schema) => write!(f, "{}", schema),
            GraphEdge::Field {
                field_name,
                requirement: None,
            } => write!(f, "{}", field_name),
            GraphEdge::Field {
                field_name,
                requirement: Some(requirement),
            } => write!(f, "{} @require({})", field_name, requirement),
            GraphEdge::PossibleType(type_name) => write!(f, "... on {}", type_name),
            GraphEdge::Lookup {
                lookup,
                key,
                internal,
            } => {
                write!(f, "🔑 {} {}", lookup, key)?;
                if *internal {
                    write!(f, " (internal)")?;
                }
                Ok(())
            }
        }
    }
}

/// The schema graph unfolded into (type, schema) nodes, with field, possible type
/// and lookup edges between them. Only used to inspect a composition.
pub struct TransitionGraph {
    graph: Graph<GraphNode, GraphEdge>,
    node_indices: HashMap<GraphNode, NodeIndex>,
}

impl TransitionGraph {
    fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_indices: HashMap::new(),
        }
    }

    fn upsert_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(index) = self.node_indices.get(&node) {
            return *index;
        }

        let index = self.graph.add_node(node.clone());
        self.node_indices.insert(node, index);
        index
    }

    fn add_edge(&mut self, head: GraphNode, tail: GraphNode, edge: GraphEdge) {
        let head = self.upsert_node(head);
        let tail = self.upsert_node(tail);
        self.graph.add_edge(head, tail, edge);
    }

    pub fn node(&self, type_name: &str, schema: &str) -> Option<NodeIndex> {
        self.node_indices
            .get(&GraphNode::schema_type(type_name, schema))
            .copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges leaving the node, each with the node it points to.
    pub fn outgoing(&self, type_name: &str, schema: &str) -> Vec<(&GraphEdge, &GraphNode)> {
        let Some(index) = self.node(type_name, schema) else {
            return vec![];
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| (edge.weight(), &self.graph[edge.target()]))
            .collect();
        // petgraph iterates edges newest first
        edges.reverse();
        edges
    }
}

/// Print me with `println!("{}", graph);` to see the graph in DOT/digraph format.
impl Display for TransitionGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", Dot::with_config(&self.graph, &[]))
    }
}

impl SchemaGraph {
    pub fn transition_graph(&self) -> TransitionGraph {
        let mut graph = TransitionGraph::new();

        for (_, root_type) in self.root_types().iter() {
            for schema in self.contributing_schemas(root_type) {
                graph.add_edge(
                    GraphNode::Root(root_type.to_string()),
                    GraphNode::schema_type(root_type, schema),
                    GraphEdge::Entry(schema.to_string()),
                );
            }
        }

        for definition in self.definitions() {
            if !definition.kind.is_composite() {
                continue;
            }

            for schema in definition.sources.keys() {
                let head = GraphNode::schema_type(&definition.name, schema);
                graph.upsert_node(head.clone());

                for field in definition.fields.values() {
                    let Some(source) = field.source(schema) else {
                        continue;
                    };

                    if !source.is_resolvable()
                        || !self.is_composite_type(&field.output_type)
                        || !self.is_defined_in(&field.output_type, schema)
                    {
                        continue;
                    }

                    graph.add_edge(
                        head.clone(),
                        GraphNode::schema_type(&field.output_type, schema),
                        GraphEdge::Field {
                            field_name: field.name.clone(),
                            requirement: source.requirement.as_ref().map(|r| r.selection.clone()),
                        },
                    );
                }

                for possible_type in self.possible_types_in(&definition.name, schema) {
                    graph.add_edge(
                        head.clone(),
                        GraphNode::schema_type(possible_type, schema),
                        GraphEdge::PossibleType(possible_type.to_string()),
                    );
                }
            }
        }

        for lookup in self.all_lookups() {
            let mut targets = vec![lookup.type_name.as_str()];
            targets.extend(self.possible_types_in(&lookup.type_name, &lookup.schema));

            for target in targets {
                for schema in self.contributing_schemas(target) {
                    if schema == lookup.schema {
                        continue;
                    }

                    graph.add_edge(
                        GraphNode::schema_type(target, schema),
                        GraphNode::schema_type(target, &lookup.schema),
                        GraphEdge::lookup(lookup),
                    );
                }
            }
        }

        graph
    }
}
