use bumpalo::Bump;

use crate::{config::SatisfiabilityOptions, graph::SchemaGraph};

/// Everything a single validation run shares between the resolution steps.
/// Paths and visited sets are allocated in `arena` and dropped with it at the end of the run.
pub(crate) struct ValidationContext<'a> {
    pub graph: &'a SchemaGraph,
    pub options: &'a SatisfiabilityOptions,
    pub arena: &'a Bump,
}

impl<'a> ValidationContext<'a> {
    pub fn new(graph: &'a SchemaGraph, options: &'a SatisfiabilityOptions, arena: &'a Bump) -> Self {
        Self {
            graph,
            options,
            arena,
        }
    }
}
