mod diagnostics;
mod walker;

pub mod config;
pub mod graph;
pub mod log;
pub mod selection;

#[cfg(test)]
mod tests;

pub use config::SatisfiabilityOptions;
pub use graph::{SchemaGraph, SchemaGraphBuilder, SchemaGraphError, SourceSchema};
pub use log::{CompositionLog, LogEntry, LogEntryCode, LogSeverity};
pub use walker::{validate_satisfiability, SatisfiabilityValidator};
