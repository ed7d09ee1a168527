use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
pub struct SatisfiabilityOptions {
    /// Require every object type implementing the node interface to expose a lookup by `id`
    /// in at least one source schema.
    /// Violations are reported before the satisfiability walk starts.
    ///
    /// Default: `false`.
    #[serde(default = "default_enable_global_object_identification")]
    pub enable_global_object_identification: bool,
    /// The name of the interface used for global object identification.
    ///
    /// Default: `Node`.
    #[serde(default = "default_node_interface_name")]
    pub node_interface_name: String,
    /// The maximum number of nested requirement, transition and lookup resolutions in a single chain.
    /// Deeply nested composite keys could otherwise make the validation run for a very long time.
    /// Exceeding the limit is reported as an error on the affected field.
    ///
    /// Default: 64.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for SatisfiabilityOptions {
    fn default() -> Self {
        Self {
            enable_global_object_identification: default_enable_global_object_identification(),
            node_interface_name: default_node_interface_name(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_enable_global_object_identification() -> bool {
    false
}

fn default_node_interface_name() -> String {
    "Node".to_string()
}

fn default_max_depth() -> usize {
    64
}
