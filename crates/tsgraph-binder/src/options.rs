//! Binder configuration.

use serde::Deserialize;
use tsgraph_common::limits::MAX_LOWERING_DEPTH;

/// Configuration options for the binder.
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides (`{"ambientGlobal": true}`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinderOptions {
    /// Global scope tolerates duplicate overloads.
    #[serde(default)]
    pub ambient_global: bool,
    /// Interface and type-literal bodies are declaration-only scopes.
    #[serde(default = "default_true")]
    pub ambient_interface_bodies: bool,
    /// Nesting limit for lowering recursion.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

const fn default_true() -> bool {
    true
}

const fn default_max_depth() -> u32 {
    MAX_LOWERING_DEPTH
}

impl Default for BinderOptions {
    fn default() -> Self {
        BinderOptions {
            ambient_global: false,
            ambient_interface_bodies: default_true(),
            max_depth: default_max_depth(),
        }
    }
}

impl BinderOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
