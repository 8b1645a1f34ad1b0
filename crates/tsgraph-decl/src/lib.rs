//! Declaration tree - the input shape of the lowering pass.
//!
//! An external front end (a TypeScript parser, a `.d.ts` reader, a test)
//! materializes declarations into a [`NodeArena`]. Nodes are addressed by
//! [`NodeIndex`] and carry a closed [`SyntaxKind`] tag, modifier and node
//! flags, a source span, and a kind-specific [`NodeData`] payload.
//!
//! Nothing in this crate interprets declarations; it only stores them.

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod flags;
pub use flags::{ModifierFlags, NodeFlags};

pub mod node;
pub use node::{
    ClassLikeData, ConditionalData, IndexedAccessData, MappedData, ModuleData, Node, NodeData,
    ParameterData, SignatureData, TypeAliasData, TypeOperatorKind, TypeParameterData,
    TypePredicateData, TypeReferenceData, VariableData,
};

mod node_arena;
pub use node_arena::NodeArena;

#[cfg(test)]
#[path = "../tests/node_arena_tests.rs"]
mod node_arena_tests;
