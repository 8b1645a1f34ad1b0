//! Scope / Binding / Type-Graph resolution engine.
//!
//! This crate turns a declaration tree ([`tsgraph_decl::NodeArena`]) into a
//! cross-referenced type graph:
//!
//! - **Type Graph**: closed set of type-node variants in an undo-logged arena
//! - **Bindings**: names tied to a type, a declaration and a scope
//! - **Scope Tree**: insertion-ordered overload-set tables with outer links
//! - **Resolver**: lookup, deferred fixpoint resolution, generic instantiation
//! - **Lowering**: the single dispatch pass that drives all of the above
//!
//! Arenas are built on `ena` snapshot vectors so a declaration that fails to
//! lower leaves no trace in the graph.

pub mod binding;
pub mod errors;
mod generics;
pub mod graph;
mod lower;
pub mod options;
pub mod provenance;
pub mod reporter;
mod resolver;
pub mod scope;
pub mod types;

pub use binding::{
    Binding, BindingId, BindingKind, DeclarationSpace, ParameterRole, ParameterSlot, SpecialMember,
    all_of, exactly_one_of, is_mergeable_pair, without,
};
pub use errors::BindError;
pub use graph::{BindOutcome, GraphSnapshot, TypeGraph};
pub use lower::Binder;
pub use options::BinderOptions;
pub use provenance::{DeclHandle, FileId, Provenance};
pub use reporter::{CollectingReporter, DiagnosticReporter, NullReporter};
pub use resolver::{Resolution, UnresolvedReference, UnresolvedReport};
pub use scope::{OverloadSet, Scope, ScopeCursor, ScopeId, ScopeOwner, escape_name, unescape_name};
pub use types::{
    BaseType, LiteralValue, ObjectFlavor, ObjectType, PrimitiveKind, RefTarget, SignatureKind,
    TypeData, TypeFormatter, TypeId, TypeNode, TypeSet,
};

#[cfg(test)]
#[path = "../tests/test_utils.rs"]
mod test_utils;

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod scope_tests;

#[cfg(test)]
#[path = "../tests/bind_tests.rs"]
mod bind_tests;

#[cfg(test)]
#[path = "../tests/mangle_tests.rs"]
mod mangle_tests;

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod resolver_tests;

#[cfg(test)]
#[path = "../tests/generics_tests.rs"]
mod generics_tests;

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod lower_tests;

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod options_tests;
