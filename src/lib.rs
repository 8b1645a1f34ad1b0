//! tsgraph - scope, binding and type-graph resolution for TypeScript
//! declaration trees.
//!
//! The work happens in the member crates; this crate re-exports them and adds
//! [`analyze`], which lowers a batch of files, runs the fixpoint pass and
//! gathers everything a caller reports into one [`Analysis`].
//!
//! ```text
//! NodeArena ──► Binder (lower each file) ──► resolve_deferred ──► Analysis
//!                    │                                              │
//!                    └─ fatal errors ─► CollectingReporter ─────────┘
//! ```

pub use tsgraph_binder as binder;
pub use tsgraph_common as common;
pub use tsgraph_decl as decl;

pub use tsgraph_binder::{
    BindError, Binder, BinderOptions, CollectingReporter, DiagnosticReporter, TypeGraph,
    UnresolvedReport,
};
pub use tsgraph_common::{Diagnostic, DiagnosticCategory};
pub use tsgraph_decl::{NodeArena, NodeIndex};

// Subscriber setup, driven by TSGRAPH_LOG / TSGRAPH_LOG_FORMAT
pub mod tracing_config;

use tracing::info;

/// One declaration file handed to [`analyze`].
#[derive(Clone, Copy)]
pub struct SourceUnit<'a> {
    pub arena: &'a NodeArena,
    pub root: NodeIndex,
}

impl<'a> SourceUnit<'a> {
    pub const fn new(arena: &'a NodeArena, root: NodeIndex) -> Self {
        Self { arena, root }
    }
}

/// Everything produced by one [`analyze`] run.
pub struct Analysis {
    pub graph: TypeGraph,
    pub unresolved: UnresolvedReport,
    /// Rolled-back declarations and ambient-overload notes, in file order,
    /// followed by one `Cannot find name` error per unresolved reference and
    /// one error per deferred reference that failed to instantiate.
    pub diagnostics: Vec<Diagnostic>,
    /// Top-level statements that failed to lower.
    pub failed_statements: usize,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    /// The unresolved report as JSON (`{ "scope path": ["Name", ...] }`).
    pub fn unresolved_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.unresolved)
    }
}

/// Lower `files` in order into one graph, then resolve forward references.
///
/// A failing top-level statement is rolled back and reported; lowering moves
/// on to the next statement. A deferred reference that fails to instantiate
/// is reported the same way. Only a file whose root node is missing aborts
/// the run.
#[tracing::instrument(level = "info", skip_all, fields(files = files.len()))]
pub fn analyze(files: &[SourceUnit<'_>], options: BinderOptions) -> Result<Analysis, BindError> {
    let mut binder = Binder::new(options);
    let mut reporter = CollectingReporter::new();
    let mut failed_statements = 0;

    for unit in files {
        failed_statements += binder.lower_file_with_reporter(unit.arena, unit.root, &mut reporter)?;
    }

    let (graph, unresolved) = binder.finish();
    let mut diagnostics = reporter.into_diagnostics();
    diagnostics.extend(unresolved.to_diagnostics(&graph, DiagnosticCategory::Error));

    info!(
        scopes = graph.scope_count(),
        bindings = graph.binding_count(),
        types = graph.types().len(),
        failed_statements,
        unresolved = unresolved.len(),
        "analysis complete"
    );
    Ok(Analysis {
        graph,
        unresolved,
        diagnostics,
        failed_statements,
    })
}
