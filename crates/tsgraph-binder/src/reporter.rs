//! Injected diagnostics collaborator.
//!
//! The lowering pass forwards fatal errors and warnings to a
//! [`DiagnosticReporter`] when one is supplied. Reporting affects diagnostic
//! quality only: the graph is built the same way with or without one.

use crate::errors::BindError;
use crate::graph::TypeGraph;
use crate::provenance::DeclHandle;
use tsgraph_common::diagnostics::{Diagnostic, DiagnosticCategory};

/// Source-location aware reporter. Every method is optional.
pub trait DiagnosticReporter {
    fn error(&mut self, _graph: &TypeGraph, _error: &BindError) {}

    fn warn(&mut self, _graph: &TypeGraph, _message: &str, _decl: Option<DeclHandle>) {}

    /// 1-based line of `decl`, if the reporter has the source text.
    fn line_number_of(&self, _decl: DeclHandle) -> Option<u32> {
        None
    }

    fn source_text_of(&self, _decl: DeclHandle) -> Option<&str> {
        None
    }
}

/// Reporter that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl DiagnosticReporter for NullReporter {}

/// Collects reports as [`Diagnostic`] records.
#[derive(Clone, Debug, Default)]
pub struct CollectingReporter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn error(&mut self, graph: &TypeGraph, error: &BindError) {
        self.diagnostics.push(error.to_diagnostic(graph));
    }

    fn warn(&mut self, graph: &TypeGraph, message: &str, decl: Option<DeclHandle>) {
        let (file, start, length) = match decl {
            Some(decl) => (
                graph.file_name(decl.file).unwrap_or_default().to_string(),
                decl.pos,
                decl.len(),
            ),
            None => (String::new(), 0, 0),
        };
        self.diagnostics
            .push(Diagnostic::warning(file, start, length, message.to_string(), 0));
    }
}
