//! Lowering pass - declaration tree to type graph.
//!
//! [`Binder`] walks a [`NodeArena`] once, dispatching on each node's
//! [`SyntaxKind`]:
//!
//! | Module | Lowers |
//! |--------|--------|
//! | [`names`] | identifier, literal, computed and qualified names |
//! | [`members`] | variables, properties, classes, interfaces, namespaces, aliases |
//! | [`signatures`] | functions, methods, call/construct/index signatures, parameters |
//! | [`type_nodes`] | every node in a type position |
//!
//! Each top-level statement is lowered inside a graph snapshot: it is either
//! fully built and bound, or rolled back. The current scope is an explicit
//! [`ScopeCursor`]; [`Binder::within`] is the only way to descend, and it
//! ascends on every exit path.

mod members;
mod names;
mod signatures;
mod type_nodes;

use crate::binding::{Binding, BindingKind};
use crate::errors::{BindError, Result};
use crate::graph::{BindOutcome, TypeGraph};
use crate::options::BinderOptions;
use crate::provenance::{DeclHandle, FileId};
use crate::reporter::DiagnosticReporter;
use crate::resolver::UnresolvedReport;
use crate::scope::{ScopeCursor, ScopeId};
use tracing::{debug, warn};
use tsgraph_decl::{Node, NodeArena, NodeIndex, SyntaxKind};

/// Drives construction of one [`TypeGraph`] from any number of files.
pub struct Binder {
    graph: TypeGraph,
    options: BinderOptions,
    cursor: ScopeCursor,
    /// File currently being lowered.
    file: FileId,
    depth: u32,
    /// Non-fatal notes raised while binding, drained by reporters.
    warnings: Vec<(String, Option<DeclHandle>)>,
}

impl Binder {
    pub fn new(options: BinderOptions) -> Self {
        Self::with_graph(TypeGraph::new(options.ambient_global), options)
    }

    /// Continue building an existing graph.
    pub fn with_graph(graph: TypeGraph, options: BinderOptions) -> Self {
        Self {
            graph,
            options,
            cursor: ScopeCursor::default(),
            file: FileId::default(),
            depth: 0,
            warnings: Vec::new(),
        }
    }

    #[inline]
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut TypeGraph {
        &mut self.graph
    }

    pub fn into_graph(self) -> TypeGraph {
        self.graph
    }

    #[inline]
    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Scope the cursor points at; the global scope between statements.
    #[inline]
    pub fn current_scope(&self) -> ScopeId {
        self.cursor.current()
    }

    /// Scopes above the root currently on the cursor stack.
    #[inline]
    pub fn cursor_depth(&self) -> usize {
        self.cursor.depth()
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Lower every statement of `root`, stopping at the first fatal error.
    ///
    /// Statements before the failing one stay bound; the failing one is
    /// rolled back.
    #[tracing::instrument(level = "debug", skip(self, arena), fields(root = root.0))]
    pub fn lower_file(&mut self, arena: &NodeArena, root: NodeIndex) -> Result<FileId> {
        let statements = self.begin_file(arena, root)?;
        for statement in statements {
            self.lower_statement(arena, statement)?;
        }
        Ok(self.file)
    }

    /// Lower every statement of `root`, reporting fatal errors to `reporter`
    /// and moving on to the next statement. Returns the number of statements
    /// that failed.
    #[tracing::instrument(level = "debug", skip(self, arena, reporter), fields(root = root.0))]
    pub fn lower_file_with_reporter(
        &mut self,
        arena: &NodeArena,
        root: NodeIndex,
        reporter: &mut dyn DiagnosticReporter,
    ) -> Result<usize> {
        let statements = self.begin_file(arena, root)?;
        let mut failed = 0;
        for statement in statements {
            if let Err(err) = self.lower_statement(arena, statement) {
                failed += 1;
                let at = err.decl();
                let line = at.and_then(|decl| reporter.line_number_of(decl));
                let source = at.and_then(|decl| reporter.source_text_of(decl));
                warn!(code = err.code(), ?line, source, error = %err, "declaration rolled back");
                reporter.error(&self.graph, &err);
            }
            for (message, decl) in self.warnings.drain(..) {
                reporter.warn(&self.graph, &message, decl);
            }
        }
        Ok(failed)
    }

    /// Run the fixpoint pass over every reference still parked.
    pub fn resolve_deferred(&mut self) -> UnresolvedReport {
        self.graph.resolve_deferred()
    }

    /// Resolve deferred references and hand back the finished graph.
    pub fn finish(mut self) -> (TypeGraph, UnresolvedReport) {
        let report = self.graph.resolve_deferred();
        (self.graph, report)
    }

    /// Non-fatal notes collected since the last reporter drain.
    pub fn warnings(&self) -> &[(String, Option<DeclHandle>)] {
        &self.warnings
    }

    fn begin_file(&mut self, arena: &NodeArena, root: NodeIndex) -> Result<Vec<NodeIndex>> {
        let node = self.node(arena, root)?;
        let (name, statements) = match &node.data {
            tsgraph_decl::NodeData::SourceFile {
                file_name,
                statements,
            } => (file_name.as_str(), statements.nodes.clone()),
            _ => ("<declarations>", vec![root]),
        };
        self.file = self.graph.add_file(name);
        self.cursor = ScopeCursor::default();
        self.depth = 0;
        debug!(file = name, statements = statements.len(), "lowering file");
        Ok(statements)
    }

    /// Lower one top-level statement atomically.
    fn lower_statement(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<()> {
        let snapshot = self.graph.snapshot();
        let warnings = self.warnings.len();
        match self.lower_declaration(arena, idx) {
            Ok(()) => {
                self.graph.commit(snapshot);
                Ok(())
            }
            Err(err) => {
                self.graph.rollback_to(snapshot);
                self.warnings.truncate(warnings);
                debug_assert_eq!(self.cursor.depth(), 0, "unbalanced scope cursor");
                self.cursor = ScopeCursor::default();
                self.depth = 0;
                Err(err)
            }
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Lower a statement or member node into the current scope.
    pub(crate) fn lower_declaration(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<()> {
        let node = self.node(arena, idx)?;
        let decl = self.decl(idx, node);
        self.enter(decl)?;
        let result = self.dispatch(arena, idx, node);
        self.depth -= 1;
        result.map_err(|err| err.or_at(decl))
    }

    fn dispatch(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<()> {
        match node.kind {
            SyntaxKind::VariableStatement => self.lower_variable_statement(arena, node),
            SyntaxKind::VariableDeclaration => {
                self.lower_variable(arena, idx, node, node.modifiers)
            }
            SyntaxKind::PropertySignature | SyntaxKind::PropertyDeclaration => {
                self.lower_property(arena, idx, node)
            }
            SyntaxKind::FunctionDeclaration
            | SyntaxKind::MethodSignature
            | SyntaxKind::MethodDeclaration => self.lower_named_signature(arena, idx, node),
            SyntaxKind::CallSignature
            | SyntaxKind::ConstructSignature
            | SyntaxKind::Constructor
            | SyntaxKind::IndexSignature => self.lower_special_signature(arena, idx, node),
            SyntaxKind::InterfaceDeclaration => {
                self.lower_class_like(arena, idx, node, BindingKind::Interface)
            }
            SyntaxKind::ClassDeclaration => {
                self.lower_class_like(arena, idx, node, BindingKind::Class)
            }
            SyntaxKind::ModuleDeclaration => self.lower_namespace(arena, idx, node),
            SyntaxKind::ModuleBlock => {
                let statements = node.list().map(|list| list.nodes.clone()).unwrap_or_default();
                for statement in statements {
                    self.lower_declaration(arena, statement)?;
                }
                Ok(())
            }
            SyntaxKind::TypeAliasDeclaration => self.lower_type_alias(arena, idx, node),
            kind => Err(BindError::UnhandledDeclarationKind {
                kind,
                decl: self.decl(idx, node),
            }),
        }
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Run `f` with `scope` as the current scope.
    pub(crate) fn within<R>(
        &mut self,
        scope: ScopeId,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.cursor.descend(scope);
        let result = f(self);
        self.cursor.ascend();
        result
    }

    fn enter(&mut self, decl: Option<DeclHandle>) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(BindError::DepthExceeded {
                limit: self.options.max_depth,
                decl,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn node<'a>(&self, arena: &'a NodeArena, idx: NodeIndex) -> Result<&'a Node> {
        arena.get(idx).ok_or(BindError::MissingNode { node: idx })
    }

    #[inline]
    pub(crate) const fn decl(&self, idx: NodeIndex, node: &Node) -> Option<DeclHandle> {
        Some(DeclHandle::of(self.file, idx, node))
    }

    /// Bind into the current scope.
    pub(crate) fn bind_here(&mut self, binding: Binding) -> Result<BindOutcome> {
        let scope = self.cursor.current();
        self.bind_in(scope, binding)
    }

    pub(crate) fn bind_in(&mut self, scope: ScopeId, binding: Binding) -> Result<BindOutcome> {
        let name = binding.name.clone();
        let decl = binding.decl;
        let outcome = self.graph.bind(scope, binding)?;
        if let BindOutcome::AmbientOverload(_) = outcome {
            self.warnings
                .push((format!("duplicate overload of '{name}' ignored in ambient scope"), decl));
        }
        Ok(outcome)
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(BinderOptions::default())
    }
}
