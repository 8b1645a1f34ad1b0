//! Name lookup and deferred (fixpoint) resolution of type references.
//!
//! A reference is resolved the moment it is lowered if its target already
//! exists. Otherwise it is parked in the graph's pending list, and
//! [`TypeGraph::resolve_deferred`] retries every parked reference until a
//! full pass makes no progress. Whatever is left is reported, grouped by the
//! path of the scope the reference was written in.

use crate::binding::{BindingId, DeclarationSpace};
use crate::errors::BindError;
use crate::graph::TypeGraph;
use crate::provenance::DeclHandle;
use crate::scope::ScopeId;
use crate::types::{PrimitiveKind, RefTarget, ResolvedRef, TypeData, TypeId};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, trace};
use tsgraph_common::diagnostics::{
    Diagnostic, DiagnosticCategory, diagnostic_codes, format_message, get_message_template,
};
use tsgraph_common::limits::{MAX_REFERENCE_CHAIN, MAX_SCOPE_WALK_ITERATIONS};

/// Result of a name lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution<'g> {
    /// Primitives are global and cannot be shadowed.
    Primitive(PrimitiveKind),
    /// The overload set of the nearest scope declaring the name.
    Bindings(&'g [BindingId]),
}

impl TypeGraph {
    // =========================================================================
    // Lookup
    // =========================================================================

    /// Look `name` up from `scope`: primitives, then the local table, then
    /// (unless `local_only`) the outer chain up to the global scope.
    pub fn resolve(&self, scope: ScopeId, name: &str, local_only: bool) -> Option<Resolution<'_>> {
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Some(Resolution::Primitive(kind));
        }
        let mut current = Some(scope);
        for _ in 0..MAX_SCOPE_WALK_ITERATIONS {
            let s = self.scope(current?)?;
            if let Some(set) = s.local(name) {
                return Some(Resolution::Bindings(set));
            }
            if local_only {
                return None;
            }
            current = s.outer;
        }
        None
    }

    /// First entry of `set` occupying a space in `prefer`, else the first
    /// entry.
    pub fn pick(&self, set: &[BindingId], prefer: DeclarationSpace) -> Option<BindingId> {
        self.pick_in_space(set, prefer)
            .or_else(|| set.first().copied())
    }

    fn pick_in_space(&self, set: &[BindingId], prefer: DeclarationSpace) -> Option<BindingId> {
        set.iter().copied().find(|id| {
            self.binding(*id)
                .is_some_and(|b| b.kind.spaces().intersects(prefer))
        })
    }

    /// Scope-chain lookup that skips declarations outside `prefer`: a type
    /// reference `Bar` inside an interface with a property `Bar` still finds
    /// the outer type. Falls back to the nearest declaration of any space.
    fn lookup_in_space(&self, scope: ScopeId, name: &str, prefer: DeclarationSpace) -> Option<RefTarget> {
        let mut fallback = None;
        let mut current = Some(scope);
        for _ in 0..MAX_SCOPE_WALK_ITERATIONS {
            let Some(id) = current else { break };
            match self.resolve(id, name, true) {
                Some(Resolution::Primitive(kind)) => return Some(RefTarget::Primitive(kind)),
                Some(Resolution::Bindings(set)) => {
                    if let Some(found) = self.pick_in_space(set, prefer) {
                        return Some(RefTarget::Binding(found));
                    }
                    if fallback.is_none() {
                        fallback = set.first().copied();
                    }
                }
                None => {}
            }
            current = self.scope(id).and_then(|s| s.outer);
        }
        fallback.map(RefTarget::Binding)
    }

    /// Resolve a possibly dotted name. The first segment walks the scope
    /// chain; each further segment is looked up in the member scope of the
    /// previous segment's type.
    pub fn lookup_target(&self, scope: ScopeId, segments: &[String], is_query: bool) -> Option<RefTarget> {
        let (first, rest) = segments.split_first()?;
        let final_space = if is_query {
            DeclarationSpace::VALUE
        } else {
            DeclarationSpace::TYPE
        };
        let container_space = DeclarationSpace::NAMESPACE;

        let first_space = if rest.is_empty() { final_space } else { container_space };
        let mut binding = match self.lookup_in_space(scope, first, first_space)? {
            RefTarget::Primitive(kind) => {
                return rest.is_empty().then_some(RefTarget::Primitive(kind));
            }
            RefTarget::Binding(id) => id,
        };

        for (i, segment) in rest.iter().enumerate() {
            let space = if i + 1 == rest.len() { final_space } else { container_space };
            let members = self.member_scope(binding)?;
            let set = self.scope(members)?.local(segment)?;
            binding = self.pick(set, space)?;
        }
        Some(RefTarget::Binding(binding))
    }

    // =========================================================================
    // Reference resolution
    // =========================================================================

    /// Try to link `reference` to its target. `Ok(false)` means the target
    /// does not exist (yet).
    pub(crate) fn try_resolve(&mut self, reference: TypeId) -> Result<bool, BindError> {
        let Some(TypeData::Reference(r)) = self.ty(reference) else {
            return Ok(true);
        };
        if r.is_resolved() {
            return Ok(true);
        }
        let Some(target) = self.lookup_target(r.scope, &r.segments, r.is_query) else {
            return Ok(false);
        };
        let type_arguments = r.type_arguments.clone();
        let decl = self.type_node(reference).and_then(|node| node.provenance.decl);

        let instantiation = match target {
            RefTarget::Binding(template) if !type_arguments.is_empty() => {
                Some(self.instantiate(template, &type_arguments, &[], decl)?)
            }
            _ => None,
        };
        self.types.set_resolution(
            reference,
            ResolvedRef {
                target,
                instantiation,
            },
        );
        trace!(reference = reference.0, ?target, "resolved");
        Ok(true)
    }

    /// Resolve now, or park the reference for the fixpoint pass.
    pub(crate) fn resolve_or_defer(&mut self, reference: TypeId) -> Result<(), BindError> {
        if !self.try_resolve(reference)? {
            self.pending.push(reference);
        }
        Ok(())
    }

    /// Retry every parked reference until a pass resolves nothing new.
    ///
    /// A reference whose target turns up but cannot be instantiated (wrong
    /// type-argument count, failed deduction) is dropped from the pending
    /// list and reported as a failure; the pass carries on with the rest.
    #[tracing::instrument(level = "debug", skip(self), fields(pending = self.pending.len()))]
    pub fn resolve_deferred(&mut self) -> UnresolvedReport {
        let mut failures = Vec::new();
        let mut pass = 0u32;
        loop {
            pass += 1;
            let before = self.pending.len();
            let parked = std::mem::take(&mut self.pending);
            let mut remaining = Vec::with_capacity(before);

            for reference in parked {
                let snapshot = self.snapshot();
                match self.try_resolve(reference) {
                    Ok(resolved) => {
                        self.commit(snapshot);
                        if !resolved {
                            remaining.push(reference);
                        }
                    }
                    Err(err) => {
                        self.rollback_to(snapshot);
                        debug!(reference = reference.0, error = %err, "deferred reference failed");
                        failures.push(err);
                    }
                }
            }

            let settled = before - remaining.len();
            self.pending = remaining;
            debug!(pass, settled, remaining = self.pending.len(), "fixpoint pass");
            if settled == 0 || self.pending.is_empty() {
                break;
            }
        }
        let mut report = self.unresolved_report();
        report.failures = failures;
        report
    }

    /// Snapshot of the references still parked, grouped by scope path.
    pub fn unresolved_report(&self) -> UnresolvedReport {
        let mut report = UnresolvedReport::default();
        for &reference in &self.pending {
            let Some(TypeData::Reference(r)) = self.ty(reference) else {
                continue;
            };
            let entry = UnresolvedReference {
                name: r.name(),
                scope_path: self.scope_path(r.scope),
                reference,
                decl: self.type_node(reference).and_then(|node| node.provenance.decl),
            };
            report.push(entry);
        }
        report
    }

    /// Scope names from the global scope inward, joined with `" > "`.
    pub fn scope_path(&self, scope: ScopeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(scope);
        for _ in 0..MAX_SCOPE_WALK_ITERATIONS {
            let Some(s) = current.and_then(|id| self.scope(id)) else {
                break;
            };
            if let Some(name) = &s.name {
                names.push(name.as_str());
            }
            current = s.outer;
        }
        names.reverse();
        names.join(" > ")
    }

    /// Follow reference and alias chains to the type they finally denote.
    /// Unresolved references are returned as-is.
    pub fn follow(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..MAX_REFERENCE_CHAIN {
            current = match self.ty(current) {
                Some(TypeData::Reference(r)) => match r.resolved.map(|resolved| resolved.target) {
                    Some(RefTarget::Primitive(kind)) => return kind.type_id(),
                    Some(RefTarget::Binding(id)) => match self.binding(id) {
                        Some(binding) => binding.ty,
                        None => return current,
                    },
                    None => return current,
                },
                Some(TypeData::Alias(alias)) => alias.target,
                _ => return current,
            };
        }
        current
    }
}

// =============================================================================
// Unresolved report
// =============================================================================

/// One reference that survived the fixpoint pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub name: String,
    pub scope_path: String,
    pub reference: TypeId,
    pub decl: Option<DeclHandle>,
}

/// Scope path → unresolved names. Serializes as that map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnresolvedReport {
    by_scope: IndexMap<String, IndexSet<String>>,
    #[serde(skip)]
    references: Vec<UnresolvedReference>,
    /// References whose target was found but could not be instantiated.
    #[serde(skip)]
    failures: Vec<BindError>,
}

impl UnresolvedReport {
    fn push(&mut self, reference: UnresolvedReference) {
        self.by_scope
            .entry(reference.scope_path.clone())
            .or_default()
            .insert(reference.name.clone());
        self.references.push(reference);
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty() && self.failures.is_empty()
    }

    /// Number of unresolved references (not distinct names).
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn get(&self, scope_path: &str) -> Option<&IndexSet<String>> {
        self.by_scope.get(scope_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.by_scope.iter().map(|(path, names)| (path.as_str(), names))
    }

    pub fn references(&self) -> &[UnresolvedReference] {
        &self.references
    }

    pub fn failures(&self) -> &[BindError] {
        &self.failures
    }

    /// One `Cannot find name` diagnostic per reference, with the caller's
    /// severity, followed by one error per failed instantiation.
    pub fn to_diagnostics(&self, graph: &TypeGraph, category: DiagnosticCategory) -> Vec<Diagnostic> {
        let template =
            get_message_template(diagnostic_codes::CANNOT_FIND_NAME).unwrap_or("Cannot find name '{0}'.");
        self.references
            .iter()
            .map(|reference| {
                let (file, start, length) = match reference.decl {
                    Some(decl) => (
                        graph.file_name(decl.file).unwrap_or_default().to_string(),
                        decl.pos,
                        decl.len(),
                    ),
                    None => (String::new(), 0, 0),
                };
                Diagnostic::error(
                    file,
                    start,
                    length,
                    format_message(template, &[reference.name.as_str()]),
                    diagnostic_codes::CANNOT_FIND_NAME,
                )
                .with_category(category)
            })
            .chain(self.failures.iter().map(|err| err.to_diagnostic(graph)))
            .collect()
    }
}
