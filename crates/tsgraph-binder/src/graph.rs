//! The type graph: scope, binding and type arenas plus the bind algorithm.
//!
//! All three arenas are `ena` snapshot vectors. Lowering wraps every
//! top-level declaration in a [`GraphSnapshot`]; on failure the snapshot is
//! rolled back and nothing built for that declaration stays reachable.

use crate::binding::{
    Binding, BindingId, BindingKind, ParameterRole, ParameterSlot, is_mergeable_pair,
};
use crate::errors::BindError;
use crate::provenance::{DeclHandle, FileId};
use crate::scope::{OverloadSet, Scope, ScopeId, ScopeOwner};
use crate::types::{ObjectFlavor, TypeArena, TypeData, TypeId, TypeNode};
use ena::snapshot_vec::{Snapshot, SnapshotVec, SnapshotVecDelegate};
use rustc_hash::FxHashMap;
use smallvec::smallvec;
use tracing::{debug, trace};
use tsgraph_decl::ModifierFlags;

// =============================================================================
// Undo logs
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) enum ScopeUndo {
    Bound {
        scope: ScopeId,
        key: String,
        new_key: bool,
    },
    Child(ScopeId),
    Parameter {
        scope: ScopeId,
        role: ParameterRole,
    },
    Owner {
        scope: ScopeId,
        previous: ScopeOwner,
    },
    Ambient {
        scope: ScopeId,
        previous: bool,
    },
}

pub(crate) struct ScopeDelegate;

impl SnapshotVecDelegate for ScopeDelegate {
    type Value = Scope;
    type Undo = ScopeUndo;

    fn reverse(values: &mut Vec<Scope>, action: ScopeUndo) {
        match action {
            ScopeUndo::Bound {
                scope,
                key,
                new_key,
            } => {
                let Some(s) = values.get_mut(scope.0 as usize) else {
                    return;
                };
                if new_key {
                    s.table.shift_remove(&key);
                } else if let Some(set) = s.table.get_mut(&key) {
                    set.pop();
                }
            }
            ScopeUndo::Child(scope) => {
                if let Some(s) = values.get_mut(scope.0 as usize) {
                    s.children.pop();
                }
            }
            ScopeUndo::Parameter { scope, role } => {
                if let Some(s) = values.get_mut(scope.0 as usize) {
                    s.parameters[role.slot()].pop();
                }
            }
            ScopeUndo::Owner { scope, previous } => {
                if let Some(s) = values.get_mut(scope.0 as usize) {
                    s.owner = previous;
                }
            }
            ScopeUndo::Ambient { scope, previous } => {
                if let Some(s) = values.get_mut(scope.0 as usize) {
                    s.ambient = previous;
                }
            }
        }
    }
}

/// Allocation is undone by truncation and in-place updates through
/// `SnapshotVec::update`, so no custom undo entries are needed.
pub(crate) struct BindingDelegate;

impl SnapshotVecDelegate for BindingDelegate {
    type Value = Binding;
    type Undo = ();

    fn reverse(_values: &mut Vec<Binding>, _action: ()) {}
}

// =============================================================================
// Outcomes and snapshots
// =============================================================================

/// How a [`TypeGraph::bind`] call was satisfied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// A new binding was added to the scope table.
    Inserted(BindingId),
    /// Declaration merge: the existing binding absorbs the declaration.
    Merged(BindingId),
    /// Re-declaration with an identical type; the existing binding stands.
    Redeclared(BindingId),
    /// Duplicate overload tolerated in an ambient scope.
    AmbientOverload(BindingId),
}

impl BindOutcome {
    #[inline]
    pub const fn id(self) -> BindingId {
        match self {
            Self::Inserted(id)
            | Self::Merged(id)
            | Self::Redeclared(id)
            | Self::AmbientOverload(id) => id,
        }
    }

    #[inline]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

pub struct GraphSnapshot {
    scopes: Snapshot,
    bindings: Snapshot,
    types: Snapshot,
    pending: usize,
}

// =============================================================================
// TypeGraph
// =============================================================================

pub struct TypeGraph {
    scopes: SnapshotVec<ScopeDelegate>,
    bindings: SnapshotVec<BindingDelegate>,
    pub(crate) types: TypeArena,
    /// References still waiting for their target.
    pub(crate) pending: Vec<TypeId>,
    /// `(template, canonical type arguments)` → instantiation scope.
    pub(crate) instantiations: FxHashMap<(BindingId, Vec<TypeId>), ScopeId>,
    files: Vec<String>,
}

impl TypeGraph {
    /// Fresh graph holding only the global scope and the primitives.
    pub fn new(global_ambient: bool) -> Self {
        let mut scopes = SnapshotVec::new();
        scopes.push(Scope::new(None, global_ambient, Some("global".to_string())));
        Self {
            scopes,
            bindings: SnapshotVec::new(),
            types: TypeArena::new(),
            pending: Vec::new(),
            instantiations: FxHashMap::default(),
            files: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        let index = id.0 as usize;
        (index < self.scopes.len()).then(|| &self.scopes[index])
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[ScopeId::GLOBAL.0 as usize]
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        let index = id.0 as usize;
        (index < self.bindings.len()).then(|| &self.bindings[index])
    }

    pub fn ty(&self, id: TypeId) -> Option<&TypeData> {
        self.types.data(id)
    }

    pub fn type_node(&self, id: TypeId) -> Option<&TypeNode> {
        self.types.get(id)
    }

    pub fn types(&self) -> &TypeArena {
        &self.types
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// References not yet linked to a target.
    pub fn pending_references(&self) -> &[TypeId] {
        &self.pending
    }

    pub fn is_ambient(&self, scope: ScopeId) -> bool {
        self.scope(scope).is_some_and(|s| s.ambient)
    }

    /// Member scope of the type a binding denotes (object body, signature
    /// parameters, alias type parameters).
    pub fn member_scope(&self, binding: BindingId) -> Option<ScopeId> {
        let ty = self.binding(binding)?.ty;
        self.ty(ty)?.scope()
    }

    pub fn add_file(&mut self, name: &str) -> FileId {
        self.files.push(name.to_string());
        FileId((self.files.len() - 1) as u32)
    }

    pub fn file_name(&self, file: FileId) -> Option<&str> {
        self.files.get(file.0 as usize).map(String::as_str)
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[track_caller]
    pub fn alloc_type(&mut self, data: TypeData, decl: Option<DeclHandle>) -> TypeId {
        self.types.alloc(data, decl)
    }

    /// Create a child scope of `outer`. Children of ambient scopes are
    /// ambient.
    pub fn add_inner(&mut self, outer: ScopeId, ambient: bool, name: Option<String>) -> ScopeId {
        let ambient = ambient || self.is_ambient(outer);
        let id = ScopeId(self.scopes.push(Scope::new(Some(outer), ambient, name)) as u32);
        if let Some(parent) = self.scope_mut(outer) {
            parent.children.push(id);
            self.scopes.record(ScopeUndo::Child(outer));
        }
        trace!(scope = id.0, outer = outer.0, ambient, "add_inner");
        id
    }

    pub fn set_scope_owner(&mut self, scope: ScopeId, owner: ScopeOwner) {
        if let Some(s) = self.scope_mut(scope) {
            let previous = std::mem::replace(&mut s.owner, owner);
            self.scopes.record(ScopeUndo::Owner { scope, previous });
        }
    }

    pub fn set_scope_ambient(&mut self, scope: ScopeId) {
        if let Some(s) = self.scope_mut(scope)
            && !s.ambient
        {
            s.ambient = true;
            self.scopes.record(ScopeUndo::Ambient {
                scope,
                previous: false,
            });
        }
    }

    /// A class declared after an interface of the same name takes over the
    /// merged binding: it gains the class kind (and with it the VALUE
    /// meaning), the object becomes a class, and the class modifiers are
    /// added. Returns `false` unless `binding` is an interface.
    pub fn promote_to_class(&mut self, binding: BindingId, modifiers: ModifierFlags) -> bool {
        let Some(object) = self
            .binding(binding)
            .filter(|b| b.kind == BindingKind::Interface)
            .map(|b| b.ty)
        else {
            return false;
        };
        self.bindings.update(binding.0 as usize, |b| {
            b.kind = BindingKind::Class;
            b.modifiers |= modifiers;
        });
        self.types.set_flavor(object, ObjectFlavor::Class);
        debug!(binding = binding.0, "interface promoted to class");
        true
    }

    fn scope_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        let index = id.0 as usize;
        (index < self.scopes.len()).then(|| self.scopes.get_mut(index))
    }

    fn insert(&mut self, scope: ScopeId, key: String, binding: Binding) -> Result<BindingId, BindError> {
        if self.scope(scope).is_none() {
            return Err(BindError::UnknownScope { scope });
        }
        let id = BindingId(self.bindings.push(binding) as u32);
        let s = self.scopes.get_mut(scope.0 as usize);
        let new_key = match s.table.get_mut(&key) {
            Some(set) => {
                set.push(id);
                false
            }
            None => {
                s.table.insert(key.clone(), smallvec![id]);
                true
            }
        };
        trace!(scope = scope.0, key = %key, binding = id.0, "bound");
        self.scopes.record(ScopeUndo::Bound {
            scope,
            key,
            new_key,
        });
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Bind
    // -------------------------------------------------------------------------

    /// Bind `binding` into `scope`.
    ///
    /// Against an existing overload set the rules apply in order:
    /// 1. Only entries sharing a declaration space with `binding` conflict.
    ///    No such entry: the declarations coexist.
    /// 2. All conflicting entries and `binding` callable: overload. An equal
    ///    mangled key is `DuplicateOverload`, tolerated in ambient scopes.
    /// 3. A single conflicting entry forming a mergeable pair: merge.
    /// 4. A single conflicting variable/property with an identical type:
    ///    re-declaration.
    /// 5. Otherwise `DuplicateIdentifier`.
    pub fn bind(&mut self, scope: ScopeId, binding: Binding) -> Result<BindOutcome, BindError> {
        let key = binding.key().into_owned();
        let Some(existing) = self.scope(scope).and_then(|s| s.table.get(&key)).cloned() else {
            return self.insert(scope, key, binding).map(BindOutcome::Inserted);
        };

        let incoming = binding.kind.spaces();
        let conflicting: OverloadSet = existing
            .iter()
            .copied()
            .filter(|id| {
                self.binding(*id)
                    .is_some_and(|b| b.kind.spaces().intersects(incoming))
            })
            .collect();

        if conflicting.is_empty() {
            return self.insert(scope, key, binding).map(BindOutcome::Inserted);
        }

        if binding.kind.is_callable()
            && crate::binding::all_of(self, &conflicting, |b| b.kind.is_callable())
        {
            return self.bind_overload(scope, key, binding, &conflicting);
        }

        if let [only] = conflicting.as_slice()
            && let Some(prior) = self.binding(*only)
        {
            if is_mergeable_pair(prior.kind, binding.kind) {
                debug!(name = %binding.name, binding = only.0, "declaration merge");
                return Ok(BindOutcome::Merged(*only));
            }
            if is_redeclarable(prior, &binding) && prior.is_identical_type(&binding, self) {
                return Ok(BindOutcome::Redeclared(*only));
            }
        }

        Err(BindError::DuplicateIdentifier {
            name: binding.name,
            decl: binding.decl,
            previous: conflicting
                .first()
                .and_then(|id| self.binding(*id))
                .and_then(|b| b.decl),
        })
    }

    fn bind_overload(
        &mut self,
        scope: ScopeId,
        key: String,
        binding: Binding,
        conflicting: &[BindingId],
    ) -> Result<BindOutcome, BindError> {
        let mangled = self.mangle_type(binding.ty);
        let duplicate = conflicting.iter().copied().find(|id| {
            self.binding(*id)
                .is_some_and(|prior| self.mangle_type(prior.ty) == mangled)
        });

        match duplicate {
            None => self.insert(scope, key, binding).map(BindOutcome::Inserted),
            Some(prior) if self.is_ambient(scope) => {
                debug!(name = %binding.name, key = %mangled, "ambient duplicate overload ignored");
                Ok(BindOutcome::AmbientOverload(prior))
            }
            Some(_) => Err(BindError::DuplicateOverload {
                name: binding.name,
                key: mangled,
                decl: binding.decl,
            }),
        }
    }

    /// Bind a parameter and record it under `role`; returns the binding and
    /// its ordinal within that role.
    pub fn bind_parameter(
        &mut self,
        scope: ScopeId,
        mut binding: Binding,
        role: ParameterRole,
    ) -> Result<(BindingId, u32), BindError> {
        let index = self.scope(scope).map_or(0, |s| s.parameters(role).len()) as u32;
        binding.parameter = Some(ParameterSlot { role, index });
        let outcome = self.bind(scope, binding)?;
        if outcome.is_inserted()
            && let Some(s) = self.scope_mut(scope)
        {
            s.parameters[role.slot()].push(outcome.id());
            self.scopes.record(ScopeUndo::Parameter { scope, role });
        }
        Ok((outcome.id(), index))
    }

    /// The binding a declaration of `kind` named `name` would merge into.
    pub fn mergeable_target(&self, scope: ScopeId, name: &str, kind: BindingKind) -> Option<BindingId> {
        let set = self.scope(scope)?.local(name)?;
        let mut conflicting = set.iter().copied().filter(|id| {
            self.binding(*id)
                .is_some_and(|b| b.kind.spaces().intersects(kind.spaces()))
        });
        let only = conflicting.next()?;
        if conflicting.next().is_some() {
            return None;
        }
        self.binding(only)
            .is_some_and(|b| is_mergeable_pair(b.kind, kind))
            .then_some(only)
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    pub fn snapshot(&mut self) -> GraphSnapshot {
        GraphSnapshot {
            scopes: self.scopes.start_snapshot(),
            bindings: self.bindings.start_snapshot(),
            types: self.types.start_snapshot(),
            pending: self.pending.len(),
        }
    }

    pub fn rollback_to(&mut self, snapshot: GraphSnapshot) {
        self.types.rollback_to(snapshot.types);
        self.bindings.rollback_to(snapshot.bindings);
        self.scopes.rollback_to(snapshot.scopes);
        self.pending.truncate(snapshot.pending);

        let (scope_count, binding_count) = (self.scopes.len() as u32, self.bindings.len() as u32);
        self.instantiations
            .retain(|(template, _), scope| template.0 < binding_count && scope.0 < scope_count);
        debug!(
            scopes = scope_count,
            bindings = binding_count,
            types = self.types.len(),
            "rolled back"
        );
    }

    pub fn commit(&mut self, snapshot: GraphSnapshot) {
        self.types.commit(snapshot.types);
        self.bindings.commit(snapshot.bindings);
        self.scopes.commit(snapshot.scopes);
    }
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Non-const variables and non-readonly properties may be re-declared with
/// an identical type.
fn is_redeclarable(prior: &Binding, incoming: &Binding) -> bool {
    let frozen = ModifierFlags::CONST | ModifierFlags::READONLY;
    prior.kind == incoming.kind
        && matches!(prior.kind, BindingKind::Variable | BindingKind::Property)
        && !prior.modifiers.intersects(frozen)
        && !incoming.modifiers.intersects(frozen)
}
