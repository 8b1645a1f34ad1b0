//! Scope tree.
//!
//! A [`Scope`] is an insertion-ordered name → overload-set table with an
//! outer link, child links, an owner, and role-ordered parameter lists.
//! Scopes are stored in the graph's scope arena and addressed by
//! [`ScopeId`]; [`ScopeId::GLOBAL`] is the root and the only scope without
//! an outer link.
//!
//! Table keys are *escaped* names: a user name starting with `__` gets one
//! extra leading underscore, leaving the `__call` / `__new` / `__index` keys
//! free for [`SpecialMember`]s. Iteration unescapes, so callers always see
//! the original spelling.

use crate::binding::{BindingId, ParameterRole, SpecialMember};
use crate::types::TypeId;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::borrow::Cow;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const GLOBAL: Self = Self(0);

    #[inline]
    pub const fn is_global(self) -> bool {
        self.0 == 0
    }
}

/// What caused a scope to exist.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScopeOwner {
    #[default]
    None,
    /// Instantiation scopes are owned by their generic template binding.
    Binding(BindingId),
    /// Member and parameter scopes are owned by the object/signature type.
    Type(TypeId),
}

/// One overload set: every binding declared under a name in one scope.
pub type OverloadSet = SmallVec<[BindingId; 1]>;

pub(crate) type ScopeTable = IndexMap<String, OverloadSet, FxBuildHasher>;

#[derive(Clone, Debug)]
pub struct Scope {
    pub outer: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub owner: ScopeOwner,
    /// Declare-only context: duplicate overloads are tolerated.
    pub ambient: bool,
    /// Display name used for scope paths (`Box`, `f`, `()`).
    pub name: Option<String>,
    pub(crate) table: ScopeTable,
    pub(crate) parameters: [Vec<BindingId>; ParameterRole::COUNT],
}

impl Scope {
    pub fn new(outer: Option<ScopeId>, ambient: bool, name: Option<String>) -> Self {
        Self {
            outer,
            children: Vec::new(),
            owner: ScopeOwner::None,
            ambient,
            name,
            table: ScopeTable::default(),
            parameters: Default::default(),
        }
    }

    /// Overload set declared locally under `name` (original spelling).
    pub fn local(&self, name: &str) -> Option<&[BindingId]> {
        self.table.get(escape_name(name).as_ref()).map(SmallVec::as_slice)
    }

    pub fn special(&self, member: SpecialMember) -> Option<&[BindingId]> {
        self.table.get(member.key()).map(SmallVec::as_slice)
    }

    /// Entries in declaration order, names unescaped for display.
    pub fn entries(&self) -> impl Iterator<Item = (Cow<'_, str>, &[BindingId])> {
        self.table
            .iter()
            .map(|(key, set)| (display_key(key), set.as_slice()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Bindings recorded under `role`, in ordinal order.
    #[inline]
    pub fn parameters(&self, role: ParameterRole) -> &[BindingId] {
        &self.parameters[role.slot()]
    }
}

// =============================================================================
// Name escaping
// =============================================================================

/// Table key for a user-written name.
pub fn escape_name(name: &str) -> Cow<'_, str> {
    if name.starts_with("__") {
        Cow::Owned(format!("_{name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Inverse of [`escape_name`]. Unescaped `__` keys are special members and
/// are returned as-is.
pub fn unescape_name(key: &str) -> &str {
    if key.starts_with("___") { &key[1..] } else { key }
}

fn display_key(key: &str) -> Cow<'_, str> {
    match SpecialMember::from_key(key) {
        Some(member) => Cow::Borrowed(member.display()),
        None => Cow::Borrowed(unescape_name(key)),
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Explicit current-scope stack owned by one lowering run.
///
/// The root entry is never popped, so `current` is always defined.
#[derive(Clone, Debug)]
pub struct ScopeCursor {
    stack: Vec<ScopeId>,
}

impl ScopeCursor {
    pub fn new(root: ScopeId) -> Self {
        Self { stack: vec![root] }
    }

    #[inline]
    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::GLOBAL)
    }

    pub fn descend(&mut self, scope: ScopeId) {
        self.stack.push(scope);
    }

    /// Pop the current scope; returns `None` at the root.
    pub fn ascend(&mut self) -> Option<ScopeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Number of scopes above the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}

impl Default for ScopeCursor {
    fn default() -> Self {
        Self::new(ScopeId::GLOBAL)
    }
}
