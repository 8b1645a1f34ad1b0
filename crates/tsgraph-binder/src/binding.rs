//! Bindings: a name tied to a type, a declaration, and a scope.

use crate::graph::TypeGraph;
use crate::provenance::DeclHandle;
use crate::scope::{ScopeId, escape_name};
use crate::types::TypeId;
use bitflags::bitflags;
use std::borrow::Cow;
use tsgraph_decl::ModifierFlags;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

// =============================================================================
// Kinds and declaration spaces
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Variable,
    Property,
    Function,
    Method,
    /// Call, construct, index signatures and class constructors.
    Signature,
    Parameter,
    TypeParameter,
    Interface,
    Class,
    TypeAlias,
    Namespace,
}

bitflags! {
    /// Which meaning spaces a declaration occupies.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct DeclarationSpace: u8 {
        const VALUE     = 1 << 0;
        const TYPE      = 1 << 1;
        const NAMESPACE = 1 << 2;
    }
}

impl BindingKind {
    pub const fn spaces(self) -> DeclarationSpace {
        match self {
            Self::Class => DeclarationSpace::VALUE.union(DeclarationSpace::TYPE),
            Self::Interface | Self::TypeAlias | Self::TypeParameter => DeclarationSpace::TYPE,
            Self::Namespace => DeclarationSpace::NAMESPACE,
            Self::Variable
            | Self::Property
            | Self::Function
            | Self::Method
            | Self::Signature
            | Self::Parameter => DeclarationSpace::VALUE,
        }
    }

    /// Participates in overload sets.
    #[inline]
    pub const fn is_callable(self) -> bool {
        matches!(self, Self::Function | Self::Method | Self::Signature)
    }
}

/// Declaration-merge predicate.
///
/// Interface/interface, class/interface (either order) and
/// namespace/namespace pairs share one object type; every other same-name
/// pair either overloads, coexists in disjoint spaces, or is a duplicate.
pub const fn is_mergeable_pair(existing: BindingKind, incoming: BindingKind) -> bool {
    use BindingKind::{Class, Interface, Namespace};
    matches!(
        (existing, incoming),
        (Interface, Interface) | (Class, Interface) | (Interface, Class) | (Namespace, Namespace)
    )
}

// =============================================================================
// Special members and parameter roles
// =============================================================================

/// Members keyed by a reserved name instead of user text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecialMember {
    Call,
    New,
    Index,
}

impl SpecialMember {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Call => "__call",
            Self::New => "__new",
            Self::Index => "__index",
        }
    }

    pub const fn display(self) -> &'static str {
        match self {
            Self::Call => "()",
            Self::New => "new",
            Self::Index => "[index]",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "__call" => Some(Self::Call),
            "__new" => Some(Self::New),
            "__index" => Some(Self::Index),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterRole {
    Formal,
    Type,
    This,
}

impl ParameterRole {
    pub(crate) const COUNT: usize = 3;

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

/// A binding's position within its scope's parameter list for one role.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParameterSlot {
    pub role: ParameterRole,
    pub index: u32,
}

// =============================================================================
// Binding
// =============================================================================

#[derive(Clone, Debug)]
pub struct Binding {
    /// Original spelling (special members carry their display form).
    pub name: String,
    pub special: Option<SpecialMember>,
    pub kind: BindingKind,
    pub ty: TypeId,
    pub decl: Option<DeclHandle>,
    pub scope: ScopeId,
    pub modifiers: ModifierFlags,
    pub parameter: Option<ParameterSlot>,
    pub optional: bool,
    pub rest: bool,
}

impl Binding {
    pub fn new(name: impl Into<String>, kind: BindingKind, ty: TypeId, scope: ScopeId) -> Self {
        Self {
            name: name.into(),
            special: None,
            kind,
            ty,
            decl: None,
            scope,
            modifiers: ModifierFlags::empty(),
            parameter: None,
            optional: false,
            rest: false,
        }
    }

    pub fn special(member: SpecialMember, ty: TypeId, scope: ScopeId) -> Self {
        Self {
            special: Some(member),
            ..Self::new(member.display(), BindingKind::Signature, ty, scope)
        }
    }

    #[must_use]
    pub const fn with_decl(mut self, decl: Option<DeclHandle>) -> Self {
        self.decl = decl;
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: ModifierFlags) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    #[must_use]
    pub const fn with_rest(mut self, rest: bool) -> Self {
        self.rest = rest;
        self
    }

    /// Key in the owning scope's table.
    pub fn key(&self) -> Cow<'_, str> {
        match self.special {
            Some(member) => Cow::Borrowed(member.key()),
            None => escape_name(&self.name),
        }
    }

    #[inline]
    pub fn is_a(&self, kind: BindingKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn has_modifier(&self, modifier: ModifierFlags) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Structural type identity (equal mangled contributions).
    pub fn is_identical_type(&self, other: &Binding, graph: &TypeGraph) -> bool {
        self.ty == other.ty || graph.mangle_type(self.ty) == graph.mangle_type(other.ty)
    }

    /// `name$<overload key>` - the string two overloads must not share.
    pub fn get_mangled(&self, graph: &TypeGraph) -> String {
        format!("{}${}", self.key(), graph.mangle_type(self.ty))
    }
}

// =============================================================================
// Overload-set helpers
// =============================================================================

/// The single entry of `set`, if there is exactly one and it has `kind`.
pub fn exactly_one_of(graph: &TypeGraph, set: &[BindingId], kind: BindingKind) -> Option<BindingId> {
    match set {
        [only] if graph.binding(*only).is_some_and(|b| b.is_a(kind)) => Some(*only),
        _ => None,
    }
}

/// Whether every entry of a non-empty `set` satisfies `pred`.
pub fn all_of(graph: &TypeGraph, set: &[BindingId], pred: impl Fn(&Binding) -> bool) -> bool {
    !set.is_empty()
        && set
            .iter()
            .all(|id| graph.binding(*id).is_some_and(|b| pred(b)))
}

/// `set` minus the entries of `kind`.
pub fn without(graph: &TypeGraph, set: &[BindingId], kind: BindingKind) -> Vec<BindingId> {
    set.iter()
        .copied()
        .filter(|id| graph.binding(*id).is_some_and(|b| !b.is_a(kind)))
        .collect()
}
