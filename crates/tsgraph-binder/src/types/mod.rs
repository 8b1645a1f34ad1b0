//! Type Graph node variants.
//!
//! Types form a closed tagged union ([`TypeData`]) stored in an undo-logged
//! arena ([`TypeArena`]) and addressed by [`TypeId`]. Nodes never own other
//! nodes; composite shapes hold ids, and member lists live in [`Scope`]s.
//!
//! Per-kind behavior is implemented as free functions over the graph:
//!
//! | Concern | Module |
//! |---------|--------|
//! | Rendering for diagnostics | [`format`] |
//! | Overload mangling contribution | [`mangle`] |
//! | Coarse base-type bucket | [`base`] |
//!
//! [`Scope`]: crate::Scope

pub mod arena;
pub mod base;
pub mod format;
pub mod mangle;

pub use arena::TypeArena;
pub use base::BaseType;
pub use format::TypeFormatter;

use crate::binding::BindingId;
use crate::provenance::Provenance;
use crate::scope::ScopeId;
use smallvec::SmallVec;
use tsgraph_decl::{SyntaxKind, TypeOperatorKind};

// =============================================================================
// TypeId
// =============================================================================

/// Index of a node in the [`TypeArena`].
///
/// Primitive kinds are preloaded at fixed indices so that every mention of
/// `number` in a run is the same node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: Self = PrimitiveKind::Any.type_id();
    pub const NUMBER: Self = PrimitiveKind::Number.type_id();
    pub const STRING: Self = PrimitiveKind::String.type_id();
    pub const BOOLEAN: Self = PrimitiveKind::Boolean.type_id();
    pub const SYMBOL: Self = PrimitiveKind::Symbol.type_id();
    pub const NULL: Self = PrimitiveKind::Null.type_id();
    pub const UNDEFINED: Self = PrimitiveKind::Undefined.type_id();
    pub const VOID: Self = PrimitiveKind::Void.type_id();
    pub const NEVER: Self = PrimitiveKind::Never.type_id();
    pub const THIS: Self = PrimitiveKind::This.type_id();
    pub const UNKNOWN: Self = PrimitiveKind::Unknown.type_id();
    pub const OBJECT: Self = PrimitiveKind::Object.type_id();
    pub const BIGINT: Self = PrimitiveKind::BigInt.type_id();

    /// First index handed out for non-primitive nodes.
    pub const FIRST_USER: u32 = PrimitiveKind::ALL.len() as u32;

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

// =============================================================================
// Primitives
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Any,
    Number,
    String,
    Boolean,
    Symbol,
    Null,
    Undefined,
    Void,
    Never,
    This,
    Unknown,
    Object,
    BigInt,
}

impl PrimitiveKind {
    /// Preload order; position equals the kind's [`TypeId`].
    pub const ALL: [Self; 13] = [
        Self::Any,
        Self::Number,
        Self::String,
        Self::Boolean,
        Self::Symbol,
        Self::Null,
        Self::Undefined,
        Self::Void,
        Self::Never,
        Self::This,
        Self::Unknown,
        Self::Object,
        Self::BigInt,
    ];

    pub const fn type_id(self) -> TypeId {
        TypeId(self as u32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Void => "void",
            Self::Never => "never",
            Self::This => "this",
            Self::Unknown => "unknown",
            Self::Object => "object",
            Self::BigInt => "bigint",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub const fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::AnyKeyword => Self::Any,
            SyntaxKind::NumberKeyword => Self::Number,
            SyntaxKind::StringKeyword => Self::String,
            SyntaxKind::BooleanKeyword => Self::Boolean,
            SyntaxKind::SymbolKeyword => Self::Symbol,
            SyntaxKind::NullKeyword => Self::Null,
            SyntaxKind::UndefinedKeyword => Self::Undefined,
            SyntaxKind::VoidKeyword => Self::Void,
            SyntaxKind::NeverKeyword => Self::Never,
            SyntaxKind::ThisType => Self::This,
            SyntaxKind::UnknownKeyword => Self::Unknown,
            SyntaxKind::ObjectKeyword => Self::Object,
            SyntaxKind::BigIntKeyword => Self::BigInt,
            _ => return None,
        })
    }
}

// =============================================================================
// Type nodes
// =============================================================================

/// A type node plus where it came from.
#[derive(Clone, Debug)]
pub struct TypeNode {
    pub data: TypeData,
    pub provenance: Provenance,
}

#[derive(Clone, Debug)]
pub enum TypeData {
    Primitive(PrimitiveKind),
    Object(ObjectType),
    Signature(SignatureType),
    Array(TypeId),
    Tuple(Vec<TupleElement>),
    Union(TypeSet),
    Intersection(TypeSet),
    Indexed(IndexedType),
    Mapped(MappedType),
    Reference(TypeReference),
    Alias(AliasType),
    TypeParameter(TypeParameterType),
    Conditional(ConditionalType),
    /// `infer U`; the parameter is bound in the enclosing conditional scope.
    Infer(BindingId),
    Predicate(PredicateType),
    Literal(LiteralValue),
    Operator(TypeOperatorKind, TypeId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectFlavor {
    Interface,
    Class,
    TypeLiteral,
    /// Namespace/module body. Never callable.
    Namespace,
}

/// An object-like type owning a member scope.
#[derive(Clone, Debug)]
pub struct ObjectType {
    pub flavor: ObjectFlavor,
    pub name: Option<String>,
    pub scope: ScopeId,
    /// Call and construct signatures recorded on this object.
    pub signatures: SmallVec<[TypeId; 1]>,
    /// `extends`/`implements` references.
    pub heritage: Vec<TypeId>,
}

impl ObjectType {
    #[inline]
    pub fn is_callable(&self) -> bool {
        !self.signatures.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Function,
    Method,
    Call,
    Construct,
    Constructor,
    Index,
    FunctionType,
    ConstructorType,
}

/// A single signature. Parameters and type parameters are the scope's
/// role-ordered parameter lists.
#[derive(Clone, Debug)]
pub struct SignatureType {
    pub kind: SignatureKind,
    pub scope: ScopeId,
    pub return_type: TypeId,
    pub this_type: Option<TypeId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TupleElement {
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// Constituents of a union or intersection, deduplicated by identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSet {
    members: SmallVec<[TypeId; 4]>,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constituent; returns `false` if it was already present.
    pub fn insert(&mut self, ty: TypeId) -> bool {
        if self.has(ty) {
            return false;
        }
        self.members.push(ty);
        true
    }

    #[inline]
    pub fn has(&self, ty: TypeId) -> bool {
        self.members.contains(&ty)
    }

    /// Same constituents regardless of order.
    pub fn same(&self, other: &TypeSet) -> bool {
        self.members.len() == other.members.len() && self.members.iter().all(|ty| other.has(*ty))
    }

    #[inline]
    pub fn members(&self) -> &[TypeId] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<TypeId> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeId>>(iter: I) -> Self {
        let mut set = TypeSet::new();
        for ty in iter {
            set.insert(ty);
        }
        set
    }
}

#[derive(Copy, Clone, Debug)]
pub struct IndexedType {
    pub object: TypeId,
    pub index: TypeId,
}

/// `{ [K in C]: T }` - `key` is the type-parameter binding for `K`.
#[derive(Clone, Debug)]
pub struct MappedType {
    pub scope: ScopeId,
    pub key: BindingId,
    pub template: TypeId,
}

/// A name plus optional type arguments, linked to its target once resolved.
#[derive(Clone, Debug)]
pub struct TypeReference {
    /// Dotted name split into segments (`A.B.C`).
    pub segments: SmallVec<[String; 1]>,
    pub type_arguments: Vec<TypeId>,
    /// Scope the reference was written in; lookups start here.
    pub scope: ScopeId,
    /// `typeof x`: prefer value-space bindings.
    pub is_query: bool,
    pub resolved: Option<ResolvedRef>,
}

impl TypeReference {
    pub fn name(&self) -> String {
        self.segments.join(".")
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRef {
    pub target: RefTarget,
    /// Instantiation scope when the reference carried type arguments.
    pub instantiation: Option<ScopeId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefTarget {
    Primitive(PrimitiveKind),
    Binding(BindingId),
}

/// `type Name<P> = target`; `scope` holds the type parameters.
#[derive(Clone, Debug)]
pub struct AliasType {
    pub name: String,
    pub scope: ScopeId,
    pub target: TypeId,
}

#[derive(Clone, Debug)]
pub struct TypeParameterType {
    pub name: String,
    pub constraint: Option<TypeId>,
    /// Constraint was written `keyof X`; `constraint` holds `X`.
    pub is_keyof: bool,
    pub default: Option<TypeId>,
}

#[derive(Clone, Debug)]
pub struct ConditionalType {
    /// Holds `infer` parameters introduced by `extends_type`.
    pub scope: ScopeId,
    pub check_type: TypeId,
    pub extends_type: TypeId,
    pub true_type: TypeId,
    pub false_type: TypeId,
}

#[derive(Clone, Debug)]
pub struct PredicateType {
    pub parameter: String,
    pub ty: Option<TypeId>,
    pub asserts: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl TypeData {
    /// Member scope for object-like and generic-carrying nodes.
    pub fn scope(&self) -> Option<ScopeId> {
        match self {
            Self::Object(obj) => Some(obj.scope),
            Self::Signature(sig) => Some(sig.scope),
            Self::Mapped(mapped) => Some(mapped.scope),
            Self::Alias(alias) => Some(alias.scope),
            Self::Conditional(cond) => Some(cond.scope),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_signature(&self) -> Option<&SignatureType> {
        match self {
            Self::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    #[inline]
    pub fn as_reference(&self) -> Option<&TypeReference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    #[inline]
    pub fn as_type_parameter(&self) -> Option<&TypeParameterType> {
        match self {
            Self::TypeParameter(param) => Some(param),
            _ => None,
        }
    }
}
