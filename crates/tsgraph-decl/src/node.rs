//! Node record and kind-specific payloads.

use crate::base::{NodeIndex, NodeList};
use crate::flags::{ModifierFlags, NodeFlags};
use crate::syntax_kind::SyntaxKind;

/// A declaration-tree node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: SyntaxKind,
    pub modifiers: ModifierFlags,
    pub flags: NodeFlags,
    /// Start offset in the source text (for external reporters).
    pub pos: u32,
    /// End offset in the source text.
    pub end: u32,
    pub data: NodeData,
}

/// Kind-specific payload.
///
/// Several kinds share one payload shape; the [`SyntaxKind`] tag on the
/// owning [`Node`] disambiguates.
#[derive(Clone, Debug)]
pub enum NodeData {
    /// Keyword types and other leaf nodes.
    None,
    /// `Identifier`, `PrivateIdentifier`, `StringLiteral`, `NumericLiteral`,
    /// and `ComputedPropertyName` (the bracketed expression's source text).
    Text(String),
    /// `A.B` - left is an identifier or another qualified name.
    QualifiedName { left: NodeIndex, right: NodeIndex },
    SourceFile { file_name: String, statements: NodeList },
    /// `ModuleBlock` statements, `VariableStatement` declarations,
    /// `TypeLiteral` members, `TupleType` elements and union/intersection
    /// constituents.
    List(NodeList),
    /// `VariableDeclaration`, `PropertySignature`, `PropertyDeclaration`.
    Variable(VariableData),
    Signature(SignatureData),
    /// `ClassDeclaration`, `InterfaceDeclaration`.
    ClassLike(ClassLikeData),
    Module(ModuleData),
    Parameter(ParameterData),
    TypeAlias(TypeAliasData),
    TypeParameter(TypeParameterData),
    /// `TypeReference`, `TypeQuery`, `ExpressionWithTypeArguments`.
    TypeReference(TypeReferenceData),
    /// A single child: `ArrayType` element, `ParenthesizedType`,
    /// `OptionalType`, `RestType`, `InferType` type parameter, and the
    /// literal node of a `LiteralType`.
    Wrapped(NodeIndex),
    TypeOperator {
        operator: TypeOperatorKind,
        type_node: NodeIndex,
    },
    IndexedAccess(IndexedAccessData),
    Mapped(MappedData),
    Conditional(ConditionalData),
    TypePredicate(TypePredicateData),
}

#[derive(Clone, Debug, Default)]
pub struct VariableData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
}

/// Shared by every signature-like kind (see [`SyntaxKind::is_signature`]).
#[derive(Clone, Debug, Default)]
pub struct SignatureData {
    /// Absent for call/construct/index signatures and function types.
    pub name: NodeIndex,
    pub type_parameters: NodeList,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct ClassLikeData {
    pub name: NodeIndex,
    pub type_parameters: NodeList,
    /// `extends`/`implements` entries (`ExpressionWithTypeArguments`).
    pub heritage: NodeList,
    pub members: NodeList,
}

#[derive(Clone, Debug, Default)]
pub struct ModuleData {
    /// Identifier or string literal (`declare module "fs"`).
    pub name: NodeIndex,
    /// `ModuleBlock`, a nested `ModuleDeclaration` for dotted names, or
    /// absent for shorthand ambient modules.
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct TypeAliasData {
    pub name: NodeIndex,
    pub type_parameters: NodeList,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct TypeReferenceData {
    /// Identifier or qualified name.
    pub type_name: NodeIndex,
    pub type_arguments: NodeList,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeOperatorKind {
    KeyOf,
    Unique,
    Readonly,
}

#[derive(Clone, Debug, Default)]
pub struct IndexedAccessData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct MappedData {
    /// `K in keyof T` - a `TypeParameter` whose constraint is the key source.
    pub type_parameter: NodeIndex,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct ConditionalData {
    pub check_type: NodeIndex,
    pub extends_type: NodeIndex,
    pub true_type: NodeIndex,
    pub false_type: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct TypePredicateData {
    /// Identifier or `ThisType`.
    pub parameter_name: NodeIndex,
    /// Absent for `asserts x`.
    pub type_node: NodeIndex,
}

macro_rules! payload_accessor {
    ($(#[$meta:meta])* $fn_name:ident, $variant:ident, $ty:ty) => {
        $(#[$meta])*
        #[inline]
        pub fn $fn_name(&self) -> Option<&$ty> {
            match &self.data {
                NodeData::$variant(data) => Some(data),
                _ => None,
            }
        }
    };
}

impl Node {
    pub const fn new(kind: SyntaxKind, data: NodeData) -> Self {
        Self {
            kind,
            modifiers: ModifierFlags::empty(),
            flags: NodeFlags::empty(),
            pos: 0,
            end: 0,
            data,
        }
    }

    #[inline]
    pub fn has_modifier(&self, flag: ModifierFlags) -> bool {
        self.modifiers.contains(flag)
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.flags.contains(NodeFlags::OPTIONAL)
    }

    #[inline]
    pub fn is_rest(&self) -> bool {
        self.flags.contains(NodeFlags::REST)
    }

    /// Text of identifier, literal and computed-name nodes.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    #[inline]
    pub fn list(&self) -> Option<&NodeList> {
        match &self.data {
            NodeData::List(list) => Some(list),
            NodeData::SourceFile { statements, .. } => Some(statements),
            _ => None,
        }
    }

    #[inline]
    pub fn qualified_name(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self.data {
            NodeData::QualifiedName { left, right } => Some((left, right)),
            _ => None,
        }
    }

    #[inline]
    pub fn wrapped(&self) -> Option<NodeIndex> {
        match self.data {
            NodeData::Wrapped(inner) => Some(inner),
            _ => None,
        }
    }

    #[inline]
    pub fn type_operator(&self) -> Option<(TypeOperatorKind, NodeIndex)> {
        match self.data {
            NodeData::TypeOperator {
                operator,
                type_node,
            } => Some((operator, type_node)),
            _ => None,
        }
    }

    payload_accessor!(variable, Variable, VariableData);
    payload_accessor!(signature, Signature, SignatureData);
    payload_accessor!(class_like, ClassLike, ClassLikeData);
    payload_accessor!(module, Module, ModuleData);
    payload_accessor!(parameter, Parameter, ParameterData);
    payload_accessor!(type_alias, TypeAlias, TypeAliasData);
    payload_accessor!(type_parameter, TypeParameter, TypeParameterData);
    payload_accessor!(type_reference, TypeReference, TypeReferenceData);
    payload_accessor!(indexed_access, IndexedAccess, IndexedAccessData);
    payload_accessor!(mapped, Mapped, MappedData);
    payload_accessor!(conditional, Conditional, ConditionalData);
    payload_accessor!(type_predicate, TypePredicate, TypePredicateData);
}
