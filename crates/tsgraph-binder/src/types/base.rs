//! Coarse base-type buckets.
//!
//! A bucket answers "roughly what is this?" (number-like, function-like,
//! object-like) without any subtype reasoning. References and aliases are
//! classified through their targets.

use super::{LiteralValue, ObjectFlavor, PrimitiveKind, RefTarget, TypeData, TypeId};
use crate::graph::TypeGraph;
use tsgraph_common::limits::MAX_REFERENCE_CHAIN;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    Any,
    Unknown,
    Never,
    Void,
    Nullish,
    NumberLike,
    StringLike,
    BooleanLike,
    SymbolLike,
    FunctionLike,
    ObjectLike,
    Namespace,
    Union,
    Intersection,
    TypeParameter,
    /// Indexed, mapped, conditional and operator types.
    Computed,
    Unresolved,
}

impl BaseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Void => "void",
            Self::Nullish => "nullish",
            Self::NumberLike => "number",
            Self::StringLike => "string",
            Self::BooleanLike => "boolean",
            Self::SymbolLike => "symbol",
            Self::FunctionLike => "function",
            Self::ObjectLike => "object",
            Self::Namespace => "namespace",
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::TypeParameter => "typeparam",
            Self::Computed => "computed",
            Self::Unresolved => "unresolved",
        }
    }

    const fn of_primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Any => Self::Any,
            PrimitiveKind::Unknown => Self::Unknown,
            PrimitiveKind::Never => Self::Never,
            PrimitiveKind::Void => Self::Void,
            PrimitiveKind::Null | PrimitiveKind::Undefined => Self::Nullish,
            PrimitiveKind::Number | PrimitiveKind::BigInt => Self::NumberLike,
            PrimitiveKind::String => Self::StringLike,
            PrimitiveKind::Boolean => Self::BooleanLike,
            PrimitiveKind::Symbol => Self::SymbolLike,
            PrimitiveKind::Object | PrimitiveKind::This => Self::ObjectLike,
        }
    }
}

impl TypeGraph {
    /// Base-type bucket of `ty`, following references and aliases.
    pub fn base_type(&self, ty: TypeId) -> BaseType {
        let mut current = ty;
        for _ in 0..MAX_REFERENCE_CHAIN {
            let Some(data) = self.ty(current) else {
                return BaseType::Unresolved;
            };
            current = match data {
                TypeData::Primitive(kind) => return BaseType::of_primitive(*kind),
                TypeData::Object(obj) if obj.flavor == ObjectFlavor::Namespace => {
                    return BaseType::Namespace;
                }
                TypeData::Object(obj) if obj.is_callable() => return BaseType::FunctionLike,
                TypeData::Object(_) | TypeData::Array(_) | TypeData::Tuple(_) => {
                    return BaseType::ObjectLike;
                }
                TypeData::Mapped(_) => return BaseType::ObjectLike,
                TypeData::Signature(_) => return BaseType::FunctionLike,
                TypeData::Union(_) => return BaseType::Union,
                TypeData::Intersection(_) => return BaseType::Intersection,
                TypeData::TypeParameter(_) | TypeData::Infer(_) => return BaseType::TypeParameter,
                TypeData::Predicate(_) => return BaseType::BooleanLike,
                TypeData::Literal(LiteralValue::String(_)) => return BaseType::StringLike,
                TypeData::Literal(LiteralValue::Number(_)) => return BaseType::NumberLike,
                TypeData::Literal(LiteralValue::Boolean(_)) => return BaseType::BooleanLike,
                TypeData::Indexed(_) | TypeData::Conditional(_) | TypeData::Operator(..) => {
                    return BaseType::Computed;
                }
                TypeData::Alias(alias) => alias.target,
                TypeData::Reference(reference) => match reference.resolved.map(|r| r.target) {
                    None => return BaseType::Unresolved,
                    Some(RefTarget::Primitive(kind)) => return BaseType::of_primitive(kind),
                    Some(RefTarget::Binding(id)) => match self.binding(id) {
                        Some(binding) => binding.ty,
                        None => return BaseType::Unresolved,
                    },
                },
            };
        }
        BaseType::Unresolved
    }

    #[inline]
    pub fn is_base_type(&self, ty: TypeId, base: BaseType) -> bool {
        self.base_type(ty) == base
    }

    /// Whether a union/intersection has a constituent in bucket `base`.
    /// Non-composite types are treated as a single constituent.
    pub fn has_kind(&self, ty: TypeId, base: BaseType) -> bool {
        match self.ty(ty) {
            Some(TypeData::Union(set) | TypeData::Intersection(set)) => set
                .members()
                .iter()
                .any(|member| self.is_base_type(*member, base)),
            Some(_) => self.is_base_type(ty, base),
            None => false,
        }
    }
}
