//! Type-position nodes.

use super::Binder;
use crate::binding::{BindingId, BindingKind, exactly_one_of};
use crate::errors::Result;
use crate::scope::ScopeOwner;
use crate::types::{
    ConditionalType, IndexedType, LiteralValue, MappedType, ObjectFlavor, ObjectType, PredicateType,
    PrimitiveKind, SignatureKind, TupleElement, TypeData, TypeId, TypeReference, TypeSet,
};
use smallvec::SmallVec;
use tsgraph_decl::{Node, NodeArena, NodeFlags, NodeIndex, SyntaxKind};

impl Binder {
    /// Lower an optional type annotation, `fallback` when absent.
    pub(crate) fn lower_type_or(&mut self, arena: &NodeArena, idx: NodeIndex, fallback: TypeId) -> Result<TypeId> {
        if idx.is_none() {
            return Ok(fallback);
        }
        self.lower_type(arena, idx)
    }

    pub(crate) fn lower_type(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<TypeId> {
        let node = self.node(arena, idx)?;
        let decl = self.decl(idx, node);
        self.enter(decl)?;
        let result = self.lower_type_node(arena, idx, node);
        self.depth -= 1;
        result
    }

    fn lower_type_node(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<TypeId> {
        let decl = self.decl(idx, node);
        if let Some(kind) = PrimitiveKind::from_keyword(node.kind) {
            return Ok(kind.type_id());
        }

        let data = match node.kind {
            SyntaxKind::TypeReference | SyntaxKind::ExpressionWithTypeArguments | SyntaxKind::TypeQuery => {
                return self.lower_type_reference(arena, idx, node);
            }
            SyntaxKind::TypeLiteral => return self.lower_type_literal(arena, idx, node),
            SyntaxKind::FunctionType => {
                return self.lower_signature(arena, idx, node, SignatureKind::FunctionType, "=>");
            }
            SyntaxKind::ConstructorType => {
                return self.lower_signature(arena, idx, node, SignatureKind::ConstructorType, "new");
            }
            SyntaxKind::ParenthesizedType | SyntaxKind::OptionalType | SyntaxKind::RestType => {
                let inner = node.wrapped().ok_or_else(|| self.unhandled(idx, node))?;
                return self.lower_type(arena, inner);
            }
            SyntaxKind::ArrayType => {
                let element = node.wrapped().ok_or_else(|| self.unhandled(idx, node))?;
                TypeData::Array(self.lower_type(arena, element)?)
            }
            SyntaxKind::TupleType => TypeData::Tuple(self.lower_tuple_elements(arena, node)?),
            SyntaxKind::UnionType | SyntaxKind::IntersectionType => {
                let constituents = self.lower_type_list(arena, node)?;
                if let [only] = constituents.members() {
                    return Ok(*only);
                }
                if node.kind == SyntaxKind::UnionType {
                    TypeData::Union(constituents)
                } else {
                    TypeData::Intersection(constituents)
                }
            }
            SyntaxKind::TypeOperator => {
                let (operator, operand) = node.type_operator().ok_or_else(|| self.unhandled(idx, node))?;
                TypeData::Operator(operator, self.lower_type(arena, operand)?)
            }
            SyntaxKind::IndexedAccessType => {
                let access = node.indexed_access().ok_or_else(|| self.unhandled(idx, node))?;
                TypeData::Indexed(IndexedType {
                    object: self.lower_type(arena, access.object_type)?,
                    index: self.lower_type(arena, access.index_type)?,
                })
            }
            SyntaxKind::MappedType => return self.lower_mapped(arena, idx, node),
            SyntaxKind::ConditionalType => return self.lower_conditional(arena, idx, node),
            SyntaxKind::InferType => {
                let tp = node.wrapped().ok_or_else(|| self.unhandled(idx, node))?;
                TypeData::Infer(self.lower_infer_parameter(arena, tp)?)
            }
            SyntaxKind::TypePredicate => {
                let predicate = node.type_predicate().ok_or_else(|| self.unhandled(idx, node))?;
                let parameter_node = self.node(arena, predicate.parameter_name)?;
                let parameter = match parameter_node.kind {
                    SyntaxKind::ThisType => "this".to_string(),
                    _ => self.declaration_name(arena, predicate.parameter_name)?,
                };
                let ty = match predicate.type_node.into_option() {
                    Some(ty) => Some(self.lower_type(arena, ty)?),
                    None => None,
                };
                TypeData::Predicate(PredicateType {
                    parameter,
                    ty,
                    asserts: node.flags.contains(NodeFlags::ASSERTS),
                })
            }
            SyntaxKind::LiteralType => {
                let literal = node.wrapped().ok_or_else(|| self.unhandled(idx, node))?;
                let literal_node = self.node(arena, literal)?;
                let text = literal_node.text().unwrap_or_default();
                let value = match literal_node.kind {
                    SyntaxKind::StringLiteral => LiteralValue::String(text.to_string()),
                    SyntaxKind::NumericLiteral => {
                        LiteralValue::Number(text.parse().unwrap_or(f64::NAN))
                    }
                    SyntaxKind::TrueKeyword => LiteralValue::Boolean(true),
                    SyntaxKind::FalseKeyword => LiteralValue::Boolean(false),
                    SyntaxKind::NullKeyword => return Ok(TypeId::NULL),
                    _ => return Err(self.unhandled(literal, literal_node)),
                };
                TypeData::Literal(value)
            }
            _ => return Err(self.unhandled(idx, node)),
        };
        Ok(self.graph.alloc_type(data, decl))
    }

    // =========================================================================
    // References
    // =========================================================================

    /// `Name`, `A.B<T>`, `typeof x`, heritage entries. Bare primitive names
    /// return the canonical primitive instead of a reference.
    fn lower_type_reference(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<TypeId> {
        let data = node.type_reference().ok_or_else(|| self.unhandled(idx, node))?;
        let decl = self.decl(idx, node);
        let is_query = node.kind == SyntaxKind::TypeQuery;
        let segments = self.entity_segments(arena, data.type_name)?;

        let mut type_arguments = Vec::with_capacity(data.type_arguments.len());
        for &arg in &data.type_arguments.nodes {
            type_arguments.push(self.lower_type(arena, arg)?);
        }

        if let [single] = segments.as_slice()
            && !is_query
            && type_arguments.is_empty()
            && let Some(kind) = PrimitiveKind::from_name(single)
        {
            return Ok(kind.type_id());
        }

        let scope = self.current_scope();
        let reference = self.graph.alloc_type(
            TypeData::Reference(TypeReference {
                segments,
                type_arguments,
                scope,
                is_query,
                resolved: None,
            }),
            decl,
        );
        self.graph
            .resolve_or_defer(reference)
            .map_err(|err| err.or_at(decl))?;
        Ok(reference)
    }

    // =========================================================================
    // Composite shapes
    // =========================================================================

    fn lower_type_literal(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<TypeId> {
        let members = node.list().map(|list| list.nodes.clone()).unwrap_or_default();
        let decl = self.decl(idx, node);
        let outer = self.current_scope();
        let scope = self
            .graph
            .add_inner(outer, self.options.ambient_interface_bodies, None);
        let object = self.graph.alloc_type(
            TypeData::Object(ObjectType {
                flavor: ObjectFlavor::TypeLiteral,
                name: None,
                scope,
                signatures: SmallVec::new(),
                heritage: Vec::new(),
            }),
            decl,
        );
        self.graph.set_scope_owner(scope, ScopeOwner::Type(object));
        self.within(scope, |this| {
            for member in members {
                this.lower_declaration(arena, member)?;
            }
            Ok(())
        })?;
        Ok(object)
    }

    fn lower_tuple_elements(&mut self, arena: &NodeArena, node: &Node) -> Result<Vec<TupleElement>> {
        let nodes = node.list().map(|list| list.nodes.clone()).unwrap_or_default();
        let mut elements = Vec::with_capacity(nodes.len());
        for idx in nodes {
            let element = self.node(arena, idx)?;
            let (optional, rest) = match element.kind {
                SyntaxKind::OptionalType => (true, false),
                SyntaxKind::RestType => (false, true),
                _ => (false, false),
            };
            elements.push(TupleElement {
                ty: self.lower_type(arena, idx)?,
                optional,
                rest,
            });
        }
        Ok(elements)
    }

    fn lower_type_list(&mut self, arena: &NodeArena, node: &Node) -> Result<TypeSet> {
        let nodes = node.list().map(|list| list.nodes.clone()).unwrap_or_default();
        let mut set = TypeSet::new();
        for idx in nodes {
            set.insert(self.lower_type(arena, idx)?);
        }
        Ok(set)
    }

    /// `{ [K in C]: T }` - `K` is bound in the mapped type's own scope.
    fn lower_mapped(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<TypeId> {
        let data = node.mapped().ok_or_else(|| self.unhandled(idx, node))?;
        let decl = self.decl(idx, node);
        let outer = self.current_scope();
        let scope = self.graph.add_inner(outer, false, None);
        let (key, template) = self.within(scope, |this| {
            let key = this.lower_type_parameter(arena, data.type_parameter)?;
            let template = this.lower_type_or(arena, data.type_node, TypeId::ANY)?;
            Ok((key, template))
        })?;
        let mapped = self.graph.alloc_type(
            TypeData::Mapped(MappedType {
                scope,
                key,
                template,
            }),
            decl,
        );
        self.graph.set_scope_owner(scope, ScopeOwner::Type(mapped));
        Ok(mapped)
    }

    /// `C extends E ? T : F` - `infer` parameters in `E` are bound in the
    /// conditional's scope and visible in `T` only.
    fn lower_conditional(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<TypeId> {
        let data = node.conditional().ok_or_else(|| self.unhandled(idx, node))?;
        let decl = self.decl(idx, node);
        let check_type = self.lower_type(arena, data.check_type)?;
        let outer = self.current_scope();
        let scope = self.graph.add_inner(outer, false, None);
        let (extends_type, true_type) = self.within(scope, |this| {
            let extends_type = this.lower_type(arena, data.extends_type)?;
            let true_type = this.lower_type(arena, data.true_type)?;
            Ok((extends_type, true_type))
        })?;
        let false_type = self.lower_type(arena, data.false_type)?;
        let conditional = self.graph.alloc_type(
            TypeData::Conditional(ConditionalType {
                scope,
                check_type,
                extends_type,
                true_type,
                false_type,
            }),
            decl,
        );
        self.graph.set_scope_owner(scope, ScopeOwner::Type(conditional));
        Ok(conditional)
    }

    /// Repeated `infer U` in one extends clause share a single parameter.
    fn lower_infer_parameter(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<BindingId> {
        let node = self.node(arena, idx)?;
        let data = node.type_parameter().ok_or_else(|| self.unhandled(idx, node))?;
        let name = self.declaration_name(arena, data.name)?;
        let scope = self.current_scope();
        let existing = self
            .graph
            .scope(scope)
            .and_then(|s| s.local(&name))
            .and_then(|set| exactly_one_of(&self.graph, set, BindingKind::TypeParameter));
        match existing {
            Some(id) => Ok(id),
            None => self.lower_type_parameter(arena, idx),
        }
    }
}
