//! NodeArena storage and creation methods (add_* helpers).
//!
//! Front ends that already own a parser can push fully formed [`Node`]s via
//! [`NodeArena::add`]. The typed helpers below build the common declaration
//! shapes directly and are what hand-written trees (tests, benchmarks,
//! generated stubs) use.

use crate::base::{NodeIndex, NodeList};
use crate::flags::{ModifierFlags, NodeFlags};
use crate::node::*;
use crate::syntax_kind::SyntaxKind;

/// Arena owning every node of one declaration tree.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get_mut(idx.0 as usize)
    }

    /// Append a node and return its index.
    ///
    /// Nodes without a span get a synthetic one-unit span at their index so
    /// reporters can still tell nodes apart.
    pub fn add(&mut self, mut node: Node) -> NodeIndex {
        let idx = self.nodes.len() as u32;
        if node.pos == 0 && node.end == 0 {
            node.pos = idx;
            node.end = idx + 1;
        }
        self.nodes.push(node);
        NodeIndex(idx)
    }

    pub fn add_node(&mut self, kind: SyntaxKind, data: NodeData) -> NodeIndex {
        self.add(Node::new(kind, data))
    }

    // =========================================================================
    // Node adjustments
    // =========================================================================

    pub fn with_modifiers(&mut self, idx: NodeIndex, modifiers: ModifierFlags) -> NodeIndex {
        if let Some(node) = self.get_mut(idx) {
            node.modifiers |= modifiers;
        }
        idx
    }

    pub fn with_flags(&mut self, idx: NodeIndex, flags: NodeFlags) -> NodeIndex {
        if let Some(node) = self.get_mut(idx) {
            node.flags |= flags;
        }
        idx
    }

    pub fn set_span(&mut self, idx: NodeIndex, pos: u32, end: u32) {
        if let Some(node) = self.get_mut(idx) {
            node.pos = pos;
            node.end = end;
        }
    }

    // =========================================================================
    // Names and literals
    // =========================================================================

    pub fn identifier(&mut self, text: &str) -> NodeIndex {
        self.add_node(SyntaxKind::Identifier, NodeData::Text(text.to_string()))
    }

    pub fn private_identifier(&mut self, text: &str) -> NodeIndex {
        self.add_node(
            SyntaxKind::PrivateIdentifier,
            NodeData::Text(text.to_string()),
        )
    }

    pub fn string_literal(&mut self, text: &str) -> NodeIndex {
        self.add_node(SyntaxKind::StringLiteral, NodeData::Text(text.to_string()))
    }

    pub fn numeric_literal(&mut self, text: &str) -> NodeIndex {
        self.add_node(SyntaxKind::NumericLiteral, NodeData::Text(text.to_string()))
    }

    /// `[expression]` property name; `expression` is the source text.
    pub fn computed_name(&mut self, expression: &str) -> NodeIndex {
        self.add_node(
            SyntaxKind::ComputedPropertyName,
            NodeData::Text(expression.to_string()),
        )
    }

    /// Identifier, or a left-nested `QualifiedName` chain for dotted input.
    pub fn entity_name(&mut self, dotted: &str) -> NodeIndex {
        let mut segments = dotted.split('.');
        let first = segments.next().unwrap_or_default();
        let mut left = self.identifier(first);
        for segment in segments {
            let right = self.identifier(segment);
            left = self.add_node(
                SyntaxKind::QualifiedName,
                NodeData::QualifiedName { left, right },
            );
        }
        left
    }

    // =========================================================================
    // Type nodes
    // =========================================================================

    pub fn keyword(&mut self, kind: SyntaxKind) -> NodeIndex {
        debug_assert!(
            kind.is_keyword_type() || matches!(kind, SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword)
        );
        self.add_node(kind, NodeData::None)
    }

    pub fn type_reference(&mut self, name: &str, type_arguments: Vec<NodeIndex>) -> NodeIndex {
        let type_name = self.entity_name(name);
        self.add_node(
            SyntaxKind::TypeReference,
            NodeData::TypeReference(TypeReferenceData {
                type_name,
                type_arguments: type_arguments.into(),
            }),
        )
    }

    /// `typeof name`
    pub fn type_query(&mut self, name: &str) -> NodeIndex {
        let type_name = self.entity_name(name);
        self.add_node(
            SyntaxKind::TypeQuery,
            NodeData::TypeReference(TypeReferenceData {
                type_name,
                type_arguments: NodeList::new(),
            }),
        )
    }

    /// Heritage clause entry (`extends Base<T>`).
    pub fn heritage(&mut self, name: &str, type_arguments: Vec<NodeIndex>) -> NodeIndex {
        let type_name = self.entity_name(name);
        self.add_node(
            SyntaxKind::ExpressionWithTypeArguments,
            NodeData::TypeReference(TypeReferenceData {
                type_name,
                type_arguments: type_arguments.into(),
            }),
        )
    }

    pub fn type_literal(&mut self, members: Vec<NodeIndex>) -> NodeIndex {
        self.add_node(SyntaxKind::TypeLiteral, NodeData::List(members.into()))
    }

    pub fn function_type(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        self.signature_node(
            SyntaxKind::FunctionType,
            NodeIndex::NONE,
            type_parameters,
            parameters,
            return_type,
        )
    }

    pub fn constructor_type(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        self.signature_node(
            SyntaxKind::ConstructorType,
            NodeIndex::NONE,
            type_parameters,
            parameters,
            return_type,
        )
    }

    pub fn array_type(&mut self, element_type: NodeIndex) -> NodeIndex {
        self.add_node(SyntaxKind::ArrayType, NodeData::Wrapped(element_type))
    }

    pub fn tuple_type(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add_node(SyntaxKind::TupleType, NodeData::List(elements.into()))
    }

    pub fn optional_type(&mut self, inner: NodeIndex) -> NodeIndex {
        self.add_node(SyntaxKind::OptionalType, NodeData::Wrapped(inner))
    }

    pub fn rest_type(&mut self, inner: NodeIndex) -> NodeIndex {
        self.add_node(SyntaxKind::RestType, NodeData::Wrapped(inner))
    }

    pub fn union_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.add_node(SyntaxKind::UnionType, NodeData::List(types.into()))
    }

    pub fn intersection_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.add_node(SyntaxKind::IntersectionType, NodeData::List(types.into()))
    }

    pub fn parenthesized_type(&mut self, inner: NodeIndex) -> NodeIndex {
        self.add_node(SyntaxKind::ParenthesizedType, NodeData::Wrapped(inner))
    }

    pub fn type_operator(&mut self, operator: TypeOperatorKind, type_node: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::TypeOperator,
            NodeData::TypeOperator {
                operator,
                type_node,
            },
        )
    }

    pub fn indexed_access_type(&mut self, object_type: NodeIndex, index_type: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::IndexedAccessType,
            NodeData::IndexedAccess(IndexedAccessData {
                object_type,
                index_type,
            }),
        )
    }

    pub fn mapped_type(&mut self, type_parameter: NodeIndex, type_node: NodeIndex) -> NodeIndex {
        self.add_node(
            SyntaxKind::MappedType,
            NodeData::Mapped(MappedData {
                type_parameter,
                type_node,
            }),
        )
    }

    pub fn conditional_type(
        &mut self,
        check_type: NodeIndex,
        extends_type: NodeIndex,
        true_type: NodeIndex,
        false_type: NodeIndex,
    ) -> NodeIndex {
        self.add_node(
            SyntaxKind::ConditionalType,
            NodeData::Conditional(ConditionalData {
                check_type,
                extends_type,
                true_type,
                false_type,
            }),
        )
    }

    pub fn infer_type(&mut self, type_parameter: NodeIndex) -> NodeIndex {
        self.add_node(SyntaxKind::InferType, NodeData::Wrapped(type_parameter))
    }

    /// `parameter is type`; `parameter == "this"` produces a `this is T` predicate.
    pub fn type_predicate(&mut self, parameter: &str, type_node: Option<NodeIndex>) -> NodeIndex {
        let parameter_name = if parameter == "this" {
            self.keyword(SyntaxKind::ThisType)
        } else {
            self.identifier(parameter)
        };
        self.add_node(
            SyntaxKind::TypePredicate,
            NodeData::TypePredicate(TypePredicateData {
                parameter_name,
                type_node: type_node.into(),
            }),
        )
    }

    pub fn literal_type(&mut self, literal: NodeIndex) -> NodeIndex {
        self.add_node(SyntaxKind::LiteralType, NodeData::Wrapped(literal))
    }

    pub fn string_literal_type(&mut self, text: &str) -> NodeIndex {
        let literal = self.string_literal(text);
        self.literal_type(literal)
    }

    pub fn number_literal_type(&mut self, text: &str) -> NodeIndex {
        let literal = self.numeric_literal(text);
        self.literal_type(literal)
    }

    pub fn boolean_literal_type(&mut self, value: bool) -> NodeIndex {
        let literal = self.keyword(if value {
            SyntaxKind::TrueKeyword
        } else {
            SyntaxKind::FalseKeyword
        });
        self.literal_type(literal)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn source_file(&mut self, file_name: &str, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add_node(
            SyntaxKind::SourceFile,
            NodeData::SourceFile {
                file_name: file_name.to_string(),
                statements: statements.into(),
            },
        )
    }

    pub fn module_block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add_node(SyntaxKind::ModuleBlock, NodeData::List(statements.into()))
    }

    /// `var`/`let`/`const` statement; pass `NodeFlags::CONST` or `NodeFlags::LET`.
    pub fn variable_statement(&mut self, flags: NodeFlags, declarations: Vec<NodeIndex>) -> NodeIndex {
        let idx = self.add_node(
            SyntaxKind::VariableStatement,
            NodeData::List(declarations.into()),
        );
        self.with_flags(idx, flags)
    }

    pub fn variable_declaration(&mut self, name: &str, type_annotation: Option<NodeIndex>) -> NodeIndex {
        let name = self.identifier(name);
        self.add_node(
            SyntaxKind::VariableDeclaration,
            NodeData::Variable(VariableData {
                name,
                type_annotation: type_annotation.into(),
            }),
        )
    }

    pub fn property_signature(&mut self, name: &str, type_annotation: Option<NodeIndex>) -> NodeIndex {
        let name = self.identifier(name);
        self.property_node(SyntaxKind::PropertySignature, name, type_annotation)
    }

    pub fn property_declaration(&mut self, name: &str, type_annotation: Option<NodeIndex>) -> NodeIndex {
        let name = self.identifier(name);
        self.property_node(SyntaxKind::PropertyDeclaration, name, type_annotation)
    }

    /// Property whose name node was built separately (string literal,
    /// computed or private names).
    pub fn property_node(
        &mut self,
        kind: SyntaxKind,
        name: NodeIndex,
        type_annotation: Option<NodeIndex>,
    ) -> NodeIndex {
        self.add_node(
            kind,
            NodeData::Variable(VariableData {
                name,
                type_annotation: type_annotation.into(),
            }),
        )
    }

    pub fn method_signature(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: Option<NodeIndex>,
    ) -> NodeIndex {
        let name = self.identifier(name);
        self.signature_node(
            SyntaxKind::MethodSignature,
            name,
            type_parameters,
            parameters,
            return_type.into(),
        )
    }

    pub fn method_declaration(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: Option<NodeIndex>,
    ) -> NodeIndex {
        let name = self.identifier(name);
        self.signature_node(
            SyntaxKind::MethodDeclaration,
            name,
            type_parameters,
            parameters,
            return_type.into(),
        )
    }

    pub fn call_signature(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: Option<NodeIndex>,
    ) -> NodeIndex {
        self.signature_node(
            SyntaxKind::CallSignature,
            NodeIndex::NONE,
            type_parameters,
            parameters,
            return_type.into(),
        )
    }

    pub fn construct_signature(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: Option<NodeIndex>,
    ) -> NodeIndex {
        self.signature_node(
            SyntaxKind::ConstructSignature,
            NodeIndex::NONE,
            type_parameters,
            parameters,
            return_type.into(),
        )
    }

    pub fn constructor(&mut self, parameters: Vec<NodeIndex>) -> NodeIndex {
        self.signature_node(
            SyntaxKind::Constructor,
            NodeIndex::NONE,
            Vec::new(),
            parameters,
            NodeIndex::NONE,
        )
    }

    /// `[key: K]: V`
    pub fn index_signature(&mut self, key: NodeIndex, value_type: NodeIndex) -> NodeIndex {
        self.signature_node(
            SyntaxKind::IndexSignature,
            NodeIndex::NONE,
            Vec::new(),
            vec![key],
            value_type,
        )
    }

    pub fn function_declaration(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: Option<NodeIndex>,
    ) -> NodeIndex {
        let name = self.identifier(name);
        self.signature_node(
            SyntaxKind::FunctionDeclaration,
            name,
            type_parameters,
            parameters,
            return_type.into(),
        )
    }

    pub fn signature_node(
        &mut self,
        kind: SyntaxKind,
        name: NodeIndex,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        type_annotation: NodeIndex,
    ) -> NodeIndex {
        debug_assert!(kind.is_signature());
        self.add_node(
            kind,
            NodeData::Signature(SignatureData {
                name,
                type_parameters: type_parameters.into(),
                parameters: parameters.into(),
                type_annotation,
            }),
        )
    }

    pub fn parameter(&mut self, name: &str, type_annotation: Option<NodeIndex>) -> NodeIndex {
        let name = self.identifier(name);
        self.add_node(
            SyntaxKind::Parameter,
            NodeData::Parameter(ParameterData {
                name,
                type_annotation: type_annotation.into(),
            }),
        )
    }

    pub fn type_parameter(
        &mut self,
        name: &str,
        constraint: Option<NodeIndex>,
        default: Option<NodeIndex>,
    ) -> NodeIndex {
        let name = self.identifier(name);
        self.add_node(
            SyntaxKind::TypeParameter,
            NodeData::TypeParameter(TypeParameterData {
                name,
                constraint: constraint.into(),
                default: default.into(),
            }),
        )
    }

    pub fn type_alias(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        type_node: NodeIndex,
    ) -> NodeIndex {
        let name = self.identifier(name);
        self.add_node(
            SyntaxKind::TypeAliasDeclaration,
            NodeData::TypeAlias(TypeAliasData {
                name,
                type_parameters: type_parameters.into(),
                type_node,
            }),
        )
    }

    pub fn interface(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        heritage: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.class_like_node(
            SyntaxKind::InterfaceDeclaration,
            name,
            type_parameters,
            heritage,
            members,
        )
    }

    pub fn class(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        heritage: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.class_like_node(
            SyntaxKind::ClassDeclaration,
            name,
            type_parameters,
            heritage,
            members,
        )
    }

    fn class_like_node(
        &mut self,
        kind: SyntaxKind,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        heritage: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.identifier(name);
        self.add_node(
            kind,
            NodeData::ClassLike(ClassLikeData {
                name,
                type_parameters: type_parameters.into(),
                heritage: heritage.into(),
                members: members.into(),
            }),
        )
    }

    /// `namespace A.B.C { ... }` - dotted names nest one `ModuleDeclaration`
    /// per segment, the innermost owning the block.
    pub fn namespace(&mut self, name: &str, statements: Vec<NodeIndex>) -> NodeIndex {
        let mut body = self.module_block(statements);
        let segments: Vec<&str> = name.split('.').collect();
        for segment in segments.iter().rev() {
            let name = self.identifier(segment);
            body = self.add_node(
                SyntaxKind::ModuleDeclaration,
                NodeData::Module(ModuleData { name, body }),
            );
        }
        body
    }

    /// `declare module "specifier" { ... }`
    pub fn ambient_module(&mut self, specifier: &str, statements: Vec<NodeIndex>) -> NodeIndex {
        let body = self.module_block(statements);
        let name = self.string_literal(specifier);
        let idx = self.add_node(
            SyntaxKind::ModuleDeclaration,
            NodeData::Module(ModuleData { name, body }),
        );
        self.with_modifiers(idx, ModifierFlags::DECLARE)
    }
}
