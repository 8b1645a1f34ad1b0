//! Variables, properties, object-like declarations, namespaces and aliases.

use super::Binder;
use crate::binding::{Binding, BindingId, BindingKind, ParameterRole};
use crate::errors::{BindError, Result};
use crate::provenance::DeclHandle;
use crate::scope::{ScopeId, ScopeOwner};
use crate::types::{AliasType, ObjectFlavor, ObjectType, TypeData, TypeId, TypeParameterType};
use smallvec::SmallVec;
use tracing::debug;
use tsgraph_decl::{
    ModifierFlags, Node, NodeArena, NodeFlags, NodeIndex, SyntaxKind, TypeOperatorKind,
};

impl Binder {
    // =========================================================================
    // Variables and properties
    // =========================================================================

    pub(super) fn lower_variable_statement(&mut self, arena: &NodeArena, node: &Node) -> Result<()> {
        let mut modifiers = node.modifiers;
        if node.flags.contains(NodeFlags::CONST) {
            modifiers |= ModifierFlags::CONST;
        }
        let declarations = node.list().map(|list| list.nodes.clone()).unwrap_or_default();
        for idx in declarations {
            let declaration = self.node(arena, idx)?;
            if declaration.kind != SyntaxKind::VariableDeclaration {
                return Err(BindError::UnhandledDeclarationKind {
                    kind: declaration.kind,
                    decl: self.decl(idx, declaration),
                });
            }
            self.lower_variable(arena, idx, declaration, modifiers)?;
        }
        Ok(())
    }

    pub(super) fn lower_variable(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        node: &Node,
        modifiers: ModifierFlags,
    ) -> Result<()> {
        let Some(data) = node.variable() else {
            return Err(self.unhandled(idx, node));
        };
        let name = self.declaration_name(arena, data.name)?;
        let ty = self.lower_type_or(arena, data.type_annotation, TypeId::ANY)?;
        let scope = self.current_scope();
        let binding = Binding::new(name, BindingKind::Variable, ty, scope)
            .with_decl(self.decl(idx, node))
            .with_modifiers(modifiers | node.modifiers);
        self.bind_here(binding)?;
        Ok(())
    }

    pub(super) fn lower_property(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<()> {
        let Some(data) = node.variable() else {
            return Err(self.unhandled(idx, node));
        };
        let name = self.declaration_name(arena, data.name)?;
        let ty = self.lower_type_or(arena, data.type_annotation, TypeId::ANY)?;
        let scope = self.current_scope();
        let binding = Binding::new(name, BindingKind::Property, ty, scope)
            .with_decl(self.decl(idx, node))
            .with_modifiers(node.modifiers)
            .with_optional(node.is_optional());
        self.bind_here(binding)?;
        Ok(())
    }

    // =========================================================================
    // Classes and interfaces
    // =========================================================================

    /// Lower a class or interface, merging into an existing declaration of
    /// the same name when the pair is mergeable.
    pub(super) fn lower_class_like(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        node: &Node,
        kind: BindingKind,
    ) -> Result<()> {
        let Some(data) = node.class_like() else {
            return Err(self.unhandled(idx, node));
        };
        let decl = self.decl(idx, node);
        let name = self.declaration_name(arena, data.name)?;
        let outer = self.current_scope();

        let (object, members, merged) =
            match self.graph.mergeable_target(outer, &name, kind) {
                Some(existing) => {
                    let (object, members) = self.object_of(existing)?;
                    self.check_type_parameter_names(arena, existing, &name, &data.type_parameters.nodes, decl)?;
                    if kind == BindingKind::Class {
                        self.graph.promote_to_class(existing, node.modifiers);
                        if node.has_modifier(ModifierFlags::DECLARE) {
                            self.graph.set_scope_ambient(members);
                        }
                    }
                    debug!(name = %name, binding = existing.0, "merging declaration");
                    (object, members, true)
                }
                None => {
                    let (flavor, ambient) = match kind {
                        BindingKind::Class => (ObjectFlavor::Class, node.has_modifier(ModifierFlags::DECLARE)),
                        _ => (ObjectFlavor::Interface, self.options.ambient_interface_bodies),
                    };
                    let members = self.graph.add_inner(outer, ambient, Some(name.clone()));
                    let object = self.graph.alloc_type(
                        TypeData::Object(ObjectType {
                            flavor,
                            name: Some(name.clone()),
                            scope: members,
                            signatures: SmallVec::new(),
                            heritage: Vec::new(),
                        }),
                        decl,
                    );
                    self.graph.set_scope_owner(members, ScopeOwner::Type(object));
                    // Bound before the body so members can refer to the type.
                    let binding = Binding::new(name.clone(), kind, object, outer)
                        .with_decl(decl)
                        .with_modifiers(node.modifiers);
                    self.bind_in(outer, binding)?;
                    (object, members, false)
                }
            };

        self.within(members, |this| {
            if !merged {
                for &tp in &data.type_parameters.nodes {
                    this.lower_type_parameter(arena, tp)?;
                }
            }
            for &clause in &data.heritage.nodes {
                let reference = this.lower_type(arena, clause)?;
                this.graph.types.push_heritage(object, reference);
            }
            for &member in &data.members.nodes {
                this.lower_declaration(arena, member)?;
            }
            Ok(())
        })
    }

    /// Object type and member scope of a mergeable binding.
    fn object_of(&self, binding: BindingId) -> Result<(TypeId, ScopeId)> {
        let object = self.graph.binding(binding).map(|b| b.ty);
        match (object, self.graph.member_scope(binding)) {
            (Some(object), Some(members)) => Ok((object, members)),
            _ => Err(BindError::DuplicateIdentifier {
                name: self
                    .graph
                    .binding(binding)
                    .map(|b| b.name.clone())
                    .unwrap_or_default(),
                decl: None,
                previous: self.graph.binding(binding).and_then(|b| b.decl),
            }),
        }
    }

    /// Merged generic declarations must spell their type parameters alike.
    fn check_type_parameter_names(
        &self,
        arena: &NodeArena,
        existing: BindingId,
        name: &str,
        incoming: &[NodeIndex],
        decl: Option<DeclHandle>,
    ) -> Result<()> {
        let declared: Vec<&str> = self
            .graph
            .type_parameters_of(existing)
            .iter()
            .filter_map(|id| self.graph.binding(*id).map(|b| b.name.as_str()))
            .collect();
        let mut written = Vec::with_capacity(incoming.len());
        for &tp in incoming {
            let node = self.node(arena, tp)?;
            let Some(data) = node.type_parameter() else {
                return Err(self.unhandled(tp, node));
            };
            written.push(self.declaration_name(arena, data.name)?);
        }
        if declared.len() != written.len() || declared.iter().zip(&written).any(|(a, b)| *a != b) {
            return Err(BindError::TypeParameterMismatch {
                name: name.to_string(),
                decl,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    /// `namespace A { }`, `namespace A.B { }` and `declare module "m" { }`.
    /// Same-named namespaces in one scope share a single member scope.
    pub(super) fn lower_namespace(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<()> {
        let Some(data) = node.module() else {
            return Err(self.unhandled(idx, node));
        };
        let decl = self.decl(idx, node);
        let name_node = self.node(arena, data.name)?;
        let name = match name_node.kind {
            SyntaxKind::StringLiteral => format!("\"{}\"", name_node.text().unwrap_or_default()),
            _ => self.declaration_name(arena, data.name)?,
        };
        let outer = self.current_scope();

        let members = match self.graph.mergeable_target(outer, &name, BindingKind::Namespace) {
            Some(existing) => self.object_of(existing)?.1,
            None => {
                let ambient = node.has_modifier(ModifierFlags::DECLARE);
                let members = self.graph.add_inner(outer, ambient, Some(name.clone()));
                let object = self.graph.alloc_type(
                    TypeData::Object(ObjectType {
                        flavor: ObjectFlavor::Namespace,
                        name: Some(name.clone()),
                        scope: members,
                        signatures: SmallVec::new(),
                        heritage: Vec::new(),
                    }),
                    decl,
                );
                self.graph.set_scope_owner(members, ScopeOwner::Type(object));
                let binding = Binding::new(name, BindingKind::Namespace, object, outer)
                    .with_decl(decl)
                    .with_modifiers(node.modifiers);
                self.bind_in(outer, binding)?;
                members
            }
        };

        // Shorthand ambient module: `declare module "m";`
        if data.body.is_none() {
            return Ok(());
        }
        self.within(members, |this| this.lower_declaration(arena, data.body))
    }

    // =========================================================================
    // Type aliases
    // =========================================================================

    pub(super) fn lower_type_alias(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<()> {
        let Some(data) = node.type_alias() else {
            return Err(self.unhandled(idx, node));
        };
        let decl = self.decl(idx, node);
        let name = self.declaration_name(arena, data.name)?;
        let outer = self.current_scope();
        let scope = self.graph.add_inner(outer, false, Some(name.clone()));

        let target = self.within(scope, |this| {
            for &tp in &data.type_parameters.nodes {
                this.lower_type_parameter(arena, tp)?;
            }
            this.lower_type(arena, data.type_node)
        })?;

        let alias = self.graph.alloc_type(
            TypeData::Alias(AliasType {
                name: name.clone(),
                scope,
                target,
            }),
            decl,
        );
        self.graph.set_scope_owner(scope, ScopeOwner::Type(alias));
        let binding = Binding::new(name, BindingKind::TypeAlias, alias, outer)
            .with_decl(decl)
            .with_modifiers(node.modifiers);
        self.bind_in(outer, binding)?;
        Ok(())
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    /// Bind a type parameter into the current scope under the type role.
    /// A constraint written `keyof X` records `X` with the keyof flag.
    pub(crate) fn lower_type_parameter(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<BindingId> {
        let node = self.node(arena, idx)?;
        let Some(data) = node.type_parameter() else {
            return Err(self.unhandled(idx, node));
        };
        let decl = self.decl(idx, node);
        let name = self.declaration_name(arena, data.name)?;

        let (constraint, is_keyof) = match data.constraint.into_option() {
            None => (None, false),
            Some(constraint) => {
                let constraint_node = self.node(arena, constraint)?;
                match constraint_node.type_operator() {
                    Some((TypeOperatorKind::KeyOf, operand)) => {
                        (Some(self.lower_type(arena, operand)?), true)
                    }
                    _ => (Some(self.lower_type(arena, constraint)?), false),
                }
            }
        };
        let default = match data.default.into_option() {
            Some(default) => Some(self.lower_type(arena, default)?),
            None => None,
        };

        let ty = self.graph.alloc_type(
            TypeData::TypeParameter(TypeParameterType {
                name: name.clone(),
                constraint,
                is_keyof,
                default,
            }),
            decl,
        );
        let scope = self.current_scope();
        let binding = Binding::new(name, BindingKind::TypeParameter, ty, scope).with_decl(decl);
        let (id, _) = self.graph.bind_parameter(scope, binding, ParameterRole::Type)?;
        Ok(id)
    }

    pub(super) fn unhandled(&self, idx: NodeIndex, node: &Node) -> BindError {
        BindError::UnhandledDeclarationKind {
            kind: node.kind,
            decl: self.decl(idx, node),
        }
    }
}
