//! Signatures and their parameter scopes.
//!
//! Every signature gets its own scope holding, in order, its type
//! parameters, an optional `this` parameter, and its formal parameters.
//! Type parameters are bound first so parameter and return annotations can
//! refer to them.

use super::Binder;
use crate::binding::{Binding, BindingKind, ParameterRole, SpecialMember};
use crate::errors::Result;
use crate::scope::{ScopeId, ScopeOwner};
use crate::types::{SignatureKind, SignatureType, TypeData, TypeId};
use tracing::trace;
use tsgraph_decl::{Node, NodeArena, NodeIndex, SyntaxKind};

impl Binder {
    /// Function declarations and methods: bound under their own name.
    pub(super) fn lower_named_signature(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<()> {
        let Some(data) = node.signature() else {
            return Err(self.unhandled(idx, node));
        };
        let (kind, binding_kind) = match node.kind {
            SyntaxKind::FunctionDeclaration => (SignatureKind::Function, BindingKind::Function),
            _ => (SignatureKind::Method, BindingKind::Method),
        };
        let name = self.declaration_name(arena, data.name)?;
        let signature = self.lower_signature(arena, idx, node, kind, &name)?;

        let scope = self.current_scope();
        let binding = Binding::new(name, binding_kind, signature, scope)
            .with_decl(self.decl(idx, node))
            .with_modifiers(node.modifiers)
            .with_optional(node.is_optional());
        self.bind_here(binding)?;
        Ok(())
    }

    /// Call, construct and index signatures and class constructors: bound
    /// under a reserved member key. Call and construct signatures also make
    /// the enclosing object callable.
    pub(super) fn lower_special_signature(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Result<()> {
        let (kind, member) = match node.kind {
            SyntaxKind::CallSignature => (SignatureKind::Call, SpecialMember::Call),
            SyntaxKind::ConstructSignature => (SignatureKind::Construct, SpecialMember::New),
            SyntaxKind::Constructor => (SignatureKind::Constructor, SpecialMember::New),
            SyntaxKind::IndexSignature => (SignatureKind::Index, SpecialMember::Index),
            _ => return Err(self.unhandled(idx, node)),
        };
        let signature = self.lower_signature(arena, idx, node, kind, member.display())?;

        let scope = self.current_scope();
        let binding = Binding::special(member, signature, scope)
            .with_decl(self.decl(idx, node))
            .with_modifiers(node.modifiers);
        let outcome = self.bind_here(binding)?;

        if outcome.is_inserted()
            && matches!(kind, SignatureKind::Call | SignatureKind::Construct)
            && let Some(ScopeOwner::Type(object)) = self.graph.scope(scope).map(|s| s.owner)
        {
            self.graph.types.push_signature(object, signature);
        }
        Ok(())
    }

    /// Build a signature type and its parameter scope. `label` names the
    /// scope in scope paths.
    pub(crate) fn lower_signature(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        node: &Node,
        kind: SignatureKind,
        label: &str,
    ) -> Result<TypeId> {
        let Some(data) = node.signature() else {
            return Err(self.unhandled(idx, node));
        };
        let decl = self.decl(idx, node);
        let outer = self.current_scope();
        let scope = self.graph.add_inner(outer, false, Some(label.to_string()));

        let (return_type, this_type) = self.within(scope, |this| {
            for &tp in &data.type_parameters.nodes {
                this.lower_type_parameter(arena, tp)?;
            }
            let mut this_type = None;
            for (position, &param) in data.parameters.nodes.iter().enumerate() {
                if let Some(ty) = this.lower_parameter(arena, param, scope, position == 0)? {
                    this_type = Some(ty);
                }
            }
            let fallback = match kind {
                SignatureKind::Constructor | SignatureKind::Construct | SignatureKind::ConstructorType => {
                    TypeId::THIS
                }
                _ => TypeId::ANY,
            };
            let return_type = this.lower_type_or(arena, data.type_annotation, fallback)?;
            Ok((return_type, this_type))
        })?;

        let signature = self.graph.alloc_type(
            TypeData::Signature(SignatureType {
                kind,
                scope,
                return_type,
                this_type,
            }),
            decl,
        );
        self.graph.set_scope_owner(scope, ScopeOwner::Type(signature));
        trace!(label, signature = signature.0, scope = scope.0, "signature");
        Ok(signature)
    }

    /// Bind one parameter. A leading `this` parameter takes the this-context
    /// role and its type is returned.
    fn lower_parameter(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        scope: ScopeId,
        first: bool,
    ) -> Result<Option<TypeId>> {
        let node = self.node(arena, idx)?;
        let Some(data) = node.parameter() else {
            return Err(self.unhandled(idx, node));
        };
        let name = self.declaration_name(arena, data.name)?;
        let ty = self.lower_type_or(arena, data.type_annotation, TypeId::ANY)?;
        let is_this = first && name == "this";
        let role = if is_this {
            ParameterRole::This
        } else {
            ParameterRole::Formal
        };

        let binding = Binding::new(name, BindingKind::Parameter, ty, scope)
            .with_decl(self.decl(idx, node))
            .with_modifiers(node.modifiers)
            .with_optional(node.is_optional())
            .with_rest(node.is_rest());
        self.graph.bind_parameter(scope, binding, role)?;
        Ok(is_this.then_some(ty))
    }
}
