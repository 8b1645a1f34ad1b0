//! Generic instantiation and type-argument deduction.
//!
//! An instantiation is a scope, child of the template's own member scope,
//! binding each type-parameter name to a concrete type. Instantiations are
//! cached per `(template, canonical argument tuple)`; different argument
//! tuples always get different scopes.

use crate::binding::{Binding, BindingId, BindingKind, ParameterRole};
use crate::errors::BindError;
use crate::graph::TypeGraph;
use crate::provenance::DeclHandle;
use crate::scope::{ScopeId, ScopeOwner};
use crate::types::{RefTarget, TypeData, TypeId};
use smallvec::SmallVec;
use tracing::debug;

type Candidates = SmallVec<[TypeId; 2]>;

impl TypeGraph {
    /// Type-parameter bindings of a generic template, in declaration order.
    pub fn type_parameters_of(&self, template: BindingId) -> &[BindingId] {
        self.member_scope(template)
            .and_then(|scope| self.scope(scope))
            .map_or(&[][..], |scope| scope.parameters(ParameterRole::Type))
    }

    /// Concrete arguments recorded in an instantiation scope.
    pub fn instantiation_arguments(&self, scope: ScopeId) -> Vec<TypeId> {
        self.scope(scope)
            .map(|s| {
                s.parameters(ParameterRole::Type)
                    .iter()
                    .filter_map(|id| self.binding(*id).map(|b| b.ty))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Instantiate `template` with `type_args`.
    ///
    /// Missing trailing arguments are deduced from `call_args`, the concrete
    /// argument types supplied at the template's formal parameters (empty
    /// for type references).
    pub fn instantiate(
        &mut self,
        template: BindingId,
        type_args: &[TypeId],
        call_args: &[TypeId],
        site: Option<DeclHandle>,
    ) -> Result<ScopeId, BindError> {
        let name = self
            .binding(template)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        let params = self.type_parameters_of(template).to_vec();

        if type_args.len() > params.len() {
            return Err(BindError::TypeArgumentCount {
                name,
                expected: params.len(),
                actual: type_args.len(),
                decl: site,
            });
        }

        let mut concrete = type_args.to_vec();
        for &param in &params[type_args.len()..] {
            concrete.push(self.deduce(template, param, call_args, site)?);
        }

        let key = (
            template,
            concrete.iter().map(|ty| self.follow(*ty)).collect::<Vec<_>>(),
        );
        if let Some(&scope) = self.instantiations.get(&key) {
            return Ok(scope);
        }

        let template_scope = self.member_scope(template).unwrap_or(ScopeId::GLOBAL);
        let label = format!(
            "{name}<{}>",
            concrete
                .iter()
                .map(|ty| self.display_type(*ty))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let scope = self.add_inner(template_scope, false, Some(label));
        self.set_scope_owner(scope, ScopeOwner::Binding(template));

        for (param, &ty) in params.iter().zip(&concrete) {
            let param_name = self
                .binding(*param)
                .map(|b| b.name.clone())
                .unwrap_or_default();
            let binding = Binding::new(param_name, BindingKind::TypeParameter, ty, scope).with_decl(site);
            self.bind_parameter(scope, binding, ParameterRole::Type)?;
        }

        debug!(template = %name, scope = scope.0, "instantiated");
        self.instantiations.insert(key, scope);
        Ok(scope)
    }

    /// Deduce one type parameter from the arguments observed at its
    /// occurrences among the template's formal parameters.
    fn deduce(
        &self,
        template: BindingId,
        param: BindingId,
        call_args: &[TypeId],
        site: Option<DeclHandle>,
    ) -> Result<TypeId, BindError> {
        let mut candidates = Candidates::new();
        let formals = self
            .member_scope(template)
            .and_then(|scope| self.scope(scope))
            .map_or(&[][..], |scope| scope.parameters(ParameterRole::Formal));

        for (i, formal) in formals.iter().enumerate() {
            let Some(formal) = self.binding(*formal) else {
                continue;
            };
            if formal.rest {
                let element = match self.ty(formal.ty) {
                    Some(TypeData::Array(element)) => *element,
                    _ => formal.ty,
                };
                for actual in call_args.iter().skip(i) {
                    self.collect_candidates(element, *actual, param, &mut candidates, 0);
                }
                break;
            }
            if let Some(actual) = call_args.get(i) {
                self.collect_candidates(formal.ty, *actual, param, &mut candidates, 0);
            }
        }

        if let [only] = candidates.as_slice() {
            return Ok(*only);
        }
        let declared = self.binding(param);
        if candidates.is_empty()
            && let Some(default) = declared
                .and_then(|b| self.ty(b.ty))
                .and_then(TypeData::as_type_parameter)
                .and_then(|p| p.default)
        {
            return Ok(default);
        }
        Err(BindError::MissingTypeArgument {
            name: self
                .binding(template)
                .map(|b| b.name.clone())
                .unwrap_or_default(),
            parameter: declared.map(|b| b.name.clone()).unwrap_or_default(),
            candidates: candidates.len(),
            decl: site,
        })
    }

    /// Match `formal` against `actual`, recording `actual` wherever `formal`
    /// mentions `param`. Arrays and tuples are matched element-wise.
    fn collect_candidates(
        &self,
        formal: TypeId,
        actual: TypeId,
        param: BindingId,
        out: &mut Candidates,
        depth: u32,
    ) {
        if depth > tsgraph_common::limits::MAX_MANGLE_DEPTH {
            return;
        }
        match self.ty(formal) {
            Some(TypeData::Reference(r))
                if r.resolved.map(|resolved| resolved.target) == Some(RefTarget::Binding(param)) =>
            {
                let canonical = self.follow(actual);
                if !out.contains(&canonical) {
                    out.push(canonical);
                }
            }
            Some(TypeData::Array(formal_element)) => {
                if let Some(TypeData::Array(actual_element)) = self.ty(self.follow(actual)) {
                    self.collect_candidates(*formal_element, *actual_element, param, out, depth + 1);
                }
            }
            Some(TypeData::Tuple(formal_elements)) => {
                if let Some(TypeData::Tuple(actual_elements)) = self.ty(self.follow(actual)) {
                    for (f, a) in formal_elements.iter().zip(actual_elements) {
                        self.collect_candidates(f.ty, a.ty, param, out, depth + 1);
                    }
                }
            }
            _ => {}
        }
    }
}
