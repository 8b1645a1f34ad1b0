//! Structural mangling.
//!
//! A mangled key identifies a signature's shape independent of parameter
//! names: `sig~(number,array~string)<typeparam~any>`. Two overloads with the
//! same key are duplicates.
//!
//! Contributions by kind:
//!
//! | Kind | Contribution |
//! |------|--------------|
//! | primitive | its name |
//! | array | `array~<elem>` |
//! | tuple | `tuple~<n>~<elem,...>` |
//! | reference | `reference-><target>` (+ `<args>`), `reference->?name` if unresolved |
//! | named object | `object~Outer.Name` (enclosing scopes below the global one) |
//! | anonymous object | `object~{member:<type>,optional?:<type>}` |
//! | alias | its target |
//! | type parameter | `typeparam~<constraint>` |
//! | union / intersection | sorted constituents |
//! | signature | `sig~(<params before first rest>)<type-param constraints>` |
//!
//! Everything else contributes its [`BaseType`](super::BaseType) bucket.

use super::{LiteralValue, RefTarget, TypeData, TypeId};
use crate::binding::ParameterRole;
use crate::graph::TypeGraph;
use crate::scope::ScopeId;
use std::fmt::Write;
use tsgraph_common::limits::{MAX_MANGLE_DEPTH, MAX_SCOPE_WALK_ITERATIONS};

impl TypeGraph {
    /// Mangled contribution of `ty`.
    pub fn mangle_type(&self, ty: TypeId) -> String {
        let mut out = String::new();
        Mangler { graph: self }.write(&mut out, ty, 0);
        out
    }
}

struct Mangler<'g> {
    graph: &'g TypeGraph,
}

impl Mangler<'_> {
    fn write(&self, out: &mut String, ty: TypeId, depth: u32) {
        if depth > MAX_MANGLE_DEPTH {
            out.push('*');
            return;
        }
        let Some(data) = self.graph.ty(ty) else {
            out.push('?');
            return;
        };
        let depth = depth + 1;

        match data {
            TypeData::Primitive(kind) => out.push_str(kind.name()),
            TypeData::Array(elem) => {
                out.push_str("array~");
                self.write(out, *elem, depth);
            }
            TypeData::Tuple(elems) => {
                let _ = write!(out, "tuple~{}~", elems.len());
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if elem.rest {
                        out.push_str("...");
                    }
                    self.write(out, elem.ty, depth);
                    if elem.optional {
                        out.push('?');
                    }
                }
            }
            TypeData::Reference(reference) => {
                out.push_str("reference->");
                match reference.resolved.map(|r| r.target) {
                    None => {
                        out.push('?');
                        out.push_str(&reference.name());
                    }
                    Some(RefTarget::Primitive(kind)) => out.push_str(kind.name()),
                    Some(RefTarget::Binding(id)) => match self.graph.binding(id) {
                        Some(binding) => self.write(out, binding.ty, depth),
                        None => out.push('?'),
                    },
                }
                if !reference.type_arguments.is_empty() {
                    self.write_list(out, '<', '>', &reference.type_arguments, depth);
                }
            }
            TypeData::Object(obj) => match &obj.name {
                Some(name) => {
                    out.push_str("object~");
                    self.write_qualified(out, obj.scope, name);
                }
                None => self.write_members(out, obj.scope, depth),
            },
            TypeData::Alias(alias) => self.write(out, alias.target, depth),
            TypeData::TypeParameter(param) => {
                out.push_str("typeparam~");
                if param.is_keyof {
                    out.push_str("keyof~");
                }
                match param.constraint {
                    Some(constraint) => self.write(out, constraint, depth),
                    None => out.push_str("any"),
                }
            }
            TypeData::Union(set) | TypeData::Intersection(set) => {
                let separator = if matches!(data, TypeData::Union(_)) { '|' } else { '&' };
                let mut parts: Vec<String> = set
                    .members()
                    .iter()
                    .map(|member| {
                        let mut part = String::new();
                        self.write(&mut part, *member, depth);
                        part
                    })
                    .collect();
                parts.sort_unstable();
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        out.push(separator);
                    }
                    out.push_str(part);
                }
            }
            TypeData::Signature(sig) => self.write_signature(out, sig.scope, depth),
            TypeData::Literal(value) => {
                out.push_str("literal~");
                match value {
                    LiteralValue::String(s) => {
                        let _ = write!(out, "{s:?}");
                    }
                    LiteralValue::Number(n) => {
                        let _ = write!(out, "{n}");
                    }
                    LiteralValue::Boolean(b) => {
                        let _ = write!(out, "{b}");
                    }
                }
            }
            TypeData::Operator(operator, operand) => {
                let _ = write!(out, "{operator:?}~");
                self.write(out, *operand, depth);
            }
            TypeData::Infer(binding) => {
                out.push_str("infer~");
                if let Some(b) = self.graph.binding(*binding) {
                    out.push_str(&b.name);
                }
            }
            TypeData::Indexed(_)
            | TypeData::Mapped(_)
            | TypeData::Conditional(_)
            | TypeData::Predicate(_) => out.push_str(self.graph.base_type(ty).as_str()),
        }
    }

    /// `A.B.Name`: names of the scopes enclosing the object's member scope,
    /// so same-named objects in different namespaces stay distinct.
    fn write_qualified(&self, out: &mut String, members: ScopeId, name: &str) {
        let mut enclosing = Vec::new();
        let mut current = self.graph.scope(members).and_then(|s| s.outer);
        for _ in 0..MAX_SCOPE_WALK_ITERATIONS {
            let Some(scope) = current.and_then(|id| self.graph.scope(id)) else {
                break;
            };
            // The global scope has no outer and is left out.
            if scope.outer.is_none() {
                break;
            }
            if let Some(scope_name) = &scope.name {
                enclosing.push(scope_name.as_str());
            }
            current = scope.outer;
        }
        for scope_name in enclosing.iter().rev() {
            out.push_str(scope_name);
            out.push('.');
        }
        out.push_str(name);
    }

    /// `object~{a:number,b?:string}`: every member with the contribution of
    /// each of its bindings, in declaration order.
    fn write_members(&self, out: &mut String, members: ScopeId, depth: u32) {
        out.push_str("object~{");
        if let Some(scope) = self.graph.scope(members) {
            for (i, (name, set)) in scope.entries().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&name);
                let bindings = set.iter().filter_map(|id| self.graph.binding(*id));
                for (j, binding) in bindings.enumerate() {
                    if j > 0 {
                        out.push('&');
                    }
                    out.push_str(if binding.optional { "?:" } else { ":" });
                    self.write(out, binding.ty, depth);
                }
            }
        }
        out.push('}');
    }

    fn write_list(&self, out: &mut String, open: char, close: char, types: &[TypeId], depth: u32) {
        out.push(open);
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write(out, *ty, depth);
        }
        out.push(close);
    }

    /// Parameter types up to the first rest parameter, then type-parameter
    /// constraints.
    fn write_signature(&self, out: &mut String, scope: ScopeId, depth: u32) {
        out.push_str("sig~");
        let Some(scope) = self.graph.scope(scope) else {
            out.push_str("()");
            return;
        };

        let params: Vec<TypeId> = scope
            .parameters(ParameterRole::Formal)
            .iter()
            .filter_map(|id| self.graph.binding(*id))
            .take_while(|b| !b.rest)
            .map(|b| b.ty)
            .collect();
        self.write_list(out, '(', ')', &params, depth);

        let type_params = scope.parameters(ParameterRole::Type);
        if type_params.is_empty() {
            return;
        }
        out.push('<');
        for (i, id) in type_params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match self.graph.binding(*id) {
                Some(b) => self.write(out, b.ty, depth),
                None => out.push('?'),
            }
        }
        out.push('>');
    }
}
