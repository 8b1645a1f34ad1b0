//! Type rendering for diagnostics and debug output.

use super::{ObjectFlavor, SignatureKind, TypeData, TypeId};
use crate::binding::ParameterRole;
use crate::graph::TypeGraph;
use crate::scope::ScopeId;
use std::fmt::Write;
use tsgraph_common::limits::MAX_MANGLE_DEPTH;
use tsgraph_decl::TypeOperatorKind;

/// Renders types in TypeScript-like syntax.
pub struct TypeFormatter<'g> {
    graph: &'g TypeGraph,
    max_depth: u32,
}

impl<'g> TypeFormatter<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self {
            graph,
            max_depth: MAX_MANGLE_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, ty, 0);
        out
    }

    fn write(&self, out: &mut String, ty: TypeId, depth: u32) {
        if depth > self.max_depth {
            out.push_str("...");
            return;
        }
        let Some(data) = self.graph.ty(ty) else {
            out.push_str("<missing>");
            return;
        };
        let depth = depth + 1;

        match data {
            TypeData::Primitive(kind) => out.push_str(kind.name()),
            TypeData::Object(obj) => match (&obj.name, obj.flavor) {
                (Some(name), ObjectFlavor::Namespace) => {
                    let _ = write!(out, "namespace {name}");
                }
                (Some(name), _) => out.push_str(name),
                (None, _) => self.write_members(out, obj.scope, depth),
            },
            TypeData::Signature(sig) => {
                if matches!(
                    sig.kind,
                    SignatureKind::Construct | SignatureKind::ConstructorType
                ) {
                    out.push_str("new ");
                }
                self.write_signature(out, sig.scope, depth);
                out.push_str(" => ");
                self.write(out, sig.return_type, depth);
            }
            TypeData::Array(elem) => {
                let needs_parens = matches!(
                    self.graph.ty(*elem),
                    Some(TypeData::Union(_) | TypeData::Intersection(_) | TypeData::Signature(_))
                );
                if needs_parens {
                    out.push('(');
                }
                self.write(out, *elem, depth);
                if needs_parens {
                    out.push(')');
                }
                out.push_str("[]");
            }
            TypeData::Tuple(elems) => {
                out.push('[');
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if elem.rest {
                        out.push_str("...");
                    }
                    self.write(out, elem.ty, depth);
                    if elem.optional {
                        out.push('?');
                    }
                }
                out.push(']');
            }
            TypeData::Union(set) => self.write_joined(out, set.members(), " | ", depth),
            TypeData::Intersection(set) => self.write_joined(out, set.members(), " & ", depth),
            TypeData::Indexed(indexed) => {
                self.write(out, indexed.object, depth);
                out.push('[');
                self.write(out, indexed.index, depth);
                out.push(']');
            }
            TypeData::Mapped(mapped) => {
                out.push_str("{ [");
                if let Some(key) = self.graph.binding(mapped.key) {
                    out.push_str(&key.name);
                    out.push_str(" in ");
                    match self.graph.ty(key.ty).and_then(TypeData::as_type_parameter) {
                        Some(param) => {
                            if param.is_keyof {
                                out.push_str("keyof ");
                            }
                            match param.constraint {
                                Some(constraint) => self.write(out, constraint, depth),
                                None => out.push_str("any"),
                            }
                        }
                        None => self.write(out, key.ty, depth),
                    }
                }
                out.push_str("]: ");
                self.write(out, mapped.template, depth);
                out.push_str(" }");
            }
            TypeData::Reference(reference) => {
                if reference.is_query {
                    out.push_str("typeof ");
                }
                out.push_str(&reference.name());
                if !reference.type_arguments.is_empty() {
                    out.push('<');
                    self.write_joined(out, &reference.type_arguments, ", ", depth);
                    out.push('>');
                }
            }
            TypeData::Alias(alias) => out.push_str(&alias.name),
            TypeData::TypeParameter(param) => out.push_str(&param.name),
            TypeData::Conditional(cond) => {
                self.write(out, cond.check_type, depth);
                out.push_str(" extends ");
                self.write(out, cond.extends_type, depth);
                out.push_str(" ? ");
                self.write(out, cond.true_type, depth);
                out.push_str(" : ");
                self.write(out, cond.false_type, depth);
            }
            TypeData::Infer(binding) => {
                out.push_str("infer ");
                if let Some(b) = self.graph.binding(*binding) {
                    out.push_str(&b.name);
                }
            }
            TypeData::Predicate(pred) => {
                if pred.asserts {
                    out.push_str("asserts ");
                }
                out.push_str(&pred.parameter);
                if let Some(ty) = pred.ty {
                    out.push_str(" is ");
                    self.write(out, ty, depth);
                }
            }
            TypeData::Literal(value) => {
                let _ = write!(out, "{value}");
            }
            TypeData::Operator(operator, operand) => {
                out.push_str(match operator {
                    TypeOperatorKind::KeyOf => "keyof ",
                    TypeOperatorKind::Unique => "unique ",
                    TypeOperatorKind::Readonly => "readonly ",
                });
                self.write(out, *operand, depth);
            }
        }
    }

    fn write_joined(&self, out: &mut String, types: &[TypeId], separator: &str, depth: u32) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write(out, *ty, depth);
        }
    }

    fn write_signature(&self, out: &mut String, scope: ScopeId, depth: u32) {
        let Some(scope) = self.graph.scope(scope) else {
            out.push_str("()");
            return;
        };

        let type_params = scope.parameters(ParameterRole::Type);
        if !type_params.is_empty() {
            out.push('<');
            for (i, id) in type_params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if let Some(b) = self.graph.binding(*id) {
                    out.push_str(&b.name);
                }
            }
            out.push('>');
        }

        out.push('(');
        let this_and_formals = scope
            .parameters(ParameterRole::This)
            .iter()
            .chain(scope.parameters(ParameterRole::Formal));
        for (i, id) in this_and_formals.enumerate() {
            let Some(param) = self.graph.binding(*id) else {
                continue;
            };
            if i > 0 {
                out.push_str(", ");
            }
            if param.rest {
                out.push_str("...");
            }
            out.push_str(&param.name);
            if param.optional {
                out.push('?');
            }
            out.push_str(": ");
            self.write(out, param.ty, depth);
        }
        out.push(')');
    }

    fn write_members(&self, out: &mut String, scope: ScopeId, depth: u32) {
        let Some(scope) = self.graph.scope(scope) else {
            out.push_str("{}");
            return;
        };
        if scope.is_empty() {
            out.push_str("{}");
            return;
        }
        out.push_str("{ ");
        for (name, set) in scope.entries() {
            for id in set {
                let Some(member) = self.graph.binding(*id) else {
                    continue;
                };
                out.push_str(&name);
                if member.optional {
                    out.push('?');
                }
                out.push_str(": ");
                self.write(out, member.ty, depth);
                out.push_str("; ");
            }
        }
        out.push('}');
    }
}

impl TypeGraph {
    /// Render `ty` with default settings.
    pub fn display_type(&self, ty: TypeId) -> String {
        TypeFormatter::new(self).format(ty)
    }
}
