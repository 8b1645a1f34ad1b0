use super::*;
use crate::test_utils::*;
use tsgraph_decl::{ModifierFlags, NodeArena, NodeFlags, NodeIndex, SyntaxKind, TypeOperatorKind};

fn object<'g>(graph: &'g TypeGraph, binding: BindingId) -> &'g ObjectType {
    let ty = graph.binding(binding).unwrap().ty;
    graph.ty(ty).and_then(TypeData::as_object).unwrap()
}

fn let_statement(arena: &mut NodeArena, name: &str, ty: NodeIndex) -> NodeIndex {
    let declaration = arena.variable_declaration(name, Some(ty));
    arena.variable_statement(NodeFlags::LET, vec![declaration])
}

// =============================================================================
// Declaration merging
// =============================================================================

#[test]
fn test_generic_interface_declarations_merge() {
    // interface Box<T> { a: T } interface Box<T> { b: T }
    let mut arena = NodeArena::new();
    let t1 = arena.type_parameter("T", None, None);
    let t_ref = reference(&mut arena, "T");
    let a = arena.property_signature("a", Some(t_ref));
    let first = arena.interface("Box", vec![t1], Vec::new(), vec![a]);
    let t2 = arena.type_parameter("T", None, None);
    let t_ref = reference(&mut arena, "T");
    let b = arena.property_signature("b", Some(t_ref));
    let second = arena.interface("Box", vec![t2], Vec::new(), vec![b]);
    let root = file(&mut arena, vec![first, second]);

    let (graph, report) = lower(&arena, root).finish();
    assert!(report.is_empty());
    let boxed = global(&graph, "Box");
    let scope = members(&graph, boxed);
    assert_eq!(graph.type_parameters_of(boxed).len(), 1);
    let t = graph.type_parameters_of(boxed)[0];
    let b = graph.binding(only(&graph, scope, "b")).unwrap();
    assert_eq!(
        graph.ty(b.ty).and_then(TypeData::as_reference).and_then(|r| r.resolved).map(|r| r.target),
        Some(RefTarget::Binding(t))
    );
}

#[test]
fn test_merge_with_different_type_parameters_fails() {
    let mut arena = NodeArena::new();
    let t = arena.type_parameter("T", None, None);
    let first = arena.interface("Box", vec![t], Vec::new(), Vec::new());
    let u = arena.type_parameter("U", None, None);
    let second = arena.interface("Box", vec![u], Vec::new(), Vec::new());
    let root = file(&mut arena, vec![first, second]);

    let mut binder = Binder::default();
    let err = binder.lower_file(&arena, root).unwrap_err();
    assert!(matches!(err, BindError::TypeParameterMismatch { ref name, .. } if name == "Box"));
    assert_eq!(err.code(), 2428);
    assert!(err.decl().is_some());
}

#[test]
fn test_class_and_interface_merge_with_heritage() {
    // class C { x: number } interface C { extra: string } interface D extends C {}
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let x = arena.property_declaration("x", Some(n));
    let class = arena.class("C", Vec::new(), Vec::new(), vec![x]);
    let s = string(&mut arena);
    let extra = arena.property_signature("extra", Some(s));
    let interface = arena.interface("C", Vec::new(), Vec::new(), vec![extra]);
    let base = arena.heritage("C", Vec::new());
    let derived = arena.interface("D", Vec::new(), vec![base], Vec::new());
    let root = file(&mut arena, vec![class, interface, derived]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let c = global(graph, "C");
    assert_eq!(graph.binding(c).unwrap().kind, BindingKind::Class);
    let scope = members(graph, c);
    assert_eq!(graph.scope(scope).unwrap().len(), 2);

    let d = object(graph, global(graph, "D"));
    assert_eq!(d.heritage.len(), 1);
    assert_eq!(
        graph.ty(d.heritage[0]).and_then(TypeData::as_reference).and_then(|r| r.resolved).map(|r| r.target),
        Some(RefTarget::Binding(c))
    );
}

#[test]
fn test_class_after_interface_takes_value_meaning() {
    // interface C { extra: string } declare class C { x: number }
    let mut arena = NodeArena::new();
    let s = string(&mut arena);
    let extra = arena.property_signature("extra", Some(s));
    let interface = arena.interface("C", Vec::new(), Vec::new(), vec![extra]);
    let n = number(&mut arena);
    let x = arena.property_declaration("x", Some(n));
    let class = arena.class("C", Vec::new(), Vec::new(), vec![x]);
    let class = arena.with_modifiers(class, ModifierFlags::DECLARE);
    let root = file(&mut arena, vec![interface, class]);

    let options = BinderOptions {
        ambient_interface_bodies: false,
        ..BinderOptions::default()
    };
    let binder = lower_with(&arena, root, options);
    let graph = binder.graph();
    let c = global(graph, "C");
    let binding = graph.binding(c).unwrap();
    assert_eq!(binding.kind, BindingKind::Class);
    assert!(binding.modifiers.contains(ModifierFlags::DECLARE));
    assert_eq!(object(graph, c).flavor, ObjectFlavor::Class);
    let scope = members(graph, c);
    assert_eq!(graph.scope(scope).unwrap().len(), 2);
    assert!(graph.is_ambient(scope));
}

#[test]
fn test_value_after_merged_interface_and_class_is_duplicate() {
    // interface C {} class C {} var C: number;
    let mut arena = NodeArena::new();
    let interface = arena.interface("C", Vec::new(), Vec::new(), Vec::new());
    let class = arena.class("C", Vec::new(), Vec::new(), Vec::new());
    let n = number(&mut arena);
    let var = arena.variable_declaration("C", Some(n));
    let statement = arena.variable_statement(NodeFlags::empty(), vec![var]);
    let root = file(&mut arena, vec![interface, class, statement]);

    let mut binder = Binder::default();
    let err = binder.lower_file(&arena, root).unwrap_err();
    assert!(matches!(err, BindError::DuplicateIdentifier { ref name, .. } if name == "C"));

    let graph = binder.graph();
    let kinds: Vec<BindingKind> = graph
        .global()
        .local("C")
        .unwrap()
        .iter()
        .map(|id| graph.binding(*id).unwrap().kind)
        .collect();
    assert_eq!(kinds, [BindingKind::Class]);
}

#[test]
fn test_rolled_back_class_merge_restores_interface() {
    // interface C {} class C { x: Unhandled }
    let mut arena = NodeArena::new();
    let interface = arena.interface("C", Vec::new(), Vec::new(), Vec::new());
    let bad = arena.keyword(SyntaxKind::NumberKeyword);
    let class = arena.class("C", Vec::new(), Vec::new(), vec![bad]);
    let root = file(&mut arena, vec![interface, class]);

    let mut binder = Binder::default();
    let mut reporter = CollectingReporter::new();
    let failed = binder.lower_file_with_reporter(&arena, root, &mut reporter).unwrap();
    assert_eq!(failed, 1);

    let graph = binder.graph();
    let c = global(graph, "C");
    assert_eq!(graph.binding(c).unwrap().kind, BindingKind::Interface);
    assert_eq!(object(graph, c).flavor, ObjectFlavor::Interface);
}

#[test]
fn test_namespaces_merge_and_nest() {
    // namespace A.B.C { interface I {} } namespace A { let y: number; }
    let mut arena = NodeArena::new();
    let i = arena.interface("I", Vec::new(), Vec::new(), Vec::new());
    let dotted = arena.namespace("A.B.C", vec![i]);
    let n = number(&mut arena);
    let y = let_statement(&mut arena, "y", n);
    let again = arena.namespace("A", vec![y]);
    let root = file(&mut arena, vec![dotted, again]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let a = members(graph, global(graph, "A"));
    let b = members(graph, only(graph, a, "B"));
    let c = members(graph, only(graph, b, "C"));
    only(graph, c, "I");
    only(graph, a, "y");
    assert_eq!(graph.scope_path(c), "global > A > B > C");
    assert_eq!(graph.display_type(graph.binding(global(graph, "A")).unwrap().ty), "namespace A");
}

#[test]
fn test_ambient_module_declaration() {
    // declare module "fs" { function read(): string; }
    let mut arena = NodeArena::new();
    let s = string(&mut arena);
    let read = arena.function_declaration("read", Vec::new(), Vec::new(), Some(s));
    let module = arena.ambient_module("fs", vec![read]);
    let root = file(&mut arena, vec![module]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let fs = global(graph, "\"fs\"");
    let scope = members(graph, fs);
    assert!(graph.is_ambient(scope));
    only(graph, scope, "read");
}

// =============================================================================
// Overloads and ambient scopes
// =============================================================================

#[test]
fn test_duplicate_overload_in_strict_global() {
    let mut arena = NodeArena::new();
    let n1 = number(&mut arena);
    let first = function(&mut arena, "f", &[n1]);
    let n2 = number(&mut arena);
    let second = function(&mut arena, "f", &[n2]);
    let root = file(&mut arena, vec![first, second]);

    let mut binder = Binder::default();
    let err = binder.lower_file(&arena, root).unwrap_err();
    assert!(matches!(err, BindError::DuplicateOverload { ref name, .. } if name == "f"));
    assert_eq!(binder.graph().global().local("f").map(<[_]>::len), Some(1));
}

#[test]
fn test_duplicate_overload_in_declare_namespace_is_a_warning() {
    let mut arena = NodeArena::new();
    let first = function(&mut arena, "f", &[]);
    let second = function(&mut arena, "f", &[]);
    let ns = arena.namespace("N", vec![first, second]);
    let ns = arena.with_modifiers(ns, ModifierFlags::DECLARE);
    let root = file(&mut arena, vec![ns]);

    let binder = lower(&arena, root);
    assert_eq!(binder.warnings().len(), 1);
    assert!(binder.warnings()[0].0.contains("'f'"));
    let graph = binder.graph();
    let scope = members(graph, global(graph, "N"));
    only(graph, scope, "f");
}

#[test]
fn test_rolled_back_statement_drops_its_warnings() {
    // declare namespace N { f(): void; f(): void; <unhandled> }
    let mut arena = NodeArena::new();
    let first = function(&mut arena, "f", &[]);
    let second = function(&mut arena, "f", &[]);
    let bad = arena.keyword(SyntaxKind::NumberKeyword);
    let ns = arena.namespace("N", vec![first, second, bad]);
    let ns = arena.with_modifiers(ns, ModifierFlags::DECLARE);
    let root = file(&mut arena, vec![ns]);

    let mut binder = Binder::default();
    let mut reporter = CollectingReporter::new();
    let failed = binder.lower_file_with_reporter(&arena, root, &mut reporter).unwrap();
    assert_eq!(failed, 1);
    assert!(binder.warnings().is_empty());

    let diagnostics = reporter.into_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 9002);
    assert!(binder.graph().global().local("N").is_none());

    // Without a reporter the warnings of a failed statement are dropped too.
    let mut binder = Binder::default();
    assert!(binder.lower_file(&arena, root).is_err());
    assert!(binder.warnings().is_empty());
}

#[test]
fn test_ambient_global_option() {
    let mut arena = NodeArena::new();
    let first = function(&mut arena, "f", &[]);
    let second = function(&mut arena, "f", &[]);
    let root = file(&mut arena, vec![first, second]);

    let options = BinderOptions {
        ambient_global: true,
        ..BinderOptions::default()
    };
    let binder = lower_with(&arena, root, options);
    assert_eq!(binder.warnings().len(), 1);
    global(binder.graph(), "f");
}

#[test]
fn test_distinct_overloads_share_a_set() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let s = string(&mut arena);
    let first = function(&mut arena, "f", &[n]);
    let second = function(&mut arena, "f", &[s]);
    let third = function(&mut arena, "f", &[n, s]);
    let root = file(&mut arena, vec![first, second, third]);

    let binder = lower(&arena, root);
    let set = binder.graph().global().local("f").unwrap();
    assert_eq!(set.len(), 3);
    assert!(all_of(binder.graph(), set, |b| b.is_a(BindingKind::Function)));
}

#[test]
fn test_const_variable_cannot_be_redeclared() {
    // const x: number; var x: number;
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let x = arena.variable_declaration("x", Some(n));
    let constant = arena.variable_statement(NodeFlags::CONST, vec![x]);
    let n = number(&mut arena);
    let x = arena.variable_declaration("x", Some(n));
    let var = arena.variable_statement(NodeFlags::empty(), vec![x]);
    let root = file(&mut arena, vec![constant, var]);

    let mut binder = Binder::default();
    assert!(matches!(
        binder.lower_file(&arena, root),
        Err(BindError::DuplicateIdentifier { .. })
    ));
    let graph = binder.graph();
    assert!(graph.binding(global(graph, "x")).unwrap().has_modifier(ModifierFlags::CONST));
}

// =============================================================================
// Atomicity and failure modes
// =============================================================================

#[test]
fn test_failed_statement_leaves_no_trace() {
    // namespace Outer { interface I {} number }  -- second member is not a declaration
    let mut arena = NodeArena::new();
    let i = arena.interface("I", Vec::new(), Vec::new(), Vec::new());
    let stray = number(&mut arena);
    let outer = arena.namespace("Outer", vec![i, stray]);
    let root = file(&mut arena, vec![outer]);

    let mut binder = Binder::default();
    let scopes = binder.graph().scope_count();
    let types = binder.graph().types().len();
    let err = binder.lower_file(&arena, root).unwrap_err();

    assert!(matches!(
        err,
        BindError::UnhandledDeclarationKind { kind: SyntaxKind::NumberKeyword, .. }
    ));
    assert_eq!(err.code(), 9002);
    assert_eq!(binder.current_scope(), ScopeId::GLOBAL);
    assert_eq!(binder.cursor_depth(), 0);
    let graph = binder.graph();
    assert_eq!(graph.scope_count(), scopes);
    assert_eq!(graph.types().len(), types);
    assert!(graph.global().local("Outer").is_none());
    assert!(graph.global().children.is_empty());
}

#[test]
fn test_missing_node() {
    let mut arena = NodeArena::new();
    let root = arena.source_file("broken.d.ts", vec![NodeIndex(9_999)]);

    let mut binder = Binder::default();
    let err = binder.lower_file(&arena, root).unwrap_err();
    assert_eq!(err, BindError::MissingNode { node: NodeIndex(9_999) });
    assert_eq!(err.code(), 9003);
}

#[test]
fn test_depth_limit() {
    let mut arena = NodeArena::new();
    let deep = arena.namespace("A.B.C.D.E", Vec::new());
    let root = file(&mut arena, vec![deep]);

    let options = BinderOptions {
        max_depth: 4,
        ..BinderOptions::default()
    };
    let mut binder = Binder::new(options);
    let err = binder.lower_file(&arena, root).unwrap_err();
    assert!(matches!(err, BindError::DepthExceeded { limit: 4, .. }));
    assert!(binder.graph().global().local("A").is_none());
}

#[test]
fn test_reporter_continues_after_error() {
    // function f(a: number); function f(b: number); let ok: string;
    let mut arena = NodeArena::new();
    let n1 = number(&mut arena);
    let first = function(&mut arena, "f", &[n1]);
    let n2 = number(&mut arena);
    let second = function(&mut arena, "f", &[n2]);
    let s = string(&mut arena);
    let ok = let_statement(&mut arena, "ok", s);
    let root = file(&mut arena, vec![first, second, ok]);

    let mut binder = Binder::default();
    let mut reporter = CollectingReporter::new();
    let failed = binder
        .lower_file_with_reporter(&arena, root, &mut reporter)
        .unwrap();

    assert_eq!(failed, 1);
    assert!(reporter.has_errors());
    let diagnostics = reporter.into_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 2393);
    assert_eq!(diagnostics[0].file, "test.d.ts");
    let graph = binder.graph();
    global(graph, "ok");
    global(graph, "f");
}

// =============================================================================
// Signatures
// =============================================================================

#[test]
fn test_call_signature_makes_interface_callable() {
    // interface Fn { (x: number): string; new (): Fn; [key: string]: any; }
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let x = arena.parameter("x", Some(n));
    let s = string(&mut arena);
    let call = arena.call_signature(Vec::new(), vec![x], Some(s));
    let fn_ref = reference(&mut arena, "Fn");
    let construct = arena.construct_signature(Vec::new(), Vec::new(), Some(fn_ref));
    let key_type = string(&mut arena);
    let key = arena.parameter("key", Some(key_type));
    let any = arena.keyword(SyntaxKind::AnyKeyword);
    let index = arena.index_signature(key, any);
    let interface = arena.interface("Fn", Vec::new(), Vec::new(), vec![call, construct, index]);
    let root = file(&mut arena, vec![interface]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let id = global(graph, "Fn");
    assert!(object(graph, id).is_callable());
    assert_eq!(object(graph, id).signatures.len(), 2);
    assert_eq!(graph.base_type(graph.binding(id).unwrap().ty), BaseType::FunctionLike);

    let scope = graph.scope(members(graph, id)).unwrap();
    let call = graph.binding(scope.special(SpecialMember::Call).unwrap()[0]).unwrap();
    assert_eq!(graph.display_type(call.ty), "(x: number) => string");
    assert!(scope.special(SpecialMember::New).is_some());
    assert!(scope.special(SpecialMember::Index).is_some());
}

#[test]
fn test_namespace_is_never_callable() {
    let mut arena = NodeArena::new();
    let call = arena.call_signature(Vec::new(), Vec::new(), None);
    let ns = arena.namespace("N", vec![call]);
    let root = file(&mut arena, vec![ns]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let n = global(graph, "N");
    assert!(!object(graph, n).is_callable());
    assert_eq!(graph.base_type(graph.binding(n).unwrap().ty), BaseType::Namespace);
}

#[test]
fn test_property_named_like_special_member() {
    // interface I { __call: number; (): void; }
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let property = arena.property_signature("__call", Some(n));
    let v = void(&mut arena);
    let call = arena.call_signature(Vec::new(), Vec::new(), Some(v));
    let interface = arena.interface("I", Vec::new(), Vec::new(), vec![property, call]);
    let root = file(&mut arena, vec![interface]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let scope = members(graph, global(graph, "I"));
    let property = graph.binding(only(graph, scope, "__call")).unwrap();
    assert_eq!(property.kind, BindingKind::Property);
    assert_eq!(property.ty, TypeId::NUMBER);
    assert_eq!(graph.scope(scope).unwrap().special(SpecialMember::Call).map(<[_]>::len), Some(1));
}

#[test]
fn test_this_parameter_role() {
    // interface I { m(this: I, x: number): void; }
    let mut arena = NodeArena::new();
    let i_ref = reference(&mut arena, "I");
    let this = arena.parameter("this", Some(i_ref));
    let n = number(&mut arena);
    let x = arena.parameter("x", Some(n));
    let v = void(&mut arena);
    let method = arena.method_signature("m", Vec::new(), vec![this, x], Some(v));
    let interface = arena.interface("I", Vec::new(), Vec::new(), vec![method]);
    let root = file(&mut arena, vec![interface]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let m = only(graph, members(graph, global(graph, "I")), "m");
    let signature = graph.binding(m).unwrap().ty;
    let sig = graph.ty(signature).and_then(TypeData::as_signature).unwrap();
    assert!(sig.this_type.is_some());
    let scope = graph.scope(sig.scope).unwrap();
    assert_eq!(scope.parameters(ParameterRole::This).len(), 1);
    assert_eq!(scope.parameters(ParameterRole::Formal).len(), 1);
    assert_eq!(graph.mangle_type(signature), "sig~(number)");
    assert_eq!(graph.display_type(signature), "(this: I, x: number) => void");
}

#[test]
fn test_keyof_constraint() {
    // interface Box {} function pick<K extends keyof Box>(key: K): void;
    let mut arena = NodeArena::new();
    let boxed = arena.interface("Box", Vec::new(), Vec::new(), Vec::new());
    let box_ref = reference(&mut arena, "Box");
    let keyof = arena.type_operator(TypeOperatorKind::KeyOf, box_ref);
    let k = arena.type_parameter("K", Some(keyof), None);
    let k_ref = reference(&mut arena, "K");
    let key = arena.parameter("key", Some(k_ref));
    let v = void(&mut arena);
    let pick = arena.function_declaration("pick", vec![k], vec![key], Some(v));
    let root = file(&mut arena, vec![boxed, pick]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let pick = global(graph, "pick");
    let k = graph.type_parameters_of(pick)[0];
    let param = graph
        .ty(graph.binding(k).unwrap().ty)
        .and_then(TypeData::as_type_parameter)
        .unwrap();
    assert!(param.is_keyof);
    assert!(param.constraint.is_some());
    assert_eq!(graph.display_type(graph.binding(pick).unwrap().ty), "<K>(key: K) => void");
}

#[test]
fn test_predicate_return_types() {
    // function isString(x: any): x is string; function check(x: any): asserts x;
    let mut arena = NodeArena::new();
    let any = arena.keyword(SyntaxKind::AnyKeyword);
    let x = arena.parameter("x", Some(any));
    let s = string(&mut arena);
    let is_string = arena.type_predicate("x", Some(s));
    let guard = arena.function_declaration("isString", Vec::new(), vec![x], Some(is_string));
    let any = arena.keyword(SyntaxKind::AnyKeyword);
    let x = arena.parameter("x", Some(any));
    let asserts = arena.type_predicate("x", None);
    let asserts = arena.with_flags(asserts, NodeFlags::ASSERTS);
    let check = arena.function_declaration("check", Vec::new(), vec![x], Some(asserts));
    let root = file(&mut arena, vec![guard, check]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let return_of = |name: &str| {
        let ty = graph.binding(global(graph, name)).unwrap().ty;
        graph.ty(ty).and_then(TypeData::as_signature).unwrap().return_type
    };
    assert_eq!(graph.display_type(return_of("isString")), "x is string");
    assert_eq!(graph.display_type(return_of("check")), "asserts x");
    assert_eq!(graph.base_type(return_of("isString")), BaseType::BooleanLike);
}

// =============================================================================
// Type positions
// =============================================================================

#[test]
fn test_primitive_references_are_canonical() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let a = let_statement(&mut arena, "a", n);
    let by_name = reference(&mut arena, "string");
    let b = let_statement(&mut arena, "b", by_name);
    let root = file(&mut arena, vec![a, b]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    assert_eq!(graph.binding(global(graph, "a")).unwrap().ty, TypeId::NUMBER);
    assert_eq!(graph.binding(global(graph, "b")).unwrap().ty, TypeId::STRING);
    assert!(graph.pending_references().is_empty());
}

#[test]
fn test_literal_union_display() {
    // type L = "a" | 1 | true | null;
    let mut arena = NodeArena::new();
    let a = arena.string_literal_type("a");
    let one = arena.number_literal_type("1");
    let t = arena.boolean_literal_type(true);
    let null = arena.keyword(SyntaxKind::NullKeyword);
    let union = arena.union_type(vec![a, one, t, null]);
    let alias = arena.type_alias("L", Vec::new(), union);
    let root = file(&mut arena, vec![alias]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let TypeData::Alias(alias) = graph.ty(graph.binding(global(graph, "L")).unwrap().ty).unwrap() else {
        panic!("L is not an alias");
    };
    assert_eq!(graph.display_type(alias.target), "\"a\" | 1 | true | null");
}

#[test]
fn test_single_member_union_collapses() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let union = arena.union_type(vec![n]);
    let x = let_statement(&mut arena, "x", union);
    let root = file(&mut arena, vec![x]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    assert_eq!(graph.binding(global(graph, "x")).unwrap().ty, TypeId::NUMBER);
}

#[test]
fn test_type_literal_scope() {
    // let p: { x: number; y?: string };
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let x = arena.property_signature("x", Some(n));
    let s = string(&mut arena);
    let y = arena.property_signature("y", Some(s));
    let y = arena.with_flags(y, NodeFlags::OPTIONAL);
    let literal = arena.type_literal(vec![x, y]);
    let p = let_statement(&mut arena, "p", literal);
    let root = file(&mut arena, vec![p]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let p = graph.binding(global(graph, "p")).unwrap().ty;
    assert_eq!(graph.display_type(p), "{ x: number; y?: string; }");
    let scope = graph.ty(p).and_then(TypeData::scope).unwrap();
    assert!(graph.is_ambient(scope));
    assert_eq!(graph.scope(scope).unwrap().owner, ScopeOwner::Type(p));
}

#[test]
fn test_mapped_type_binds_key_parameter() {
    // interface Box { a: number } type M = { [K in keyof Box]: string };
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let a = arena.property_signature("a", Some(n));
    let boxed = arena.interface("Box", Vec::new(), Vec::new(), vec![a]);
    let box_ref = reference(&mut arena, "Box");
    let keyof = arena.type_operator(TypeOperatorKind::KeyOf, box_ref);
    let k = arena.type_parameter("K", Some(keyof), None);
    let s = string(&mut arena);
    let mapped = arena.mapped_type(k, s);
    let alias = arena.type_alias("M", Vec::new(), mapped);
    let root = file(&mut arena, vec![boxed, alias]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let TypeData::Alias(alias) = graph.ty(graph.binding(global(graph, "M")).unwrap().ty).unwrap() else {
        panic!("M is not an alias");
    };
    let TypeData::Mapped(mapped) = graph.ty(alias.target).unwrap() else {
        panic!("M is not a mapped type");
    };
    assert_eq!(graph.binding(mapped.key).unwrap().scope, mapped.scope);
    assert_eq!(graph.display_type(alias.target), "{ [K in keyof Box]: string }");
}

#[test]
fn test_conditional_infer_scope() {
    // type Elem<T> = T extends [infer R, infer R] ? R : never;
    let mut arena = NodeArena::new();
    let t = arena.type_parameter("T", None, None);
    let check = reference(&mut arena, "T");
    let r1 = arena.type_parameter("R", None, None);
    let infer1 = arena.infer_type(r1);
    let r2 = arena.type_parameter("R", None, None);
    let infer2 = arena.infer_type(r2);
    let extends = arena.tuple_type(vec![infer1, infer2]);
    let true_type = reference(&mut arena, "R");
    let never = arena.keyword(SyntaxKind::NeverKeyword);
    let conditional = arena.conditional_type(check, extends, true_type, never);
    let alias = arena.type_alias("Elem", vec![t], conditional);
    let root = file(&mut arena, vec![alias]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let TypeData::Alias(alias) = graph.ty(graph.binding(global(graph, "Elem")).unwrap().ty).unwrap() else {
        panic!("Elem is not an alias");
    };
    let TypeData::Conditional(conditional) = graph.ty(alias.target).unwrap() else {
        panic!("Elem is not conditional");
    };
    let r = only(graph, conditional.scope, "R");
    assert_eq!(graph.binding(r).unwrap().kind, BindingKind::TypeParameter);
    assert_eq!(
        graph
            .ty(conditional.true_type)
            .and_then(TypeData::as_reference)
            .and_then(|reference| reference.resolved)
            .map(|resolved| resolved.target),
        Some(RefTarget::Binding(r))
    );
    assert_eq!(
        graph.display_type(alias.target),
        "T extends [infer R, infer R] ? R : never"
    );
}

#[test]
fn test_numeric_and_computed_member_names() {
    // interface I { 0x10: number; [Symbol.iterator]: string; }
    let mut arena = NodeArena::new();
    let hex = arena.numeric_literal("0x10");
    let n = number(&mut arena);
    let numeric = arena.property_node(SyntaxKind::PropertySignature, hex, Some(n));
    let computed_name = arena.computed_name("Symbol.iterator");
    let s = string(&mut arena);
    let computed = arena.property_node(SyntaxKind::PropertySignature, computed_name, Some(s));
    let interface = arena.interface("I", Vec::new(), Vec::new(), vec![numeric, computed]);
    let root = file(&mut arena, vec![interface]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let scope = members(graph, global(graph, "I"));
    only(graph, scope, "16");
    only(graph, scope, "[Symbol.iterator]");
}
