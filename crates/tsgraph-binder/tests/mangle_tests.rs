use super::*;
use crate::test_utils::*;
use tsgraph_decl::{NodeArena, NodeFlags};

/// Mangled type of the single global binding `name`.
fn mangled(binder: &Binder, name: &str) -> String {
    let graph = binder.graph();
    let id = global(graph, name);
    graph.mangle_type(graph.binding(id).unwrap().ty)
}

#[test]
fn test_parameter_names_do_not_affect_mangling() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let s = string(&mut arena);
    let f = function(&mut arena, "f", &[n, s]);
    let x = arena.parameter("x", Some(n));
    let y = arena.parameter("y", Some(s));
    let ret = void(&mut arena);
    let g = arena.function_declaration("g", Vec::new(), vec![x, y], Some(ret));
    let root = file(&mut arena, vec![f, g]);

    let binder = lower(&arena, root);
    assert_eq!(mangled(&binder, "f"), "sig~(number,string)");
    assert_eq!(mangled(&binder, "f"), mangled(&binder, "g"));
}

#[test]
fn test_parameter_type_changes_key() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let s = string(&mut arena);
    let f = function(&mut arena, "f", &[n]);
    let g = function(&mut arena, "g", &[s]);
    let root = file(&mut arena, vec![f, g]);

    let binder = lower(&arena, root);
    assert_ne!(mangled(&binder, "f"), mangled(&binder, "g"));
}

#[test]
fn test_mangling_stops_at_rest_parameter() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let s = string(&mut arena);
    let first = arena.parameter("first", Some(n));
    let elements = arena.array_type(s);
    let rest = arena.parameter("rest", Some(elements));
    let rest = arena.with_flags(rest, NodeFlags::REST);
    let f = arena.function_declaration("f", Vec::new(), vec![first, rest], None);
    let root = file(&mut arena, vec![f]);

    let binder = lower(&arena, root);
    assert_eq!(mangled(&binder, "f"), "sig~(number)");
}

#[test]
fn test_array_and_tuple_contributions() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let s = string(&mut arena);
    let array = arena.array_type(n);
    let tuple = arena.tuple_type(vec![n, s]);
    let a = arena.variable_declaration("a", Some(array));
    let t = arena.variable_declaration("t", Some(tuple));
    let statement = arena.variable_statement(NodeFlags::empty(), vec![a, t]);
    let root = file(&mut arena, vec![statement]);

    let binder = lower(&arena, root);
    assert_eq!(mangled(&binder, "a"), "array~number");
    assert_eq!(mangled(&binder, "t"), "tuple~2~number,string");
}

#[test]
fn test_union_mangling_ignores_order() {
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let s = string(&mut arena);
    let ab = arena.union_type(vec![n, s]);
    let ba = arena.union_type(vec![s, n]);
    let f = function(&mut arena, "f", &[ab]);
    let g = function(&mut arena, "g", &[ba]);
    let root = file(&mut arena, vec![f, g]);

    let binder = lower(&arena, root);
    assert_eq!(mangled(&binder, "f"), "sig~(number|string)");
    assert_eq!(mangled(&binder, "f"), mangled(&binder, "g"));
}

#[test]
fn test_reference_contribution_follows_target() {
    let mut arena = NodeArena::new();
    let boxed = arena.interface("Box", Vec::new(), Vec::new(), Vec::new());
    let box_ref = reference(&mut arena, "Box");
    let missing = reference(&mut arena, "Missing");
    let f = function(&mut arena, "f", &[box_ref]);
    let g = function(&mut arena, "g", &[missing]);
    let root = file(&mut arena, vec![boxed, f, g]);

    let binder = lower(&arena, root);
    assert_eq!(mangled(&binder, "f"), "sig~(reference->object~Box)");
    assert_eq!(mangled(&binder, "g"), "sig~(reference->?Missing)");
}

#[test]
fn test_type_parameter_constraints_are_mangled() {
    let mut arena = NodeArena::new();
    let s = string(&mut arena);
    let t = arena.type_parameter("T", None, None);
    let u = arena.type_parameter("U", Some(s), None);
    let f = arena.function_declaration("f", vec![t], Vec::new(), None);
    let g = arena.function_declaration("g", vec![u], Vec::new(), None);
    let root = file(&mut arena, vec![f, g]);

    let binder = lower(&arena, root);
    assert_eq!(mangled(&binder, "f"), "sig~()<typeparam~any>");
    assert_eq!(mangled(&binder, "g"), "sig~()<typeparam~string>");
}

#[test]
fn test_object_literal_members_contribute_types() {
    // function f(x: { a: number }): void; function f(x: { a: string; b?: number }): void;
    let mut arena = NodeArena::new();
    let n = number(&mut arena);
    let a = arena.property_signature("a", Some(n));
    let first = arena.type_literal(vec![a]);
    let s = string(&mut arena);
    let a = arena.property_signature("a", Some(s));
    let n = number(&mut arena);
    let b = arena.property_signature("b", Some(n));
    let b = arena.with_flags(b, NodeFlags::OPTIONAL);
    let second = arena.type_literal(vec![a, b]);
    let f1 = function(&mut arena, "f", &[first]);
    let f2 = function(&mut arena, "f", &[second]);
    let root = file(&mut arena, vec![f1, f2]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let set = graph.global().local("f").unwrap();
    assert_eq!(set.len(), 2);
    let keys: Vec<String> = set
        .iter()
        .map(|id| graph.mangle_type(graph.binding(*id).unwrap().ty))
        .collect();
    assert_eq!(keys[0], "sig~(object~{a:number})");
    assert_eq!(keys[1], "sig~(object~{a:string,b?:number})");
}

#[test]
fn test_same_named_objects_in_different_namespaces_differ() {
    // namespace A { interface Box {} } namespace B { interface Box {} }
    // function f(x: A.Box): void; function f(x: B.Box): void;
    let mut arena = NodeArena::new();
    let a_box = arena.interface("Box", Vec::new(), Vec::new(), Vec::new());
    let a = arena.namespace("A", vec![a_box]);
    let b_box = arena.interface("Box", Vec::new(), Vec::new(), Vec::new());
    let b = arena.namespace("B.Inner", vec![b_box]);
    let a_ref = reference(&mut arena, "A.Box");
    let b_ref = reference(&mut arena, "B.Inner.Box");
    let f1 = function(&mut arena, "f", &[a_ref]);
    let f2 = function(&mut arena, "f", &[b_ref]);
    let root = file(&mut arena, vec![a, b, f1, f2]);

    let binder = lower(&arena, root);
    let graph = binder.graph();
    let set = graph.global().local("f").unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(
        graph.mangle_type(graph.binding(set[0]).unwrap().ty),
        "sig~(reference->object~A.Box)"
    );
    assert_eq!(
        graph.mangle_type(graph.binding(set[1]).unwrap().ty),
        "sig~(reference->object~B.Inner.Box)"
    );
}
