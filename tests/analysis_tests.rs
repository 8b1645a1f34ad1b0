//! End-to-end tests through the public API.
//!
//! Declaration trees are built with `NodeArena` helpers, lowered with
//! `analyze`, and the resulting graph is walked the way downstream code
//! would.

use tsgraph::binder::{BaseType, BindingId, BindingKind, RefTarget, Resolution, ScopeId, TypeData, TypeId};
use tsgraph::decl::{ModifierFlags, NodeFlags, SyntaxKind};
use tsgraph::{Analysis, BinderOptions, NodeArena, NodeIndex, SourceUnit, TypeGraph, analyze};

fn run(arena: &NodeArena, root: NodeIndex) -> Analysis {
    tsgraph::tracing_config::init_tracing();
    analyze(&[SourceUnit::new(arena, root)], BinderOptions::default()).expect("analysis aborted")
}

fn global(graph: &TypeGraph, name: &str) -> BindingId {
    match graph.resolve(ScopeId::GLOBAL, name, true) {
        Some(Resolution::Bindings([only])) => *only,
        other => panic!("expected one global '{name}', got {other:?}"),
    }
}

fn reference_target(graph: &TypeGraph, ty: TypeId) -> Option<RefTarget> {
    graph
        .ty(ty)
        .and_then(TypeData::as_reference)
        .and_then(|r| r.resolved)
        .map(|r| r.target)
}

/// `function name(x: number): void`
fn number_function(arena: &mut NodeArena, name: &str, parameter: &str) -> NodeIndex {
    let n = arena.keyword(SyntaxKind::NumberKeyword);
    let x = arena.parameter(parameter, Some(n));
    let v = arena.keyword(SyntaxKind::VoidKeyword);
    arena.function_declaration(name, Vec::new(), vec![x], Some(v))
}

#[test]
fn test_scope_chain_terminates_at_root() {
    let mut arena = NodeArena::new();
    let n = arena.keyword(SyntaxKind::NumberKeyword);
    let inner = arena.variable_declaration("inner", Some(n));
    let statement = arena.variable_statement(NodeFlags::LET, vec![inner]);
    let ns = arena.namespace("A.B", vec![statement]);
    let root = arena.source_file("chain.d.ts", vec![ns]);

    let analysis = run(&arena, root);
    let graph = &analysis.graph;
    let a = graph.member_scope(global(graph, "A")).unwrap();
    let b = match graph.resolve(a, "B", true) {
        Some(Resolution::Bindings([b])) => graph.member_scope(*b).unwrap(),
        other => panic!("B not found: {other:?}"),
    };

    assert!(graph.resolve(b, "inner", false).is_some());
    assert!(graph.resolve(a, "inner", false).is_none());
    assert!(graph.resolve(b, "nowhere", false).is_none());

    let mut hops = 0;
    let mut current = Some(b);
    while let Some(scope) = current {
        current = graph.scope(scope).unwrap().outer;
        hops += 1;
    }
    assert_eq!(hops, 3);
}

#[test]
fn test_primitive_instances_are_shared() {
    let mut arena = NodeArena::new();
    let n1 = arena.keyword(SyntaxKind::NumberKeyword);
    let n2 = arena.type_reference("number", Vec::new());
    let a = arena.variable_declaration("a", Some(n1));
    let b = arena.variable_declaration("b", Some(n2));
    let statement = arena.variable_statement(NodeFlags::LET, vec![a, b]);
    let root = arena.source_file("primitives.d.ts", vec![statement]);

    let analysis = run(&arena, root);
    let graph = &analysis.graph;
    let a = graph.binding(global(graph, "a")).unwrap().ty;
    let b = graph.binding(global(graph, "b")).unwrap().ty;
    assert_eq!(a, b);
    assert_eq!(a, TypeId::NUMBER);
}

#[test]
fn test_mangled_keys_ignore_parameter_names() {
    let mut arena = NodeArena::new();
    let f = number_function(&mut arena, "f", "x");
    let g = number_function(&mut arena, "g", "renamed");
    let s = arena.keyword(SyntaxKind::StringKeyword);
    let y = arena.parameter("x", Some(s));
    let h = arena.function_declaration("h", Vec::new(), vec![y], None);
    let root = arena.source_file("mangle.d.ts", vec![f, g, h]);

    let analysis = run(&arena, root);
    let graph = &analysis.graph;
    let key = |name: &str| graph.mangle_type(graph.binding(global(graph, name)).unwrap().ty);
    assert_eq!(key("f"), key("g"));
    assert_ne!(key("f"), key("h"));
}

#[test]
fn test_interface_declarations_merge() {
    // interface Box<T> { value: T } interface Box<T> { extra: T }
    let mut arena = NodeArena::new();
    let mut declaration = |member: &str| {
        let t = arena.type_parameter("T", None, None);
        let t_ref = arena.type_reference("T", Vec::new());
        let property = arena.property_signature(member, Some(t_ref));
        arena.interface("Box", vec![t], Vec::new(), vec![property])
    };
    let first = declaration("value");
    let second = declaration("extra");
    let root = arena.source_file("box.d.ts", vec![first, second]);

    let analysis = run(&arena, root);
    assert!(!analysis.has_errors(), "{:?}", analysis.diagnostics);
    let graph = &analysis.graph;
    let boxed = global(graph, "Box");
    let object = graph.ty(graph.binding(boxed).unwrap().ty).and_then(TypeData::as_object).unwrap();
    assert_eq!(object.name.as_deref(), Some("Box"));
    let names: Vec<String> = graph
        .scope(object.scope)
        .unwrap()
        .entries()
        .map(|(name, _)| name.into_owned())
        .collect();
    assert_eq!(names, ["T", "value", "extra"]);
}

#[test]
fn test_forward_alias_resolves() {
    // type A = B; interface B {}
    let mut arena = NodeArena::new();
    let b_ref = arena.type_reference("B", Vec::new());
    let a = arena.type_alias("A", Vec::new(), b_ref);
    let b = arena.interface("B", Vec::new(), Vec::new(), Vec::new());
    let root = arena.source_file("forward.d.ts", vec![a, b]);

    let analysis = run(&arena, root);
    assert!(analysis.unresolved.is_empty());
    assert!(analysis.diagnostics.is_empty());
    assert_eq!(analysis.unresolved_json().unwrap(), "{}");

    let graph = &analysis.graph;
    let TypeData::Alias(alias) = graph.ty(graph.binding(global(graph, "A")).unwrap().ty).unwrap() else {
        panic!("A is not an alias");
    };
    assert_eq!(
        reference_target(graph, alias.target),
        Some(RefTarget::Binding(global(graph, "B")))
    );
}

#[test]
fn test_generic_deduction() {
    // function id<T>(x: T): T;  function none<T>(): void;
    let mut arena = NodeArena::new();
    let t = arena.type_parameter("T", None, None);
    let t_ref = arena.type_reference("T", Vec::new());
    let x = arena.parameter("x", Some(t_ref));
    let ret = arena.type_reference("T", Vec::new());
    let id = arena.function_declaration("id", vec![t], vec![x], Some(ret));
    let t = arena.type_parameter("T", None, None);
    let none = arena.function_declaration("none", vec![t], Vec::new(), None);
    let root = arena.source_file("generic.d.ts", vec![id, none]);

    let mut analysis = run(&arena, root);
    let graph = &mut analysis.graph;
    let id = global(graph, "id");
    let scope = graph.instantiate(id, &[], &[TypeId::STRING], None).unwrap();
    assert_eq!(graph.instantiation_arguments(scope), vec![TypeId::STRING]);

    let none = global(graph, "none");
    let err = graph.instantiate(none, &[], &[TypeId::STRING], None).unwrap_err();
    assert!(matches!(err, tsgraph::BindError::MissingTypeArgument { candidates: 0, .. }));
}

#[test]
fn test_duplicate_overload_strict_versus_ambient() {
    let mut arena = NodeArena::new();
    let f1 = number_function(&mut arena, "f", "x");
    let f2 = number_function(&mut arena, "f", "x");
    let strict = arena.source_file("strict.d.ts", vec![f1, f2]);

    let g1 = number_function(&mut arena, "f", "x");
    let g2 = number_function(&mut arena, "f", "x");
    let ns = arena.namespace("Ambient", vec![g1, g2]);
    let ns = arena.with_modifiers(ns, ModifierFlags::DECLARE);
    let ambient = arena.source_file("ambient.d.ts", vec![ns]);

    let analysis = analyze(
        &[SourceUnit::new(&arena, strict), SourceUnit::new(&arena, ambient)],
        BinderOptions::default(),
    )
    .unwrap();

    assert_eq!(analysis.failed_statements, 1);
    let errors: Vec<_> = analysis
        .diagnostics
        .iter()
        .filter(|d| d.category == tsgraph::DiagnosticCategory::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, 2393);
    assert_eq!(errors[0].file, "strict.d.ts");
    assert!(
        analysis
            .diagnostics
            .iter()
            .any(|d| d.category == tsgraph::DiagnosticCategory::Warning && d.file == "ambient.d.ts")
    );

    let graph = &analysis.graph;
    assert_eq!(graph.global().local("f").map(<[_]>::len), Some(1));
    let ns = graph.member_scope(global(graph, "Ambient")).unwrap();
    assert_eq!(graph.scope(ns).unwrap().local("f").map(<[_]>::len), Some(1));
}

#[test]
fn test_unresolved_references_become_diagnostics() {
    // interface Holder { a: Missing; b: Holder; }
    let mut arena = NodeArena::new();
    let missing = arena.type_reference("Missing", Vec::new());
    let a = arena.property_signature("a", Some(missing));
    let holder_ref = arena.type_reference("Holder", Vec::new());
    let b = arena.property_signature("b", Some(holder_ref));
    let holder = arena.interface("Holder", Vec::new(), Vec::new(), vec![a, b]);
    let root = arena.source_file("holder.d.ts", vec![holder]);

    let analysis = run(&arena, root);
    assert_eq!(analysis.failed_statements, 0);
    assert!(analysis.has_errors());
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].code, 2304);
    assert_eq!(analysis.diagnostics[0].message_text, "Cannot find name 'Missing'.");

    let json: serde_json::Value = serde_json::from_str(&analysis.unresolved_json().unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({ "global > Holder": ["Missing"] }));

    let graph = &analysis.graph;
    let scope = graph.member_scope(global(graph, "Holder")).unwrap();
    let a = graph.scope(scope).unwrap().local("a").unwrap()[0];
    assert_eq!(graph.base_type(graph.binding(a).unwrap().ty), BaseType::Unresolved);
}

#[test]
fn test_declaration_spaces_coexist() {
    // interface Array<T> {} declare var Array: any;
    let mut arena = NodeArena::new();
    let t = arena.type_parameter("T", None, None);
    let interface = arena.interface("Array", vec![t], Vec::new(), Vec::new());
    let any = arena.keyword(SyntaxKind::AnyKeyword);
    let var = arena.variable_declaration("Array", Some(any));
    let statement = arena.variable_statement(NodeFlags::empty(), vec![var]);
    let statement = arena.with_modifiers(statement, ModifierFlags::DECLARE);
    let root = arena.source_file("lib.d.ts", vec![interface, statement]);

    let analysis = run(&arena, root);
    assert!(analysis.diagnostics.is_empty());
    let graph = &analysis.graph;
    let set = graph.global().local("Array").unwrap();
    let kinds: Vec<BindingKind> = set.iter().map(|id| graph.binding(*id).unwrap().kind).collect();
    assert_eq!(kinds, [BindingKind::Interface, BindingKind::Variable]);
}

#[test]
fn test_missing_root_aborts() {
    let arena = NodeArena::new();
    let result = analyze(&[SourceUnit::new(&arena, NodeIndex(0))], BinderOptions::default());
    assert!(matches!(result, Err(tsgraph::BindError::MissingNode { .. })));
}
