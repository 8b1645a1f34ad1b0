//! Centralized limits and thresholds for the type-graph engine.
//!
//! Declaration trees come from an external front end and may be arbitrarily
//! deep or contain cyclic type references (`type A = B; type B = A`). Every
//! recursive or iterative walk in the engine is bounded by one of the
//! constants below.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth while lowering a declaration tree.
///
/// Each nested member list, parameter list or composite type node adds a
/// level. Exceeding it is fatal (`DepthExceeded`).
///
/// ```typescript
/// type Deep = { a: { b: { c: { /* ... hundreds of levels ... */ } } } };
/// ```
pub const MAX_LOWERING_DEPTH: u32 = 500;

/// Maximum depth when computing a structural mangled key.
///
/// References are mangled through their resolved target, so alias cycles
/// would otherwise recurse forever:
///
/// ```typescript
/// type A = B[];
/// type B = A[];
/// declare function f(x: A): void;
/// ```
pub const MAX_MANGLE_DEPTH: u32 = 32;

/// Maximum number of reference hops followed when chasing a reference to
/// its final bound type.
pub const MAX_REFERENCE_CHAIN: u32 = 64;

// =============================================================================
// Operation Counts
// =============================================================================

/// Maximum number of outer-scope hops during a single name lookup.
///
/// The scope tree is acyclic by construction; this is a backstop for
/// corrupted parent links.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;
