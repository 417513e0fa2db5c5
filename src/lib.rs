// src/lib.rs
//
// Intermediate-representation built-ins for the Rill compiler: canonical
// types and classes for the primitive universe, and the compiler-internal
// operators (equality, comparisons, null assertion, throw helpers) that
// have no source text. One registry is built per compilation session and
// shared read-only with every later phase.

pub mod builtins;
pub mod decl;
pub mod errors;
pub mod primitive;
pub mod stdlib;
pub mod symbols;
pub mod translate;
pub mod types;

pub use builtins::IrBuiltins;
pub use errors::BuiltinsError;
pub use primitive::{PrimitiveKind, RelationKind};
