// src/decl.rs
//
// Declaration data model for compiler-owned built-ins.
//
// Declarations are the materialized side of a symbol: a symbol is minted
// first (identity only), then bound to exactly one declaration. Built-in
// declarations carry no source location and are marked with a synthetic
// origin so later phases can tell them from user code.

use smallvec::SmallVec;

use crate::symbols::{ClassSymbol, FunctionSymbol, TypeParamSymbol, ValueParamSymbol};
use crate::types::TypeId;

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclOrigin {
    /// Written in source text (including the standard library).
    Source,
    /// Synthesized by the compiler with no source location.
    BuiltinOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Final,
    Open,
    Abstract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

/// Owner of a function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// The hidden `rill.internal.ir` package that owns every synthesized
    /// operator.
    BuiltinsPackage,
    /// A class, for member functions referenced out of the standard
    /// library (e.g. `Boolean.not`).
    Class(ClassSymbol),
}

/// A function declaration.
///
/// Built-in operators always come out public, final, and free of the
/// source-only flags; the struct keeps the flags explicit so the same
/// declaration shape serves referenced library members when their IR is
/// materialized.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    /// The symbol this declaration is bound to; points back at itself.
    pub symbol: FunctionSymbol,
    pub name: String,
    /// Unique key distinguishing same-named overloads:
    /// `name#[render:render:...]`.
    pub mangle: String,
    pub return_type: TypeId,
    pub visibility: Visibility,
    pub modality: Modality,
    pub origin: DeclOrigin,
    pub parent: ParentRef,
    pub value_params: SmallVec<[ValueParamSymbol; 2]>,
    pub type_params: SmallVec<[TypeParamSymbol; 1]>,
    pub is_suspend: bool,
    pub is_inline: bool,
    pub is_tailrec: bool,
    pub is_override: bool,
}

/// A value parameter, named positionally (`arg0`, `arg1`, ...).
#[derive(Debug, Clone)]
pub struct ValueParamDecl {
    pub symbol: ValueParamSymbol,
    pub owner: FunctionSymbol,
    pub index: u32,
    pub name: String,
    pub ty: TypeId,
    pub origin: DeclOrigin,
    pub vararg_element: Option<TypeId>,
    pub is_crossinline: bool,
    pub is_noinline: bool,
}

/// A type parameter, named positionally (`T0`, `T1`, ...).
#[derive(Debug, Clone)]
pub struct TypeParamDecl {
    pub symbol: TypeParamSymbol,
    pub owner: FunctionSymbol,
    pub index: u32,
    pub name: String,
    pub variance: Variance,
    pub is_reified: bool,
    pub upper_bounds: SmallVec<[TypeId; 1]>,
    pub origin: DeclOrigin,
}

/// A class declaration. The registry only ever resolves classes out of
/// the standard library; it never synthesizes one.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub symbol: ClassSymbol,
    pub name: String,
    pub origin: DeclOrigin,
}
