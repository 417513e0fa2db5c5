// src/errors.rs
//! IR bring-up errors (E4xxx).
//!
//! These abort compiler initialization: the compiler cannot function
//! without its built-in universe, so there is no recovery path. Internal
//! consistency bugs (double-binding, unbound reads) are panics, not
//! variants here.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum BuiltinsError {
    #[error("standard library class '{name}' is missing")]
    #[diagnostic(
        code(E4001),
        help("the core standard library must be loaded before IR bring-up")
    )]
    MissingBuiltin { name: String },

    #[error("standard library member '{class}.{member}' is missing")]
    #[diagnostic(code(E4002))]
    MissingMember { class: String, member: String },
}
