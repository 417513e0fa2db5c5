// src/translate.rs
//
// Source-to-internal type translation.
//
// One class symbol is minted per source class and cached, so every
// translation of the same class lands on the same canonical symbol and
// the same interned TypeId. Failure to resolve a required class is fatal
// to bring-up; there is nothing to recover to without the built-ins.

use rustc_hash::FxHashMap;

use crate::decl::{ClassDecl, DeclOrigin};
use crate::errors::BuiltinsError;
use crate::stdlib::{SourceClassId, SourceType, StdlibScope};
use crate::symbols::{ClassSymbol, SymbolTable};
use crate::types::{TypeArena, TypeId};

/// Translation session over a stdlib scope, a symbol table, and a type
/// arena. Lives only for the duration of registry bring-up.
pub struct Translator<'a> {
    stdlib: &'a StdlibScope,
    symbols: &'a mut SymbolTable,
    types: &'a mut TypeArena,
    class_cache: FxHashMap<SourceClassId, ClassSymbol>,
}

impl<'a> Translator<'a> {
    pub fn new(
        stdlib: &'a StdlibScope,
        symbols: &'a mut SymbolTable,
        types: &'a mut TypeArena,
    ) -> Self {
        Self {
            stdlib,
            symbols,
            types,
            class_cache: FxHashMap::default(),
        }
    }

    /// Canonical class symbol for a source class; minted and bound on
    /// first use, cached afterwards.
    pub fn class_symbol(&mut self, class: SourceClassId) -> ClassSymbol {
        if let Some(&symbol) = self.class_cache.get(&class) {
            return symbol;
        }
        let name = self.stdlib.class_name(class).to_string();
        let symbol = self.symbols.declare_class(|symbol| ClassDecl {
            symbol,
            name,
            origin: DeclOrigin::Source,
        });
        self.class_cache.insert(class, symbol);
        symbol
    }

    /// Translate a source type into its interned internal form.
    pub fn translate(&mut self, ty: SourceType) -> TypeId {
        let class = self.class_symbol(ty.class);
        self.types.class_type(class, ty.nullable)
    }

    /// Resolve a required built-in class by name.
    pub fn resolve_class(&mut self, name: &str) -> Result<ClassSymbol, BuiltinsError> {
        let id = self
            .stdlib
            .find_class(name)
            .ok_or_else(|| BuiltinsError::MissingBuiltin {
                name: name.to_string(),
            })?;
        Ok(self.class_symbol(id))
    }

    /// Resolve a required built-in class and translate its type with the
    /// given nullability.
    pub fn resolve_type(&mut self, name: &str, nullable: bool) -> Result<TypeId, BuiltinsError> {
        let class = self.resolve_class(name)?;
        Ok(self.types.class_type(class, nullable))
    }

    /// Mint a pending reference to a member function of a built-in class.
    /// The declaration is bound later, when stdlib IR is materialized.
    pub fn reference_member(
        &mut self,
        class_name: &str,
        member: &str,
    ) -> Result<crate::symbols::FunctionSymbol, BuiltinsError> {
        let class = self
            .stdlib
            .find_class(class_name)
            .ok_or_else(|| BuiltinsError::MissingBuiltin {
                name: class_name.to_string(),
            })?;
        if !self.stdlib.has_member(class, member) {
            return Err(BuiltinsError::MissingMember {
                class: class_name.to_string(),
                member: member.to_string(),
            });
        }
        Ok(self.symbols.alloc_function())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_symbols_are_canonical() {
        let stdlib = StdlibScope::core();
        let mut symbols = SymbolTable::new();
        let mut types = TypeArena::new();
        let mut tr = Translator::new(&stdlib, &mut symbols, &mut types);

        let a = tr.resolve_class("Int").unwrap();
        let b = tr.resolve_class("Int").unwrap();
        assert_eq!(a, b);
        assert_eq!(symbols.class(a).name, "Int");
    }

    #[test]
    fn translate_distinguishes_nullability() {
        let stdlib = StdlibScope::core();
        let mut symbols = SymbolTable::new();
        let mut types = TypeArena::new();
        let mut tr = Translator::new(&stdlib, &mut symbols, &mut types);

        let int = stdlib.find_class("Int").unwrap();
        let plain = tr.translate(stdlib.default_type(int));
        let nullable = tr.translate(SourceType {
            class: int,
            nullable: true,
        });
        assert_ne!(plain, nullable);
        assert_eq!(types.classifier(plain), types.classifier(nullable));
    }

    #[test]
    fn missing_class_is_fatal() {
        let stdlib = StdlibScope::new();
        let mut symbols = SymbolTable::new();
        let mut types = TypeArena::new();
        let mut tr = Translator::new(&stdlib, &mut symbols, &mut types);

        let err = tr.resolve_class("Any").unwrap_err();
        assert!(matches!(err, BuiltinsError::MissingBuiltin { name } if name == "Any"));
    }

    #[test]
    fn member_reference_is_pending() {
        let stdlib = StdlibScope::core();
        let mut symbols = SymbolTable::new();
        let mut types = TypeArena::new();
        let mut tr = Translator::new(&stdlib, &mut symbols, &mut types);

        let not = tr.reference_member("Boolean", "not").unwrap();
        assert!(!symbols.is_bound_function(not));
    }

    #[test]
    fn missing_member_is_fatal() {
        let stdlib = StdlibScope::core();
        let mut symbols = SymbolTable::new();
        let mut types = TypeArena::new();
        let mut tr = Translator::new(&stdlib, &mut symbols, &mut types);

        let err = tr.reference_member("Boolean", "xor").unwrap_err();
        assert!(matches!(err, BuiltinsError::MissingMember { .. }));
    }
}
