// src/types.rs
//
// Interned internal types with TypeId handles for O(1) equality.
//
// The built-in universe only ever needs simple types: a classifier (class
// or type parameter) plus a nullability marker. Interning makes canonical
// forms shareable; flipping nullability re-interns and lands on the same
// TypeId every time.

use hashbrown::HashMap;

use crate::symbols::{ClassSymbol, SymbolTable, TypeParamSymbol};

/// Handle to an interned type (Copy, trivial Eq/Hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// What a type refers to, independent of nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classifier {
    Class(ClassSymbol),
    TypeParam(TypeParamSymbol),
}

/// The canonical internal type representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrType {
    pub classifier: Classifier,
    pub nullable: bool,
}

/// Per-session type storage with automatic deduplication.
pub struct TypeArena {
    /// Interned types, indexed by TypeId.
    types: Vec<IrType>,
    /// Deduplication map.
    intern_map: HashMap<IrType, TypeId>,
}

impl std::fmt::Debug for TypeArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeArena")
            .field("types_count", &self.types.len())
            .finish_non_exhaustive()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            intern_map: HashMap::new(),
        }
    }

    /// Intern a type, returning the existing TypeId if already interned.
    fn intern(&mut self, ty: IrType) -> TypeId {
        let next_id = TypeId(self.types.len() as u32);
        *self.intern_map.entry(ty).or_insert_with(|| {
            self.types.push(ty);
            next_id
        })
    }

    /// Canonical type for a class, with the given nullability.
    pub fn class_type(&mut self, class: ClassSymbol, nullable: bool) -> TypeId {
        self.intern(IrType {
            classifier: Classifier::Class(class),
            nullable,
        })
    }

    /// Canonical type for a type parameter, with the given nullability.
    /// Built from the parameter's own symbol; the translation service is
    /// never involved (type parameters do not exist in source).
    pub fn type_param_type(&mut self, param: TypeParamSymbol, nullable: bool) -> TypeId {
        self.intern(IrType {
            classifier: Classifier::TypeParam(param),
            nullable,
        })
    }

    pub fn get(&self, id: TypeId) -> IrType {
        self.types[id.0 as usize]
    }

    pub fn classifier(&self, id: TypeId) -> Classifier {
        self.get(id).classifier
    }

    pub fn is_nullable(&self, id: TypeId) -> bool {
        self.get(id).nullable
    }

    fn with_nullability(&mut self, id: TypeId, nullable: bool) -> TypeId {
        let ty = self.get(id);
        if ty.nullable == nullable {
            return id;
        }
        self.intern(IrType { nullable, ..ty })
    }

    /// The `T?` form of a type.
    pub fn make_nullable(&mut self, id: TypeId) -> TypeId {
        self.with_nullability(id, true)
    }

    /// The `T` (non-null) form of a type.
    pub fn make_non_null(&mut self, id: TypeId) -> TypeId {
        self.with_nullability(id, false)
    }

    /// User-facing rendering, used for operator mangles: the class name
    /// (`?`-suffixed when nullable), or the placeholder `T` when the type
    /// has no source-level name.
    pub fn render(&self, id: TypeId, symbols: &SymbolTable) -> String {
        let ty = self.get(id);
        match ty.classifier {
            Classifier::Class(class) => {
                let name = &symbols.class(class).name;
                if ty.nullable {
                    format!("{name}?")
                } else {
                    name.clone()
                }
            }
            Classifier::TypeParam(_) => "T".to_string(),
        }
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{ClassDecl, DeclOrigin};

    fn class(symbols: &mut SymbolTable, name: &str) -> ClassSymbol {
        let name = name.to_string();
        symbols.declare_class(|symbol| ClassDecl {
            symbol,
            name,
            origin: DeclOrigin::Source,
        })
    }

    #[test]
    fn interning_deduplicates() {
        let mut symbols = SymbolTable::new();
        let mut arena = TypeArena::new();
        let int = class(&mut symbols, "Int");

        let a = arena.class_type(int, false);
        let b = arena.class_type(int, false);
        assert_eq!(a, b);
    }

    #[test]
    fn nullability_is_part_of_identity() {
        let mut symbols = SymbolTable::new();
        let mut arena = TypeArena::new();
        let int = class(&mut symbols, "Int");

        let plain = arena.class_type(int, false);
        let nullable = arena.class_type(int, true);
        assert_ne!(plain, nullable);
        assert_eq!(arena.classifier(plain), arena.classifier(nullable));
    }

    #[test]
    fn nullability_flips_are_canonical() {
        let mut symbols = SymbolTable::new();
        let mut arena = TypeArena::new();
        let int = class(&mut symbols, "Int");

        let plain = arena.class_type(int, false);
        let nullable = arena.make_nullable(plain);
        assert!(arena.is_nullable(nullable));
        assert_eq!(arena.make_non_null(nullable), plain);
        assert_eq!(arena.make_nullable(nullable), nullable);
    }

    #[test]
    fn render_uses_class_name_and_question_mark() {
        let mut symbols = SymbolTable::new();
        let mut arena = TypeArena::new();
        let double = class(&mut symbols, "Double");

        let plain = arena.class_type(double, false);
        let nullable = arena.class_type(double, true);
        assert_eq!(arena.render(plain, &symbols), "Double");
        assert_eq!(arena.render(nullable, &symbols), "Double?");
    }

    #[test]
    fn render_falls_back_to_placeholder_for_type_params() {
        let mut symbols = SymbolTable::new();
        let mut arena = TypeArena::new();

        let param = symbols.alloc_type_param();
        let ty = arena.type_param_type(param, false);
        assert_eq!(arena.render(ty, &symbols), "T");
    }
}
