// src/stdlib.rs
//
// Source-side view of the standard library, as loaded by the frontend.
//
// The builtins registry never walks source declarations; it resolves
// classes here by name and hands them to the translator. The scope is a
// plain name table: class names, plus the member functions the registry
// is allowed to reference (e.g. `Boolean.not`).

use rustc_hash::FxHashMap;

use crate::primitive::PrimitiveKind;

/// Identity of a class on the source side of the translation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceClassId(u32);

impl SourceClassId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A source-level type: a class reference plus nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceType {
    pub class: SourceClassId,
    pub nullable: bool,
}

#[derive(Debug, Clone)]
struct SourceClass {
    name: String,
    members: Vec<String>,
}

/// The frontend's registry of core-library classes.
#[derive(Debug, Clone)]
pub struct StdlibScope {
    classes: Vec<SourceClass>,
    by_name: FxHashMap<String, SourceClassId>,
}

impl StdlibScope {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// The full built-in universe the registry requires.
    pub fn core() -> Self {
        let mut scope = Self::new();
        for name in [
            "Any",
            "Nothing",
            "Unit",
            "String",
            "Number",
            "Collection",
            "Array",
            "Throwable",
            "Callable",
            "Property",
            "DeclarationContainer",
            "ClassRef",
            "Property0",
            "Property1",
            "Property2",
            "MutableProperty0",
            "MutableProperty1",
            "MutableProperty2",
        ] {
            scope.declare_class(name);
        }
        for kind in PrimitiveKind::ALL {
            let class = scope.declare_class(kind.class_name());
            scope.declare_class(kind.array_class_name());
            if kind == PrimitiveKind::Boolean {
                scope.declare_member(class, "not");
            }
        }
        scope
    }

    pub fn declare_class(&mut self, name: &str) -> SourceClassId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = SourceClassId(self.classes.len() as u32);
        self.classes.push(SourceClass {
            name: name.to_string(),
            members: Vec::new(),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn declare_member(&mut self, class: SourceClassId, name: &str) {
        self.classes[class.0 as usize].members.push(name.to_string());
    }

    pub fn find_class(&self, name: &str) -> Option<SourceClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class_name(&self, id: SourceClassId) -> &str {
        &self.classes[id.0 as usize].name
    }

    pub fn has_member(&self, class: SourceClassId, name: &str) -> bool {
        self.classes[class.0 as usize]
            .members
            .iter()
            .any(|member| member == name)
    }

    /// The class's default (non-null) type.
    pub fn default_type(&self, class: SourceClassId) -> SourceType {
        SourceType {
            class,
            nullable: false,
        }
    }
}

impl Default for StdlibScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveKind;

    #[test]
    fn core_scope_has_every_required_class() {
        let scope = StdlibScope::core();
        for name in ["Any", "Nothing", "Unit", "String", "Number", "Throwable"] {
            assert!(scope.find_class(name).is_some(), "missing {name}");
        }
        for kind in PrimitiveKind::ALL {
            assert!(scope.find_class(kind.class_name()).is_some());
            assert!(scope.find_class(kind.array_class_name()).is_some());
        }
    }

    #[test]
    fn declare_class_is_idempotent() {
        let mut scope = StdlibScope::new();
        let a = scope.declare_class("Int");
        let b = scope.declare_class("Int");
        assert_eq!(a, b);
    }

    #[test]
    fn boolean_has_not_member() {
        let scope = StdlibScope::core();
        let boolean = scope.find_class("Boolean").unwrap();
        assert!(scope.has_member(boolean, "not"));
        assert!(!scope.has_member(boolean, "and"));
    }

    #[test]
    fn unknown_class_is_absent() {
        let scope = StdlibScope::core();
        assert!(scope.find_class("Regex").is_none());
    }
}
