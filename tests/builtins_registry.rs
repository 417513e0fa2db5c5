// tests/builtins_registry.rs
//! End-to-end checks of the built-in registry as later phases consume it.

use smallvec::SmallVec;

use rill_ir::builtins::op;
use rill_ir::decl::{DeclOrigin, FunctionDecl, Modality, ParentRef, Visibility};
use rill_ir::stdlib::StdlibScope;
use rill_ir::types::Classifier;
use rill_ir::{IrBuiltins, PrimitiveKind, RelationKind};

fn registry() -> IrBuiltins {
    IrBuiltins::new(&StdlibScope::core()).expect("core stdlib must bring up")
}

#[test]
fn lowering_can_type_an_int_comparison() {
    let builtins = registry();

    // `a < b` over two ints lowers to a call of the `less` operator for
    // the int kind.
    let less = builtins
        .relational(RelationKind::Less, PrimitiveKind::Int)
        .expect("int is ordered");
    let decl = builtins.symbols.function(less);

    let int = builtins.primitive_type(PrimitiveKind::Int);
    let operand_types: Vec<_> = decl
        .value_params
        .iter()
        .map(|&param| builtins.symbols.value_param(param).ty)
        .collect();
    assert_eq!(operand_types, vec![int, int]);
    assert_eq!(decl.return_type, builtins.boolean_type());
    assert_eq!(decl.name, op::LESS);
}

#[test]
fn ieee754_double_equality_is_nullable_aware() {
    let builtins = registry();

    let equals = builtins
        .ieee754_equals(PrimitiveKind::Double)
        .expect("double is floating point");
    let decl = builtins.symbols.function(equals);

    let nullable_double = builtins.primitive_nullable_type(PrimitiveKind::Double);
    assert_ne!(nullable_double, builtins.primitive_type(PrimitiveKind::Double));
    for &param in &decl.value_params {
        assert_eq!(builtins.symbols.value_param(param).ty, nullable_double);
    }
}

#[test]
fn enum_value_lookup_returns_its_own_type_parameter() {
    let builtins = registry();

    let decl = builtins.symbols.function(builtins.enum_value_of);
    assert_eq!(decl.value_params.len(), 1);
    assert_eq!(
        builtins.symbols.value_param(decl.value_params[0]).ty,
        builtins.string_type
    );

    let type_param = decl.type_params[0];
    assert_eq!(
        builtins.types.classifier(decl.return_type),
        Classifier::TypeParam(type_param)
    );
    assert!(!builtins.types.is_nullable(decl.return_type));
}

#[test]
fn primitive_array_bijection_round_trips() {
    let builtins = registry();

    for kind in PrimitiveKind::ALL {
        let array_class = builtins.primitive_array_class(kind);
        assert_eq!(
            builtins.primitive_kind_for_array_class(array_class),
            Some(kind)
        );
        let name = &builtins.symbols.class(array_class).name;
        assert_eq!(name, kind.array_class_name());
    }
}

#[test]
fn every_operator_lives_in_the_hidden_package() {
    let builtins = registry();

    assert!(!builtins.operators().is_empty());
    for &symbol in builtins.operators() {
        let decl = builtins.symbols.function(symbol);
        assert_eq!(decl.parent, ParentRef::BuiltinsPackage);
        assert_eq!(decl.origin, DeclOrigin::BuiltinOperator);
    }
}

#[test]
fn unused_array_member_helper_still_has_its_shape() {
    let builtins = registry();

    let decl = builtins
        .symbols
        .function(builtins.data_class_array_member_to_string);
    assert_eq!(decl.return_type, builtins.string_type);
    assert_eq!(decl.value_params.len(), 1);
    assert_eq!(
        builtins.symbols.value_param(decl.value_params[0]).ty,
        builtins.any_n_type
    );
}

#[test]
fn pending_boolean_not_binds_when_stdlib_ir_materializes() {
    let mut builtins = registry();

    let not = builtins.boolean_not;
    assert!(!builtins.symbols.is_bound_function(not));

    // Stdlib IR generation later materializes the member declaration
    // through the same pending symbol.
    let boolean_class = builtins.primitive_class(PrimitiveKind::Boolean);
    let boolean_type = builtins.boolean_type();
    let decl = builtins.symbols.bind_function(not, |symbol| FunctionDecl {
        symbol,
        name: "not".to_string(),
        mangle: "not#[]".to_string(),
        return_type: boolean_type,
        visibility: Visibility::Public,
        modality: Modality::Final,
        origin: DeclOrigin::Source,
        parent: ParentRef::Class(boolean_class),
        value_params: SmallVec::new(),
        type_params: SmallVec::new(),
        is_suspend: false,
        is_inline: false,
        is_tailrec: false,
        is_override: false,
    });
    assert_eq!(decl.symbol, not);
    assert!(builtins.symbols.is_bound_function(not));
    assert_eq!(builtins.symbols.function(not).parent, ParentRef::Class(boolean_class));
}

#[test]
fn independent_sessions_do_not_share_identity() {
    let a = registry();
    let b = registry();

    // Symbols are identity within one session; two sessions each get a
    // full, disjoint universe.
    assert_eq!(a.operators().len(), b.operators().len());
    assert_eq!(
        a.symbols.function_count(),
        b.symbols.function_count()
    );
}
