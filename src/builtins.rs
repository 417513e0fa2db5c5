// src/builtins.rs
//
// The built-in symbol registry: canonical types, classes, and synthesized
// operators shared by every later compiler phase.
//
// Bring-up runs once per compilation session, eagerly and in dependency
// order: the type/class catalog first (operator signatures draw their
// types from it), then the operator families. After `new` returns the
// registry is read-only; the operator list cannot grow because the
// factory that appends to it only exists during construction.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{smallvec, SmallVec};

use crate::decl::{
    DeclOrigin, FunctionDecl, Modality, ParentRef, TypeParamDecl, ValueParamDecl, Variance,
    Visibility,
};
use crate::errors::BuiltinsError;
use crate::primitive::{PrimitiveKind, RelationKind};
use crate::stdlib::StdlibScope;
use crate::symbols::{ClassSymbol, FunctionSymbol, SymbolTable, ValueParamSymbol};
use crate::translate::Translator;
use crate::types::{TypeArena, TypeId};

/// Fully-qualified name of the hidden package that owns every synthesized
/// operator.
pub const BUILTINS_PACKAGE_FQN: &str = "rill.internal.ir";

/// Display names of the synthesized operators.
pub mod op {
    pub const LESS: &str = "less";
    pub const LESS_OR_EQUAL: &str = "lessOrEqual";
    pub const GREATER: &str = "greater";
    pub const GREATER_OR_EQUAL: &str = "greaterOrEqual";
    pub const EQEQ: &str = "EQEQ";
    pub const EQEQEQ: &str = "EQEQEQ";
    pub const IEEE754_EQUALS: &str = "ieee754equals";
    pub const THROW_CCE: &str = "THROW_CCE";
    pub const THROW_ISE: &str = "THROW_ISE";
    pub const NO_BRANCH_MATCHED: &str = "noBranchMatchedException";
    pub const ILLEGAL_ARGUMENT: &str = "illegalArgumentException";
    pub const ANDAND: &str = "ANDAND";
    pub const OROR: &str = "OROR";
    pub const ENUM_VALUE_OF: &str = "enumValueOf";
    pub const CHECK_NOT_NULL: &str = "CHECK_NOT_NULL";
    pub const DATA_CLASS_ARRAY_MEMBER_HASH_CODE: &str = "dataClassArrayMemberHashCode";
    pub const DATA_CLASS_ARRAY_MEMBER_TO_STRING: &str = "dataClassArrayMemberToString";
}

/// Canonical entries for one primitive kind.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveEntry {
    pub ty: TypeId,
    pub nullable_ty: TypeId,
    pub class: ClassSymbol,
    pub array_class: ClassSymbol,
}

/// Pre-resolved entries for all eight primitive kinds.
#[derive(Debug, Clone, Copy)]
struct PrimitiveTable {
    boolean: PrimitiveEntry,
    char: PrimitiveEntry,
    byte: PrimitiveEntry,
    short: PrimitiveEntry,
    int: PrimitiveEntry,
    float: PrimitiveEntry,
    long: PrimitiveEntry,
    double: PrimitiveEntry,
}

impl PrimitiveTable {
    fn entry(&self, kind: PrimitiveKind) -> PrimitiveEntry {
        match kind {
            PrimitiveKind::Boolean => self.boolean,
            PrimitiveKind::Char => self.char,
            PrimitiveKind::Byte => self.byte,
            PrimitiveKind::Short => self.short,
            PrimitiveKind::Int => self.int,
            PrimitiveKind::Float => self.float,
            PrimitiveKind::Long => self.long,
            PrimitiveKind::Double => self.double,
        }
    }
}

fn resolve_primitive(
    tr: &mut Translator<'_>,
    kind: PrimitiveKind,
) -> Result<PrimitiveEntry, BuiltinsError> {
    let class = tr.resolve_class(kind.class_name())?;
    let ty = tr.resolve_type(kind.class_name(), false)?;
    let nullable_ty = tr.resolve_type(kind.class_name(), true)?;
    let array_class = tr.resolve_class(kind.array_class_name())?;
    Ok(PrimitiveEntry {
        ty,
        nullable_ty,
        class,
        array_class,
    })
}

/// Mints built-in operator declarations during bring-up. Owns the running
/// bookkeeping lists; consumed when construction finishes, which freezes
/// them.
struct OperatorFactory<'a> {
    symbols: &'a mut SymbolTable,
    types: &'a mut TypeArena,
    mangles: FxHashSet<String>,
    operators: Vec<FunctionSymbol>,
    package_decls: Vec<FunctionSymbol>,
}

impl OperatorFactory<'_> {
    fn mangle_of(&self, name: &str, param_types: &[TypeId]) -> String {
        let rendered: Vec<String> = param_types
            .iter()
            .map(|&ty| self.types.render(ty, self.symbols))
            .collect();
        format!("{name}#[{}]", rendered.join(":"))
    }

    #[track_caller]
    fn claim_mangle(&mut self, mangle: &str) {
        if !self.mangles.insert(mangle.to_string()) {
            panic!("INTERNAL ERROR: built-in operator '{mangle}' registered twice");
        }
    }

    fn value_params_for(
        &mut self,
        owner: FunctionSymbol,
        param_types: &[TypeId],
    ) -> SmallVec<[ValueParamSymbol; 2]> {
        param_types
            .iter()
            .enumerate()
            .map(|(index, &ty)| {
                self.symbols.declare_value_param(|symbol| ValueParamDecl {
                    symbol,
                    owner,
                    index: index as u32,
                    name: format!("arg{index}"),
                    ty,
                    origin: DeclOrigin::BuiltinOperator,
                    vararg_element: None,
                    is_crossinline: false,
                    is_noinline: false,
                })
            })
            .collect()
    }

    /// Synthesize one operator: compute its mangle, mint positional value
    /// parameters, bind the declaration, and register it with the hidden
    /// package and the enumeration list.
    #[track_caller]
    fn define(&mut self, name: &str, return_type: TypeId, param_types: &[TypeId]) -> FunctionSymbol {
        let mangle = self.mangle_of(name, param_types);
        self.claim_mangle(&mangle);
        tracing::trace!(%mangle, "synthesized built-in operator");

        let symbol = self.symbols.alloc_function();
        let value_params = self.value_params_for(symbol, param_types);
        self.symbols.bind_function(symbol, |symbol| FunctionDecl {
            symbol,
            name: name.to_string(),
            mangle,
            return_type,
            visibility: Visibility::Public,
            modality: Modality::Final,
            origin: DeclOrigin::BuiltinOperator,
            parent: ParentRef::BuiltinsPackage,
            value_params,
            type_params: SmallVec::new(),
            is_suspend: false,
            is_inline: false,
            is_tailrec: false,
            is_override: false,
        });
        self.package_decls.push(symbol);
        self.operators.push(symbol);
        symbol
    }

    fn define_relational_family(
        &mut self,
        rel: RelationKind,
        primitives: &PrimitiveTable,
        boolean_type: TypeId,
    ) -> FxHashMap<PrimitiveKind, FunctionSymbol> {
        PrimitiveKind::ORDERED
            .iter()
            .map(|&kind| {
                let operand = primitives.entry(kind).ty;
                (kind, self.define(rel.op_name(), boolean_type, &[operand, operand]))
            })
            .collect()
    }

    /// `enumValueOf`: reified `T0` bounded by the nullable top type, one
    /// string parameter, returning non-null `T0`.
    fn define_enum_value_of(&mut self, string_type: TypeId, any_n_type: TypeId) -> FunctionSymbol {
        let mangle = format!("{}#:enum", op::ENUM_VALUE_OF);
        self.claim_mangle(&mangle);

        let symbol = self.symbols.alloc_function();
        let type_param = self.symbols.declare_type_param(|tp_symbol| TypeParamDecl {
            symbol: tp_symbol,
            owner: symbol,
            index: 0,
            name: "T0".to_string(),
            variance: Variance::Invariant,
            is_reified: true,
            upper_bounds: smallvec![any_n_type],
            origin: DeclOrigin::BuiltinOperator,
        });
        // The return type comes from the operator's own type parameter,
        // never from the translation service.
        let return_type = self.types.type_param_type(type_param, false);
        let value_params = self.value_params_for(symbol, &[string_type]);

        self.symbols.bind_function(symbol, |symbol| FunctionDecl {
            symbol,
            name: op::ENUM_VALUE_OF.to_string(),
            mangle,
            return_type,
            visibility: Visibility::Public,
            modality: Modality::Final,
            origin: DeclOrigin::BuiltinOperator,
            parent: ParentRef::BuiltinsPackage,
            value_params,
            type_params: smallvec![type_param],
            is_suspend: false,
            is_inline: false,
            is_tailrec: false,
            is_override: false,
        });
        self.package_decls.push(symbol);
        self.operators.push(symbol);
        symbol
    }

    /// `CHECK_NOT_NULL`: non-reified `T0` bounded by the non-null top
    /// type; the parameter is `T0?` and the return is `T0`. Stripping
    /// nullability is the operator's entire meaning, so both types share
    /// one classifier and differ only in the marker.
    fn define_check_not_null(&mut self, any_type: TypeId) -> FunctionSymbol {
        let mangle = format!("{}#:!!", op::CHECK_NOT_NULL);
        self.claim_mangle(&mangle);

        let symbol = self.symbols.alloc_function();
        let type_param = self.symbols.declare_type_param(|tp_symbol| TypeParamDecl {
            symbol: tp_symbol,
            owner: symbol,
            index: 0,
            name: "T0".to_string(),
            variance: Variance::Invariant,
            is_reified: false,
            upper_bounds: smallvec![any_type],
            origin: DeclOrigin::BuiltinOperator,
        });
        let value_type = self.types.type_param_type(type_param, true);
        let return_type = self.types.type_param_type(type_param, false);
        let value_params = self.value_params_for(symbol, &[value_type]);

        self.symbols.bind_function(symbol, |symbol| FunctionDecl {
            symbol,
            name: op::CHECK_NOT_NULL.to_string(),
            mangle,
            return_type,
            visibility: Visibility::Public,
            modality: Modality::Final,
            origin: DeclOrigin::BuiltinOperator,
            parent: ParentRef::BuiltinsPackage,
            value_params,
            type_params: smallvec![type_param],
            is_suspend: false,
            is_inline: false,
            is_tailrec: false,
            is_override: false,
        });
        self.package_decls.push(symbol);
        self.operators.push(symbol);
        symbol
    }
}

/// The per-session built-in registry. Constructed once during bring-up,
/// then shared read-only; pass `&IrBuiltins` to consumers rather than
/// holding a process-wide singleton.
#[derive(Debug)]
pub struct IrBuiltins {
    pub symbols: SymbolTable,
    pub types: TypeArena,

    // Catalog: top/bottom/unit/string/number.
    pub any_type: TypeId,
    pub any_n_type: TypeId,
    pub any_class: ClassSymbol,
    pub nothing_type: TypeId,
    pub nothing_n_type: TypeId,
    pub nothing_class: ClassSymbol,
    pub unit_type: TypeId,
    pub unit_class: ClassSymbol,
    pub string_type: TypeId,
    pub string_class: ClassSymbol,
    pub number_type: TypeId,
    pub number_class: ClassSymbol,

    // Catalog: untyped collection/array supertypes and throwable.
    pub collection_class: ClassSymbol,
    pub array_class: ClassSymbol,
    pub throwable_type: TypeId,
    pub throwable_class: ClassSymbol,

    // Catalog: reflection supertypes.
    pub callable_class: ClassSymbol,
    pub property_class: ClassSymbol,
    pub declaration_container_class: ClassSymbol,
    pub class_ref_class: ClassSymbol,
    property_refs: [ClassSymbol; 3],
    mutable_property_refs: [ClassSymbol; 3],

    primitives: PrimitiveTable,
    array_class_to_kind: FxHashMap<ClassSymbol, PrimitiveKind>,

    // Relational operator tables, one map per kind; boolean never appears.
    less_by_operand: FxHashMap<PrimitiveKind, FunctionSymbol>,
    less_or_equal_by_operand: FxHashMap<PrimitiveKind, FunctionSymbol>,
    greater_by_operand: FxHashMap<PrimitiveKind, FunctionSymbol>,
    greater_or_equal_by_operand: FxHashMap<PrimitiveKind, FunctionSymbol>,
    ieee754_equals_by_operand: FxHashMap<PrimitiveKind, FunctionSymbol>,

    pub eqeqeq: FunctionSymbol,
    pub eqeq: FunctionSymbol,
    pub andand: FunctionSymbol,
    pub oror: FunctionSymbol,
    pub throw_cce: FunctionSymbol,
    pub throw_ise: FunctionSymbol,
    pub no_branch_matched: FunctionSymbol,
    pub illegal_argument: FunctionSymbol,
    pub enum_value_of: FunctionSymbol,
    pub check_not_null: FunctionSymbol,
    pub data_class_array_member_hash_code: FunctionSymbol,
    /// Exists for lowering of data-class members; currently has no
    /// consumer in this layer.
    pub data_class_array_member_to_string: FunctionSymbol,

    /// Pending reference to the stdlib `Boolean.not` member; bound when
    /// stdlib IR is materialized.
    pub boolean_not: FunctionSymbol,

    /// Declarations owned by the hidden built-ins package.
    package_decls: Vec<FunctionSymbol>,
    /// Every synthesized operator, in creation order.
    operators: Vec<FunctionSymbol>,
}

impl IrBuiltins {
    pub fn new(stdlib: &StdlibScope) -> Result<Self, BuiltinsError> {
        let mut symbols = SymbolTable::new();
        let mut types = TypeArena::new();

        let mut tr = Translator::new(stdlib, &mut symbols, &mut types);

        let any_class = tr.resolve_class("Any")?;
        let any_type = tr.resolve_type("Any", false)?;
        let any_n_type = tr.resolve_type("Any", true)?;

        let nothing_class = tr.resolve_class("Nothing")?;
        let nothing_type = tr.resolve_type("Nothing", false)?;
        let nothing_n_type = tr.resolve_type("Nothing", true)?;

        let unit_class = tr.resolve_class("Unit")?;
        let unit_type = tr.resolve_type("Unit", false)?;

        let string_class = tr.resolve_class("String")?;
        let string_type = tr.resolve_type("String", false)?;

        let number_class = tr.resolve_class("Number")?;
        let number_type = tr.resolve_type("Number", false)?;

        let collection_class = tr.resolve_class("Collection")?;
        let array_class = tr.resolve_class("Array")?;
        let throwable_class = tr.resolve_class("Throwable")?;
        let throwable_type = tr.resolve_type("Throwable", false)?;

        let callable_class = tr.resolve_class("Callable")?;
        let property_class = tr.resolve_class("Property")?;
        let declaration_container_class = tr.resolve_class("DeclarationContainer")?;
        let class_ref_class = tr.resolve_class("ClassRef")?;
        let property_refs = [
            tr.resolve_class("Property0")?,
            tr.resolve_class("Property1")?,
            tr.resolve_class("Property2")?,
        ];
        let mutable_property_refs = [
            tr.resolve_class("MutableProperty0")?,
            tr.resolve_class("MutableProperty1")?,
            tr.resolve_class("MutableProperty2")?,
        ];

        let primitives = PrimitiveTable {
            boolean: resolve_primitive(&mut tr, PrimitiveKind::Boolean)?,
            char: resolve_primitive(&mut tr, PrimitiveKind::Char)?,
            byte: resolve_primitive(&mut tr, PrimitiveKind::Byte)?,
            short: resolve_primitive(&mut tr, PrimitiveKind::Short)?,
            int: resolve_primitive(&mut tr, PrimitiveKind::Int)?,
            float: resolve_primitive(&mut tr, PrimitiveKind::Float)?,
            long: resolve_primitive(&mut tr, PrimitiveKind::Long)?,
            double: resolve_primitive(&mut tr, PrimitiveKind::Double)?,
        };

        let boolean_not = tr.reference_member("Boolean", "not")?;
        drop(tr);

        // Both directions of the primitive-array bijection. Totality falls
        // out of iterating every kind; injectivity is checked as entries
        // land.
        let mut array_class_to_kind = FxHashMap::default();
        for kind in PrimitiveKind::ALL {
            let previous = array_class_to_kind.insert(primitives.entry(kind).array_class, kind);
            assert!(
                previous.is_none(),
                "INTERNAL ERROR: primitive array class shared by {previous:?} and {kind:?}"
            );
        }

        let boolean_type = primitives.boolean.ty;
        let int_type = primitives.int.ty;

        let mut factory = OperatorFactory {
            symbols: &mut symbols,
            types: &mut types,
            mangles: FxHashSet::default(),
            operators: Vec::new(),
            package_decls: Vec::new(),
        };

        let less_by_operand =
            factory.define_relational_family(RelationKind::Less, &primitives, boolean_type);
        let less_or_equal_by_operand =
            factory.define_relational_family(RelationKind::LessOrEqual, &primitives, boolean_type);
        let greater_or_equal_by_operand = factory.define_relational_family(
            RelationKind::GreaterOrEqual,
            &primitives,
            boolean_type,
        );
        let greater_by_operand =
            factory.define_relational_family(RelationKind::Greater, &primitives, boolean_type);

        // IEEE 754 equality is distinct from structural equality: NaN and
        // signed zero force dedicated per-width operators over nullable
        // operands.
        let mut ieee754_equals_by_operand = FxHashMap::default();
        for kind in PrimitiveKind::FLOATING {
            let nullable = primitives.entry(kind).nullable_ty;
            let symbol = factory.define(op::IEEE754_EQUALS, boolean_type, &[nullable, nullable]);
            ieee754_equals_by_operand.insert(kind, symbol);
        }

        let eqeqeq = factory.define(op::EQEQEQ, boolean_type, &[any_n_type, any_n_type]);
        let eqeq = factory.define(op::EQEQ, boolean_type, &[any_n_type, any_n_type]);
        // Throw helpers return the bottom type so lowering keeps a single
        // call-based representation for abrupt termination.
        let throw_cce = factory.define(op::THROW_CCE, nothing_type, &[]);
        let throw_ise = factory.define(op::THROW_ISE, nothing_type, &[]);
        let andand = factory.define(op::ANDAND, boolean_type, &[boolean_type, boolean_type]);
        let oror = factory.define(op::OROR, boolean_type, &[boolean_type, boolean_type]);
        let no_branch_matched = factory.define(op::NO_BRANCH_MATCHED, nothing_type, &[]);
        let illegal_argument = factory.define(op::ILLEGAL_ARGUMENT, nothing_type, &[string_type]);

        let enum_value_of = factory.define_enum_value_of(string_type, any_n_type);
        let check_not_null = factory.define_check_not_null(any_type);

        let data_class_array_member_hash_code = factory.define(
            op::DATA_CLASS_ARRAY_MEMBER_HASH_CODE,
            int_type,
            &[any_type],
        );
        let data_class_array_member_to_string = factory.define(
            op::DATA_CLASS_ARRAY_MEMBER_TO_STRING,
            string_type,
            &[any_n_type],
        );

        let OperatorFactory {
            operators,
            package_decls,
            ..
        } = factory;

        tracing::debug!(
            package = BUILTINS_PACKAGE_FQN,
            operators = operators.len(),
            functions = symbols.function_count(),
            "IR built-ins registry initialized"
        );

        Ok(Self {
            symbols,
            types,
            any_type,
            any_n_type,
            any_class,
            nothing_type,
            nothing_n_type,
            nothing_class,
            unit_type,
            unit_class,
            string_type,
            string_class,
            number_type,
            number_class,
            collection_class,
            array_class,
            throwable_type,
            throwable_class,
            callable_class,
            property_class,
            declaration_container_class,
            class_ref_class,
            property_refs,
            mutable_property_refs,
            primitives,
            array_class_to_kind,
            less_by_operand,
            less_or_equal_by_operand,
            greater_by_operand,
            greater_or_equal_by_operand,
            ieee754_equals_by_operand,
            eqeqeq,
            eqeq,
            andand,
            oror,
            throw_cce,
            throw_ise,
            no_branch_matched,
            illegal_argument,
            enum_value_of,
            check_not_null,
            data_class_array_member_hash_code,
            data_class_array_member_to_string,
            boolean_not,
            package_decls,
            operators,
        })
    }

    // ========================================================================
    // Primitive lookups - total over the fixed kind domain
    // ========================================================================

    pub fn primitive_type(&self, kind: PrimitiveKind) -> TypeId {
        self.primitives.entry(kind).ty
    }

    pub fn primitive_nullable_type(&self, kind: PrimitiveKind) -> TypeId {
        self.primitives.entry(kind).nullable_ty
    }

    pub fn primitive_class(&self, kind: PrimitiveKind) -> ClassSymbol {
        self.primitives.entry(kind).class
    }

    pub fn primitive_array_class(&self, kind: PrimitiveKind) -> ClassSymbol {
        self.primitives.entry(kind).array_class
    }

    /// Reverse direction of the primitive-array bijection.
    pub fn primitive_kind_for_array_class(&self, class: ClassSymbol) -> Option<PrimitiveKind> {
        self.array_class_to_kind.get(&class).copied()
    }

    pub fn boolean_type(&self) -> TypeId {
        self.primitives.boolean.ty
    }
    pub fn char_type(&self) -> TypeId {
        self.primitives.char.ty
    }
    pub fn byte_type(&self) -> TypeId {
        self.primitives.byte.ty
    }
    pub fn short_type(&self) -> TypeId {
        self.primitives.short.ty
    }
    pub fn int_type(&self) -> TypeId {
        self.primitives.int.ty
    }
    pub fn float_type(&self) -> TypeId {
        self.primitives.float.ty
    }
    pub fn long_type(&self) -> TypeId {
        self.primitives.long.ty
    }
    pub fn double_type(&self) -> TypeId {
        self.primitives.double.ty
    }

    // ========================================================================
    // Operator lookups
    // ========================================================================

    /// The relational operator table for one comparison kind.
    pub fn relational_table(
        &self,
        rel: RelationKind,
    ) -> &FxHashMap<PrimitiveKind, FunctionSymbol> {
        match rel {
            RelationKind::Less => &self.less_by_operand,
            RelationKind::LessOrEqual => &self.less_or_equal_by_operand,
            RelationKind::Greater => &self.greater_by_operand,
            RelationKind::GreaterOrEqual => &self.greater_or_equal_by_operand,
        }
    }

    /// The relational operator over two operands of `operand`, if the kind
    /// is ordered. Boolean has no relational operators.
    pub fn relational(&self, rel: RelationKind, operand: PrimitiveKind) -> Option<FunctionSymbol> {
        self.relational_table(rel).get(&operand).copied()
    }

    /// IEEE-754-aware equality over two nullable operands; floating-point
    /// kinds only.
    pub fn ieee754_equals(&self, operand: PrimitiveKind) -> Option<FunctionSymbol> {
        self.ieee754_equals_by_operand.get(&operand).copied()
    }

    /// The property-reference class for the given mutability and arity.
    /// Arity is a fixed domain; anything outside {0, 1, 2} is a compiler
    /// bug.
    #[track_caller]
    pub fn property_ref_class(&self, mutable: bool, arity: usize) -> ClassSymbol {
        let table = if mutable {
            &self.mutable_property_refs
        } else {
            &self.property_refs
        };
        match table.get(arity) {
            Some(&class) => class,
            None => panic!(
                "INTERNAL ERROR: no property reference class for arity {arity} (mutable={mutable})"
            ),
        }
    }

    /// Every synthesized operator, in creation order.
    pub fn operators(&self) -> &[FunctionSymbol] {
        &self.operators
    }

    /// Declarations owned by the hidden `rill.internal.ir` package.
    pub fn package_declarations(&self) -> &[FunctionSymbol] {
        &self.package_decls
    }
}
