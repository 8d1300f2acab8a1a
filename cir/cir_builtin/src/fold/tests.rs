use cir::{
    Builtin, BuiltinRef, CirValue, FoldVariant, FoldingError, Kind, ObjectGraph, ObjectRef,
    Value, Variables,
};
use expect_test::{expect, Expect};

use crate::{builtin_table, evaluate, CirOptimizer, Opts};

/// Parameters followed by `k = v0` and `e = v1`.
fn args(params: &[CirValue]) -> Vec<CirValue> {
    let mut vars = Variables::new();
    let (k, e) = vars.new_continuations();
    let mut args = params.to_vec();
    args.push(k.into());
    args.push(e.into());
    args
}

fn fold_with(ctx: &CirOptimizer, callee: BuiltinRef, params: &[CirValue]) -> String {
    let rule = builtin_table().rule(callee);
    let args = args(params);
    if !rule.is_foldable(ctx, &args) {
        return "not foldable".to_owned();
    }
    match rule.fold(ctx, &args) {
        Ok(call) => call.to_string(),
        Err(err) => format!("error: {err}"),
    }
}

fn check(builtin: Builtin, params: &[CirValue], expect: Expect) {
    let opts = Opts::default();
    let mut vars = Variables::new();
    let ctx = CirOptimizer::new(&opts, &mut vars);
    expect.assert_eq(&fold_with(&ctx, builtin.into(), params));
}

#[test]
fn constants() {
    check(Builtin::IntPlus, &[CirValue::int(3), CirValue::int(4)], expect![[r#"v0(7)"#]]);
    check(
        Builtin::LongShiftedLeft,
        &[CirValue::long(1), CirValue::int(65)],
        expect![[r#"v0(2L)"#]],
    );
    check(
        Builtin::DoubleDivided,
        &[Value::double(1.0).into(), Value::double(0.0).into()],
        expect![[r#"v0(+InfD)"#]],
    );
    check(
        Builtin::FloatCompareG,
        &[Value::float(f32::NAN).into(), Value::float(1.0).into()],
        expect![[r#"v0(1)"#]],
    );
    check(
        Builtin::AddressRemainderByInt,
        &[CirValue::word(0x1_0000_0007), CirValue::int(-1)],
        expect![[r#"v0(8)"#]],
    );
}

#[test]
fn non_constants() {
    let mut vars = Variables::new();
    let x = vars.new_variable(Kind::Int);
    check(Builtin::IntPlus, &[x.into(), CirValue::int(4)], expect![[r#"not foldable"#]]);
    check(
        Builtin::ReferenceEquals,
        &[Value::NULL.into(), Value::NULL.into()],
        expect![[r#"not foldable"#]],
    );
    check(Builtin::SoftSafepoint, &[], expect![[r#"not foldable"#]]);
    check(Builtin::GetInstructionPointer, &[], expect![[r#"not foldable"#]]);
    check(
        Builtin::ReadIntAtIntOffset,
        &[CirValue::word(0x1000), CirValue::int(8)],
        expect![[r#"not foldable"#]],
    );
}

#[test]
fn division_by_zero_is_reported() {
    check(
        Builtin::IntDivided,
        &[CirValue::int(1), CirValue::int(0)],
        expect![[r#"error: division by zero"#]],
    );
    check(
        Builtin::AddressDividedByInt,
        &[CirValue::word(1), CirValue::int(0)],
        expect![[r#"error: division by zero"#]],
    );
}

#[test]
fn wrong_arity() {
    let opts = Opts::default();
    let mut vars = Variables::new();
    let ctx = CirOptimizer::new(&opts, &mut vars);
    let rule = builtin_table().get(Builtin::IntPlus);
    let args = args(&[CirValue::int(1)]);
    assert!(!rule.is_foldable(&ctx, &args));
    assert_eq!(
        rule.fold(&ctx, &args),
        Err(FoldingError::Arity { builtin: Builtin::IntPlus, expected: 4, found: 3 })
    );
}

struct Host {
    graph: ObjectGraph,
    obj: ObjectRef,
}

/// An object with an immutable int `5` at 8, a mutable int `7` at 12 and a mutable int `0` at 16.
fn host() -> Host {
    let mut graph = ObjectGraph::new();
    let obj = graph.alloc();
    graph.store(obj, 8, Value::Int(5), true);
    graph.store(obj, 12, Value::Int(7), false);
    graph.store(obj, 16, Value::Int(0), false);
    Host { graph, obj }
}

fn check_hosted(host: &Host, variant: FoldVariant, offset: i32, expect: Expect) {
    let opts = Opts::hosted();
    let mut vars = Variables::new();
    let ctx = CirOptimizer::new(&opts, &mut vars).with_heap(&host.graph);
    let callee = BuiltinRef::new(Builtin::ReadIntAtIntOffset, variant);
    let params = [Value::object(host.obj).into(), CirValue::int(offset)];
    expect.assert_eq(&fold_with(&ctx, callee, &params));
}

#[test]
fn hosted_loads() {
    let host = host();
    check_hosted(&host, FoldVariant::Plain, 8, expect![[r#"v0(5)"#]]);
    check_hosted(&host, FoldVariant::Plain, 12, expect![[r#"not foldable"#]]);
    check_hosted(&host, FoldVariant::Foldable, 12, expect![[r#"v0(7)"#]]);
    check_hosted(&host, FoldVariant::Foldable, 16, expect![[r#"v0(0)"#]]);
    check_hosted(&host, FoldVariant::FoldableWhenNotZero, 12, expect![[r#"v0(7)"#]]);
    check_hosted(&host, FoldVariant::FoldableWhenNotZero, 16, expect![[r#"not foldable"#]]);
    check_hosted(&host, FoldVariant::FoldableWhenNotZero, 20, expect![[r#"not foldable"#]]);
    check_hosted(
        &host,
        FoldVariant::Foldable,
        20,
        expect![[r#"error: failed to read a int at offset 20 of @obj0"#]],
    );
}

#[test]
fn target_mode_ignores_the_host() {
    let host = host();
    let opts = Opts::default();
    let mut vars = Variables::new();
    let ctx = CirOptimizer::new(&opts, &mut vars).with_heap(&host.graph);
    let params = [Value::object(host.obj).into(), CirValue::int(8)];
    for variant in [FoldVariant::Plain, FoldVariant::Foldable, FoldVariant::FoldableWhenNotZero] {
        let callee = BuiltinRef::new(Builtin::ReadIntAtIntOffset, variant);
        assert_eq!(fold_with(&ctx, callee, &params), "not foldable");
    }
    assert_eq!(
        evaluate(&ctx, Builtin::ReadIntAtIntOffset, &params),
        Err(FoldingError::NoHostHeap)
    );
}

#[test]
fn narrowing_loads() {
    let mut graph = ObjectGraph::new();
    let obj = graph.alloc();
    graph.store(obj, 24, Value::Int(0x1_80ff), true);
    let opts = Opts::hosted();
    let mut vars = Variables::new();
    let ctx = CirOptimizer::new(&opts, &mut vars).with_heap(&graph);

    let read = |builtin: Builtin, params: &[CirValue]| evaluate(&ctx, builtin, params);
    let ptr: CirValue = Value::object(obj).into();
    assert_eq!(
        read(Builtin::ReadByteAtIntOffset, &[ptr.clone(), CirValue::int(24)]),
        Ok(Value::Int(-1)),
    );
    assert_eq!(
        read(Builtin::ReadCharAtLongOffset, &[ptr.clone(), CirValue::long(24)]),
        Ok(Value::Int(0x80ff)),
    );
    assert_eq!(
        read(Builtin::GetShort, &[ptr, CirValue::int(20), CirValue::int(2)]),
        Ok(Value::Int(-0x7f01))
    );
}

#[test]
fn folding_is_repeatable() {
    let host = host();
    let opts = Opts::hosted();
    let mut vars = Variables::new();
    let ctx = CirOptimizer::new(&opts, &mut vars).with_heap(&host.graph);
    let callee = BuiltinRef::new(Builtin::ReadIntAtIntOffset, FoldVariant::Foldable);
    let params = [Value::object(host.obj).into(), CirValue::int(12)];
    let first = fold_with(&ctx, callee, &params);
    assert_eq!(fold_with(&ctx, callee, &params), first);
}
