use cir::{
    Builtin, Call, CirSwitch, CirValue, Closure, FrameDescriptor, Kind, SwitchKind, Value,
    ValueComparator, Variable, Variables, WordWidth,
};
use expect_test::{expect, Expect};

use crate::{builtin_table, CirOptimizer, Opts};


/// `x = v0`, `y = v1`, `k = v2`, `e = v3` and `p = v4` (a spare continuation parameter).
/// Temporaries created by a reduction start at `v5`.
struct Vars {
    x: CirValue,
    y: CirValue,
    k: CirValue,
    e: CirValue,
    p: Variable,
}

impl Vars {
    fn call(&self, params: Vec<CirValue>) -> Vec<CirValue> {
        let mut args = params;
        args.push(self.k.clone());
        args.push(self.e.clone());
        args
    }

    /// `cont[p] { Switch<int,comparator,1>(p, val, k, e) }`
    fn branch(&self, comparator: ValueComparator, val: i32) -> CirValue {
        let switch = CirSwitch::new(SwitchKind::Int, comparator, 1);
        let body = Call::new(
            switch,
            vec![self.p.into(), CirValue::int(val), self.k.clone(), self.e.clone()],
        );
        Closure::continuation(vec![self.p], body).into()
    }
}

fn reduce(opts: &Opts, builtin: Builtin, build: impl FnOnce(&Vars) -> Vec<CirValue>) -> String {
    let mut variables = Variables::new();
    let x = variables.new_variable(Kind::Int);
    let y = variables.new_variable(Kind::Int);
    let (k, e) = variables.new_continuations();
    let p = variables.new_variable(Kind::Int);
    let vars = Vars { x: x.into(), y: y.into(), k: k.into(), e: e.into(), p };
    let args = build(&vars);

    let mut ctx = CirOptimizer::new(opts, &mut variables);
    let rule = builtin_table().get(builtin);
    if rule.is_reducible(&ctx, &args) {
        rule.reduce(&mut ctx, &args).to_string()
    } else {
        "irreducible".to_owned()
    }
}

fn check(builtin: Builtin, build: impl FnOnce(&Vars) -> Vec<CirValue>, expect: Expect) {
    expect.assert_eq(&reduce(&Opts::default(), builtin, build));
}

#[test]
fn times() {
    check(
        Builtin::IntTimes,
        |v| v.call(vec![v.x.clone(), CirValue::int(8)]),
        expect![[r#"IntShiftedLeft(v0, 3, v2, v3)"#]],
    );
    check(
        Builtin::IntTimes,
        |v| v.call(vec![CirValue::int(8), v.x.clone()]),
        expect![[r#"IntShiftedLeft(v0, 3, v2, v3)"#]],
    );
    check(
        Builtin::IntTimes,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::IntTimes,
        |v| v.call(vec![v.x.clone(), CirValue::int(1)]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::IntTimes,
        |v| v.call(vec![v.x.clone(), CirValue::int(-1)]),
        expect![[r#"IntNegated(v0, v2, v3)"#]],
    );
    check(
        Builtin::IntTimes,
        |v| v.call(vec![v.x.clone(), CirValue::int(i32::MIN)]),
        expect![[r#"IntShiftedLeft(v0, 31, v2, v3)"#]],
    );
    check(
        Builtin::LongTimes,
        |v| v.call(vec![v.x.clone(), CirValue::long(16)]),
        expect![[r#"LongShiftedLeft(v0, 4, v2, v3)"#]],
    );
    check(
        Builtin::IntTimes,
        |v| v.call(vec![v.x.clone(), CirValue::int(6)]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::IntTimes,
        |v| v.call(vec![v.x.clone(), v.y.clone()]),
        expect![[r#"irreducible"#]],
    );
}

#[test]
fn plus_minus() {
    check(
        Builtin::IntMinus,
        |v| v.call(vec![CirValue::int(0), v.x.clone()]),
        expect![[r#"IntNegated(v0, v2, v3)"#]],
    );
    check(
        Builtin::IntMinus,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::LongMinus,
        |v| v.call(vec![v.x.clone(), CirValue::long(1)]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::LongPlus,
        |v| v.call(vec![CirValue::long(0), v.x.clone()]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::IntPlus,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"v2(v0)"#]],
    );
}

#[test]
fn division() {
    check(
        Builtin::IntDivided,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"CreateArithmeticException(v3, v3)"#]],
    );
    check(
        Builtin::IntDivided,
        |v| v.call(vec![v.x.clone(), CirValue::int(-1)]),
        expect![[r#"IntNegated(v0, v2, v3)"#]],
    );
    check(
        Builtin::IntDivided,
        |v| v.call(vec![v.x.clone(), CirValue::int(1)]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::IntDivided,
        |v| v.call(vec![CirValue::int(0), v.y.clone()]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::IntDivided,
        |v| v.call(vec![v.x.clone(), CirValue::int(8)]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::LongDivided,
        |v| v.call(vec![CirValue::long(0), CirValue::long(0)]),
        expect![[r#"CreateArithmeticException(v3, v3)"#]],
    );

    check(
        Builtin::LongRemainder,
        |v| v.call(vec![v.x.clone(), CirValue::long(-1)]),
        expect![[r#"v2(0L)"#]],
    );
    check(
        Builtin::LongRemainder,
        |v| v.call(vec![v.x.clone(), CirValue::long(0)]),
        expect![[r#"CreateArithmeticException(v3, v3)"#]],
    );
    check(
        Builtin::LongRemainder,
        |v| v.call(vec![v.x.clone(), CirValue::long(8)]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::IntRemainder,
        |v| v.call(vec![CirValue::int(0), v.y.clone()]),
        expect![[r#"v2(0)"#]],
    );
}

#[test]
fn address_division() {
    check(
        Builtin::AddressDividedByAddress,
        |v| v.call(vec![v.x.clone(), CirValue::word(16)]),
        expect![[r#"AddressUnsignedShiftedRight(v0, 4, v2, v3)"#]],
    );
    check(
        Builtin::AddressDividedByAddress,
        |v| v.call(vec![v.x.clone(), CirValue::word(0)]),
        expect![[r#"CreateArithmeticException(v3, v3)"#]],
    );
    check(
        Builtin::AddressDividedByAddress,
        |v| v.call(vec![v.x.clone(), CirValue::word(1)]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::AddressDividedByAddress,
        |v| v.call(vec![v.x.clone(), CirValue::word(6)]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::AddressDividedByAddress,
        |v| v.call(vec![CirValue::word(0), v.y.clone()]),
        expect![[r#"v2(#0x0)"#]],
    );
    check(
        Builtin::AddressDividedByInt,
        |v| v.call(vec![v.x.clone(), CirValue::int(8)]),
        expect![[r#"AddressUnsignedShiftedRight(v0, 3, v2, v3)"#]],
    );
    check(
        Builtin::AddressDividedByInt,
        |v| v.call(vec![v.x.clone(), CirValue::int(i32::MIN)]),
        expect![[r#"AddressUnsignedShiftedRight(v0, 31, v2, v3)"#]],
    );
}

#[test]
fn address_remainder() {
    check(
        Builtin::AddressRemainderByAddress,
        |v| v.call(vec![v.x.clone(), CirValue::word(8)]),
        expect![[r#"AddressAnd(v0, #0x7, v2, v3)"#]],
    );
    check(
        Builtin::AddressRemainderByAddress,
        |v| v.call(vec![v.x.clone(), CirValue::word(1)]),
        expect![[r#"v2(#0x0)"#]],
    );
    check(
        Builtin::AddressRemainderByAddress,
        |v| v.call(vec![CirValue::word(0), v.y.clone()]),
        expect![[r#"v2(#0x0)"#]],
    );
    check(
        Builtin::AddressRemainderByInt,
        |v| v.call(vec![v.x.clone(), CirValue::int(8)]),
        expect![[r#"WordToInt(v0, cont[v5] { IntAnd(v5, 7, v2, v3) }, v3)"#]],
    );
    check(
        Builtin::AddressRemainderByInt,
        |v| v.call(vec![v.x.clone(), CirValue::int(1)]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::AddressRemainderByInt,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"CreateArithmeticException(v3, v3)"#]],
    );
    check(
        Builtin::AddressRemainderByInt,
        |v| v.call(vec![CirValue::word(0), v.y.clone()]),
        expect![[r#"v2(0)"#]],
    );
}

#[test]
fn logic() {
    check(Builtin::IntAnd, |v| v.call(vec![v.x.clone(), v.x.clone()]), expect![[r#"v2(v0)"#]]);
    check(Builtin::LongOr, |v| v.call(vec![v.x.clone(), v.x.clone()]), expect![[r#"v2(v0)"#]]);
    check(Builtin::IntXor, |v| v.call(vec![v.x.clone(), v.x.clone()]), expect![[r#"v2(0)"#]]);
    check(Builtin::IntAnd, |v| v.call(vec![v.x.clone(), CirValue::int(0)]), expect![[r#"v2(0)"#]]);
    check(
        Builtin::IntAnd,
        |v| v.call(vec![CirValue::int(-1), v.x.clone()]),
        expect![[r#"v2(v0)"#]],
    );
    check(Builtin::IntOr, |v| v.call(vec![v.x.clone(), CirValue::int(0)]), expect![[r#"v2(v0)"#]]);
    check(Builtin::IntOr, |v| v.call(vec![v.x.clone(), CirValue::int(-1)]), expect![[r#"v2(-1)"#]]);
    check(Builtin::IntXor, |v| v.call(vec![CirValue::int(0), v.x.clone()]), expect![[r#"v2(v0)"#]]);
    check(
        Builtin::IntXor,
        |v| v.call(vec![v.x.clone(), CirValue::int(-1)]),
        expect![[r#"IntNot(v0, v2, v3)"#]],
    );
    check(
        Builtin::LongXor,
        |v| v.call(vec![CirValue::long(-1), v.x.clone()]),
        expect![[r#"LongNot(v0, v2, v3)"#]],
    );
    // the first operand decides
    check(
        Builtin::IntAnd,
        |v| v.call(vec![CirValue::int(0), CirValue::int(-1)]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::IntAnd,
        |v| v.call(vec![v.x.clone(), CirValue::int(0xff)]),
        expect![[r#"irreducible"#]],
    );
}

#[test]
fn shifts() {
    check(
        Builtin::IntShiftedLeft,
        |v| v.call(vec![v.x.clone(), CirValue::int(32)]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::IntShiftedLeft,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::LongShiftedLeft,
        |v| v.call(vec![v.x.clone(), CirValue::int(64)]),
        expect![[r#"v2(v0)"#]],
    );
    check(
        Builtin::LongShiftedLeft,
        |v| v.call(vec![v.x.clone(), CirValue::int(32)]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::IntShiftedLeft,
        |v| v.call(vec![CirValue::int(0), v.y.clone()]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::IntSignedShiftedRight,
        |v| v.call(vec![CirValue::int(-1), v.y.clone()]),
        expect![[r#"v2(-1)"#]],
    );
    check(
        Builtin::IntUnsignedShiftedRight,
        |v| v.call(vec![CirValue::int(-1), v.y.clone()]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::LongUnsignedShiftedRight,
        |v| v.call(vec![CirValue::long(0), v.y.clone()]),
        expect![[r#"v2(0L)"#]],
    );
}

#[test]
fn pathological_comparisons() {
    check(
        Builtin::UnsignedIntGreaterEqual,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"v2(1)"#]],
    );
    check(
        Builtin::UnsignedIntGreaterEqual,
        |v| v.call(vec![CirValue::int(-1), v.y.clone()]),
        expect![[r#"v2(1)"#]],
    );
    check(
        Builtin::UnsignedIntLessThan,
        |v| v.call(vec![v.x.clone(), CirValue::int(0)]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::UnsignedIntLessThan,
        |v| v.call(vec![v.x.clone(), CirValue::int(-1)]),
        expect![[r#"irreducible"#]],
    );
    check(
        Builtin::AddressGreaterThan,
        |v| v.call(vec![v.x.clone(), CirValue::word(u64::MAX)]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::AddressGreaterThan,
        |v| v.call(vec![CirValue::word(0), v.y.clone()]),
        expect![[r#"v2(0)"#]],
    );
    check(
        Builtin::AddressLessEqual,
        |v| v.call(vec![CirValue::word(0), v.y.clone()]),
        expect![[r#"v2(1)"#]],
    );
    check(
        Builtin::AddressLessThan,
        |v| v.call(vec![CirValue::word(u64::MAX), v.y.clone()]),
        expect![[r#"v2(0)"#]],
    );

    // the largest address depends on the word width
    let build = |v: &Vars| v.call(vec![v.x.clone(), CirValue::word(0xffff_ffff)]);
    let opts = Opts { word_width: WordWidth::W32, ..Opts::default() };
    expect![[r#"v2(1)"#]].assert_eq(&reduce(&opts, Builtin::AddressLessEqual, build));
    let wide = reduce(&Opts::default(), Builtin::AddressLessEqual, build);
    expect![[r#"irreducible"#]].assert_eq(&wide);
}

#[test]
fn branch_fusion() {
    use ValueComparator::{Equal, NotEqual};

    check(
        Builtin::UnsignedIntLessThan,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(Equal, 1), v.e.clone()],
        expect![[r#"Switch<uint,<,1>(v0, v1, v2, v3)"#]],
    );
    check(
        Builtin::UnsignedIntLessThan,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(Equal, 0), v.e.clone()],
        expect![[r#"Switch<uint,>=,1>(v0, v1, v2, v3)"#]],
    );
    check(
        Builtin::UnsignedIntLessThan,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(NotEqual, 1), v.e.clone()],
        expect![[r#"Switch<uint,>=,1>(v0, v1, v2, v3)"#]],
    );
    check(
        Builtin::UnsignedIntLessThan,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(NotEqual, 0), v.e.clone()],
        expect![[r#"Switch<uint,<,1>(v0, v1, v2, v3)"#]],
    );
    check(
        Builtin::AddressGreaterThan,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(Equal, 1), v.e.clone()],
        expect![[r#"Switch<word,>,1>(v0, v1, v2, v3)"#]],
    );
    check(
        Builtin::WordEquals,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(NotEqual, 0), v.e.clone()],
        expect![[r#"Switch<word,==,1>(v0, v1, v2, v3)"#]],
    );
    check(
        Builtin::ReferenceNotEquals,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(Equal, 0), v.e.clone()],
        expect![[r#"Switch<ref,==,1>(v0, v1, v2, v3)"#]],
    );

    // the pathological check comes first
    check(
        Builtin::UnsignedIntLessThan,
        |v| vec![v.x.clone(), CirValue::int(0), v.branch(Equal, 1), v.e.clone()],
        expect![[r#"cont[v4] { Switch<int,==,1>(v4, 1, v2, v3) }(0)"#]],
    );
    // only 0 and 1 can be results of a comparison
    check(
        Builtin::WordEquals,
        |v| vec![v.x.clone(), v.y.clone(), v.branch(Equal, 2), v.e.clone()],
        expect![[r#"irreducible"#]],
    );
}

#[test]
fn branch_fusion_requires_dead_result() {
    let uses_result = |v: &Vars| {
        let target = Closure::continuation(vec![], Call::new(v.k.clone(), vec![v.p.into()]));
        let switch = CirSwitch::new(SwitchKind::Int, ValueComparator::Equal, 1);
        let body =
            Call::new(switch, vec![v.p.into(), CirValue::int(1), target.into(), v.e.clone()]);
        let cont = Closure::continuation(vec![v.p], body);
        vec![v.x.clone(), v.y.clone(), cont.into(), v.e.clone()]
    };
    check(Builtin::WordNotEquals, uses_result, expect![[r#"irreducible"#]]);

    // references from frame descriptors are retargeted to the left operand
    let debug_only = |v: &Vars| {
        let target = Closure::continuation(
            vec![],
            Call::new(v.k.clone(), vec![CirValue::int(1)])
                .with_frame(FrameDescriptor::new(3, vec![v.p.into()], vec![])),
        );
        let switch = CirSwitch::new(SwitchKind::Int, ValueComparator::Equal, 1);
        let body = Call::new(switch, vec![v.p.into(), CirValue::int(1), target.into(), v.e.clone()])
            .with_frame(FrameDescriptor::new(7, vec![v.p.into()], vec![v.y.clone()]));
        let cont = Closure::continuation(vec![v.p], body);
        vec![v.x.clone(), v.y.clone(), cont.into(), v.e.clone()]
    };
    check(
        Builtin::WordNotEquals,
        debug_only,
        expect![[r#"Switch<word,!=,1>(v0, v1, cont[] { v2(1) @3[v0; ] }, v3) @7[v0; v1]"#]],
    );
}

#[test]
fn pointer_loads() {
    let dead = |v: &Vars| {
        let cont = Closure::continuation(vec![v.p], Call::new(v.k.clone(), vec![CirValue::int(1)]));
        vec![v.x.clone(), CirValue::int(8), cont.into(), v.e.clone()]
    };
    check(Builtin::ReadIntAtIntOffset, dead, expect![[r#"v2(1)"#]]);

    let forward = |v: &Vars| {
        let cont = Closure::continuation(vec![v.p], Call::new(v.k.clone(), vec![v.p.into()]));
        vec![v.x.clone(), CirValue::long(8), cont.into(), v.e.clone()]
    };
    check(
        Builtin::ReadLongAtLongOffset,
        forward,
        expect![[r#"ReadLongAtLongOffset(v0, 8L, v2, v3)"#]],
    );

    let used = |v: &Vars| {
        let body = Call::new(
            Builtin::IntPlus,
            vec![v.p.into(), CirValue::int(1), v.k.clone(), v.e.clone()],
        );
        let cont = Closure::continuation(vec![v.p], body);
        vec![v.x.clone(), CirValue::int(8), CirValue::int(2), cont.into(), v.e.clone()]
    };
    check(Builtin::GetInt, used, expect![[r#"irreducible"#]]);

    check(
        Builtin::ReadIntAtIntOffset,
        |v| v.call(vec![v.x.clone(), CirValue::int(8)]),
        expect![[r#"irreducible"#]],
    );
}

#[test]
fn malformed_calls_are_irreducible() {
    check(
        Builtin::IntTimes,
        |v| vec![v.x.clone(), CirValue::int(0), v.k.clone()],
        expect![[r#"irreducible"#]],
    );
    check(Builtin::IntPlus, |_| vec![Value::Int(0).into()], expect![[r#"irreducible"#]]);
}
