//! The builtin table maps every [`Builtin`] to the rule object that folds and reduces it.

use cir::{
    Builtin, BuiltinRef, Call, CirValue, FoldVariant, FoldingError, SwitchKind, ValueComparator,
};
use once_cell::sync::Lazy;

use crate::fold;
use crate::rules::{
    AddressDivided, AddressRemainder, Comparison, Divided, Logic, LogicOp, Minus, Plus,
    PointerLoad, Remainder, Rule, Shift, ShiftDirection, Times,
};
use crate::CirOptimizer;


/// The slot of a builtin in the [`BuiltinTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CirBuiltin {
    builtin: Builtin,
    rule: Rule,
    has_variants: bool,
}

impl CirBuiltin {
    #[inline]
    pub fn builtin(&self) -> Builtin {
        self.builtin
    }

    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Whether a foldable and a foldable-when-not-zero variant exist for this builtin.
    #[inline]
    pub fn has_variants(&self) -> bool {
        self.has_variants
    }

    #[inline]
    pub fn plain(&self) -> RuleObject<'_> {
        RuleObject { slot: self, variant: FoldVariant::Plain }
    }

    /// The rule object for `variant`, `None` if this builtin has no such variant.
    pub fn variant(&self, variant: FoldVariant) -> Option<RuleObject<'_>> {
        if variant == FoldVariant::Plain || self.has_variants {
            Some(RuleObject { slot: self, variant })
        } else {
            None
        }
    }

    pub fn is_foldable(&self, ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        self.plain().is_foldable(ctx, args)
    }

    pub fn fold(&self, ctx: &CirOptimizer, args: &[CirValue]) -> Result<Call, FoldingError> {
        self.plain().fold(ctx, args)
    }

    pub fn is_reducible(&self, ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        self.plain().is_reducible(ctx, args)
    }

    pub fn reduce(&self, ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        self.plain().reduce(ctx, args)
    }
}

/// One member of the group of rule objects registered for a builtin.
///
/// All members share the slot (and therefore the strength reductions) and only differ in
/// their foldability policy. Every member can hand out references to its siblings.
#[derive(Clone, Copy, Debug)]
pub struct RuleObject<'t> {
    slot: &'t CirBuiltin,
    variant: FoldVariant,
}

impl<'t> RuleObject<'t> {
    #[inline]
    pub fn builtin(&self) -> Builtin {
        self.slot.builtin
    }

    #[inline]
    pub fn variant(&self) -> FoldVariant {
        self.variant
    }

    #[inline]
    pub fn builtin_ref(&self) -> BuiltinRef {
        BuiltinRef::new(self.slot.builtin, self.variant)
    }

    pub fn plain_variant(&self) -> BuiltinRef {
        BuiltinRef::new(self.slot.builtin, FoldVariant::Plain)
    }

    pub fn foldable_variant(&self) -> Option<BuiltinRef> {
        self.slot
            .has_variants
            .then(|| BuiltinRef::new(self.slot.builtin, FoldVariant::Foldable))
    }

    pub fn when_not_zero_variant(&self) -> Option<BuiltinRef> {
        self.slot
            .has_variants
            .then(|| BuiltinRef::new(self.slot.builtin, FoldVariant::FoldableWhenNotZero))
    }

    pub fn is_foldable(&self, ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        args.len() == self.builtin().arity() && fold::is_foldable(ctx, self.builtin_ref(), args)
    }

    pub fn fold(&self, ctx: &CirOptimizer, args: &[CirValue]) -> Result<Call, FoldingError> {
        fold::fold(ctx, self.builtin_ref(), args)
    }

    pub fn is_reducible(&self, ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        args.len() == self.builtin().arity()
            && self.slot.rule.as_reducible().map_or(false, |rule| rule.is_reducible(ctx, args))
    }

    /// Rewrites a call to this builtin. Must only be called if `is_reducible` holds.
    ///
    /// # Panics
    ///
    /// Panics if the builtin has no strength reductions.
    pub fn reduce(&self, ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let rule = match self.slot.rule.as_reducible() {
            Some(rule) => rule,
            None => panic!("{} has no strength reductions", self.builtin()),
        };
        let mut call = rule.reduce(ctx, args);
        // a reduction that calls the same builtin again keeps the variant
        if call.builtin() == Some(self.plain_variant()) {
            call.procedure = CirValue::Builtin(self.builtin_ref());
        }
        call
    }
}

/// Maps every builtin to its rule object.
#[derive(Debug, Clone)]
pub struct BuiltinTable {
    slots: Box<[CirBuiltin]>,
}

impl Default for BuiltinTable {
    fn default() -> BuiltinTable {
        BuiltinTable::new()
    }
}

struct Registry {
    slots: Vec<Option<CirBuiltin>>,
}

impl Registry {
    fn register(&mut self, builtin: Builtin, rule: Rule, has_variants: bool) {
        let slot = &mut self.slots[builtin.serial()];
        assert!(slot.is_none(), "{builtin} was registered twice");
        *slot = Some(CirBuiltin { builtin, rule, has_variants });
    }

    fn specialize(&mut self, builtin: Builtin, rule: Rule) {
        self.register(builtin, rule, false)
    }
}

impl BuiltinTable {
    pub fn new() -> BuiltinTable {
        let mut registry = Registry { slots: vec![None; Builtin::COUNT] };
        register_specialized(&mut registry);
        let specialized = registry.slots.iter().filter(|slot| slot.is_some()).count();

        let mut pointer_loads = 0;
        for &builtin in Builtin::ALL {
            if builtin.is_pointer_load() {
                registry.register(builtin, Rule::PointerLoad(PointerLoad { builtin }), true);
                pointer_loads += 1;
            }
        }

        let mut generic = 0;
        for &builtin in Builtin::ALL {
            if registry.slots[builtin.serial()].is_none() {
                registry.register(builtin, Rule::Generic, false);
                generic += 1;
            }
        }

        log::debug!(
            "builtin table: {specialized} specialized, {pointer_loads} pointer loads, \
             {generic} generic"
        );

        let slots = registry
            .slots
            .into_iter()
            .zip(Builtin::ALL)
            .map(|(slot, builtin)| match slot {
                Some(slot) => slot,
                None => panic!("no rule was registered for {builtin}"),
            })
            .collect();
        BuiltinTable { slots }
    }

    #[inline]
    pub fn get(&self, builtin: Builtin) -> &CirBuiltin {
        &self.slots[builtin.serial()]
    }

    /// Resolves a builtin reference (including its variant) to its rule object.
    ///
    /// # Panics
    ///
    /// Panics if the referenced variant was never registered.
    pub fn rule(&self, builtin: BuiltinRef) -> RuleObject<'_> {
        match self.get(builtin.builtin).variant(builtin.variant) {
            Some(rule) => rule,
            None => panic!("{} has no {:?} variant", builtin.builtin, builtin.variant),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CirBuiltin> {
        self.slots.iter()
    }
}

/// The process wide builtin table. Built on first access and immutable afterwards.
pub fn builtin_table() -> &'static BuiltinTable {
    static TABLE: Lazy<BuiltinTable> = Lazy::new(BuiltinTable::new);
    &TABLE
}

fn register_specialized(registry: &mut Registry) {
    use ShiftDirection::{Left, SignedRight, UnsignedRight};

    registry.specialize(Builtin::IntMinus, Rule::IntMinus(Minus::new()));
    registry.specialize(Builtin::LongMinus, Rule::LongMinus(Minus::new()));
    registry.specialize(Builtin::IntPlus, Rule::IntPlus(Plus::new()));
    registry.specialize(Builtin::LongPlus, Rule::LongPlus(Plus::new()));
    registry.specialize(Builtin::IntTimes, Rule::IntTimes(Times::new()));
    registry.specialize(Builtin::LongTimes, Rule::LongTimes(Times::new()));
    registry.specialize(Builtin::IntDivided, Rule::IntDivided(Divided::new()));
    registry.specialize(Builtin::LongDivided, Rule::LongDivided(Divided::new()));
    registry.specialize(Builtin::IntRemainder, Rule::IntRemainder(Remainder::new()));
    registry.specialize(Builtin::LongRemainder, Rule::LongRemainder(Remainder::new()));

    registry.specialize(Builtin::IntAnd, Rule::IntLogic(Logic::new(LogicOp::And)));
    registry.specialize(Builtin::IntOr, Rule::IntLogic(Logic::new(LogicOp::Or)));
    registry.specialize(Builtin::IntXor, Rule::IntLogic(Logic::new(LogicOp::Xor)));
    registry.specialize(Builtin::LongAnd, Rule::LongLogic(Logic::new(LogicOp::And)));
    registry.specialize(Builtin::LongOr, Rule::LongLogic(Logic::new(LogicOp::Or)));
    registry.specialize(Builtin::LongXor, Rule::LongLogic(Logic::new(LogicOp::Xor)));

    registry.specialize(Builtin::IntShiftedLeft, Rule::IntShift(Shift::new(Left)));
    registry.specialize(Builtin::IntSignedShiftedRight, Rule::IntShift(Shift::new(SignedRight)));
    registry
        .specialize(Builtin::IntUnsignedShiftedRight, Rule::IntShift(Shift::new(UnsignedRight)));
    registry.specialize(Builtin::LongShiftedLeft, Rule::LongShift(Shift::new(Left)));
    registry
        .specialize(Builtin::LongSignedShiftedRight, Rule::LongShift(Shift::new(SignedRight)));
    registry
        .specialize(Builtin::LongUnsignedShiftedRight, Rule::LongShift(Shift::new(UnsignedRight)));

    registry.specialize(
        Builtin::AddressDividedByAddress,
        Rule::AddressDivided(AddressDivided { by_int: false }),
    );
    registry.specialize(
        Builtin::AddressDividedByInt,
        Rule::AddressDivided(AddressDivided { by_int: true }),
    );
    registry.specialize(
        Builtin::AddressRemainderByAddress,
        Rule::AddressRemainder(AddressRemainder { by_int: false }),
    );
    registry.specialize(
        Builtin::AddressRemainderByInt,
        Rule::AddressRemainder(AddressRemainder { by_int: true }),
    );

    use SwitchKind::{Reference, UnsignedInt, Word};
    use ValueComparator::{Equal, GreaterEqual, GreaterThan, LessEqual, LessThan, NotEqual};
    let comparisons = [
        (Builtin::UnsignedIntGreaterEqual, Comparison::unsigned(UnsignedInt, GreaterEqual)),
        (Builtin::UnsignedIntLessThan, Comparison::unsigned(UnsignedInt, LessThan)),
        (Builtin::AddressLessEqual, Comparison::unsigned(Word, LessEqual)),
        (Builtin::AddressLessThan, Comparison::unsigned(Word, LessThan)),
        (Builtin::AddressGreaterEqual, Comparison::unsigned(Word, GreaterEqual)),
        (Builtin::AddressGreaterThan, Comparison::unsigned(Word, GreaterThan)),
        (Builtin::WordEquals, Comparison::new(Word, Equal)),
        (Builtin::WordNotEquals, Comparison::new(Word, NotEqual)),
        (Builtin::ReferenceEquals, Comparison::new(Reference, Equal)),
        (Builtin::ReferenceNotEquals, Comparison::new(Reference, NotEqual)),
    ];
    for (builtin, comparison) in comparisons {
        registry.specialize(builtin, Rule::Comparison(comparison));
    }
}
