//! The closed set of builtin operators.
//!
//! Every builtin has a stable serial (its discriminant), a result kind, a list of parameter
//! kinds and [`BuiltinFlags`]. A call to a builtin always receives the parameters followed by the
//! normal continuation and the exception continuation.

use std::fmt;

use bitflags::bitflags;

use crate::Kind;

mod eval;
mod load;


pub use load::{Addressing, Load, MemoryKind};

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct BuiltinFlags: u8 {
        /// The builtin has externally observable or platform dependent effects and must never be
        /// evaluated at compile time.
        const NON_FOLDABLE = 1;
        /// The builtin reads memory through a pointer.
        const POINTER_LOAD = 1 << 1;
        /// The builtin may raise through its exception continuation.
        const MAY_TRAP = 1 << 2;
    }
}

macro_rules! builtins {
    ($($name: ident ($($param: ident),*) -> $result: ident $(: $($flag: ident)|+)?;)*) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Builtin {
            $($name),*
        }

        impl Builtin {
            pub const ALL: &'static [Builtin] = &[$(Builtin::$name),*];
            pub const COUNT: usize = Builtin::ALL.len();
        }

        const BUILTIN_NAMES: [&str; Builtin::COUNT] = [$(stringify!($name)),*];
        const BUILTIN_PARAMS: [&[Kind]; Builtin::COUNT] = [$(&[$(Kind::$param),*]),*];
        const BUILTIN_RESULTS: [Kind; Builtin::COUNT] = [$(Kind::$result),*];
        const BUILTIN_FLAGS: [BuiltinFlags; Builtin::COUNT] = [
            $(BuiltinFlags::empty()$($(.union(BuiltinFlags::$flag))+)?),*
        ];
    };
}

builtins! {
    IntNegated(Int) -> Int;
    IntPlus(Int, Int) -> Int;
    IntMinus(Int, Int) -> Int;
    IntTimes(Int, Int) -> Int;
    IntDivided(Int, Int) -> Int: MAY_TRAP;
    IntRemainder(Int, Int) -> Int: MAY_TRAP;
    IntShiftedLeft(Int, Int) -> Int;
    IntSignedShiftedRight(Int, Int) -> Int;
    IntUnsignedShiftedRight(Int, Int) -> Int;
    IntNot(Int) -> Int;
    IntAnd(Int, Int) -> Int;
    IntOr(Int, Int) -> Int;
    IntXor(Int, Int) -> Int;

    LongNegated(Long) -> Long;
    LongPlus(Long, Long) -> Long;
    LongMinus(Long, Long) -> Long;
    LongTimes(Long, Long) -> Long;
    LongDivided(Long, Long) -> Long: MAY_TRAP;
    LongRemainder(Long, Long) -> Long: MAY_TRAP;
    LongShiftedLeft(Long, Int) -> Long;
    LongSignedShiftedRight(Long, Int) -> Long;
    LongUnsignedShiftedRight(Long, Int) -> Long;
    LongNot(Long) -> Long;
    LongAnd(Long, Long) -> Long;
    LongOr(Long, Long) -> Long;
    LongXor(Long, Long) -> Long;
    LongCompare(Long, Long) -> Int;

    FloatNegated(Float) -> Float;
    FloatPlus(Float, Float) -> Float;
    FloatMinus(Float, Float) -> Float;
    FloatTimes(Float, Float) -> Float;
    FloatDivided(Float, Float) -> Float;
    FloatRemainder(Float, Float) -> Float;
    FloatCompareL(Float, Float) -> Int;
    FloatCompareG(Float, Float) -> Int;

    DoubleNegated(Double) -> Double;
    DoublePlus(Double, Double) -> Double;
    DoubleMinus(Double, Double) -> Double;
    DoubleTimes(Double, Double) -> Double;
    DoubleDivided(Double, Double) -> Double;
    DoubleRemainder(Double, Double) -> Double;
    DoubleCompareL(Double, Double) -> Int;
    DoubleCompareG(Double, Double) -> Int;

    IntToByte(Int) -> Int;
    IntToChar(Int) -> Int;
    IntToShort(Int) -> Int;
    IntToLong(Int) -> Long;
    IntToFloat(Int) -> Float;
    IntToDouble(Int) -> Double;
    LongToInt(Long) -> Int;
    LongToFloat(Long) -> Float;
    LongToDouble(Long) -> Double;
    FloatToInt(Float) -> Int;
    FloatToLong(Float) -> Long;
    FloatToDouble(Float) -> Double;
    DoubleToInt(Double) -> Int;
    DoubleToLong(Double) -> Long;
    DoubleToFloat(Double) -> Float;

    AddressLessEqual(Word, Word) -> Int;
    AddressLessThan(Word, Word) -> Int;
    AddressGreaterEqual(Word, Word) -> Int;
    AddressGreaterThan(Word, Word) -> Int;
    AddressDividedByAddress(Word, Word) -> Word: MAY_TRAP;
    AddressDividedByInt(Word, Int) -> Word: MAY_TRAP;
    AddressRemainderByAddress(Word, Word) -> Word: MAY_TRAP;
    AddressRemainderByInt(Word, Int) -> Int: MAY_TRAP;
    AddressAnd(Word, Word) -> Word;
    AddressUnsignedShiftedRight(Word, Int) -> Word;
    WordToInt(Word) -> Int;
    WordEquals(Word, Word) -> Int;
    WordNotEquals(Word, Word) -> Int;

    UnsignedIntGreaterEqual(Int, Int) -> Int;
    UnsignedIntLessThan(Int, Int) -> Int;
    ReferenceEquals(Reference, Reference) -> Int;
    ReferenceNotEquals(Reference, Reference) -> Int;

    SoftSafepoint() -> Void: NON_FOLDABLE;
    HardSafepoint() -> Void: NON_FOLDABLE;
    BarMemory() -> Void: NON_FOLDABLE;
    Breakpoint() -> Void: NON_FOLDABLE;
    GetInstructionPointer() -> Word: NON_FOLDABLE;

    ReadByteAtIntOffset(Word, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadShortAtIntOffset(Word, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadCharAtIntOffset(Word, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadIntAtIntOffset(Word, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadFloatAtIntOffset(Word, Int) -> Float: POINTER_LOAD | NON_FOLDABLE;
    ReadLongAtIntOffset(Word, Int) -> Long: POINTER_LOAD | NON_FOLDABLE;
    ReadDoubleAtIntOffset(Word, Int) -> Double: POINTER_LOAD | NON_FOLDABLE;
    ReadWordAtIntOffset(Word, Int) -> Word: POINTER_LOAD | NON_FOLDABLE;
    ReadReferenceAtIntOffset(Word, Int) -> Reference: POINTER_LOAD | NON_FOLDABLE;

    ReadByteAtLongOffset(Word, Long) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadShortAtLongOffset(Word, Long) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadCharAtLongOffset(Word, Long) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadIntAtLongOffset(Word, Long) -> Int: POINTER_LOAD | NON_FOLDABLE;
    ReadFloatAtLongOffset(Word, Long) -> Float: POINTER_LOAD | NON_FOLDABLE;
    ReadLongAtLongOffset(Word, Long) -> Long: POINTER_LOAD | NON_FOLDABLE;
    ReadDoubleAtLongOffset(Word, Long) -> Double: POINTER_LOAD | NON_FOLDABLE;
    ReadWordAtLongOffset(Word, Long) -> Word: POINTER_LOAD | NON_FOLDABLE;
    ReadReferenceAtLongOffset(Word, Long) -> Reference: POINTER_LOAD | NON_FOLDABLE;

    GetByte(Word, Int, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    GetShort(Word, Int, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    GetChar(Word, Int, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    GetInt(Word, Int, Int) -> Int: POINTER_LOAD | NON_FOLDABLE;
    GetFloat(Word, Int, Int) -> Float: POINTER_LOAD | NON_FOLDABLE;
    GetLong(Word, Int, Int) -> Long: POINTER_LOAD | NON_FOLDABLE;
    GetDouble(Word, Int, Int) -> Double: POINTER_LOAD | NON_FOLDABLE;
    GetWord(Word, Int, Int) -> Word: POINTER_LOAD | NON_FOLDABLE;
    GetReference(Word, Int, Int) -> Reference: POINTER_LOAD | NON_FOLDABLE;

    WriteByteAtIntOffset(Word, Int, Int) -> Void: NON_FOLDABLE;
    WriteShortAtIntOffset(Word, Int, Int) -> Void: NON_FOLDABLE;
    WriteCharAtIntOffset(Word, Int, Int) -> Void: NON_FOLDABLE;
    WriteIntAtIntOffset(Word, Int, Int) -> Void: NON_FOLDABLE;
    WriteFloatAtIntOffset(Word, Int, Float) -> Void: NON_FOLDABLE;
    WriteLongAtIntOffset(Word, Int, Long) -> Void: NON_FOLDABLE;
    WriteDoubleAtIntOffset(Word, Int, Double) -> Void: NON_FOLDABLE;
    WriteWordAtIntOffset(Word, Int, Word) -> Void: NON_FOLDABLE;
    WriteReferenceAtIntOffset(Word, Int, Reference) -> Void: NON_FOLDABLE;

    SetByte(Word, Int, Int, Int) -> Void: NON_FOLDABLE;
    SetShort(Word, Int, Int, Int) -> Void: NON_FOLDABLE;
    SetChar(Word, Int, Int, Int) -> Void: NON_FOLDABLE;
    SetInt(Word, Int, Int, Int) -> Void: NON_FOLDABLE;
    SetFloat(Word, Int, Int, Float) -> Void: NON_FOLDABLE;
    SetLong(Word, Int, Int, Long) -> Void: NON_FOLDABLE;
    SetDouble(Word, Int, Int, Double) -> Void: NON_FOLDABLE;
    SetWord(Word, Int, Int, Word) -> Void: NON_FOLDABLE;
    SetReference(Word, Int, Int, Reference) -> Void: NON_FOLDABLE;

    CompareAndSwapIntAtIntOffset(Word, Int, Int, Int) -> Int: NON_FOLDABLE;
    CompareAndSwapWordAtIntOffset(Word, Int, Word, Word) -> Word: NON_FOLDABLE;
    CompareAndSwapReferenceAtIntOffset(Word, Int, Reference, Reference) -> Reference: NON_FOLDABLE;
}

impl Builtin {
    #[inline]
    pub const fn serial(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_serial(serial: usize) -> Option<Builtin> {
        Builtin::ALL.get(serial).copied()
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        BUILTIN_NAMES[self as usize]
    }

    #[inline]
    pub const fn params(self) -> &'static [Kind] {
        BUILTIN_PARAMS[self as usize]
    }

    #[inline]
    pub const fn result(self) -> Kind {
        BUILTIN_RESULTS[self as usize]
    }

    #[inline]
    pub const fn flags(self) -> BuiltinFlags {
        BUILTIN_FLAGS[self as usize]
    }

    /// Number of arguments a call to this builtin receives: the parameters followed by the
    /// normal and the exception continuation.
    #[inline]
    pub const fn arity(self) -> usize {
        self.params().len() + 2
    }

    #[inline]
    pub fn is_pointer_load(self) -> bool {
        self.flags().contains(BuiltinFlags::POINTER_LOAD)
    }

    #[inline]
    pub fn is_non_foldable(self) -> bool {
        self.flags().contains(BuiltinFlags::NON_FOLDABLE)
    }

    #[inline]
    pub fn may_trap(self) -> bool {
        self.flags().contains(BuiltinFlags::MAY_TRAP)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selects one member of the group of rule objects registered for a builtin.
///
/// Only builtins with variants (the pointer load family) accept anything but `Plain`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum FoldVariant {
    #[default]
    Plain,
    Foldable,
    FoldableWhenNotZero,
}

/// A reference to a builtin as it appears in procedure position of a call.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BuiltinRef {
    pub builtin: Builtin,
    pub variant: FoldVariant,
}

impl BuiltinRef {
    #[inline]
    pub fn new(builtin: Builtin, variant: FoldVariant) -> BuiltinRef {
        BuiltinRef { builtin, variant }
    }
}

impl From<Builtin> for BuiltinRef {
    fn from(builtin: Builtin) -> BuiltinRef {
        BuiltinRef { builtin, variant: FoldVariant::Plain }
    }
}

impl fmt::Display for BuiltinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            FoldVariant::Plain => write!(f, "{}", self.builtin),
            FoldVariant::Foldable => write!(f, "{}!foldable", self.builtin),
            FoldVariant::FoldableWhenNotZero => {
                write!(f, "{}!foldable_when_not_zero", self.builtin)
            }
        }
    }
}
