use std::cmp::Ordering;

use crate::{Builtin, FoldingError, Reference, Value};

impl Builtin {
    /// Evaluates the compile time semantics of this builtin.
    ///
    /// `args` are the parameters only (without the two continuations). Integer arithmetic
    /// wraps and shift amounts are masked to the operand width. Word operands are unsigned.
    pub fn evaluate(self, args: &[Value]) -> Result<Value, FoldingError> {
        self.check_args(args)?;

        let int = |i: usize| args[i].as_int().unwrap_or_default();
        let long = |i: usize| args[i].as_long().unwrap_or_default();
        let word = |i: usize| args[i].as_word().unwrap_or_default();
        let float = |i: usize| match args[i] {
            Value::Float(val) => val.as_float(),
            _ => 0.0,
        };
        let double = |i: usize| match args[i] {
            Value::Double(val) => val.as_float(),
            _ => 0.0,
        };
        let reference = |i: usize| args[i].as_reference().unwrap_or(Reference::Null);
        // zero extension of an int operand to a word
        let uint = |i: usize| int(i) as u32 as u64;

        let res: Value = match self {
            Builtin::IntNegated => int(0).wrapping_neg().into(),
            Builtin::IntPlus => int(0).wrapping_add(int(1)).into(),
            Builtin::IntMinus => int(0).wrapping_sub(int(1)).into(),
            Builtin::IntTimes => int(0).wrapping_mul(int(1)).into(),
            Builtin::IntDivided => {
                if int(1) == 0 {
                    return Err(FoldingError::DivisionByZero);
                }
                int(0).wrapping_div(int(1)).into()
            }
            Builtin::IntRemainder => {
                if int(1) == 0 {
                    return Err(FoldingError::DivisionByZero);
                }
                int(0).wrapping_rem(int(1)).into()
            }
            Builtin::IntShiftedLeft => int(0).wrapping_shl(int(1) as u32).into(),
            Builtin::IntSignedShiftedRight => int(0).wrapping_shr(int(1) as u32).into(),
            Builtin::IntUnsignedShiftedRight => {
                ((int(0) as u32).wrapping_shr(int(1) as u32) as i32).into()
            }
            Builtin::IntNot => (!int(0)).into(),
            Builtin::IntAnd => (int(0) & int(1)).into(),
            Builtin::IntOr => (int(0) | int(1)).into(),
            Builtin::IntXor => (int(0) ^ int(1)).into(),

            Builtin::LongNegated => long(0).wrapping_neg().into(),
            Builtin::LongPlus => long(0).wrapping_add(long(1)).into(),
            Builtin::LongMinus => long(0).wrapping_sub(long(1)).into(),
            Builtin::LongTimes => long(0).wrapping_mul(long(1)).into(),
            Builtin::LongDivided => {
                if long(1) == 0 {
                    return Err(FoldingError::DivisionByZero);
                }
                long(0).wrapping_div(long(1)).into()
            }
            Builtin::LongRemainder => {
                if long(1) == 0 {
                    return Err(FoldingError::DivisionByZero);
                }
                long(0).wrapping_rem(long(1)).into()
            }
            Builtin::LongShiftedLeft => long(0).wrapping_shl(int(1) as u32).into(),
            Builtin::LongSignedShiftedRight => long(0).wrapping_shr(int(1) as u32).into(),
            Builtin::LongUnsignedShiftedRight => {
                ((long(0) as u64).wrapping_shr(int(1) as u32) as i64).into()
            }
            Builtin::LongNot => (!long(0)).into(),
            Builtin::LongAnd => (long(0) & long(1)).into(),
            Builtin::LongOr => (long(0) | long(1)).into(),
            Builtin::LongXor => (long(0) ^ long(1)).into(),
            Builtin::LongCompare => ordering(long(0).cmp(&long(1))),

            Builtin::FloatNegated => (-float(0)).into(),
            Builtin::FloatPlus => (float(0) + float(1)).into(),
            Builtin::FloatMinus => (float(0) - float(1)).into(),
            Builtin::FloatTimes => (float(0) * float(1)).into(),
            Builtin::FloatDivided => (float(0) / float(1)).into(),
            Builtin::FloatRemainder => (float(0) % float(1)).into(),
            Builtin::FloatCompareL => float_compare(float(0).partial_cmp(&float(1)), -1),
            Builtin::FloatCompareG => float_compare(float(0).partial_cmp(&float(1)), 1),

            Builtin::DoubleNegated => (-double(0)).into(),
            Builtin::DoublePlus => (double(0) + double(1)).into(),
            Builtin::DoubleMinus => (double(0) - double(1)).into(),
            Builtin::DoubleTimes => (double(0) * double(1)).into(),
            Builtin::DoubleDivided => (double(0) / double(1)).into(),
            Builtin::DoubleRemainder => (double(0) % double(1)).into(),
            Builtin::DoubleCompareL => float_compare(double(0).partial_cmp(&double(1)), -1),
            Builtin::DoubleCompareG => float_compare(double(0).partial_cmp(&double(1)), 1),

            Builtin::IntToByte => (int(0) as i8 as i32).into(),
            Builtin::IntToChar => (int(0) as u16 as i32).into(),
            Builtin::IntToShort => (int(0) as i16 as i32).into(),
            Builtin::IntToLong => i64::from(int(0)).into(),
            Builtin::IntToFloat => (int(0) as f32).into(),
            Builtin::IntToDouble => f64::from(int(0)).into(),
            Builtin::LongToInt => (long(0) as i32).into(),
            Builtin::LongToFloat => (long(0) as f32).into(),
            Builtin::LongToDouble => (long(0) as f64).into(),
            // `as` saturates and maps NaN to zero like the JVM
            Builtin::FloatToInt => (float(0) as i32).into(),
            Builtin::FloatToLong => (float(0) as i64).into(),
            Builtin::FloatToDouble => f64::from(float(0)).into(),
            Builtin::DoubleToInt => (double(0) as i32).into(),
            Builtin::DoubleToLong => (double(0) as i64).into(),
            Builtin::DoubleToFloat => (double(0) as f32).into(),

            Builtin::AddressLessEqual => Value::bool(word(0) <= word(1)),
            Builtin::AddressLessThan => Value::bool(word(0) < word(1)),
            Builtin::AddressGreaterEqual => Value::bool(word(0) >= word(1)),
            Builtin::AddressGreaterThan => Value::bool(word(0) > word(1)),
            Builtin::AddressDividedByAddress => {
                Value::Word(word(0).checked_div(word(1)).ok_or(FoldingError::DivisionByZero)?)
            }
            Builtin::AddressDividedByInt => {
                Value::Word(word(0).checked_div(uint(1)).ok_or(FoldingError::DivisionByZero)?)
            }
            Builtin::AddressRemainderByAddress => {
                Value::Word(word(0).checked_rem(word(1)).ok_or(FoldingError::DivisionByZero)?)
            }
            Builtin::AddressRemainderByInt => {
                let rem = word(0).checked_rem(uint(1)).ok_or(FoldingError::DivisionByZero)?;
                Value::Int(rem as i32)
            }
            Builtin::AddressAnd => Value::Word(word(0) & word(1)),
            Builtin::AddressUnsignedShiftedRight => {
                Value::Word(word(0).wrapping_shr(int(1) as u32))
            }
            Builtin::WordToInt => Value::Int(word(0) as i32),
            Builtin::WordEquals => Value::bool(word(0) == word(1)),
            Builtin::WordNotEquals => Value::bool(word(0) != word(1)),

            Builtin::UnsignedIntGreaterEqual => Value::bool(int(0) as u32 >= int(1) as u32),
            Builtin::UnsignedIntLessThan => Value::bool((int(0) as u32) < int(1) as u32),
            Builtin::ReferenceEquals => Value::bool(reference(0) == reference(1)),
            Builtin::ReferenceNotEquals => Value::bool(reference(0) != reference(1)),

            _ => return Err(FoldingError::NoSemantics(self)),
        };

        Ok(res)
    }

    fn check_args(self, args: &[Value]) -> Result<(), FoldingError> {
        let params = self.params();
        if args.len() != params.len() {
            return Err(FoldingError::Arity {
                builtin: self,
                expected: params.len(),
                found: args.len(),
            });
        }

        for (index, (arg, &expected)) in args.iter().zip(params).enumerate() {
            let found = arg.kind();
            if found != expected {
                return Err(FoldingError::KindMismatch { builtin: self, index, expected, found });
            }
        }

        Ok(())
    }
}

fn ordering(ord: Ordering) -> Value {
    Value::Int(ord as i32)
}

fn float_compare(ord: Option<Ordering>, unordered: i32) -> Value {
    ord.map_or(Value::Int(unordered), ordering)
}
