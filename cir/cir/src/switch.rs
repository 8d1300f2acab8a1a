use std::fmt;

use stdx::impl_debug_display;

use crate::Value;

/// How the tag and the match values of a switch are compared.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKind {
    Int,
    Long,
    UnsignedInt,
    Word,
    Reference,
}

impl_debug_display! {
    match SwitchKind{
        SwitchKind::Int => "int";
        SwitchKind::Long => "long";
        SwitchKind::UnsignedInt => "uint";
        SwitchKind::Word => "word";
        SwitchKind::Reference => "ref";
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueComparator {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl_debug_display! {
    match ValueComparator{
        ValueComparator::Equal => "==";
        ValueComparator::NotEqual => "!=";
        ValueComparator::LessThan => "<";
        ValueComparator::LessEqual => "<=";
        ValueComparator::GreaterThan => ">";
        ValueComparator::GreaterEqual => ">=";
    }
}

impl ValueComparator {
    /// The comparator that holds exactly when `self` does not.
    pub fn complement(self) -> ValueComparator {
        match self {
            ValueComparator::Equal => ValueComparator::NotEqual,
            ValueComparator::NotEqual => ValueComparator::Equal,
            ValueComparator::LessThan => ValueComparator::GreaterEqual,
            ValueComparator::LessEqual => ValueComparator::GreaterThan,
            ValueComparator::GreaterThan => ValueComparator::LessEqual,
            ValueComparator::GreaterEqual => ValueComparator::LessThan,
        }
    }

    /// Compares `lhs` with `rhs` under the ordering of `kind`.
    ///
    /// Returns `None` if the operands do not match `kind` or if an ordering comparison is
    /// requested for references.
    pub fn evaluate(self, kind: SwitchKind, lhs: &Value, rhs: &Value) -> Option<bool> {
        let ord = match (kind, lhs, rhs) {
            (SwitchKind::Int, Value::Int(lhs), Value::Int(rhs)) => lhs.cmp(rhs),
            (SwitchKind::UnsignedInt, Value::Int(lhs), Value::Int(rhs)) => {
                (*lhs as u32).cmp(&(*rhs as u32))
            }
            (SwitchKind::Long, Value::Long(lhs), Value::Long(rhs)) => lhs.cmp(rhs),
            (SwitchKind::Word, Value::Word(lhs), Value::Word(rhs)) => lhs.cmp(rhs),
            (SwitchKind::Reference, Value::Reference(lhs), Value::Reference(rhs)) => {
                return match self {
                    ValueComparator::Equal => Some(lhs == rhs),
                    ValueComparator::NotEqual => Some(lhs != rhs),
                    _ => None,
                };
            }
            _ => return None,
        };

        let res = match self {
            ValueComparator::Equal => ord.is_eq(),
            ValueComparator::NotEqual => ord.is_ne(),
            ValueComparator::LessThan => ord.is_lt(),
            ValueComparator::LessEqual => ord.is_le(),
            ValueComparator::GreaterThan => ord.is_gt(),
            ValueComparator::GreaterEqual => ord.is_ge(),
        };
        Some(res)
    }
}

/// A multi way branch.
///
/// A switch with `matches` match values is called with
/// `(tag, match_0, .., match_n-1, target_0, .., target_n-1, default)`. The first target whose
/// match value satisfies `comparator(tag, match)` is called without arguments, `default` is called
/// if no match value does.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CirSwitch {
    pub kind: SwitchKind,
    pub comparator: ValueComparator,
    pub matches: usize,
}

impl CirSwitch {
    pub fn new(kind: SwitchKind, comparator: ValueComparator, matches: usize) -> CirSwitch {
        CirSwitch { kind, comparator, matches }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        2 * self.matches + 2
    }

    /// Selects the index of the argument that is called for `tag` and the constant match values.
    /// Returns `None` if any comparison is undefined.
    pub fn select(&self, tag: &Value, matches: &[Value]) -> Option<usize> {
        debug_assert_eq!(matches.len(), self.matches);
        for (i, val) in matches.iter().enumerate() {
            if self.comparator.evaluate(self.kind, tag, val)? {
                return Some(1 + self.matches + i);
            }
        }
        Some(1 + 2 * self.matches)
    }
}

impl fmt::Display for CirSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Switch<{},{},{}>", self.kind, self.comparator, self.matches)
    }
}
