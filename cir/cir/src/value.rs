use std::fmt::{self, Display, Formatter};

use stdx::{impl_debug_display, impl_idx_from, Ieee32, Ieee64};

use crate::Kind;

/// An object of the host object graph (see [`crate::heap`]).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectRef(u32);
impl_idx_from!(ObjectRef(u32));
impl_debug_display! {obj @ ObjectRef => "@obj{}", obj.0}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Reference {
    Null,
    Object(ObjectRef),
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Null => f.write_str("null"),
            Reference::Object(obj) => Display::fmt(obj, f),
        }
    }
}

/// Width of a machine word on the platform that is being compiled for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum WordWidth {
    W32,
    #[default]
    W64,
}

impl WordWidth {
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            WordWidth::W32 => 32,
            WordWidth::W64 => 64,
        }
    }

    /// The largest address representable with this width.
    #[inline]
    pub fn all_ones(self) -> u64 {
        stdx::truncate(u64::MAX, self.bits())
    }

    #[inline]
    pub fn truncate(self, bits: u64) -> u64 {
        stdx::truncate(bits, self.bits())
    }
}

/// A constant CIR value.
///
/// Values are immutable and compared by content. Floating point values compare by their bit
/// pattern so that constants can serve as keys and be compared structurally.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Value {
    Void,
    Int(i32),
    Long(i64),
    Float(Ieee32),
    Double(Ieee64),
    Word(u64),
    Reference(Reference),
}

impl Value {
    pub const NULL: Value = Value::Reference(Reference::Null);
    pub const TRUE: Value = Value::Int(1);
    pub const FALSE: Value = Value::Int(0);

    #[inline]
    pub fn bool(val: bool) -> Value {
        Value::Int(val as i32)
    }

    #[inline]
    pub fn float(val: f32) -> Value {
        Value::Float(val.into())
    }

    #[inline]
    pub fn double(val: f64) -> Value {
        Value::Double(val.into())
    }

    /// Creates a word constant that is truncated to `width`.
    #[inline]
    pub fn word(bits: u64, width: WordWidth) -> Value {
        Value::Word(width.truncate(bits))
    }

    #[inline]
    pub fn object(obj: ObjectRef) -> Value {
        Value::Reference(Reference::Object(obj))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Void => Kind::Void,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::Word(_) => Kind::Word,
            Value::Reference(_) => Kind::Reference,
        }
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    /// Whether this value is the zero of its kind. `null` counts as the zero reference and both
    /// signed zeros count as floating point zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            Value::Void => false,
            Value::Int(val) => val == 0,
            Value::Long(val) => val == 0,
            Value::Float(val) => val.is_zero(),
            Value::Double(val) => val.is_zero(),
            Value::Word(val) => val == 0,
            Value::Reference(val) => val == Reference::Null,
        }
    }

    pub fn is_all_ones(&self) -> bool {
        match *self {
            Value::Int(val) => val == -1,
            Value::Long(val) => val == -1,
            Value::Word(val) => val == u64::MAX,
            _ => false,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        if let Value::Int(val) = *self {
            Some(val)
        } else {
            None
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        if let Value::Long(val) = *self {
            Some(val)
        } else {
            None
        }
    }

    pub fn as_word(&self) -> Option<u64> {
        if let Value::Word(val) = *self {
            Some(val)
        } else {
            None
        }
    }

    pub fn as_reference(&self) -> Option<Reference> {
        if let Value::Reference(val) = *self {
            Some(val)
        } else {
            None
        }
    }

    /// The object a non-null reference constant points to.
    pub fn as_object(&self) -> Option<ObjectRef> {
        match *self {
            Value::Reference(Reference::Object(obj)) => Some(obj),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Value {
        Value::Int(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Value {
        Value::Long(val)
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Value {
        Value::float(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Value {
        Value::double(val)
    }
}

impl From<Reference> for Value {
    fn from(val: Reference) -> Value {
        Value::Reference(val)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Int(val) => write!(f, "{val}"),
            Value::Long(val) => write!(f, "{val}L"),
            Value::Float(val) => write!(f, "{val}F"),
            Value::Double(val) => write!(f, "{val}D"),
            Value::Word(val) => write!(f, "#{val:#x}"),
            Value::Reference(val) => Display::fmt(val, f),
        }
    }
}
