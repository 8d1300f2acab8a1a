use stdx::impl_debug_display;

use crate::{Builtin, FoldingError, Kind, Value};

/// The in-memory representation read by a pointer load.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryKind {
    Byte,
    Short,
    Char,
    Int,
    Float,
    Long,
    Double,
    Word,
    Reference,
}

impl_debug_display! {
    match MemoryKind{
        MemoryKind::Byte => "byte";
        MemoryKind::Short => "short";
        MemoryKind::Char => "char";
        MemoryKind::Int => "int";
        MemoryKind::Float => "float";
        MemoryKind::Long => "long";
        MemoryKind::Double => "double";
        MemoryKind::Word => "word";
        MemoryKind::Reference => "ref";
    }
}

impl MemoryKind {
    /// Element size used to scale the index of `Get*` builtins. Words and references are
    /// laid out as 8 byte slots in the host object graph.
    pub fn size(self) -> i64 {
        match self {
            MemoryKind::Byte => 1,
            MemoryKind::Short | MemoryKind::Char => 2,
            MemoryKind::Int | MemoryKind::Float => 4,
            MemoryKind::Long | MemoryKind::Double | MemoryKind::Word | MemoryKind::Reference => 8,
        }
    }

    /// The kind of the value produced by the load.
    pub fn kind(self) -> Kind {
        match self {
            MemoryKind::Byte | MemoryKind::Short | MemoryKind::Char | MemoryKind::Int => Kind::Int,
            MemoryKind::Float => Kind::Float,
            MemoryKind::Long => Kind::Long,
            MemoryKind::Double => Kind::Double,
            MemoryKind::Word => Kind::Word,
            MemoryKind::Reference => Kind::Reference,
        }
    }

    /// Narrows a stored value to the representation of this memory kind (sign extension for
    /// `byte` and `short`, zero extension for `char`).
    pub fn narrow(self, val: Value) -> Value {
        match (self, val) {
            (MemoryKind::Byte, Value::Int(val)) => Value::Int(val as i8 as i32),
            (MemoryKind::Short, Value::Int(val)) => Value::Int(val as i16 as i32),
            (MemoryKind::Char, Value::Int(val)) => Value::Int(val as u16 as i32),
            (_, val) => val,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Addressing {
    /// `(pointer, int offset)`
    IntOffset,
    /// `(pointer, long offset)`
    LongOffset,
    /// `(pointer, int displacement, int index)`, the index is scaled by the element size.
    Indexed,
}

/// Describes how a pointer load computes its address and what it reads.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Load {
    pub builtin: Builtin,
    pub kind: MemoryKind,
    pub addressing: Addressing,
}

impl Load {
    /// Computes the byte offset from the pointer from the offset arguments (every parameter
    /// but the pointer).
    pub fn offset(&self, offsets: &[Value]) -> Result<i64, FoldingError> {
        let mismatch = |index: usize, expected: Kind| FoldingError::KindMismatch {
            builtin: self.builtin,
            index,
            expected,
            found: offsets.get(index - 1).map_or(Kind::Void, Value::kind),
        };

        match self.addressing {
            Addressing::IntOffset => {
                let offset = offsets.first().and_then(Value::as_int);
                offset.map(i64::from).ok_or_else(|| mismatch(1, Kind::Int))
            }
            Addressing::LongOffset => {
                offsets.first().and_then(Value::as_long).ok_or_else(|| mismatch(1, Kind::Long))
            }
            Addressing::Indexed => {
                let displacement =
                    offsets.first().and_then(Value::as_int).ok_or_else(|| mismatch(1, Kind::Int))?;
                let index =
                    offsets.get(1).and_then(Value::as_int).ok_or_else(|| mismatch(2, Kind::Int))?;
                Ok(i64::from(displacement) + i64::from(index) * self.kind.size())
            }
        }
    }
}

impl Builtin {
    /// Returns how this builtin reads memory if it belongs to the pointer load family.
    pub fn load(self) -> Option<Load> {
        use Addressing::{Indexed, IntOffset, LongOffset};
        use Builtin::*;

        let (kind, addressing) = match self {
            ReadByteAtIntOffset => (MemoryKind::Byte, IntOffset),
            ReadShortAtIntOffset => (MemoryKind::Short, IntOffset),
            ReadCharAtIntOffset => (MemoryKind::Char, IntOffset),
            ReadIntAtIntOffset => (MemoryKind::Int, IntOffset),
            ReadFloatAtIntOffset => (MemoryKind::Float, IntOffset),
            ReadLongAtIntOffset => (MemoryKind::Long, IntOffset),
            ReadDoubleAtIntOffset => (MemoryKind::Double, IntOffset),
            ReadWordAtIntOffset => (MemoryKind::Word, IntOffset),
            ReadReferenceAtIntOffset => (MemoryKind::Reference, IntOffset),

            ReadByteAtLongOffset => (MemoryKind::Byte, LongOffset),
            ReadShortAtLongOffset => (MemoryKind::Short, LongOffset),
            ReadCharAtLongOffset => (MemoryKind::Char, LongOffset),
            ReadIntAtLongOffset => (MemoryKind::Int, LongOffset),
            ReadFloatAtLongOffset => (MemoryKind::Float, LongOffset),
            ReadLongAtLongOffset => (MemoryKind::Long, LongOffset),
            ReadDoubleAtLongOffset => (MemoryKind::Double, LongOffset),
            ReadWordAtLongOffset => (MemoryKind::Word, LongOffset),
            ReadReferenceAtLongOffset => (MemoryKind::Reference, LongOffset),

            GetByte => (MemoryKind::Byte, Indexed),
            GetShort => (MemoryKind::Short, Indexed),
            GetChar => (MemoryKind::Char, Indexed),
            GetInt => (MemoryKind::Int, Indexed),
            GetFloat => (MemoryKind::Float, Indexed),
            GetLong => (MemoryKind::Long, Indexed),
            GetDouble => (MemoryKind::Double, Indexed),
            GetWord => (MemoryKind::Word, Indexed),
            GetReference => (MemoryKind::Reference, Indexed),

            _ => return None,
        };

        Some(Load { builtin: self, kind, addressing })
    }
}
