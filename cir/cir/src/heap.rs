//! The host object graph.
//!
//! When the compiler runs hosted (inside the system it compiles) pointer loads whose pointer is a
//! known object can be answered by reading that object directly. [`HostHeap`] is the interface
//! the optimizer uses for this and [`ObjectGraph`] a simple in-memory implementation.

use ahash::AHashMap;
use typed_index_collections::TiVec;

use crate::{FoldingError, Kind, Load, ObjectRef, Value};

pub trait HostHeap {
    /// Reads the value stored at `offset` in `object`.
    fn read(&self, object: ObjectRef, offset: i64, kind: Kind) -> Result<Value, FoldingError>;

    /// Whether the slot at `offset` in `object` is known to never change.
    fn is_immutable(&self, object: ObjectRef, offset: i64) -> bool;

    /// Performs `load` on the constant arguments `args` (pointer first, without continuations).
    fn load(&self, load: Load, args: &[Value]) -> Result<Value, FoldingError> {
        let object = args
            .first()
            .and_then(Value::as_object)
            .ok_or(FoldingError::NotHostPointer(load.builtin))?;
        let offset = load.offset(&args[1..])?;
        let val = self.read(object, offset, load.kind.kind())?;
        Ok(load.kind.narrow(val))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Slot {
    val: Value,
    immutable: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ObjectData {
    slots: AHashMap<i64, Slot>,
}

#[derive(Clone, Debug, Default)]
pub struct ObjectGraph {
    objects: TiVec<ObjectRef, ObjectData>,
}

impl ObjectGraph {
    pub fn new() -> ObjectGraph {
        ObjectGraph::default()
    }

    pub fn alloc(&mut self) -> ObjectRef {
        self.objects.push_and_get_key(ObjectData::default())
    }

    /// Stores `val` at `offset`. Immutable slots are treated like final fields.
    pub fn store(&mut self, object: ObjectRef, offset: i64, val: Value, immutable: bool) {
        self.objects[object].slots.insert(offset, Slot { val, immutable });
    }

    fn slot(&self, object: ObjectRef, offset: i64) -> Option<&Slot> {
        self.objects.get(object)?.slots.get(&offset)
    }
}

impl HostHeap for ObjectGraph {
    fn read(&self, object: ObjectRef, offset: i64, kind: Kind) -> Result<Value, FoldingError> {
        match self.slot(object, offset) {
            Some(slot) if slot.val.kind() == kind => Ok(slot.val),
            _ => Err(FoldingError::HostRead { object, offset, kind }),
        }
    }

    fn is_immutable(&self, object: ObjectRef, offset: i64) -> bool {
        self.slot(object, offset).map_or(false, |slot| slot.immutable)
    }
}
