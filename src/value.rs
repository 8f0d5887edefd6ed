//! Value discipline: a tagged sum of integer and reference, never
//! reinterpreted from one variant to the other by an opcode.

use crate::heap::Ref;

/// A datum living on the operand stack or in a local slot.
///
/// Every value carries its variant explicitly; there is no bit-stealing on
/// pointers. An opcode that expects `Int` and finds `Ref` (or vice versa)
/// is a bug in the bytecode, not a trap the VM is obliged to detect — see
/// `int_of`/`ref_of` below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    /// The value discipline has no meaningful "zero" value, but local slots
    /// need an initial state before well-formed bytecode writes them.
    Uninit,
    Int(i32),
    Ref(Ref),
}

impl Value {
    pub fn from_int(i: i32) -> Self {
        Value::Int(i)
    }

    pub fn from_ref(r: Ref) -> Self {
        Value::Ref(r)
    }

    /// Extracts the integer payload. Panics (verifier-caught bug) if `self`
    /// is not `Int`.
    pub fn int_of(self) -> i32 {
        match self {
            Value::Int(i) => i,
            other => panic!("expected Int value, found {other:?}"),
        }
    }

    /// Extracts the reference payload. Panics (verifier-caught bug) if
    /// `self` is not `Ref`.
    pub fn ref_of(self) -> Ref {
        match self {
            Value::Ref(r) => r,
            other => panic!("expected Ref value, found {other:?}"),
        }
    }

    /// Structural equality: both `Int` with equal bit patterns, or both
    /// `Ref` referring to the same address. Mixed-variant equality is
    /// false.
    pub fn values_eq(a: Value, b: Value) -> bool {
        match (a, b) {
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Ref(x), Value::Ref(y)) => x == y,
            _ => false,
        }
    }
}
