//! The trap taxonomy: five terminal, non-recoverable failure kinds.
use thiserror::Error;

use crate::definitions::exit_code;

/// Arithmetic errors: division/remainder by zero, `INT_MIN / -1` overflow,
/// and out-of-range shift amounts.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArithError {
    #[error("divide by zero")]
    DivideByZero,
    #[error("division overflow (INT_MIN / -1)")]
    Overflow,
    #[error("shift amount {0} outside [0, 32)")]
    ShiftOutOfRange(i32),
}

/// Memory errors: null dereference, negative array allocation size, and
/// array index out of bounds.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum HeapError {
    #[error("null pointer dereference")]
    NullDereference,
    #[error("negative array allocation size {0}")]
    NegativeArraySize(i32),
    #[error("array index {index} out of bounds for array of length {count}")]
    IndexOutOfBounds { index: i32, count: i32 },
}

/// Invalid bytecode: an unrecognized or reserved opcode byte, or a program
/// counter that runs past the end of the active code array.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpcodeError {
    #[error("invalid opcode 0x{0:02x}")]
    Unknown(u8),
    #[error("unimplemented reserved opcode 0x{0:02x}")]
    Reserved(u8),
    #[error("program counter {pc} runs past end of code (len {len})")]
    Truncated { pc: usize, len: usize },
}

/// The five terminal trap kinds a running machine can raise. Every variant
/// is fatal: there is no handler inside the VM, only a host-visible exit.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Trap {
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithError),
    #[error("memory error: {0}")]
    Memory(#[from] HeapError),
    #[error("assertion failure: {0}")]
    Assertion(String),
    #[error("user error: {0}")]
    User(String),
    #[error("invalid bytecode: {0}")]
    InvalidBytecode(#[from] OpcodeError),
}

impl Trap {
    /// The process exit code a host should surface for this trap.
    pub fn exit_code(&self) -> i32 {
        match self {
            Trap::Arithmetic(_) => exit_code::ARITHMETIC,
            Trap::Memory(_) => exit_code::MEMORY,
            Trap::Assertion(_) => exit_code::ASSERTION,
            Trap::User(_) => exit_code::USER,
            Trap::InvalidBytecode(_) => exit_code::INVALID_BYTECODE,
        }
    }
}
