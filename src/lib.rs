//! A stack-based bytecode virtual machine core for a small safe imperative
//! language: value discipline, operand and call stacks, a heap allocator,
//! and a fetch-decode-execute dispatch loop over a fixed opcode set.
//!
//! Loading bytecode from a file, the native function table's concrete
//! implementations, and the process entry point are all out of scope for
//! this crate; see the `c0vm-cli` binary for a runnable host.

pub mod definitions;
pub mod error;
pub mod heap;
pub mod image;
pub mod opcode;
pub mod stack;
pub mod value;
mod vm;

pub use error::Trap;
pub use heap::Ref;
pub use image::{FunctionInfo, NativeInfo, NativeTable, ProgramImage};
pub use value::Value;
pub use vm::execute;
