//! Engine error type.

use warren_bytecode::ModuleError;
use warren_core::CursorError;

/// A step, a load or a registration failed.
///
/// Running past the end of the code buffer is not an error; the step loop
/// reports it as a halt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    /// `init` was handed a malformed module.
    #[error("malformed module: {0}")]
    Module(#[from] ModuleError),

    /// A register, memory, constant or operand access fell out of range.
    #[error(transparent)]
    Bounds(#[from] CursorError),

    #[error("invalid register id: {0}")]
    InvalidRegister(u8),

    #[error("opcode not executable: {0:#04x}")]
    UnknownOpcode(u8),

    #[error("opcode already registered: {0:#04x}")]
    DuplicateOpcode(u8),

    #[error("no syscall registered under id {0}")]
    UnknownSyscall(u16),

    #[error("syscall already registered under id {0}")]
    DuplicateSyscall(u16),

    #[error("integer division by zero")]
    DivideByZero,

    /// A host function signalled failure.
    #[error("syscall failed: {0}")]
    Syscall(String),

    /// A constant-pool string argument held bytes that are not UTF-8.
    #[error("constant is not valid UTF-8")]
    InvalidString,
}
