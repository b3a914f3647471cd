//! Execution engine for the Warren VM.
//!
//! The engine owns the register file, linear memory, constants and the
//! opcode dispatch table, and advances strictly one instruction per
//! [`Vm::step_run`] call. Instruction semantics live in pluggable execution
//! units ([`Alu`], [`Fpu`]); host functions join in through the cooperative
//! syscall protocol and may span multiple steps.

pub mod engine;

pub use engine::error::VmError;
pub use engine::syscall::{SyscallCtx, SyscallFactory, SyscallSignal, SyscallTask};
pub use engine::units::{Alu, Fpu, OpHandler, OpTable, Unit};
pub use engine::vm::{FLAG_SIGN, FLAG_SYSCALL, FLAG_ZERO, Step, Vm};
