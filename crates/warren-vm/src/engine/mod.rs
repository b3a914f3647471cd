//! Engine internals: VM state, dispatch errors, execution units, syscalls.

pub mod error;
pub mod syscall;
pub mod units;
pub mod vm;


pub use error::VmError;
pub use syscall::{SyscallCtx, SyscallFactory, SyscallSignal, SyscallTask};
pub use units::{Alu, Fpu, OpHandler, OpTable, Unit};
pub use vm::{Step, Vm};
