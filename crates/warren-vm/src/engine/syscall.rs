//! Cooperative syscall protocol.
//!
//! A syscall is a resumable host function: the engine calls it once per step
//! and it yields a signal at each suspension point. The function sees the
//! machine only through [`SyscallCtx`], a narrow accessor scoped to the
//! frame convention: the caller pushes its arguments before issuing
//! SYSCALL, the handler establishes a frame, reads arguments relative to
//! `Fp`, writes its result to `A0`, and tears the frame down before
//! finishing.

use warren_bytecode::RegId;
use warren_core::bytes_from_words;

use super::error::VmError;
use super::vm::Vm;

/// What a syscall generator yields at a suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallSignal {
    /// Not done; resume on the next step.
    Continue,
    /// Done; normal completion.
    End,
    /// Failed; the message recorded via [`SyscallCtx::set_error`] is
    /// propagated as the step's failure.
    Error,
}

/// One in-flight syscall invocation, resumed once per engine step.
pub type SyscallTask = Box<dyn FnMut(&mut SyscallCtx<'_>) -> SyscallSignal>;

/// Produces a fresh task each time its syscall id is invoked.
pub type SyscallFactory = Box<dyn Fn() -> SyscallTask>;

/// Accessor handed to a syscall task, valid for one resumption.
pub struct SyscallCtx<'vm> {
    vm: &'vm mut Vm,
}

impl<'vm> SyscallCtx<'vm> {
    pub(crate) fn new(vm: &'vm mut Vm) -> Self {
        Self { vm }
    }

    /// Read 16-bit argument `n`, addressed relative to the frame pointer.
    pub fn arg_u16(&self, n: u16) -> Result<u16, VmError> {
        self.vm.mem(self.arg_addr(n))
    }

    /// Read argument `n` as a constant-pool string.
    ///
    /// The argument value is an index into the constants pool where a
    /// word-count prefix is followed by the packed UTF-8 bytes. At most one
    /// trailing NUL is stripped: the pad byte the encoder adds to
    /// odd-length text. NULs inside the text pass through.
    pub fn arg_str(&self, n: u16) -> Result<String, VmError> {
        let index = self.arg_u16(n)? as usize;
        let words = self.vm.constant(index)? as usize;
        let packed = self.vm.const_range(index + 1, words)?;
        let mut text = String::from_utf8(bytes_from_words(packed))
            .map_err(|_| VmError::InvalidString)?;
        if text.ends_with('\0') {
            text.pop();
        }
        Ok(text)
    }

    /// Write the syscall's result into `A0`.
    pub fn set_return(&mut self, value: u16) {
        self.vm.set_reg(RegId::A0, value);
    }

    /// Record a failure message. The task should yield
    /// [`SyscallSignal::Error`] afterwards.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.vm.record_error(message.into());
    }

    /// Establish a call frame: push `Fp` at `Sp`, decrement `Sp`, then set
    /// `Fp = Sp`. Must run before any argument read.
    pub fn enter_frame(&mut self) -> Result<(), VmError> {
        let fp = self.vm.reg(RegId::Fp);
        let sp = self.vm.reg(RegId::Sp);
        self.vm.set_mem(sp, fp)?;
        let sp = sp.wrapping_sub(1);
        self.vm.set_reg(RegId::Sp, sp);
        self.vm.set_reg(RegId::Fp, sp);
        Ok(())
    }

    /// Tear the frame down: restore `Sp = Fp`, increment `Sp`, pop the
    /// saved frame pointer back into `Fp`.
    pub fn leave_frame(&mut self) -> Result<(), VmError> {
        let sp = self.vm.reg(RegId::Fp).wrapping_add(1);
        self.vm.set_reg(RegId::Sp, sp);
        let saved = self.vm.mem(sp)?;
        self.vm.set_reg(RegId::Fp, saved);
        Ok(())
    }

    /// Argument `n` lives at `Fp - n + 2`.
    fn arg_addr(&self, n: u16) -> u16 {
        self.vm.reg(RegId::Fp).wrapping_sub(n).wrapping_add(2)
    }
}
