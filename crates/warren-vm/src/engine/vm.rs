//! VM state and the step loop.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use warren_bytecode::{Module, Opcode, RegId};
use warren_core::{Cursor, CursorError, range_u16};

use super::error::VmError;
use super::syscall::{SyscallCtx, SyscallFactory, SyscallSignal, SyscallTask};
use super::units::{OpHandler, OpTable, Unit};

/// Compare result: last result was zero.
pub const FLAG_ZERO: u8 = 0b0000_0001;
/// Compare result: last result was negative.
pub const FLAG_SIGN: u8 = 0b0000_0010;
/// A syscall generator is in progress; the step loop resumes it before
/// fetching any instruction.
pub const FLAG_SYSCALL: u8 = 0b0001_0000;

/// Outcome of one successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An instruction or syscall unit ran; more may follow.
    Continue,
    /// The instruction pointer is past the end of code. Stepping again
    /// reports `Halt` again.
    Halt,
}

/// The execution engine.
///
/// Owns all machine state. Instruction semantics come from handlers
/// registered by execution units; the engine itself only implements fetch,
/// dispatch and the syscall state machine (plus the SYSCALL opcode, which
/// needs access to the registration table).
pub struct Vm {
    registers: [u16; RegId::COUNT],
    memory: Vec<u16>,
    constants: Vec<u16>,
    code: Vec<u8>,
    flags: u8,
    ops: OpTable,
    syscalls: HashMap<u16, SyscallFactory>,
    active_syscall: Option<SyscallTask>,
    pending_error: Option<String>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// An engine with no module loaded. The SYSCALL opcode is pre-wired;
    /// everything else comes from [`Vm::register_unit`].
    pub fn new() -> Vm {
        let mut ops = OpTable::new();
        ops.insert(Opcode::Syscall.as_byte(), op_syscall as OpHandler);
        Vm {
            registers: [0; RegId::COUNT],
            memory: Vec::new(),
            constants: Vec::new(),
            code: Vec::new(),
            flags: 0,
            ops,
            syscalls: HashMap::new(),
            active_syscall: None,
            pending_error: None,
        }
    }

    /// Load a binary module and reset machine state.
    ///
    /// Zeroes the registers and flags, allocates `memory_size` words, and
    /// points `Sp` and `Fp` at the top of memory. Registered handlers and
    /// syscalls survive re-initialization.
    pub fn init(&mut self, bytes: &[u8], memory_size: u16) -> Result<(), VmError> {
        let module = Module::load(bytes)?;
        self.constants = module.constants;
        self.code = module.code;
        self.memory = vec![0; memory_size as usize];
        self.registers = [0; RegId::COUNT];
        self.flags = 0;
        self.active_syscall = None;
        self.pending_error = None;

        let top = memory_size.saturating_sub(1);
        self.set_reg(RegId::Sp, top);
        self.set_reg(RegId::Fp, top);
        Ok(())
    }

    /// Advance the machine by one unit of work.
    ///
    /// Priority order: resume an in-progress syscall; surface a recorded
    /// error; otherwise fetch and dispatch one instruction. An instruction
    /// pointer past the end of code is the program's halt condition, not a
    /// fault.
    pub fn step_run(&mut self) -> Result<Step, VmError> {
        if self.flag(FLAG_SYSCALL) {
            return self.resume_syscall();
        }

        if let Some(message) = self.pending_error.take() {
            return Err(VmError::Syscall(message));
        }

        let ip = self.reg(RegId::Ip) as usize;
        let Some(&opcode) = self.code.get(ip) else {
            return Ok(Step::Halt);
        };
        // Ip points at the first operand byte while the handler runs
        self.set_reg(RegId::Ip, (ip + 1) as u16);

        let handler = *self
            .ops
            .get(&opcode)
            .ok_or(VmError::UnknownOpcode(opcode))?;
        handler(self)?;
        Ok(Step::Continue)
    }

    fn resume_syscall(&mut self) -> Result<Step, VmError> {
        let Some(mut task) = self.active_syscall.take() else {
            self.set_flag(FLAG_SYSCALL, false);
            return Ok(Step::Continue);
        };

        match task(&mut SyscallCtx::new(self)) {
            SyscallSignal::Continue => {
                self.active_syscall = Some(task);
                Ok(Step::Continue)
            }
            SyscallSignal::End => {
                self.set_flag(FLAG_SYSCALL, false);
                Ok(Step::Continue)
            }
            SyscallSignal::Error => {
                self.set_flag(FLAG_SYSCALL, false);
                let message = self
                    .pending_error
                    .take()
                    .unwrap_or_else(|| "unspecified error".to_string());
                Err(VmError::Syscall(message))
            }
        }
    }

    /// Bind `handler` to an opcode. Each opcode takes exactly one handler.
    pub fn register_op(&mut self, opcode: Opcode, handler: OpHandler) -> Result<(), VmError> {
        match self.ops.entry(opcode.as_byte()) {
            Entry::Occupied(_) => Err(VmError::DuplicateOpcode(opcode.as_byte())),
            Entry::Vacant(slot) => {
                slot.insert(handler);
                Ok(())
            }
        }
    }

    /// Let `unit` register every opcode it implements.
    pub fn register_unit(&mut self, unit: &dyn Unit) -> Result<(), VmError> {
        unit.register(self)
    }

    /// Bind a host function factory to a syscall id.
    pub fn register_syscall(&mut self, id: u16, factory: SyscallFactory) -> Result<(), VmError> {
        match self.syscalls.entry(id) {
            Entry::Occupied(_) => Err(VmError::DuplicateSyscall(id)),
            Entry::Vacant(slot) => {
                slot.insert(factory);
                Ok(())
            }
        }
    }

    pub fn reg(&self, id: RegId) -> u16 {
        self.registers[id.as_byte() as usize]
    }

    pub fn set_reg(&mut self, id: RegId, value: u16) {
        self.registers[id.as_byte() as usize] = value;
    }

    /// Read a register by its wire encoding; out-of-range ids fail.
    pub fn reg_raw(&self, byte: u8) -> Result<u16, VmError> {
        let id = RegId::from_byte(byte).ok_or(VmError::InvalidRegister(byte))?;
        Ok(self.reg(id))
    }

    /// Write a register by its wire encoding; out-of-range ids fail.
    pub fn set_reg_raw(&mut self, byte: u8, value: u16) -> Result<(), VmError> {
        let id = RegId::from_byte(byte).ok_or(VmError::InvalidRegister(byte))?;
        self.set_reg(id, value);
        Ok(())
    }

    pub fn mem(&self, addr: u16) -> Result<u16, VmError> {
        Ok(range_u16(&self.memory, addr as usize, 1)?[0])
    }

    pub fn set_mem(&mut self, addr: u16, value: u16) -> Result<(), VmError> {
        let len = self.memory.len();
        let slot = self
            .memory
            .get_mut(addr as usize)
            .ok_or(CursorError { index: addr as usize, len })?;
        *slot = value;
        Ok(())
    }

    pub fn mem_range(&self, addr: u16, len: usize) -> Result<&[u16], VmError> {
        Ok(range_u16(&self.memory, addr as usize, len)?)
    }

    pub fn constant(&self, index: usize) -> Result<u16, VmError> {
        Ok(range_u16(&self.constants, index, 1)?[0])
    }

    pub fn const_range(&self, index: usize, len: usize) -> Result<&[u16], VmError> {
        Ok(range_u16(&self.constants, index, len)?)
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Instruction pointer as a code-buffer offset.
    pub fn ip(&self) -> usize {
        self.reg(RegId::Ip) as usize
    }

    pub fn flag(&self, mask: u8) -> bool {
        self.flags & mask != 0
    }

    pub fn set_flag(&mut self, mask: u8, on: bool) {
        if on {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
    }

    /// Record an error to surface on a later step.
    pub(crate) fn record_error(&mut self, message: String) {
        self.pending_error = Some(message);
    }
}

/// SYSCALL id: start the host function registered under `id`. The generator
/// itself runs on subsequent steps, not within this one.
fn op_syscall(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let id = cur.read_u16()?;
    let end = cur.pos() as u16;

    let factory = vm.syscalls.get(&id).ok_or(VmError::UnknownSyscall(id))?;
    vm.active_syscall = Some(factory());
    vm.set_flag(FLAG_SYSCALL, true);
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

impl fmt::Display for Vm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in 0..RegId::COUNT as u8 {
            let id = RegId::from_byte(byte).ok_or(fmt::Error)?;
            if byte > 0 {
                f.write_str(if byte % 4 == 0 { "\n" } else { "  " })?;
            }
            write!(f, "{:>3}={:#06x}", id.name(), self.reg(id))?;
        }
        writeln!(
            f,
            "\nflags: zero={} sign={} syscall={}",
            self.flag(FLAG_ZERO) as u8,
            self.flag(FLAG_SIGN) as u8,
            self.flag(FLAG_SYSCALL) as u8,
        )?;
        write!(
            f,
            "memory: {} words  constants: {} words  code: {} bytes",
            self.memory.len(),
            self.constants.len(),
            self.code.len(),
        )
    }
}
