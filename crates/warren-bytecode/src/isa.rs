//! Instruction set definitions: opcodes, operand layouts and register ids.
//!
//! Every instruction is an opcode byte followed by a fixed operand sequence;
//! `Opcode::layout` is the single source of truth for that sequence, shared
//! by the assembler, the disassembler and the execution units.

use std::fmt;

/// One-byte instruction tag. Discriminants are the wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// LOADI reg(u8) imm(u16): `reg = imm`
    Loadi = 0x00,
    /// LOAD dst(u8) ptr(u8): `dst = memory[reg[ptr]]`
    Load = 0x01,
    /// STOREI reg(u8) imm(u16): `memory[imm] = reg`
    Storei = 0x02,
    /// STORE ptr(u8) src(u8): `memory[reg[ptr]] = reg[src]`
    Store = 0x03,
    /// MOVE dst(u8) src(u8): `dst = src`
    Move = 0x04,
    Add = 0x05,
    Addf = 0x06,
    Sub = 0x07,
    Subf = 0x08,
    Mul = 0x09,
    Mulf = 0x0A,
    Div = 0x0B,
    Divf = 0x0C,
    And = 0x0D,
    Or = 0x0E,
    Xor = 0x0F,
    /// CMP a(u8) b(u8): sets the zero/sign flags from `a - b`
    Cmp = 0x10,
    Cmpf = 0x11,
    Jmp = 0x12,
    Je = 0x13,
    Jne = 0x14,
    Jg = 0x15,
    Jge = 0x16,
    Jl = 0x17,
    Jle = 0x18,
    Push = 0x19,
    Pop = 0x1A,
    /// SYSCALL id(u16): start the host function registered under `id`
    Syscall = 0x1B,
}

/// Fixed operand sequence following an opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// reg(u8) imm(u16)
    RegImm,
    /// Two register ids; second is a memory pointer (`LOAD dst, [ptr]`)
    RegPtr,
    /// Two register ids; first is a memory pointer (`STORE [ptr], src`)
    PtrReg,
    /// Two plain register ids
    RegReg,
    /// Three register ids: dst, src, target
    RegRegReg,
    /// Single register id
    Reg,
    /// 16-bit code address (jump target)
    Addr,
    /// 16-bit immediate (syscall id)
    Imm,
}

impl Opcode {
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        Some(match byte {
            0x00 => Loadi,
            0x01 => Load,
            0x02 => Storei,
            0x03 => Store,
            0x04 => Move,
            0x05 => Add,
            0x06 => Addf,
            0x07 => Sub,
            0x08 => Subf,
            0x09 => Mul,
            0x0A => Mulf,
            0x0B => Div,
            0x0C => Divf,
            0x0D => And,
            0x0E => Or,
            0x0F => Xor,
            0x10 => Cmp,
            0x11 => Cmpf,
            0x12 => Jmp,
            0x13 => Je,
            0x14 => Jne,
            0x15 => Jg,
            0x16 => Jge,
            0x17 => Jl,
            0x18 => Jle,
            0x19 => Push,
            0x1A => Pop,
            0x1B => Syscall,
            _ => return None,
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// The operand sequence this opcode is encoded with.
    pub fn layout(self) -> Layout {
        use Opcode::*;
        match self {
            Loadi | Storei => Layout::RegImm,
            Load => Layout::RegPtr,
            Store => Layout::PtrReg,
            Move | Cmp | Cmpf => Layout::RegReg,
            Add | Addf | Sub | Subf | Mul | Mulf | Div | Divf | And | Or | Xor => Layout::RegRegReg,
            Push | Pop => Layout::Reg,
            Jmp | Je | Jne | Jg | Jge | Jl | Jle => Layout::Addr,
            Syscall => Layout::Imm,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Loadi => "LOADI",
            Load => "LOAD",
            Storei => "STOREI",
            Store => "STORE",
            Move => "MOVE",
            Add => "ADD",
            Addf => "ADDF",
            Sub => "SUB",
            Subf => "SUBF",
            Mul => "MUL",
            Mulf => "MULF",
            Div => "DIV",
            Divf => "DIVF",
            And => "AND",
            Or => "OR",
            Xor => "XOR",
            Cmp => "CMP",
            Cmpf => "CMPF",
            Jmp => "JMP",
            Je => "JE",
            Jne => "JNE",
            Jg => "JG",
            Jge => "JGE",
            Jl => "JL",
            Jle => "JLE",
            Push => "PUSH",
            Pop => "POP",
            Syscall => "SYSCALL",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Register identifier. Discriminants are the wire encoding (closed 0-15 range).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegId {
    /// Instruction pointer
    Ip = 0,
    /// Stack pointer
    Sp = 1,
    /// Frame pointer
    Fp = 2,
    A0 = 3,
    A1 = 4,
    A2 = 5,
    A3 = 6,
    A4 = 7,
    A5 = 8,
    A6 = 9,
    A7 = 10,
    A8 = 11,
    A9 = 12,
    A10 = 13,
    A11 = 14,
    A12 = 15,
}

impl RegId {
    /// Number of registers in the file.
    pub const COUNT: usize = 16;

    pub fn from_byte(byte: u8) -> Option<RegId> {
        use RegId::*;
        Some(match byte {
            0 => Ip,
            1 => Sp,
            2 => Fp,
            3 => A0,
            4 => A1,
            5 => A2,
            6 => A3,
            7 => A4,
            8 => A5,
            9 => A6,
            10 => A7,
            11 => A8,
            12 => A9,
            13 => A10,
            14 => A11,
            15 => A12,
            _ => return None,
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Register name as written in listings (`Ip`, `Sp`, `Fp`, `A0`..`A12`).
    pub fn name(self) -> &'static str {
        use RegId::*;
        match self {
            Ip => "Ip",
            Sp => "Sp",
            Fp => "Fp",
            A0 => "A0",
            A1 => "A1",
            A2 => "A2",
            A3 => "A3",
            A4 => "A4",
            A5 => "A5",
            A6 => "A6",
            A7 => "A7",
            A8 => "A8",
            A9 => "A9",
            A10 => "A10",
            A11 => "A11",
            A12 => "A12",
        }
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
