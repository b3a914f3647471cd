//! Best-effort disassembler for binary modules.
//!
//! Walks the code section once, decoding each instruction via its opcode's
//! operand layout. Unknown opcode bytes become an `OP_xx` line and the walk
//! continues at the next byte; a truncated operand sequence ends the walk at
//! the last complete instruction. Jump targets are collected so the renderer
//! can attach `_XXXX` labels to the listing.

use std::collections::BTreeSet;

use warren_core::Cursor;

use crate::isa::{Layout, Opcode, RegId};
use crate::module::{Module, ModuleError};

/// One decoded instruction, positioned at `offset` in the code section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub offset: u16,
    pub mnemonic: String,
    pub args: Vec<String>,
}

/// Holds a decoded module together with its instruction listing.
#[derive(Debug, Clone)]
pub struct Disassembler {
    module: Module,
    instructions: Vec<Instruction>,
    labels: BTreeSet<u16>,
}

impl Disassembler {
    /// Decode a binary module and disassemble its code section.
    pub fn load(bytes: &[u8]) -> Result<Disassembler, ModuleError> {
        Ok(Self::from_module(Module::load(bytes)?))
    }

    /// Disassemble from an already-split constants pool and code stream.
    pub fn load_parts(constants: Vec<u16>, code: Vec<u8>) -> Disassembler {
        Self::from_module(Module { constants, code })
    }

    fn from_module(module: Module) -> Disassembler {
        let (instructions, labels) = disassemble(&module.code);
        Disassembler { module, instructions, labels }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Code offsets targeted by at least one jump, in ascending order.
    pub fn labels(&self) -> &BTreeSet<u16> {
        &self.labels
    }

    pub fn constants(&self) -> &[u16] {
        &self.module.constants
    }

    pub fn code(&self) -> &[u8] {
        &self.module.code
    }
}

fn disassemble(code: &[u8]) -> (Vec<Instruction>, BTreeSet<u16>) {
    let mut instructions = Vec::new();
    let mut labels = BTreeSet::new();
    let mut cur = Cursor::new(code);

    while !cur.is_at_end() {
        let offset = cur.pos() as u16;
        let byte = match cur.read_u8() {
            Ok(byte) => byte,
            Err(_) => break,
        };

        let Some(op) = Opcode::from_byte(byte) else {
            instructions.push(Instruction {
                offset,
                mnemonic: format!("OP_{byte:02X}"),
                args: Vec::new(),
            });
            continue;
        };

        let Ok(args) = decode_args(&mut cur, op, &mut labels) else {
            break;
        };
        instructions.push(Instruction {
            offset,
            mnemonic: op.mnemonic().to_string(),
            args,
        });
    }

    (instructions, labels)
}

fn decode_args(
    cur: &mut Cursor<'_>,
    op: Opcode,
    labels: &mut BTreeSet<u16>,
) -> Result<Vec<String>, warren_core::CursorError> {
    let args = match op.layout() {
        Layout::RegImm => {
            let reg = reg_name(cur.read_u8()?);
            let imm = cur.read_u16()?;
            vec![reg, format!("{imm:#06x}")]
        }
        Layout::RegPtr => {
            let reg = reg_name(cur.read_u8()?);
            let ptr = reg_name(cur.read_u8()?);
            vec![reg, format!("[{ptr}]")]
        }
        Layout::PtrReg => {
            let ptr = reg_name(cur.read_u8()?);
            let reg = reg_name(cur.read_u8()?);
            vec![format!("[{ptr}]"), reg]
        }
        Layout::RegReg => {
            let a = reg_name(cur.read_u8()?);
            let b = reg_name(cur.read_u8()?);
            vec![a, b]
        }
        Layout::RegRegReg => {
            let a = reg_name(cur.read_u8()?);
            let b = reg_name(cur.read_u8()?);
            let c = reg_name(cur.read_u8()?);
            vec![a, b, c]
        }
        Layout::Reg => {
            vec![reg_name(cur.read_u8()?)]
        }
        Layout::Addr => {
            let addr = cur.read_u16()?;
            labels.insert(addr);
            vec![format!("_{addr:04X}")]
        }
        Layout::Imm => {
            let imm = cur.read_u16()?;
            vec![format!("{imm:#06x}")]
        }
    };
    Ok(args)
}

fn reg_name(byte: u8) -> String {
    match RegId::from_byte(byte) {
        Some(reg) => reg.name().to_string(),
        None => format!("R{byte}"),
    }
}
