//! Assembler: builds a binary module from instruction-construction calls.
//!
//! One method per mnemonic appends the fixed encoding to the code buffer.
//! Jump targets are symbolic labels: a jump to a not-yet-defined label emits
//! a `0xFFFF` sentinel and records the operand offset; `set_label` patches
//! every recorded reference when the label is defined. A label that is never
//! defined keeps the sentinel, so jumping to it faults visibly at runtime
//! instead of landing somewhere silently.

use std::collections::HashMap;

use crate::isa::{Opcode, RegId};
use crate::module::{SECTION_CODE, SECTION_CONST};

/// Sentinel address emitted for unresolved label references.
pub const UNRESOLVED: u16 = u16::MAX;

/// Incrementally assembles one module (constants + code).
#[derive(Debug, Default)]
pub struct Assembler {
    code: Vec<u8>,
    constants: Vec<u8>,
    labels: HashMap<String, u16>,
    unresolved: HashMap<String, Vec<u16>>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `label` at the current code offset and patch every forward
    /// reference recorded for it.
    pub fn set_label(&mut self, label: &str) {
        let addr = self.code.len() as u16;
        self.labels.insert(label.to_string(), addr);

        if let Some(sites) = self.unresolved.remove(label) {
            for site in sites {
                self.patch_u16(site, addr);
            }
        }
    }

    /// Append a string literal to the constants pool.
    ///
    /// Encoding: a 16-bit count of the words covering the UTF-8 bytes,
    /// then the bytes themselves, zero-padded to a word boundary.
    pub fn set_const(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let words = bytes.len().div_ceil(2) as u16;
        self.constants.extend_from_slice(&words.to_le_bytes());
        self.constants.extend_from_slice(bytes);
        if bytes.len() % 2 != 0 {
            self.constants.push(0);
        }
    }

    /// Concatenate the tagged sections into the finished module bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.push(SECTION_CONST);
        bytes.extend_from_slice(&(self.constants.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&self.constants);

        bytes.push(SECTION_CODE);
        bytes.extend_from_slice(&(self.code.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&self.code);

        bytes
    }

    pub fn loadi(&mut self, reg: RegId, imm: u16) {
        self.reg_imm(Opcode::Loadi, reg, imm);
    }

    pub fn load(&mut self, dst: RegId, ptr: RegId) {
        self.reg_reg(Opcode::Load, dst, ptr);
    }

    pub fn storei(&mut self, reg: RegId, imm: u16) {
        self.reg_imm(Opcode::Storei, reg, imm);
    }

    pub fn store(&mut self, ptr: RegId, src: RegId) {
        self.reg_reg(Opcode::Store, ptr, src);
    }

    /// MOVE dst, src
    pub fn mov(&mut self, dst: RegId, src: RegId) {
        self.reg_reg(Opcode::Move, dst, src);
    }

    pub fn add(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Add, dst, src, target);
    }

    pub fn addf(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Addf, dst, src, target);
    }

    pub fn sub(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Sub, dst, src, target);
    }

    pub fn subf(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Subf, dst, src, target);
    }

    pub fn mul(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Mul, dst, src, target);
    }

    pub fn mulf(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Mulf, dst, src, target);
    }

    pub fn div(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Div, dst, src, target);
    }

    pub fn divf(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Divf, dst, src, target);
    }

    pub fn and(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::And, dst, src, target);
    }

    pub fn or(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Or, dst, src, target);
    }

    pub fn xor(&mut self, dst: RegId, src: RegId, target: RegId) {
        self.reg_reg_reg(Opcode::Xor, dst, src, target);
    }

    pub fn cmp(&mut self, a: RegId, b: RegId) {
        self.reg_reg(Opcode::Cmp, a, b);
    }

    pub fn cmpf(&mut self, a: RegId, b: RegId) {
        self.reg_reg(Opcode::Cmpf, a, b);
    }

    pub fn push(&mut self, reg: RegId) {
        self.reg(Opcode::Push, reg);
    }

    pub fn pop(&mut self, reg: RegId) {
        self.reg(Opcode::Pop, reg);
    }

    pub fn jmp(&mut self, label: &str) {
        self.jump(Opcode::Jmp, label);
    }

    pub fn je(&mut self, label: &str) {
        self.jump(Opcode::Je, label);
    }

    pub fn jne(&mut self, label: &str) {
        self.jump(Opcode::Jne, label);
    }

    pub fn jg(&mut self, label: &str) {
        self.jump(Opcode::Jg, label);
    }

    pub fn jge(&mut self, label: &str) {
        self.jump(Opcode::Jge, label);
    }

    pub fn jl(&mut self, label: &str) {
        self.jump(Opcode::Jl, label);
    }

    pub fn jle(&mut self, label: &str) {
        self.jump(Opcode::Jle, label);
    }

    pub fn syscall(&mut self, id: u16) {
        self.code.push(Opcode::Syscall.as_byte());
        self.push_u16(id);
    }

    fn reg(&mut self, op: Opcode, reg: RegId) {
        self.code.push(op.as_byte());
        self.code.push(reg.as_byte());
    }

    fn reg_reg(&mut self, op: Opcode, a: RegId, b: RegId) {
        self.code.push(op.as_byte());
        self.code.push(a.as_byte());
        self.code.push(b.as_byte());
    }

    fn reg_reg_reg(&mut self, op: Opcode, a: RegId, b: RegId, c: RegId) {
        self.code.push(op.as_byte());
        self.code.push(a.as_byte());
        self.code.push(b.as_byte());
        self.code.push(c.as_byte());
    }

    fn reg_imm(&mut self, op: Opcode, reg: RegId, imm: u16) {
        self.code.push(op.as_byte());
        self.code.push(reg.as_byte());
        self.push_u16(imm);
    }

    fn jump(&mut self, op: Opcode, label: &str) {
        self.code.push(op.as_byte());
        if let Some(&addr) = self.labels.get(label) {
            self.push_u16(addr);
        } else {
            // Forward reference: record the operand offset for later patching
            let site = self.code.len() as u16;
            self.unresolved.entry(label.to_string()).or_default().push(site);
            self.push_u16(UNRESOLVED);
        }
    }

    fn push_u16(&mut self, value: u16) {
        self.code.extend_from_slice(&value.to_le_bytes());
    }

    fn patch_u16(&mut self, site: u16, value: u16) {
        let bytes = value.to_le_bytes();
        self.code[site as usize] = bytes[0];
        self.code[site as usize + 1] = bytes[1];
    }
}
