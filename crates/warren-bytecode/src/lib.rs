//! Instruction set and binary module format for the Warren VM.
//!
//! This crate contains:
//! - ISA definitions (`Opcode`, `RegId`) with the fixed per-opcode operand layout
//! - The section-tagged binary module container (`Module`)
//! - The `Assembler` that emits modules and resolves labels
//! - The `Disassembler` and its listing renderer

pub mod asm;
pub mod disasm;
pub mod dump;
pub mod isa;
pub mod module;

#[cfg(test)]
mod asm_tests;
#[cfg(test)]
mod disasm_tests;
#[cfg(test)]
mod isa_tests;
#[cfg(test)]
mod module_tests;

// Re-export commonly used items at crate root
pub use asm::Assembler;
pub use disasm::{Disassembler, Instruction};
pub use dump::render;
pub use isa::{Opcode, RegId};
pub use module::{Module, ModuleError, SECTION_CODE, SECTION_CONST};
