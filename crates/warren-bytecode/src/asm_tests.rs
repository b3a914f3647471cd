//! Tests for the assembler.

use super::asm::{Assembler, UNRESOLVED};
use super::isa::RegId;
use super::module::Module;

fn code_of(asm: Assembler) -> Vec<u8> {
    Module::load(&asm.finish()).unwrap().code
}

#[test]
fn reg_imm_encoding() {
    let mut asm = Assembler::new();
    asm.loadi(RegId::A0, 0x1234);
    asm.storei(RegId::A1, 0x0008);
    assert_eq!(code_of(asm), vec![0x00, 3, 0x34, 0x12, 0x02, 4, 0x08, 0x00]);
}

#[test]
fn reg_reg_encoding() {
    let mut asm = Assembler::new();
    asm.load(RegId::A0, RegId::A1);
    asm.store(RegId::A2, RegId::A3);
    asm.mov(RegId::A4, RegId::A5);
    asm.cmp(RegId::A0, RegId::A1);
    asm.cmpf(RegId::A0, RegId::A1);
    assert_eq!(
        code_of(asm),
        vec![0x01, 3, 4, 0x03, 5, 6, 0x04, 7, 8, 0x10, 3, 4, 0x11, 3, 4]
    );
}

#[test]
fn three_reg_encoding() {
    let mut asm = Assembler::new();
    asm.add(RegId::A2, RegId::A0, RegId::A1);
    asm.divf(RegId::A5, RegId::A3, RegId::A4);
    assert_eq!(code_of(asm), vec![0x05, 5, 3, 4, 0x0C, 8, 6, 7]);
}

#[test]
fn stack_and_syscall_encoding() {
    let mut asm = Assembler::new();
    asm.push(RegId::A0);
    asm.pop(RegId::A1);
    asm.syscall(0x0102);
    assert_eq!(code_of(asm), vec![0x19, 3, 0x1A, 4, 0x1B, 0x02, 0x01]);
}

#[test]
fn backward_jump_resolves_immediately() {
    let mut asm = Assembler::new();
    asm.set_label("top");
    asm.loadi(RegId::A0, 1);
    asm.jmp("top");
    assert_eq!(code_of(asm), vec![0x00, 3, 0x01, 0x00, 0x12, 0x00, 0x00]);
}

#[test]
fn forward_jump_is_patched_at_definition() {
    let mut asm = Assembler::new();
    asm.je("done");
    asm.loadi(RegId::A0, 1);
    asm.set_label("done");
    asm.syscall(1);

    let code = code_of(asm);
    // JE operand patched to 0x0007, the offset right after LOADI
    assert_eq!(code[1..3], [0x07, 0x00]);
}

#[test]
fn multiple_forward_references_all_patched() {
    let mut asm = Assembler::new();
    asm.jl("out");
    asm.jg("out");
    asm.set_label("out");

    let code = code_of(asm);
    assert_eq!(code[1..3], [0x06, 0x00]);
    assert_eq!(code[4..6], [0x06, 0x00]);
}

#[test]
fn undefined_label_keeps_sentinel() {
    let mut asm = Assembler::new();
    asm.jmp("nowhere");

    let code = code_of(asm);
    assert_eq!(u16::from_le_bytes([code[1], code[2]]), UNRESOLVED);
}

#[test]
fn const_even_length() {
    let mut asm = Assembler::new();
    asm.set_const("Hi");

    let module = Module::load(&asm.finish()).unwrap();
    // Word count 1, then 'H' 'i' packed little-endian
    assert_eq!(module.constants, vec![0x0001, u16::from_le_bytes([b'H', b'i'])]);
}

#[test]
fn const_odd_length_is_padded() {
    let mut asm = Assembler::new();
    asm.set_const("abc");

    let module = Module::load(&asm.finish()).unwrap();
    assert_eq!(
        module.constants,
        vec![
            0x0002,
            u16::from_le_bytes([b'a', b'b']),
            u16::from_le_bytes([b'c', 0]),
        ]
    );
}

#[test]
fn finish_emits_const_then_code() {
    let mut asm = Assembler::new();
    asm.set_const("Hi");
    asm.push(RegId::A0);

    let bytes = asm.finish();
    assert_eq!(bytes[0], super::module::SECTION_CONST);
    assert_eq!(bytes[1..3], [0x04, 0x00]);
    assert_eq!(bytes[7], super::module::SECTION_CODE);
    assert_eq!(bytes[8..10], [0x02, 0x00]);
}

#[test]
fn empty_assembler_finishes_to_empty_sections() {
    let bytes = Assembler::new().finish();
    let module = Module::load(&bytes).unwrap();
    assert!(module.constants.is_empty());
    assert!(module.code.is_empty());
}
