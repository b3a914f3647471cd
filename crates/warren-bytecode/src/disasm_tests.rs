//! Tests for the disassembler and the dump renderer.

use warren_core::Colors;

use super::asm::Assembler;
use super::disasm::Disassembler;
use super::dump::render;
use super::isa::RegId;

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn listing_covers_every_layout() {
    let mut asm = Assembler::new();
    asm.loadi(RegId::A0, 5);
    asm.load(RegId::A1, RegId::A0);
    asm.store(RegId::A0, RegId::A1);
    asm.add(RegId::A2, RegId::A0, RegId::A1);
    asm.cmp(RegId::A2, RegId::A0);
    asm.push(RegId::A2);
    asm.syscall(1);

    let disasm = Disassembler::load(&asm.finish()).unwrap();
    let instrs = disasm.instructions();
    assert_eq!(instrs.len(), 7);

    assert_eq!(instrs[0].mnemonic, "LOADI");
    assert_eq!(instrs[0].args, args(&["A0", "0x0005"]));
    assert_eq!(instrs[1].mnemonic, "LOAD");
    assert_eq!(instrs[1].args, args(&["A1", "[A0]"]));
    assert_eq!(instrs[2].mnemonic, "STORE");
    assert_eq!(instrs[2].args, args(&["[A0]", "A1"]));
    assert_eq!(instrs[3].mnemonic, "ADD");
    assert_eq!(instrs[3].args, args(&["A2", "A0", "A1"]));
    assert_eq!(instrs[4].mnemonic, "CMP");
    assert_eq!(instrs[4].args, args(&["A2", "A0"]));
    assert_eq!(instrs[5].mnemonic, "PUSH");
    assert_eq!(instrs[5].args, args(&["A2"]));
    assert_eq!(instrs[6].mnemonic, "SYSCALL");
    assert_eq!(instrs[6].args, args(&["0x0001"]));
}

#[test]
fn offsets_advance_by_instruction_size() {
    let mut asm = Assembler::new();
    asm.loadi(RegId::A0, 5); // 4 bytes
    asm.push(RegId::A0); // 2 bytes
    asm.syscall(0); // 3 bytes

    let disasm = Disassembler::load(&asm.finish()).unwrap();
    let offsets: Vec<u16> = disasm.instructions().iter().map(|i| i.offset).collect();
    assert_eq!(offsets, vec![0, 4, 6]);
}

#[test]
fn jump_targets_become_labels() {
    let mut asm = Assembler::new();
    asm.set_label("top");
    asm.loadi(RegId::A0, 1);
    asm.jle("end");
    asm.jmp("top");
    asm.set_label("end");
    asm.syscall(1);

    let disasm = Disassembler::load(&asm.finish()).unwrap();
    let labels: Vec<u16> = disasm.labels().iter().copied().collect();
    assert_eq!(labels, vec![0x0000, 0x000A]);

    let jle = &disasm.instructions()[1];
    assert_eq!(jle.mnemonic, "JLE");
    assert_eq!(jle.args, args(&["_000A"]));
}

#[test]
fn unknown_opcode_renders_bare() {
    let disasm = Disassembler::load_parts(vec![], vec![0xEE, 0x19, 0x03]);
    let instrs = disasm.instructions();
    assert_eq!(instrs.len(), 2);
    assert_eq!(instrs[0].mnemonic, "OP_EE");
    assert!(instrs[0].args.is_empty());
    assert_eq!(instrs[1].mnemonic, "PUSH");
}

#[test]
fn truncated_operands_stop_the_walk() {
    // LOADI needs reg + u16 but only one byte follows
    let disasm = Disassembler::load_parts(vec![], vec![0x19, 0x03, 0x00, 0x03]);
    let instrs = disasm.instructions();
    assert_eq!(instrs.len(), 1);
    assert_eq!(instrs[0].mnemonic, "PUSH");
}

#[test]
fn out_of_range_register_renders_raw() {
    let disasm = Disassembler::load_parts(vec![], vec![0x19, 0x20]);
    assert_eq!(disasm.instructions()[0].args, args(&["R32"]));
}

#[test]
fn dump_shows_constants_and_labeled_code() {
    let mut asm = Assembler::new();
    asm.set_const("Hi");
    asm.set_label("top");
    asm.loadi(RegId::A0, 5);
    asm.jmp("top");

    let disasm = Disassembler::load(&asm.finish()).unwrap();
    let out = render(&disasm, Colors::OFF);

    assert!(out.contains("  CONSTANTS"));
    assert!(out.contains("  SIZE: 0x0004"));
    assert!(out.contains("  CODE"));
    assert!(out.contains("  SIZE: 0x0007"));
    // Constants grid glosses the printable bytes
    assert!(out.contains("Hi"));
    // Jump target gets a margin label, fallthrough lines do not
    assert!(out.contains("_0000: LOADI A0, 0x0005"));
    assert!(out.contains("       JMP _0000"));
}

#[test]
fn dump_of_empty_module_is_just_banners() {
    let disasm = Disassembler::load_parts(vec![], vec![]);
    let out = render(&disasm, Colors::OFF);
    assert!(out.contains("  CONSTANTS"));
    assert!(out.contains("  CODE"));
    assert!(!out.contains("LOADI"));
}
