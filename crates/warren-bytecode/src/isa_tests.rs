//! Tests for opcode and register encodings.

use super::isa::{Layout, Opcode, RegId};

#[test]
fn opcode_bytes_round_trip() {
    for byte in 0x00..=0x1B {
        let op = Opcode::from_byte(byte).unwrap();
        assert_eq!(op.as_byte(), byte);
    }
}

#[test]
fn bytes_past_the_table_are_unknown() {
    assert_eq!(Opcode::from_byte(0x1C), None);
    assert_eq!(Opcode::from_byte(0xFF), None);
}

#[test]
fn layouts_match_operand_shapes() {
    assert_eq!(Opcode::Loadi.layout(), Layout::RegImm);
    assert_eq!(Opcode::Storei.layout(), Layout::RegImm);
    assert_eq!(Opcode::Load.layout(), Layout::RegPtr);
    assert_eq!(Opcode::Store.layout(), Layout::PtrReg);
    assert_eq!(Opcode::Move.layout(), Layout::RegReg);
    assert_eq!(Opcode::Cmpf.layout(), Layout::RegReg);
    assert_eq!(Opcode::Add.layout(), Layout::RegRegReg);
    assert_eq!(Opcode::Xor.layout(), Layout::RegRegReg);
    assert_eq!(Opcode::Push.layout(), Layout::Reg);
    assert_eq!(Opcode::Jle.layout(), Layout::Addr);
    assert_eq!(Opcode::Syscall.layout(), Layout::Imm);
}

#[test]
fn mnemonics() {
    assert_eq!(Opcode::Loadi.to_string(), "LOADI");
    assert_eq!(Opcode::Addf.to_string(), "ADDF");
    assert_eq!(Opcode::Syscall.to_string(), "SYSCALL");
}

#[test]
fn register_bytes_round_trip() {
    for byte in 0..RegId::COUNT as u8 {
        let reg = RegId::from_byte(byte).unwrap();
        assert_eq!(reg.as_byte(), byte);
    }
    assert_eq!(RegId::from_byte(16), None);
}

#[test]
fn register_names() {
    assert_eq!(RegId::Ip.name(), "Ip");
    assert_eq!(RegId::Sp.name(), "Sp");
    assert_eq!(RegId::Fp.name(), "Fp");
    assert_eq!(RegId::A0.name(), "A0");
    assert_eq!(RegId::A12.name(), "A12");
}
