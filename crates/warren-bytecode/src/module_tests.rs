//! Tests for the binary module container.

use super::module::{Module, ModuleError, SECTION_CODE, SECTION_CONST};

fn section(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![tag];
    bytes.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

#[test]
fn load_const_then_code() {
    let mut bytes = section(SECTION_CONST, &[0x34, 0x12, 0xCD, 0xAB]);
    bytes.extend(section(SECTION_CODE, &[0x00, 0x03, 0x05, 0x00]));

    let module = Module::load(&bytes).unwrap();
    assert_eq!(module.constants, vec![0x1234, 0xABCD]);
    assert_eq!(module.code, vec![0x00, 0x03, 0x05, 0x00]);
}

#[test]
fn load_accepts_code_before_const() {
    let mut bytes = section(SECTION_CODE, &[0x1B, 0x01, 0x00]);
    bytes.extend(section(SECTION_CONST, &[0xFF, 0x00]));

    let module = Module::load(&bytes).unwrap();
    assert_eq!(module.constants, vec![0x00FF]);
    assert_eq!(module.code, vec![0x1B, 0x01, 0x00]);
}

#[test]
fn load_empty_buffer_is_empty_module() {
    let module = Module::load(&[]).unwrap();
    assert!(module.constants.is_empty());
    assert!(module.code.is_empty());
}

#[test]
fn repeated_section_overwrites() {
    let mut bytes = section(SECTION_CODE, &[0x01]);
    bytes.extend(section(SECTION_CODE, &[0x02, 0x03]));

    let module = Module::load(&bytes).unwrap();
    assert_eq!(module.code, vec![0x02, 0x03]);
}

#[test]
fn unknown_tag_is_rejected() {
    let bytes = section(0x07, &[0x00]);
    assert_eq!(Module::load(&bytes), Err(ModuleError::UnknownTag(0x07)));
}

#[test]
fn truncated_payload_is_rejected() {
    // Header claims 4 payload bytes, only 2 present
    let bytes = [SECTION_CODE, 0x04, 0x00, 0xAA, 0xBB];
    let err = Module::load(&bytes).unwrap_err();
    assert!(matches!(err, ModuleError::Truncated(_)));
}

#[test]
fn truncated_header_is_rejected() {
    let err = Module::load(&[SECTION_CONST, 0x02]).unwrap_err();
    assert!(matches!(err, ModuleError::Truncated(_)));
}

#[test]
fn to_bytes_round_trips() {
    let module = Module {
        constants: vec![0x0002, 0x6948],
        code: vec![0x00, 0x03, 0x2A, 0x00, 0x1B, 0x01, 0x00],
    };
    let loaded = Module::load(&module.to_bytes()).unwrap();
    assert_eq!(loaded, module);
}

#[test]
fn error_display() {
    let err = ModuleError::UnknownTag(0x09);
    assert_eq!(err.to_string(), "unknown section tag: 0x09");
}
