//! Section-tagged binary module container.
//!
//! Layout: `section := tag(u8) size(u16 LE) payload(size bytes)`, repeated
//! until the buffer is exhausted. Producers emit the constants section then
//! the code section; decoders dispatch purely on tag and accept either order.

use warren_core::{Cursor, CursorError, words_from_bytes};

/// Section tag for the constants pool payload.
pub const SECTION_CONST: u8 = 0x00;
/// Section tag for the code payload.
pub const SECTION_CODE: u8 = 0x01;

/// A module failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("unknown section tag: {0:#04x}")]
    UnknownTag(u8),

    /// A section header or payload ran past the end of the buffer.
    #[error("truncated section: {0}")]
    Truncated(#[from] CursorError),
}

/// A decoded module: constants pool plus raw instruction stream.
///
/// The constants payload is reinterpreted as 16-bit words at load time; the
/// code payload stays as raw bytes and is decoded instruction by instruction
/// during execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub constants: Vec<u16>,
    pub code: Vec<u8>,
}

impl Module {
    /// Decode a module from its binary form.
    ///
    /// Sections may appear in any order; a repeated tag overwrites the
    /// earlier payload. Unknown tags and truncated payloads are fatal.
    pub fn load(bytes: &[u8]) -> Result<Module, ModuleError> {
        let mut module = Module::default();
        let mut cur = Cursor::new(bytes);

        while !cur.is_at_end() {
            let tag = cur.read_u8()?;
            let size = cur.read_u16()? as usize;
            let payload = cur.read_bytes(size)?;
            match tag {
                SECTION_CONST => module.constants = words_from_bytes(payload),
                SECTION_CODE => module.code = payload.to_vec(),
                _ => return Err(ModuleError::UnknownTag(tag)),
            }
        }

        Ok(module)
    }

    /// Encode back to binary form: constants section, then code section.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.push(SECTION_CONST);
        let const_len = (self.constants.len() * 2) as u16;
        bytes.extend_from_slice(&const_len.to_le_bytes());
        for word in &self.constants {
            bytes.extend_from_slice(&word.to_le_bytes());
        }

        bytes.push(SECTION_CODE);
        bytes.extend_from_slice(&(self.code.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&self.code);

        bytes
    }
}
