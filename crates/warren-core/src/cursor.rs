//! Bounds-checked access to byte and word buffers.
//!
//! Instruction operands, module sections and VM memory are all read through
//! these primitives, so an out-of-range access surfaces as an error value
//! instead of a panic. `Cursor` carries an explicit advancing offset; the
//! free functions read fixed ranges at an absolute index.

/// Out-of-range access to a byte or word buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("index out of range: got {index}, expected [0, {len})")]
pub struct CursorError {
    /// Offending index (start of the requested read).
    pub index: usize,
    /// Length of the buffer the read was attempted on.
    pub len: usize,
}

/// Sequential reader over a byte buffer with an explicit position.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Cursor at an arbitrary offset into `buf`.
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    /// Current offset into the buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// True when the position has reached the end of the buffer.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        let byte = *self.buf.get(self.pos).ok_or(CursorError {
            index: self.pos,
            len: self.buf.len(),
        })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a little-endian 16-bit value.
    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Read `len` raw bytes, advancing past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        let bytes = range_u8(self.buf, self.pos, len)?;
        self.pos += len;
        Ok(bytes)
    }
}

/// A `len`-byte slice of `buf` starting at `index`.
pub fn range_u8(buf: &[u8], index: usize, len: usize) -> Result<&[u8], CursorError> {
    let end = index.checked_add(len).filter(|end| *end <= buf.len());
    match end {
        Some(end) => Ok(&buf[index..end]),
        None => Err(CursorError {
            index,
            len: buf.len(),
        }),
    }
}

/// A `len`-word slice of `buf` starting at `index`.
pub fn range_u16(buf: &[u16], index: usize, len: usize) -> Result<&[u16], CursorError> {
    let end = index.checked_add(len).filter(|end| *end <= buf.len());
    match end {
        Some(end) => Ok(&buf[index..end]),
        None => Err(CursorError {
            index,
            len: buf.len(),
        }),
    }
}

/// Pack bytes into little-endian 16-bit words, zero-padding an odd tail.
pub fn words_from_bytes(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| u16::from_le_bytes([pair[0], *pair.get(1).unwrap_or(&0)]))
        .collect()
}

/// Unpack little-endian 16-bit words back into bytes.
pub fn bytes_from_words(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}
