//! Core value types and buffer primitives for the Warren VM.
//!
//! This crate contains:
//! - `Half`: the 16-bit floating-point register value type
//! - `Cursor` and range readers: bounds-checked access to byte/word buffers
//! - `Colors`: ANSI palette for CLI output

pub mod colors;
pub mod cursor;
pub mod half;

#[cfg(test)]
mod cursor_tests;

// Re-export commonly used items at crate root
pub use colors::Colors;
pub use cursor::{Cursor, CursorError, bytes_from_words, range_u16, range_u8, words_from_bytes};
pub use half::Half;
