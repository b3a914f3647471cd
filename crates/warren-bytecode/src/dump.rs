//! Human-readable module dump: constants as a hex grid, code as a listing.

use std::fmt::Write as _;

use warren_core::{Colors, bytes_from_words};

use crate::disasm::Disassembler;

const BANNER_WIDTH: usize = 64;
const BYTES_PER_ROW: usize = 16;

/// Render a disassembled module as a dump: a banner-framed constants section
/// (hex grid with a character gloss) followed by the code listing with jump
/// target labels in the left margin.
pub fn render(disasm: &Disassembler, colors: Colors) -> String {
    let mut out = String::new();

    render_constants(&mut out, disasm, &colors);
    render_code(&mut out, disasm, &colors);

    out
}

fn render_constants(out: &mut String, disasm: &Disassembler, c: &Colors) {
    let bytes = bytes_from_words(disasm.constants());

    banner(out, "CONSTANTS", bytes.len(), c);

    // Column header: byte offsets 00..0F
    write!(out, "{}      ", c.dim).unwrap();
    for col in 0..BYTES_PER_ROW {
        write!(out, " {col:02X}").unwrap();
    }
    writeln!(out, "{}", c.reset).unwrap();

    for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        write!(out, "{}{:04X}{}  ", c.dim, row * BYTES_PER_ROW, c.reset).unwrap();
        for byte in chunk {
            write!(out, " {byte:02X}").unwrap();
        }
        for _ in chunk.len()..BYTES_PER_ROW {
            out.push_str("   ");
        }
        write!(out, "   {}", c.green).unwrap();
        for byte in chunk {
            out.push(gloss(*byte));
        }
        writeln!(out, "{}", c.reset).unwrap();
    }
    out.push('\n');
}

fn render_code(out: &mut String, disasm: &Disassembler, c: &Colors) {
    banner(out, "CODE", disasm.code().len(), c);

    for instr in disasm.instructions() {
        if disasm.labels().contains(&instr.offset) {
            write!(out, "{}_{:04X}:{} ", c.blue, instr.offset, c.reset).unwrap();
        } else {
            out.push_str("       ");
        }
        write!(out, "{}", instr.mnemonic).unwrap();
        if !instr.args.is_empty() {
            write!(out, " {}", instr.args.join(", ")).unwrap();
        }
        out.push('\n');
    }
}

fn banner(out: &mut String, title: &str, size: usize, c: &Colors) {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "{}{rule}{}", c.dim, c.reset).unwrap();
    writeln!(out, "{}  {title}{}", c.blue, c.reset).unwrap();
    writeln!(out, "  SIZE: {:#06x}", size).unwrap();
    writeln!(out, "{}{rule}{}", c.dim, c.reset).unwrap();
}

/// Printable ASCII passes through; everything else renders as '.'.
fn gloss(byte: u8) -> char {
    if (0x20..0x7F).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}
