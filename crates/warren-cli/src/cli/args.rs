//! Shared argument builders for CLI commands.

use clap::{Arg, value_parser};

/// Memory size in 16-bit words (--mem).
pub fn mem_arg() -> Arg {
    Arg::new("mem")
        .long("mem")
        .value_name("WORDS")
        .default_value("128")
        .value_parser(value_parser!(u16))
        .help("Memory size in 16-bit words")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
