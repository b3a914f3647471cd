//! Command builders for the CLI.

use clap::Command;

use super::args::{color_arg, mem_arg};

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("warren")
        .about("Register-based bytecode VM with half-precision floats")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(run_command())
        .subcommand(dump_command())
}

/// Execute the built-in summation program.
fn run_command() -> Command {
    Command::new("run")
        .about("Assemble the demo program and execute it")
        .after_help(
            r#"EXAMPLES:
  warren run              # prompt for n, print the sum 0..=n
  warren run --mem 64     # with a 64-word memory"#,
        )
        .arg(mem_arg())
}

/// Disassemble the built-in summation program.
fn dump_command() -> Command {
    Command::new("dump")
        .about("Assemble the demo program and print its listing")
        .arg(color_arg())
}
