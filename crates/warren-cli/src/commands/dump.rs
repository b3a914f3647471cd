use warren_bytecode::{Disassembler, render};
use warren_core::Colors;

use crate::demo;

pub struct DumpArgs {
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let module = demo::summation_module();

    let disasm = match Disassembler::load(&module) {
        Ok(disasm) => disasm,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let colors = Colors::new(args.color);
    print!("{}", render(&disasm, colors));
}
