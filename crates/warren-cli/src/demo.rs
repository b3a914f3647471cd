//! Built-in demo: a summation program plus its host functions.
//!
//! The program asks the host for `n` (syscall 0), accumulates `0..=n` in a
//! register loop, then hands the sum back to the host for printing
//! (syscall 1). The loop accumulates before testing, so `n` itself is
//! included in the sum.

use std::io::{self, BufRead, Write};

use warren_bytecode::{Assembler, RegId};
use warren_vm::{SyscallCtx, SyscallFactory, SyscallSignal, SyscallTask};

/// Read a number from stdin into `A0`.
pub const SYS_READLINE: u16 = 0;
/// Print argument 0 to stdout.
pub const SYS_WRITELINE: u16 = 1;

/// Assemble the summation module.
///
/// Register use: `A0` = n, `A1` = sum, `A2` = i, `A3` = constant 1.
pub fn summation_module() -> Vec<u8> {
    let mut asm = Assembler::new();
    asm.syscall(SYS_READLINE);
    asm.loadi(RegId::A1, 0);
    asm.loadi(RegId::A2, 0);
    asm.loadi(RegId::A3, 1);
    asm.set_label("LOOP");
    asm.add(RegId::A1, RegId::A1, RegId::A2);
    asm.cmp(RegId::A2, RegId::A0);
    asm.jle("LOOP_END");
    asm.add(RegId::A2, RegId::A2, RegId::A3);
    asm.jmp("LOOP");
    asm.set_label("LOOP_END");
    asm.push(RegId::A1);
    asm.syscall(SYS_WRITELINE);
    asm.finish()
}

/// Prompt on stdout, read one line from stdin, return it as the syscall's
/// result. Non-numeric input is a syscall error.
pub fn readline() -> SyscallFactory {
    Box::new(|| {
        Box::new(|ctx: &mut SyscallCtx<'_>| {
            print!("sum up to: ");
            if io::stdout().flush().is_err() {
                ctx.set_error("stdout is closed");
                return SyscallSignal::Error;
            }

            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line).is_err() {
                ctx.set_error("failed to read input");
                return SyscallSignal::Error;
            }
            let Ok(n) = line.trim().parse::<u16>() else {
                ctx.set_error(format!("not a number: {:?}", line.trim()));
                return SyscallSignal::Error;
            };

            if ctx.enter_frame().is_err() {
                ctx.set_error("stack exhausted");
                return SyscallSignal::Error;
            }
            ctx.set_return(n);
            if ctx.leave_frame().is_err() {
                ctx.set_error("corrupt call frame");
                return SyscallSignal::Error;
            }
            SyscallSignal::End
        }) as SyscallTask
    })
}

/// Print argument 0 to stdout.
pub fn writeline() -> SyscallFactory {
    Box::new(|| {
        Box::new(|ctx: &mut SyscallCtx<'_>| {
            if ctx.enter_frame().is_err() {
                ctx.set_error("stack exhausted");
                return SyscallSignal::Error;
            }
            match ctx.arg_u16(0) {
                Ok(value) => println!("{value}"),
                Err(err) => {
                    ctx.set_error(err.to_string());
                    return SyscallSignal::Error;
                }
            }
            if ctx.leave_frame().is_err() {
                ctx.set_error("corrupt call frame");
                return SyscallSignal::Error;
            }
            SyscallSignal::End
        }) as SyscallTask
    })
}
