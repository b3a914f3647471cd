use warren_bytecode::RegId;
use warren_vm::{Alu, Fpu, Step, Vm, VmError};

use crate::demo;

pub struct RunArgs {
    pub memory: u16,
}

fn setup(vm: &mut Vm) -> Result<(), VmError> {
    vm.register_unit(&Alu)?;
    vm.register_unit(&Fpu)?;
    vm.register_syscall(demo::SYS_READLINE, demo::readline())?;
    vm.register_syscall(demo::SYS_WRITELINE, demo::writeline())?;
    Ok(())
}

pub fn run(args: RunArgs) {
    let module = demo::summation_module();

    let mut vm = Vm::new();
    if let Err(e) = setup(&mut vm) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = vm.init(&module, args.memory) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    loop {
        match vm.step_run() {
            Ok(Step::Continue) => {}
            Ok(Step::Halt) => break,
            Err(e) => {
                eprintln!("error at {:#06x}: {}", vm.reg(RegId::Ip), e);
                std::process::exit(1);
            }
        }
    }
}
