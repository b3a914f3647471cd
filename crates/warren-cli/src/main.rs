mod cli;
mod commands;
mod demo;


use cli::{DumpParams, RunParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", m)) => {
            let params = RunParams::from_matches(m);
            commands::run::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
