//! Dispatch logic: extract params from ArgMatches and convert to command args.

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::run::RunArgs;

pub struct RunParams {
    pub memory: u16,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let memory = match m.get_one::<u16>("mem") {
            Some(words) => *words,
            None => unreachable!("--mem carries a default"),
        };
        Self { memory }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self { memory: p.memory }
    }
}

pub struct DumpParams {
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            color: p.color.should_colorize(),
        }
    }
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
