//! Tests for argument extraction.

use super::commands::build_cli;
use super::dispatch::{DumpParams, RunParams};
use super::ColorChoice;

fn run_matches(argv: &[&str]) -> clap::ArgMatches {
    build_cli().get_matches_from(argv)
}

#[test]
fn run_defaults_to_128_words() {
    let m = run_matches(&["warren", "run"]);
    let (_, sub) = m.subcommand().unwrap();
    let params = RunParams::from_matches(sub);
    assert_eq!(params.memory, 128);
}

#[test]
fn run_accepts_mem_override() {
    let m = run_matches(&["warren", "run", "--mem", "64"]);
    let (_, sub) = m.subcommand().unwrap();
    let params = RunParams::from_matches(sub);
    assert_eq!(params.memory, 64);
}

#[test]
fn mem_rejects_non_numeric() {
    let result = build_cli().try_get_matches_from(["warren", "run", "--mem", "lots"]);
    assert!(result.is_err());
}

#[test]
fn dump_color_choices() {
    let m = run_matches(&["warren", "dump", "--color", "always"]);
    let (_, sub) = m.subcommand().unwrap();
    let params = DumpParams::from_matches(sub);
    assert!(matches!(params.color, ColorChoice::Always));

    let m = run_matches(&["warren", "dump", "--color", "never"]);
    let (_, sub) = m.subcommand().unwrap();
    let params = DumpParams::from_matches(sub);
    assert!(matches!(params.color, ColorChoice::Never));

    let m = run_matches(&["warren", "dump"]);
    let (_, sub) = m.subcommand().unwrap();
    let params = DumpParams::from_matches(sub);
    assert!(matches!(params.color, ColorChoice::Auto));
}

#[test]
fn color_rejects_unknown_value() {
    let result = build_cli().try_get_matches_from(["warren", "dump", "--color", "sometimes"]);
    assert!(result.is_err());
}
