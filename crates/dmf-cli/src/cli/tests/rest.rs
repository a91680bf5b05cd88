//! Tests for ids, resolve and completions.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use clap_complete::Shell;
use std::path::Path;

#[test]
fn cli_parse_ids() {
    match parse(&["dmf", "ids", "1000"]) {
        CliCommand::Ids { app_id, location } => {
            assert_eq!(app_id, "1000");
            assert!(location.steam_path.is_none());
            assert!(location.file.is_none());
        }
        _ => panic!("expected Ids"),
    }
}

#[test]
fn cli_parse_ids_with_file() {
    match parse(&["dmf", "ids", "1000", "--file", "plug.lua"]) {
        CliCommand::Ids { app_id, location } => {
            assert_eq!(app_id, "1000");
            assert_eq!(location.file.as_deref(), Some(Path::new("plug.lua")));
        }
        _ => panic!("expected Ids with --file"),
    }
}

#[test]
fn cli_parse_ids_requires_app_id() {
    assert!(Cli::try_parse_from(["dmf", "ids"]).is_err());
}

#[test]
fn cli_parse_resolve_with_steam_path() {
    match parse(&["dmf", "resolve", "480", "--steam-path", "/opt/steam"]) {
        CliCommand::Resolve { app_id, location } => {
            assert_eq!(app_id, "480");
            assert_eq!(location.steam_path.as_deref(), Some(Path::new("/opt/steam")));
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["dmf", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_completions_rejects_unknown_shell() {
    assert!(Cli::try_parse_from(["dmf", "completions", "tcsh"]).is_err());
}
