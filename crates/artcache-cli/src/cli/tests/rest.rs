//! Tests for evict, path and key.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_evict() {
    match parse(&["artcache", "evict", "https://h/a.jar"]) {
        CliCommand::Evict { uri } => assert_eq!(uri, "https://h/a.jar"),
        _ => panic!("expected Evict"),
    }
}

#[test]
fn cli_parse_path() {
    match parse(&["artcache", "path", "https://h/a.jar"]) {
        CliCommand::Path { uri } => assert_eq!(uri, "https://h/a.jar"),
        _ => panic!("expected Path"),
    }
}

#[test]
fn cli_parse_key() {
    match parse(&["artcache", "key", "https://h/a.jar"]) {
        CliCommand::Key { uri } => assert_eq!(uri, "https://h/a.jar"),
        _ => panic!("expected Key"),
    }
}

#[test]
fn cli_requires_uri() {
    assert!(Cli::try_parse_from(["artcache", "get"]).is_err());
    assert!(Cli::try_parse_from(["artcache", "evict"]).is_err());
}
