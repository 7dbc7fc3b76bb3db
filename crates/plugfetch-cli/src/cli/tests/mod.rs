//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_fetch() {
    match parse(&["plugfetch", "fetch", "github.com/acme/tool", "v1.0.0"]) {
        CliCommand::Fetch {
            name,
            version,
            cache_dir,
            catalog_url,
        } => {
            assert_eq!(name, "github.com/acme/tool");
            assert_eq!(version, "v1.0.0");
            assert!(cache_dir.is_none());
            assert!(catalog_url.is_none());
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_overrides() {
    match parse(&[
        "plugfetch",
        "fetch",
        "acme/tool",
        "1.0.0",
        "--cache-dir",
        "/tmp/archives",
        "--catalog-url",
        "http://localhost:8080/public/",
    ]) {
        CliCommand::Fetch {
            cache_dir,
            catalog_url,
            ..
        } => {
            assert_eq!(cache_dir.as_deref(), Some(Path::new("/tmp/archives")));
            assert_eq!(catalog_url.as_deref(), Some("http://localhost:8080/public/"));
        }
        _ => panic!("expected Fetch with overrides"),
    }
}

#[test]
fn cli_parse_fetch_requires_version() {
    assert!(Cli::try_parse_from(["plugfetch", "fetch", "acme/tool"]).is_err());
}

#[test]
fn cli_parse_path() {
    match parse(&["plugfetch", "path", "acme/tool", "1.0.0", "--cache-dir", "/c"]) {
        CliCommand::Path {
            name,
            version,
            cache_dir,
        } => {
            assert_eq!(name, "acme/tool");
            assert_eq!(version, "1.0.0");
            assert_eq!(cache_dir.as_deref(), Some(Path::new("/c")));
        }
        _ => panic!("expected Path"),
    }
}

#[test]
fn cli_parse_hash() {
    match parse(&["plugfetch", "hash", "/tmp/a.zip"]) {
        CliCommand::Hash { path } => assert_eq!(path, Path::new("/tmp/a.zip")),
        _ => panic!("expected Hash"),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["plugfetch", "bench", "x"]).is_err());
}
