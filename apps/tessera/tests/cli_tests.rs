//! # CLI Tests
//!
//! Commands run against temporary asset directories.

use clap::Parser;
use std::path::Path;
use tessera::cli::{self, Cli, cmd_create_manifests, cmd_graph, cmd_hash, cmd_list};
use tessera::config::Config;
use tessera_core::{StateReport, TesseraError};

const INSTALL_CONFIG: &str = "\
apiVersion: v1
baseDomain: example.com
metadata:
  name: foo
";

fn seeded_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("install-config.yaml"), INSTALL_CONFIG).expect("seed");
    dir
}

fn read(dir: &Path, relative: &str) -> String {
    std::fs::read_to_string(dir.join(relative)).expect("read output")
}

// =============================================================================
// CREATE
// =============================================================================

#[test]
fn create_manifests_writes_files_and_report() {
    let dir = seeded_dir();
    cmd_create_manifests(dir.path(), false).expect("create");

    let ingress = read(dir.path(), "manifests/cluster-ingress-02-config.yml");
    assert!(ingress.contains("domain: apps.foo.example.com"));
    assert!(dir.path().join("manifests/cluster-network-02-config.yml").is_file());

    let report = StateReport::read(dir.path()).expect("read").expect("present");
    assert_eq!(report.files.len(), 4);
    assert_eq!(report.assets.len(), 6);
}

#[test]
fn create_manifests_twice_is_stable() {
    let dir = seeded_dir();
    cmd_create_manifests(dir.path(), true).expect("first");
    let first = read(dir.path(), "manifests/cluster-dns-02-config.yml");

    cmd_create_manifests(dir.path(), true).expect("second");
    let second = read(dir.path(), "manifests/cluster-dns-02-config.yml");

    assert_eq!(first, second);
}

#[test]
fn create_without_install_config_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = cmd_create_manifests(dir.path(), false).expect_err("no input");

    assert!(matches!(err, TesseraError::Generate { .. }));
    assert!(!dir.path().join("manifests").exists());
}

#[test]
fn create_rejects_corrupt_install_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("install-config.yaml"), "metadata:\n  name: ''\n")
        .expect("seed");

    let err = cmd_create_manifests(dir.path(), false).expect_err("invalid");
    assert!(matches!(err, TesseraError::Load { .. }));
}

// =============================================================================
// INSPECTION
// =============================================================================

#[test]
fn inspection_commands_do_not_write() {
    let dir = seeded_dir();

    cmd_list(dir.path(), false).expect("list");
    cmd_list(dir.path(), true).expect("list json");
    cmd_hash(dir.path(), false).expect("hash");
    cmd_hash(dir.path(), true).expect("hash json");

    assert!(!dir.path().join("manifests").exists());
    assert!(StateReport::read(dir.path()).expect("read").is_none());
}

#[test]
fn inspection_requires_existing_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing");

    assert!(matches!(cmd_hash(&missing, false), Err(TesseraError::Io(_))));
    assert!(matches!(cmd_list(&missing, false), Err(TesseraError::Io(_))));
}

#[test]
fn graph_renders() {
    cmd_graph(false).expect("dot");
    cmd_graph(true).expect("json");
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn config_output_dir_used_when_flag_absent() {
    let dir = seeded_dir();
    let config_path = dir.path().join("tessera.toml");
    let toml = format!("[output]\ndir = {:?}\n", dir.path().display().to_string());
    std::fs::write(&config_path, toml).expect("write config");

    let config = Config::load(&config_path).expect("config");
    let cli = Cli::try_parse_from(["tessera", "create", "manifests"]).expect("parse");
    cli::execute(cli, &config).expect("execute");

    assert!(dir.path().join("manifests/cluster-dns-02-config.yml").is_file());
}
