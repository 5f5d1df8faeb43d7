//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use std::path::{Path, PathBuf};
use tessera_core::{Asset, DependencyGraph, DirFetcher, Outcome, Pass, PassOutput, TesseraError};
use tessera_manifests::{INSTALL_CONFIG_FILENAME, Manifests};

// =============================================================================
// HELPERS
// =============================================================================

/// Validate an existing asset directory.
///
/// Canonicalizes the path so messages and output name the real location.
fn validate_asset_dir(dir: &Path) -> Result<PathBuf, TesseraError> {
    let canonical = dir.canonicalize().map_err(|e| {
        TesseraError::Io(format!("Invalid asset directory '{}': {}", dir.display(), e))
    })?;

    if !canonical.is_dir() {
        return Err(TesseraError::Io(format!(
            "Path '{}' is not a directory",
            dir.display()
        )));
    }

    Ok(canonical)
}

/// Root assets of every command.
fn roots() -> Vec<Box<dyn Asset>> {
    vec![Box::new(Manifests)]
}

/// Resolve the manifest catalog against the persisted state in `dir`.
fn run_pass(dir: &Path) -> Result<PassOutput, TesseraError> {
    if !dir.join(INSTALL_CONFIG_FILENAME).is_file() {
        tracing::warn!(
            dir = %dir.display(),
            "{} not found; the pass will fail",
            INSTALL_CONFIG_FILENAME
        );
    }

    let fetcher = DirFetcher::new(dir);
    roots()
        .into_iter()
        .fold(Pass::new(&fetcher), Pass::target_boxed)
        .run()
}

/// Render `value` as pretty JSON.
fn render_json(value: &serde_json::Value) -> Result<String, TesseraError> {
    serde_json::to_string_pretty(value).map_err(|e| TesseraError::Serialization(e.to_string()))
}

fn print_json(value: &serde_json::Value) -> Result<(), TesseraError> {
    println!("{}", render_json(value)?);
    Ok(())
}

// =============================================================================
// CREATE COMMAND
// =============================================================================

/// Resolve the manifests and write them, with the state report, into `dir`.
pub fn cmd_create_manifests(dir: &Path, json_mode: bool) -> Result<(), TesseraError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| TesseraError::Io(format!("Cannot create '{}': {}", dir.display(), e)))?;
    let dir = validate_asset_dir(dir)?;

    let output = run_pass(&dir)?;
    let written = output.write(&dir)?;

    if json_mode {
        let files: Vec<_> = written
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        print_json(&serde_json::json!({
            "dir": dir.to_string_lossy(),
            "files": files,
            "loaded": output.graph.count(Outcome::Loaded),
            "generated": output.graph.count(Outcome::Generated),
            "checksum": format!("{:016x}", output.files.checksum()),
        }))?;
        return Ok(());
    }

    println!("Wrote {} files to {}", written.len(), dir.display());
    for file in output.files.files() {
        println!("  {}", file.path);
    }

    Ok(())
}

// =============================================================================
// GRAPH COMMAND
// =============================================================================

/// Print the static dependency graph.
pub fn cmd_graph(json_mode: bool) -> Result<(), TesseraError> {
    let graph = DependencyGraph::build(roots())?;

    if json_mode {
        let nodes: Vec<_> = graph
            .nodes()
            .iter()
            .map(|n| {
                serde_json::json!({
                    "name": n.name,
                    "type": n.id.short_name(),
                    "writable": n.writable,
                })
            })
            .collect();
        let edges: Vec<_> = graph
            .edges()
            .map(|(from, to)| serde_json::json!({ "from": from.name, "to": to.name }))
            .collect();
        print_json(&serde_json::json!({ "nodes": nodes, "edges": edges }))?;
        return Ok(());
    }

    print!("{}", graph.to_dot());
    Ok(())
}

// =============================================================================
// HASH COMMAND
// =============================================================================

/// Resolve without writing and print the output checksums.
pub fn cmd_hash(dir: &Path, json_mode: bool) -> Result<(), TesseraError> {
    let dir = validate_asset_dir(dir)?;
    let output = run_pass(&dir)?;

    let checksum = format!("{:016x}", output.files.checksum());
    let blake3 = output.files.blake3_hex();

    if json_mode {
        print_json(&serde_json::json!({
            "files": output.files.len(),
            "bytes": output.files.total_bytes(),
            "checksum": checksum,
            "blake3": blake3,
        }))?;
        return Ok(());
    }

    println!("Files:    {}", output.files.len());
    println!("Bytes:    {}", output.files.total_bytes());
    println!("Checksum: {}", checksum);
    println!("BLAKE3:   {}", blake3);

    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// Resolve without writing and list every asset and file.
pub fn cmd_list(dir: &Path, json_mode: bool) -> Result<(), TesseraError> {
    let dir = validate_asset_dir(dir)?;
    let output = run_pass(&dir)?;

    if json_mode {
        let report = output.report();
        let value = serde_json::to_value(&report)
            .map_err(|e| TesseraError::Serialization(e.to_string()))?;
        print_json(&value)?;
        return Ok(());
    }

    println!("Assets");
    println!("======");
    for record in output.graph.records() {
        let outcome = record.outcome.to_string();
        println!("{:>3}  {:<9}  {}", record.sequence, outcome, record.name);
    }
    println!();
    println!("Files");
    println!("=====");
    for file in output.files.files() {
        let owner = output.files.owner(&file.path).unwrap_or_default();
        println!("{:<48}  {:>6}  {}", file.path, file.len(), owner);
    }

    Ok(())
}
