//! Probe artifacts
//!
//! Helper functions to cross-build the probe binaries and locate the produced ELFs.

use std::path::PathBuf;
use std::process::Command;

use walkdir::WalkDir;

use crate::path::{
    get_linker_script_path, get_probe_binary_path, get_probes_path, get_workspace_path,
};

/// Target triple the probes are built for.
///
/// The probes are freestanding: they carry their own entry point and issue syscalls directly,
/// so they build against the bare-metal target even though they run under user-mode emulation.
pub const PROBE_TARGET: &str = "riscv64gc-unknown-none-elf";

/// List the probe crates available in the workspace.
pub fn list_probes() -> Vec<String> {
    let mut probes = Vec::new();
    for entry in WalkDir::new(get_probes_path())
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .flatten()
    {
        if entry.path().join("Cargo.toml").is_file() {
            if let Some(name) = entry.file_name().to_str() {
                probes.push(name.to_string());
            }
        }
    }
    probes.sort();
    probes
}

/// Build a probe binary, returning the path to the produced ELF.
pub fn build_probe(probe: &str) -> Option<PathBuf> {
    let linker_script = get_linker_script_path();
    let mut build_cmd = Command::new(env!("CARGO"));
    build_cmd
        .current_dir(get_workspace_path())
        .arg("build")
        .arg("--package")
        .arg(probe)
        .arg("--target")
        .arg(PROBE_TARGET)
        .env(
            "RUSTFLAGS",
            format!("-C link-arg=-T{}", linker_script.display()),
        );

    log::debug!("{:?}", &build_cmd);
    let status = build_cmd.status().ok()?;
    if !status.success() {
        log::error!("Could not build probe '{}'", probe);
        return None;
    }

    let binary = get_probe_binary_path(probe);
    if !binary.is_file() {
        log::error!("Missing probe binary at '{}'", binary.display());
        return None;
    }
    Some(binary)
}
