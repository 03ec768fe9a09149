//! Path helper functions

use std::path::PathBuf;
use std::str::FromStr;

use crate::artifacts::PROBE_TARGET;

/// Return the root of the workspace.
pub fn get_workspace_path() -> PathBuf {
    let Ok(runner_manifest) = std::env::var("CARGO_MANIFEST_DIR") else {
        panic!("Could not locate workspace root");
    };
    let path = PathBuf::from_str(&runner_manifest).unwrap();
    path.parent().unwrap().to_owned()
}

/// Return the path to the scenarios configuration file.
pub fn get_config_path() -> PathBuf {
    let mut path = get_workspace_path();
    path.push("scenarios.toml");
    path
}

/// Return the path to the probes directory.
pub fn get_probes_path() -> PathBuf {
    let mut path = get_workspace_path();
    path.push("probes");
    path
}

/// Return the path to the probe linker script.
pub fn get_linker_script_path() -> PathBuf {
    let mut path = get_workspace_path();
    path.push("misc");
    path.push("probe.ld");
    path
}

/// Return the path of a built probe binary.
pub fn get_probe_binary_path(probe: &str) -> PathBuf {
    let mut path = get_workspace_path();
    path.push("target");
    path.push(PROBE_TARGET);
    path.push("debug");
    path.push(probe);
    path
}
