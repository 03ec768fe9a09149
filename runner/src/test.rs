//! Scenario test runner
//!
//! Runs every configured scenario, each in its own QEMU sub-process, and compares the reported
//! outcome with the expectation from `scenarios.toml`. No retries: the probes are
//! deterministic, a diverging outcome is a finding, not flakiness.

use std::fs;
use std::process::{Command, ExitCode};

use crate::artifacts::build_probe;
use crate::path::get_config_path;
use crate::project::{ExpectedOutcome, ProjectConfig, ScenarioEntry};
use crate::run::{qemu_is_available, ProcessOutcome, QEMU};
use crate::TestArgs;

#[derive(Default)]
struct TestStats {
    total: usize,
    success: usize,
    /// Scenarios skipped because QEMU is not available.
    skipped: usize,
}

/// The test command, run all the scenarios.
pub fn run_tests(args: &TestArgs) -> ExitCode {
    let path = get_config_path();
    let config = match fs::read_to_string(&path) {
        Ok(config) => config,
        Err(_) => {
            log::error!("Could not read '{}'", &path.display());
            return ExitCode::FAILURE;
        }
    };

    // Parse the config
    let config = match toml::from_str::<ProjectConfig>(&config) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Failed to parse configuration:\n{}", err.message());
            return ExitCode::FAILURE;
        }
    };

    let qemu_available = qemu_is_available();
    if !qemu_available {
        log::warn!("'{}' is not installed, skipping all scenarios", QEMU);
    }

    let mut stats = TestStats::default();
    for (name, entry) in &config.scenario {
        stats.total += 1;
        if !qemu_available {
            stats.skipped += 1;
            continue;
        }
        if run_scenario(name, entry, args) {
            stats.success += 1;
        }
    }

    log::info!(
        "{}/{} scenarios behaved as expected ({} skipped)",
        stats.success,
        stats.total,
        stats.skipped
    );
    if stats.success + stats.skipped == stats.total {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run one scenario in its own sub-process; returns true if the outcome matches the
/// expectation.
fn run_scenario(name: &str, entry: &ScenarioEntry, args: &TestArgs) -> bool {
    let probe = entry.probe_name(name);
    let Some(binary) = build_probe(probe) else {
        log::error!("failed - {}: could not build probe '{}'", name, probe);
        return false;
    };

    let mut qemu_cmd = Command::new(QEMU);
    qemu_cmd.arg(binary);
    log::debug!("{:?}", &qemu_cmd);

    let output = qemu_cmd.output().expect("Failed to run QEMU");
    let outcome = ProcessOutcome::from_status(output.status);

    if matches(entry.expect, outcome) {
        log::info!("ok - {} ({})", name, outcome.as_str());
        if args.verbose {
            dump_output(&output.stdout, &output.stderr);
        }
        true
    } else {
        log::error!(
            "failed - {}: expected {:?}, probe reported {}",
            name,
            entry.expect,
            outcome.as_str()
        );
        dump_output(&output.stdout, &output.stderr);
        false
    }
}

fn matches(expected: ExpectedOutcome, outcome: ProcessOutcome) -> bool {
    matches!(
        (expected, outcome),
        (ExpectedOutcome::Pass, ProcessOutcome::Pass)
            | (ExpectedOutcome::Fail, ProcessOutcome::Fail)
            | (ExpectedOutcome::Fault, ProcessOutcome::Fault)
    )
}

fn dump_output(stdout: &[u8], stderr: &[u8]) {
    for line in String::from_utf8_lossy(stdout).lines() {
        log::info!("    {}", line);
    }
    for line in String::from_utf8_lossy(stderr).lines() {
        log::info!("    {}", line);
    }
}
