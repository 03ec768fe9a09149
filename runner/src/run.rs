//! Run subcommand
//!
//! Launches a probe binary in a `qemu-riscv64` sub-process. One probe process per scenario is
//! the resource-isolation boundary: a faulting trap kills only that process, and the next
//! scenario starts from fresh memory mappings and CSR state.

use std::process::{Command, ExitCode, ExitStatus};

use rvprobe_core::exit_code;

use crate::artifacts::{build_probe, list_probes};
use crate::RunArgs;

/// The user-mode emulator probes run under.
pub const QEMU: &str = "qemu-riscv64";

// ————————————————————————————— Process Outcomes ——————————————————————————— //

/// The outcome one probe process reported through the exit-code protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Pass,
    Fail,
    Fault,
}

impl ProcessOutcome {
    /// Decode a probe exit status.
    ///
    /// A process killed by a signal (an aborted trap, e.g. SIGILL on a CSR the target rejects)
    /// has no exit code and counts as a fault.
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) if code == exit_code::PASS as i32 => ProcessOutcome::Pass,
            Some(code) if code == exit_code::FAIL as i32 => ProcessOutcome::Fail,
            _ => ProcessOutcome::Fault,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessOutcome::Pass => "pass",
            ProcessOutcome::Fail => "fail",
            ProcessOutcome::Fault => "fault",
        }
    }
}

/// Return true if the user-mode emulator is installed.
pub fn qemu_is_available() -> bool {
    Command::new(QEMU)
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

// —————————————————————————————————— Run ——————————————————————————————————— //

/// Run a single probe on QEMU, streaming its output.
pub fn run(args: &RunArgs) -> ExitCode {
    let probes = list_probes();
    if !probes.iter().any(|name| name == &args.probe) {
        log::error!(
            "Unknown probe '{}', available probes: {}",
            &args.probe,
            probes.join(", ")
        );
        return ExitCode::FAILURE;
    }
    if !qemu_is_available() {
        log::error!("Could not find '{}'", QEMU);
        return ExitCode::FAILURE;
    }
    let Some(binary) = build_probe(&args.probe) else {
        return ExitCode::FAILURE;
    };

    log::info!("Running probe '{}'", &args.probe);
    let mut qemu_cmd = Command::new(QEMU);
    qemu_cmd.arg(binary);
    log::debug!("{:?}", &qemu_cmd);

    let exit_status = qemu_cmd.status().expect("Failed to run QEMU");
    let outcome = ProcessOutcome::from_status(exit_status);
    log::info!("Probe '{}' reported: {}", &args.probe, outcome.as_str());

    match outcome {
        ProcessOutcome::Pass => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
