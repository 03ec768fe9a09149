//! Scenario runner
//!
//! Composes syscall and CSR steps into named test cases and reports pass/fail plus the
//! captured register values. Execution is single-threaded and synchronous: each step's trap
//! either returns or aborts the probe process before the next step begins. A fault halts the
//! remaining steps of its scenario only; sibling scenarios run in their own sub-processes and
//! are not affected. Nothing is retried: these are deterministic hardware or emulator probes,
//! retrying a faulting instruction without changing inputs is not meaningful.

use core::fmt::Write;

use rvprobe_core::exit_code;

use crate::csr::{self, CsrSnapshot};
use crate::error::ProbeError;
use crate::syscall::{self, ArgList, MapFlags, Prot, RegionState, SyscallRequest, SyscallResult};

/// Maximum steps (and captured values) per scenario.
pub const MAX_STEPS: usize = 32;
/// Region slots available to one scenario.
pub const MAX_REGIONS: usize = 4;

// ————————————————————————————— Steps & Predicates ————————————————————————— //

/// One operation of a scenario step.
#[derive(Clone, Copy, Debug)]
pub enum Operation {
    /// Issue a raw syscall.
    Syscall { nr: usize, args: ArgList },
    /// Read a CSR.
    CsrRead { addr: u16 },
    /// Write a CSR, capturing the previous value.
    CsrWrite { addr: u16, value: usize },
    /// Map anonymous memory into a scenario-owned region slot.
    Map {
        slot: usize,
        len: usize,
        prot: Prot,
        flags: MapFlags,
    },
    /// Release the region held in a slot.
    Unmap { slot: usize },
}

/// Expected-outcome predicate for one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    /// The captured value must match exactly.
    Exact(usize),
    /// The captured value must fall within the inclusive range.
    Range(usize, usize),
    /// The captured value must not be below the previous step's captured value.
    NonDecreasing,
    /// The step must complete without a fault; any value passes.
    NoFault,
}

impl Expect {
    fn matches(self, actual: usize, previous: Option<usize>) -> bool {
        match self {
            Expect::Exact(value) => actual == value,
            Expect::Range(lo, hi) => actual >= lo && actual <= hi,
            Expect::NonDecreasing => previous.map_or(true, |prev| actual >= prev),
            Expect::NoFault => true,
        }
    }
}

/// One scenario step: an operation plus the predicate its captured value must satisfy.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub op: Operation,
    pub expect: Expect,
}

// ——————————————————————————— Captures & Outcomes —————————————————————————— //

/// A value captured by one step, reported verbatim for offline inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Captured {
    Syscall(SyscallResult),
    Csr(CsrSnapshot),
    Region { base: usize },
}

impl Captured {
    /// The machine word predicates are evaluated against.
    pub fn value(&self) -> usize {
        match self {
            Captured::Syscall(result) => result.0 as usize,
            Captured::Csr(snapshot) => snapshot.value,
            Captured::Region { base } => *base,
        }
    }
}

/// Why a scenario failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// A step's captured value did not match its predicate.
    Mismatch { actual: usize, expected: Expect },
    /// A region was still mapped when the steps ended.
    LeakedRegion { slot: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Failure {
    pub step: usize,
    pub kind: FailureKind,
}

/// Scenario outcome. Terminal once reached.
///
/// An unexpected value is a normal occurrence during testing and is recorded as `Fail`; a
/// `Fault` means a trap could not complete and the remaining steps were skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(Failure),
    Fault(ProbeError),
}

// ————————————————————————————————— Scenario ——————————————————————————————— //

#[derive(Debug, PartialEq, Eq)]
enum State {
    Pending,
    Running,
    Done(Outcome),
}

/// A named test case over the syscall and CSR primitives.
///
/// State machine: `Pending -> Running -> {Pass | Fail | Fault}`, terminal once any outcome is
/// reached; running a terminal scenario returns the recorded outcome without issuing another
/// trap. Mapped regions are owned by the scenario and must be released before its steps end.
pub struct Scenario {
    name: &'static str,
    state: State,
    captured: [Option<Captured>; MAX_STEPS],
    captured_len: usize,
    regions: [Option<syscall::MemoryRegion>; MAX_REGIONS],
}

impl Scenario {
    pub const fn new(name: &'static str) -> Self {
        Scenario {
            name,
            state: State::Pending,
            captured: [None; MAX_STEPS],
            captured_len: 0,
            regions: [None, None, None, None],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The outcome, once terminal.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            State::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The values captured so far, in step order.
    pub fn captured(&self) -> impl Iterator<Item = &Captured> {
        self.captured[..self.captured_len].iter().flatten()
    }

    /// Run the steps to completion and return the outcome.
    pub fn run(&mut self, steps: &[Step]) -> Outcome {
        assert!(steps.len() <= MAX_STEPS, "too many steps for one scenario");
        match self.state {
            State::Done(outcome) => return outcome,
            State::Running | State::Pending => {}
        }
        self.state = State::Running;
        let outcome = self.execute(steps);
        self.state = State::Done(outcome);
        outcome
    }

    fn execute(&mut self, steps: &[Step]) -> Outcome {
        for (index, step) in steps.iter().enumerate() {
            let captured = match self.apply(&step.op) {
                Ok(captured) => captured,
                Err(cause) => {
                    log::error!("{}: step {} faulted: {}", self.name, index, cause);
                    return Outcome::Fault(cause);
                }
            };
            let actual = captured.value();
            let matched = step.expect.matches(actual, self.last_value());
            self.push(captured);
            if !matched {
                return Outcome::Fail(Failure {
                    step: index,
                    kind: FailureKind::Mismatch {
                        actual,
                        expected: step.expect,
                    },
                });
            }
        }

        // A scenario owns its mappings and must release every one of them before it ends.
        for (slot, region) in self.regions.iter().enumerate() {
            if let Some(region) = region {
                if region.state() == RegionState::Mapped {
                    return Outcome::Fail(Failure {
                        step: steps.len(),
                        kind: FailureKind::LeakedRegion { slot },
                    });
                }
            }
        }
        Outcome::Pass
    }

    fn apply(&mut self, op: &Operation) -> Result<Captured, ProbeError> {
        match *op {
            Operation::Syscall { nr, args } => {
                let result = SyscallRequest { nr, args }.issue()?;
                Ok(Captured::Syscall(result))
            }
            Operation::CsrRead { addr } => Ok(Captured::Csr(csr::read(addr)?)),
            Operation::CsrWrite { addr, value } => {
                let prev = csr::write(addr, value)?;
                Ok(Captured::Csr(CsrSnapshot { addr, value: prev }))
            }
            Operation::Map {
                slot,
                len,
                prot,
                flags,
            } => {
                assert!(slot < MAX_REGIONS, "region slot out of range");
                assert!(
                    !matches!(&self.regions[slot], Some(r) if r.state() == RegionState::Mapped),
                    "region slot already holds a mapped region"
                );
                let region = syscall::map(len, prot, flags)?;
                let base = region.base();
                self.regions[slot] = Some(region);
                Ok(Captured::Region { base })
            }
            Operation::Unmap { slot } => {
                assert!(slot < MAX_REGIONS, "region slot out of range");
                match self.regions[slot].as_mut() {
                    Some(region) => {
                        syscall::unmap(region)?;
                        Ok(Captured::Region {
                            base: region.base(),
                        })
                    }
                    None => Err(ProbeError::NotMapped { base: 0 }),
                }
            }
        }
    }

    fn last_value(&self) -> Option<usize> {
        self.captured[..self.captured_len]
            .last()
            .and_then(|captured| captured.as_ref())
            .map(|captured| captured.value())
    }

    fn push(&mut self, captured: Captured) {
        self.captured[self.captured_len] = Some(captured);
        self.captured_len += 1;
    }

    // ————————————————————————————— Reporting —————————————————————————————— //

    /// Emit the captured records and the final verdict line on stdout.
    pub fn emit(&self) {
        for (index, captured) in self.captured().enumerate() {
            let mut line: LineBuffer<160> = LineBuffer::new();
            match captured {
                Captured::Syscall(result) => {
                    writeln!(&mut line, "[rvprobe] capture step={} syscall={}", index, result.0)
                }
                Captured::Csr(snapshot) => writeln!(
                    &mut line,
                    "[rvprobe] capture step={} csr=0x{:03x} value=0x{:x}",
                    index, snapshot.addr, snapshot.value
                ),
                Captured::Region { base } => writeln!(
                    &mut line,
                    "[rvprobe] capture step={} region=0x{:x}",
                    index, base
                ),
            }
            .ok();
            syscall::write(1, line.as_bytes()).ok();
        }

        let mut line: LineBuffer<160> = LineBuffer::new();
        match self.state {
            State::Done(Outcome::Pass) => writeln!(
                &mut line,
                "[rvprobe] scenario={} outcome=pass steps={}",
                self.name, self.captured_len
            ),
            State::Done(Outcome::Fail(failure)) => writeln!(
                &mut line,
                "[rvprobe] scenario={} outcome=fail step={}",
                self.name, failure.step
            ),
            State::Done(Outcome::Fault(cause)) => writeln!(
                &mut line,
                "[rvprobe] scenario={} outcome=fault cause=\"{}\"",
                self.name, cause
            ),
            _ => writeln!(&mut line, "[rvprobe] scenario={} outcome=none", self.name),
        }
        .ok();
        syscall::write(1, line.as_bytes()).ok();
    }

    /// The process exit status encoding the outcome, per the exit-code protocol.
    pub fn exit_status(&self) -> usize {
        match self.state {
            State::Done(Outcome::Pass) => exit_code::PASS,
            State::Done(Outcome::Fail(_)) => exit_code::FAIL,
            State::Done(Outcome::Fault(_)) => exit_code::FAULT,
            // Asking before the scenario ran is a probe bug, report it as a fault.
            _ => exit_code::FAULT,
        }
    }
}

// —————————————————————————————— Line Buffer ——————————————————————————————— //

/// A stack-allocated buffer report lines are formatted into before a single write trap.
struct LineBuffer<const N: usize> {
    buff: [u8; N],
    cursor: usize,
}

impl<const N: usize> LineBuffer<N> {
    const fn new() -> Self {
        LineBuffer {
            buff: [0u8; N],
            cursor: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buff[..self.cursor]
    }
}

impl<const N: usize> core::fmt::Write for LineBuffer<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        if bytes.len() > self.buff.len() - self.cursor {
            return Err(core::fmt::Error);
        }
        let new_cursor = self.cursor + bytes.len();
        self.buff[self.cursor..new_cursor].copy_from_slice(bytes);
        self.cursor = new_cursor;
        Ok(())
    }
}

// ————————————————————————————————— Tests —————————————————————————————————— //

#[cfg(test)]
mod tests {
    use rvprobe_core::{csr, sysno};

    use super::*;
    use crate::arch::testing;

    fn csr_read(addr: u16, expect: Expect) -> Step {
        Step {
            op: Operation::CsrRead { addr },
            expect,
        }
    }

    #[test]
    fn counter_scenario_passes_with_ten_snapshots() {
        let _guard = testing::lock();
        testing::reset();

        let mut steps = [csr_read(csr::MHPMCOUNTER3, Expect::NonDecreasing); 11];
        steps[0] = Step {
            op: Operation::CsrWrite {
                addr: csr::MHPMEVENT3,
                value: csr::EVENT_BRANCH,
            },
            expect: Expect::NoFault,
        };

        let mut scenario = Scenario::new("counter");
        assert_eq!(scenario.run(&steps), Outcome::Pass);

        let snapshots = scenario
            .captured()
            .filter(|captured| {
                matches!(captured, Captured::Csr(snapshot) if snapshot.addr == csr::MHPMCOUNTER3)
            })
            .count();
        assert_eq!(snapshots, 10);
    }

    #[test]
    fn unsupported_csr_reports_fault_not_pass() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [csr_read(0x7c0, Expect::NoFault)];
        let mut scenario = Scenario::new("bad_csr");
        assert_eq!(
            scenario.run(&steps),
            Outcome::Fault(ProbeError::UnsupportedCsr(0x7c0))
        );
    }

    #[test]
    fn a_mismatched_value_fails_the_scenario() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [
            Step {
                op: Operation::CsrWrite {
                    addr: csr::MSCRATCH,
                    value: 0x42,
                },
                expect: Expect::NoFault,
            },
            csr_read(csr::MSCRATCH, Expect::Exact(0x41)),
        ];
        let mut scenario = Scenario::new("mismatch");
        assert_eq!(
            scenario.run(&steps),
            Outcome::Fail(Failure {
                step: 1,
                kind: FailureKind::Mismatch {
                    actual: 0x42,
                    expected: Expect::Exact(0x41),
                },
            })
        );
    }

    #[test]
    fn a_fault_halts_the_remaining_steps() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [
            csr_read(0x7c0, Expect::NoFault),
            csr_read(csr::MSCRATCH, Expect::NoFault),
        ];
        let mut scenario = Scenario::new("halts");
        let before = testing::trap_count();
        scenario.run(&steps);
        // Only the faulting step issued a trap.
        assert_eq!(testing::trap_count(), before + 1);
        assert_eq!(scenario.captured().count(), 0);
    }

    #[test]
    fn outcomes_are_terminal() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [csr_read(csr::MSCRATCH, Expect::NoFault)];
        let mut scenario = Scenario::new("terminal");
        assert_eq!(scenario.outcome(), None);
        let first = scenario.run(&steps);
        assert_eq!(scenario.outcome(), Some(first));

        // A second run returns the recorded outcome without issuing any trap.
        let before = testing::trap_count();
        assert_eq!(scenario.run(&steps), first);
        assert_eq!(testing::trap_count(), before);
    }

    #[test]
    fn map_unmap_scenario_passes() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [
            Step {
                op: Operation::Map {
                    slot: 0,
                    len: 8,
                    prot: Prot::READ | Prot::WRITE,
                    flags: MapFlags::PRIVATE | MapFlags::ANONYMOUS,
                },
                expect: Expect::NoFault,
            },
            Step {
                op: Operation::Unmap { slot: 0 },
                expect: Expect::NoFault,
            },
        ];
        let mut scenario = Scenario::new("map_unmap");
        assert_eq!(scenario.run(&steps), Outcome::Pass);
    }

    #[test]
    fn a_leaked_region_fails_the_scenario() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [Step {
            op: Operation::Map {
                slot: 0,
                len: 8,
                prot: Prot::READ | Prot::WRITE,
                flags: MapFlags::PRIVATE | MapFlags::ANONYMOUS,
            },
            expect: Expect::NoFault,
        }];
        let mut scenario = Scenario::new("leak");
        assert_eq!(
            scenario.run(&steps),
            Outcome::Fail(Failure {
                step: 1,
                kind: FailureKind::LeakedRegion { slot: 0 },
            })
        );
    }

    #[test]
    fn releasing_an_unmapped_slot_faults() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [
            Step {
                op: Operation::Map {
                    slot: 0,
                    len: 8,
                    prot: Prot::READ | Prot::WRITE,
                    flags: MapFlags::PRIVATE | MapFlags::ANONYMOUS,
                },
                expect: Expect::NoFault,
            },
            Step {
                op: Operation::Unmap { slot: 0 },
                expect: Expect::NoFault,
            },
            Step {
                op: Operation::Unmap { slot: 0 },
                expect: Expect::NoFault,
            },
        ];
        let mut scenario = Scenario::new("double_unmap");
        match scenario.run(&steps) {
            Outcome::Fault(ProbeError::NotMapped { .. }) => {}
            other => panic!("expected a NotMapped fault, got {:?}", other),
        }
    }

    #[test]
    fn syscall_steps_capture_the_raw_result() {
        let _guard = testing::lock();
        testing::reset();

        let marker = b"jump\n";
        let steps = [Step {
            op: Operation::Syscall {
                nr: sysno::WRITE,
                args: ArgList::new(&[1, marker.as_ptr() as usize, marker.len()]),
            },
            expect: Expect::Exact(marker.len()),
        }];
        let mut scenario = Scenario::new("marker");
        assert_eq!(scenario.run(&steps), Outcome::Pass);
        assert_eq!(
            scenario.captured().next(),
            Some(&Captured::Syscall(SyscallResult(5)))
        );
    }

    #[test]
    fn range_predicates_bound_the_captured_value() {
        let _guard = testing::lock();
        testing::reset();

        let steps = [
            Step {
                op: Operation::CsrWrite {
                    addr: csr::MSCRATCH,
                    value: 10,
                },
                expect: Expect::NoFault,
            },
            csr_read(csr::MSCRATCH, Expect::Range(5, 15)),
            csr_read(csr::MSCRATCH, Expect::Range(11, 15)),
        ];
        let mut scenario = Scenario::new("range");
        assert_eq!(
            scenario.run(&steps),
            Outcome::Fail(Failure {
                step: 2,
                kind: FailureKind::Mismatch {
                    actual: 10,
                    expected: Expect::Range(11, 15),
                },
            })
        );
    }
}
