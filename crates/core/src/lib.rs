//! Probe harness core definitions
//!
//! This crate's purpose is to hold constants shared between the probe binaries and the host
//! tooling. In particular, this crate does not hold any code, this is important as not all code
//! is portable, but the definitions here can be used in lots of different contexts (in the
//! probes themselves, from the runner, or from external tooling).

#![no_std]

// —————————————————————————— Target Syscall ABI ———————————————————————————— //

/// The riscv64 Linux syscall numbers the harness knows about.
///
/// Arguments go in `a0` to `a5` in order, the number in `a7`, and the result comes back in
/// `a0`. Porting the harness to another target means updating this table only.
pub mod sysno {
    pub const WRITE: usize = 64; // write(fd, buf, count) -> count
    pub const EXIT: usize = 93; // exit(code) -> !
    pub const EXIT_GROUP: usize = 94; // exit_group(code) -> !
    pub const MUNMAP: usize = 215; // munmap(addr, len) -> 0
    pub const MMAP: usize = 222; // mmap(addr, len, prot, flags, fd, offset) -> addr

    /// The fixed argument arity of a syscall, or `None` when the harness has no entry for the
    /// number. Numbers without an entry are passed through unchecked and the target answers
    /// (typically with -ENOSYS).
    pub const fn arity(nr: usize) -> Option<usize> {
        match nr {
            WRITE => Some(3),
            EXIT | EXIT_GROUP => Some(1),
            MUNMAP => Some(2),
            MMAP => Some(6),
            _ => None,
        }
    }

    /// Result values in `ERROR_WINDOW..0` carry a target error code in `a0`.
    pub const ERROR_WINDOW: isize = -4095;
}

// ——————————————————————————— Memory Mapping Bits —————————————————————————— //

/// `mmap` protection and mapping flag values for the target.
pub mod mem {
    pub const PROT_READ: usize = 0x1;
    pub const PROT_WRITE: usize = 0x2;
    pub const PROT_EXEC: usize = 0x4;

    pub const MAP_SHARED: usize = 0x01;
    pub const MAP_PRIVATE: usize = 0x02;
    pub const MAP_ANONYMOUS: usize = 0x20;
}

// ————————————————————————————— CSR Addresses —————————————————————————————— //

/// The CSR addresses the bundled probes use.
///
/// CSR addresses are target-defined; the accessor treats them as opaque integers and this
/// module only names the handful that appear in the shipped scenarios.
pub mod csr {
    /// Machine performance-monitoring event selector 3.
    pub const MHPMEVENT3: u16 = 0x323;
    /// Machine scratch register.
    pub const MSCRATCH: u16 = 0x340;
    /// Machine performance-monitoring counter 3.
    pub const MHPMCOUNTER3: u16 = 0xb03;
    /// User-mode cycle counter.
    pub const CYCLE: u16 = 0xc00;
    /// User-mode timer.
    pub const TIME: u16 = 0xc01;
    /// User-mode instructions-retired counter.
    pub const INSTRET: u16 = 0xc02;
    /// User-mode alias of performance-monitoring counter 3.
    pub const HPMCOUNTER3: u16 = 0xc03;

    /// Event code selecting retired branch instructions on the bring-up target.
    pub const EVENT_BRANCH: usize = 0x6;
}

// ———————————————————————————— Exit Code Protocol —————————————————————————— //

/// Process exit codes a probe reports its scenario outcome with.
///
/// The runner reads these back from the sub-process boundary; a probe killed by a signal (a
/// trap the environment turned into an abort) counts as a fault as well.
pub mod exit_code {
    pub const PASS: usize = 0;
    pub const FAIL: usize = 1;
    pub const FAULT: usize = 2;
    /// A probe panic, reported by the runtime's panic handler.
    pub const PANIC: usize = 3;
}
