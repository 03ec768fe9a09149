#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(target_arch = "riscv64")]
mod probe {
    use rvprobe::scenario::{Expect, Operation, Scenario, Step};
    use rvprobe_abi::setup_binary;
    use rvprobe_core::csr;

    setup_binary!(main);

    fn main() -> ! {
        log::info!("programming mhpmevent3 with the branch event, watching mhpmcounter3");

        // One write to the event selector, then ten counter observations. The runner's own
        // step loop retires branches between reads, so a live counter must not step back.
        let mut steps = [Step {
            op: Operation::CsrRead {
                addr: csr::MHPMCOUNTER3,
            },
            expect: Expect::NonDecreasing,
        }; 11];
        steps[0] = Step {
            op: Operation::CsrWrite {
                addr: csr::MHPMEVENT3,
                value: csr::EVENT_BRANCH,
            },
            expect: Expect::NoFault,
        };

        let mut scenario = Scenario::new("perf_counters");
        scenario.run(&steps);
        scenario.emit();
        rvprobe_abi::exit(scenario.exit_status());
    }
}

#[cfg(not(target_arch = "riscv64"))]
fn main() {
    // Probes are cross-built for the RISC-V target; this stub keeps host builds of the
    // workspace linking.
}
