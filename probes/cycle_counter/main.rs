#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(target_arch = "riscv64")]
mod probe {
    use rvprobe::scenario::{Expect, Operation, Scenario, Step};
    use rvprobe_abi::setup_binary;
    use rvprobe_core::csr;

    setup_binary!(main);

    fn main() -> ! {
        log::info!("reading the cycle counter, expecting it never to step back");

        let steps = [Step {
            op: Operation::CsrRead { addr: csr::CYCLE },
            expect: Expect::NonDecreasing,
        }; 10];

        let mut scenario = Scenario::new("cycle_counter");
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
