#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(target_arch = "riscv64")]
mod probe {
    use rvprobe::scenario::{Expect, Operation, Scenario, Step};
    use rvprobe_abi::setup_binary;

    setup_binary!(main);

    fn main() -> ! {
        log::info!("touching a CSR address outside the harness table");

        // 0x7c0 is a custom-extension address no supported target implements; the access must
        // surface as a fault, never as a pass.
        let steps = [Step {
            op: Operation::CsrRead { addr: 0x7c0 },
            expect: Expect::NoFault,
        }];

        let mut scenario = Scenario::new("bad_csr");
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
