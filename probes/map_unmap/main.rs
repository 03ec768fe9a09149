#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(target_arch = "riscv64")]
mod probe {
    use rvprobe::scenario::{Expect, Operation, Scenario, Step};
    use rvprobe::syscall::{MapFlags, Prot};
    use rvprobe_abi::setup_binary;

    setup_binary!(main);

    fn main() -> ! {
        log::info!("mapping then releasing a small anonymous region");

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
