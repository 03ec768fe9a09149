#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(target_arch = "riscv64")]
mod probe {
    use rvprobe::scenario::{Expect, Operation, Scenario, Step};
    use rvprobe::syscall::ArgList;
    use rvprobe_abi::setup_binary;
    use rvprobe_core::sysno;

    setup_binary!(main);

    const MARKER: &[u8] = b"jump\n";

    fn main() -> ! {
        log::info!("emitting loop markers through the raw write syscall");

        let marker = Step {
            op: Operation::Syscall {
                nr: sysno::WRITE,
                args: ArgList::new(&[1, MARKER.as_ptr() as usize, MARKER.len()]),
            },
            expect: Expect::Exact(MARKER.len()),
        };
        let steps = [marker; 5];

        let mut scenario = Scenario::new("write_marker");
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
