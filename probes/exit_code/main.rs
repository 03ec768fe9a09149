#![cfg_attr(target_arch = "riscv64", no_std)]
#![cfg_attr(target_arch = "riscv64", no_main)]

#[cfg(target_arch = "riscv64")]
mod probe {
    use rvprobe_abi::setup_binary;

    setup_binary!(main);

    fn main() -> ! {
        // The exit trap is a terminal transition: nothing after this line runs. The runner
        // observes the code from the sub-process boundary, which is the only place it can be
        // observed from.
        log::info!("exiting with code 0, control never comes back");
        rvprobe::syscall::exit(0);
    }
}

#[cfg(not(target_arch = "riscv64"))]
fn main() {
    // Probes are cross-built for the RISC-V target; this stub keeps host builds of the
    // workspace linking.
}
