use std::{env, fs, path::PathBuf};

use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // The management core. Everything else is a host build, which runs against the simulator.
        vexriscv: { all(target_arch = "riscv32", target_os = "none") },
    }

    // Put the memory layout where the linker can find it when building the firmware image.
    if env::var_os("CARGO_FEATURE_RT").is_some() {
        let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
        fs::copy("memory.x", out.join("memory.x")).unwrap();
        println!("cargo:rustc-link-search={}", out.display());
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
