use std::env;
use std::fs;
use std::path::PathBuf;

/// Timing overrides accepted from the build environment
const TIMING_VARS: [&str; 5] = [
    "SIGNAL_MIN_GO_MS",
    "SIGNAL_MAX_GO_MS",
    "SIGNAL_PER_VEHICLE_MS",
    "SIGNAL_CAUTION_MS",
    "SIGNAL_LOG_INTERVAL_MS",
];

fn main() {
    // Read timing overrides from environment variables (optional)
    // Unset variables are exported empty so env!() always resolves
    for name in TIMING_VARS {
        match env::var(name) {
            Ok(value) => {
                println!("cargo:rustc-env={}={}", name, value);
                println!("cargo:warning=Using {} from environment: {}", name, value);
            }
            Err(_) => println!("cargo:rustc-env={}=", name),
        }
    }

    // Rerun if environment variables change
    for name in TIMING_VARS {
        println!("cargo:rerun-if-env-changed={}", name);
    }
    println!("cargo:rerun-if-changed=build.rs");

    // Board linker script, only for the RP2350 Arm target
    if env::var("TARGET").is_ok_and(|target| target.starts_with("thumbv8m")) {
        link_board_memory();
    }
}

fn link_board_memory() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=memory.x");
}
