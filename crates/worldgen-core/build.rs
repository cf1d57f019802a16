//! Links against the native `platec` (plate-tectonics) solver.
//!
//! Prefers `pkg-config`; falls back to a bare `-lplatec` link directive so
//! builds still work against a solver installed without a `.pc` file (e.g.
//! a vendored build dropped next to the library search path).

fn main() {
    println!("cargo:rerun-if-env-changed=PLATEC_LIB_DIR");

    if pkg_config::Config::new().probe("platec").is_ok() {
        return;
    }

    if let Ok(dir) = std::env::var("PLATEC_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    println!("cargo:rustc-link-lib=dylib=platec");
}
