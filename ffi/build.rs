//! Generate `jobs_ffi.h` from the `extern "C"` surface into `OUT_DIR`.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        println!("cargo:warning=CARGO_MANIFEST_DIR or OUT_DIR unset; skipping header");
        return;
    };
    let header = PathBuf::from(out_dir).join("jobs_ffi.h");

    let result = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("JOBS_FFI_H")
        .with_pragma_once(true)
        .generate();

    // Best effort: the library still builds without a header.
    match result {
        Ok(bindings) => {
            bindings.write_to_file(&header);
        }
        Err(e) => println!("cargo:warning=cbindgen failed: {e}"),
    }
}
