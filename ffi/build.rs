//! Generate `include/thyme.h` for the Swift host.

use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let include_dir = crate_dir.join("include");

    println!("cargo:rerun-if-changed=src");

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("THYME_FFI_H")
        .with_no_includes()
        .with_sys_include("stdbool.h")
        .with_sys_include("stdint.h")
        .generate();

    // Header generation is best-effort; the library itself does not need it.
    match bindings {
        Ok(bindings) => {
            let _ = std::fs::create_dir_all(&include_dir);
            bindings.write_to_file(include_dir.join("thyme.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen could not generate thyme.h: {e}"),
    }
}
