//! Build script: tells the arm variant whether the target runs in Thumb state.

use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(coswitch_thumb)");
    println!("cargo:rerun-if-changed=build.rs");

    let target = env::var("TARGET").expect("TARGET not set");
    if target.starts_with("thumb") {
        println!("cargo:rustc-cfg=coswitch_thumb");
    }
}
