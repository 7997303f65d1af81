// Copyright © 2024 Menagerie. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build script: refuses compilers older than the declared `rust-version`.

/// Minimum supported Rust version, kept in step with `Cargo.toml`.
const MIN_VERSION: &str = "1.70.0";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    match version_check::is_min_version(MIN_VERSION) {
        Some(true) => {}
        _ => {
            eprintln!(
                "'menagerie' requires Rustc version >= {}",
                MIN_VERSION
            );
            std::process::exit(1);
        }
    }
}
