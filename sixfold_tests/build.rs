// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build step.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=SIXFOLD_CI_GPU_SUPPORT");
    println!("cargo:rustc-check-cfg=cfg(skip_gpu_tests)");
    // GPU tests only run where a device is known to be available.
    match env::var("SIXFOLD_CI_GPU_SUPPORT") {
        Ok(mut value) => {
            value.make_ascii_lowercase();
            match &*value {
                "yes" | "y" => {}
                "no" | "n" => {
                    println!("cargo:rustc-cfg=skip_gpu_tests");
                }
                _ => {
                    println!("cargo:warning=SIXFOLD_CI_GPU_SUPPORT should be set to yes/y or no/n");
                    println!("cargo:rustc-cfg=skip_gpu_tests");
                }
            }
        }
        Err(_) => {
            println!("cargo:rustc-cfg=skip_gpu_tests");
        }
    }
}
