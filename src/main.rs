//! Widget Packager - per-resolution zip packaging for .widget projects.
//!
//! This binary copies a widget project to scratch space, strips hidden,
//! ignored and off-resolution files, and zips the result once per target
//! resolution.

use std::process;

fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match widget_packager::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
