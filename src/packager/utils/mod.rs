//! Filesystem and formatting helpers shared by the packager.

pub mod fs;
pub mod size;

pub use size::{DEFAULT_PRECISION, format_bytes};
