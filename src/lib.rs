//! Widget packaging library
//!
//! This library provides the pipeline behind the `widget-packager` binary:
//! - validating a `.widget` project layout and building its ignore list
//! - reading `Contents/widget.xml` for the output filename
//! - producing one size-checked zip archive per target resolution
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod metadata;
pub mod packager;
pub mod project;

// Re-export commonly used types
pub use cli::Config;
pub use error::{PackagerError, Result};
pub use packager::{PackagedArtifact, Packager, Resolution};
