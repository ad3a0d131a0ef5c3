//! mlpub Package - turns a project tree into a runnable zip bundle
//!
//! The packaging pipeline copies the project into a staging directory
//! (excluding the reserved `.mlpub` working directory), vendors declared
//! dependencies next to the source so the runtime's import resolution finds
//! them, and writes every staged file into a zip archive whose root is the
//! function's execution root.

pub mod archive;
pub mod build;
pub mod error;
pub mod installer;
pub mod staging;

pub use archive::{archive_digest, write_zip_archive};
pub use build::build_archive;
pub use error::{PackageError, Result};
pub use installer::find_installer;
pub use staging::StagingArtifact;
