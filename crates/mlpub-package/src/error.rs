//! Packaging error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Project root not found: {path}")]
    ProjectRootNotFound { path: String },

    #[error("Model artifact not found: {path}")]
    ModelNotFound { path: String },

    #[error("Dependency manifest not found: {path}")]
    ManifestNotFound { path: String },

    #[error("No dependency installer found on PATH (tried: {candidates})")]
    InstallerNotFound { candidates: String },

    #[error("Dependency install failed (exit code {code}): {stderr}")]
    InstallFailed { code: i32, stderr: String },

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PackageError>;
