//! Error types for provider operations

use thiserror::Error;

/// Provider operation errors
#[derive(Debug, Error)]
pub enum CloudError {
    // ============ Storage Errors ============
    #[error("Bucket name already taken by another account: {bucket}")]
    BucketConflict { bucket: String },

    #[error("Upload failed for key '{key}': {message}")]
    UploadFailed { key: String, message: String },

    // ============ Function Errors ============
    #[error("A function named '{name}' already exists")]
    FunctionConflict { name: String },

    #[error("No execution role configured; set platform_extras.role to a pre-existing role")]
    MissingRole,

    // ============ Container Errors ============
    #[error("Docker not found on PATH")]
    DockerNotFound,

    #[error("Docker build failed: {stderr}")]
    DockerBuildFailed { stderr: String },

    #[error("Docker push failed: {stderr}")]
    DockerPushFailed { stderr: String },

    #[error("Container build abandoned after {seconds}s")]
    BuildTimeout { seconds: u64 },

    // ============ Provider / IO ============
    #[error("Provider error: {message}")]
    Provider { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, CloudError>;
