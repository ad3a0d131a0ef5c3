//! mlpub Core - Core types for the ML model deployment pipeline
//!
//! This crate provides the foundational types used throughout mlpub:
//! - `DeployConfig`: The project configuration (`mlpub.yaml`)
//! - `PlatformConfig`: Per-platform deployment parameters
//! - Resource-name derivation for buckets, functions, and archives

pub mod config;
pub mod error;
pub mod naming;

pub use config::{
    ContainerExtras, DeployConfig, LambdaExtras, PlatformConfig, CONFIG_FILE_NAME, WORK_DIR_NAME,
};
pub use error::{CoreError, Result};
pub use naming::{archive_name, bucket_name, function_name, random_token};
