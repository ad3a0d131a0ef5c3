//! Orchestrator error type
//!
//! Every step error is terminal to the run; the first error stops all
//! further steps and is reported once.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] mlpub_core::CoreError),

    #[error(transparent)]
    Package(#[from] mlpub_package::PackageError),

    #[error(transparent)]
    Cloud(#[from] mlpub_cloud::CloudError),
}

pub type Result<T> = std::result::Result<T, DeployError>;
