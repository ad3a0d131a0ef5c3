//! mlpub Deploy - the deployment orchestrator
//!
//! Sequences one deployment run through its states:
//!
//! ```text
//! Validated -> Packaged -> Provisioned -> Uploaded -> Registered -> Done
//! ```
//!
//! with `Failed` absorbing any error. Transitions are strictly forward; a
//! failed run is re-invoked from `Validated`. Container targets branch off at
//! `Validated` into the Docker build-and-push path.

pub mod deployment;
pub mod error;
pub mod state;

pub use deployment::{DeployOutcome, Deployment};
pub use error::{DeployError, Result};
pub use state::DeployState;
