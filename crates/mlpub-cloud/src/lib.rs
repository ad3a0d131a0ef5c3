//! mlpub Cloud - provider clients behind narrow trait seams
//!
//! The orchestrator talks to two traits: [`ObjectStorage`] for the artifact
//! bucket and [`FunctionService`] for function registration. AWS
//! implementations live in [`storage`] and [`function`]; [`fake`] provides an
//! in-memory provider with operation counters for tests. The container
//! deployment path (Docker build + registry push) lives in [`docker`].

pub mod docker;
pub mod error;
pub mod fake;
pub mod function;
pub mod storage;

pub use docker::build_and_push;
pub use error::{CloudError, Result};
pub use fake::{FakeCloud, OperationCounts};
pub use function::{FunctionService, FunctionSpec, LambdaService, RegisteredFunction};
pub use storage::{ObjectStorage, S3Storage};
