//! In-memory fake provider for testing
//!
//! Implements both provider traits without touching the network, and counts
//! every call so tests can assert on idempotency properties.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{CloudError, Result};
use crate::function::{FunctionService, FunctionSpec, RegisteredFunction};
use crate::storage::ObjectStorage;

/// Counts of provider calls for testing assertions
#[derive(Debug, Default, Clone)]
pub struct OperationCounts {
    pub create_bucket: usize,
    pub put_object: usize,
    pub create_function: usize,
}

#[derive(Default)]
struct FakeState {
    buckets: Vec<String>,
    foreign_buckets: HashSet<String>,
    objects: Vec<(String, String)>,
    functions: Vec<FunctionSpec>,
}

/// In-memory provider implementing storage and function registration
#[derive(Clone, Default)]
pub struct FakeCloud {
    state: Arc<RwLock<FakeState>>,
    counts: Arc<RwLock<OperationCounts>>,
}

impl FakeCloud {
    /// Create an empty fake provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create a bucket owned by this account
    pub fn with_owned_bucket(self, bucket: impl Into<String>) -> Self {
        self.state.write().unwrap().buckets.push(bucket.into());
        self
    }

    /// Mark a bucket name as taken by a different account
    pub fn with_foreign_bucket(self, bucket: impl Into<String>) -> Self {
        self.state
            .write()
            .unwrap()
            .foreign_buckets
            .insert(bucket.into());
        self
    }

    /// Operation counts for assertions
    pub fn counts(&self) -> OperationCounts {
        self.counts.read().unwrap().clone()
    }

    /// Buckets that exist in this account
    pub fn buckets(&self) -> Vec<String> {
        self.state.read().unwrap().buckets.clone()
    }

    /// Uploaded `(bucket, key)` pairs
    pub fn objects(&self) -> Vec<(String, String)> {
        self.state.read().unwrap().objects.clone()
    }

    /// Registered function specs
    pub fn functions(&self) -> Vec<FunctionSpec> {
        self.state.read().unwrap().functions.clone()
    }
}

#[async_trait]
impl ObjectStorage for FakeCloud {
    async fn create_bucket(&self, bucket: &str, _region: &str) -> Result<()> {
        {
            let mut counts = self.counts.write().unwrap();
            counts.create_bucket += 1;
        }

        let mut state = self.state.write().unwrap();
        if state.foreign_buckets.contains(bucket) {
            return Err(CloudError::BucketConflict {
                bucket: bucket.to_string(),
            });
        }

        // Re-creating an owned bucket is success, mirroring the provider's
        // idempotent-create behavior
        if !state.buckets.iter().any(|b| b == bucket) {
            state.buckets.push(bucket.to_string());
        }
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        {
            let mut counts = self.counts.write().unwrap();
            counts.put_object += 1;
        }

        if !path.exists() {
            return Err(CloudError::UploadFailed {
                key: key.to_string(),
                message: format!("local file not found: {}", path.display()),
            });
        }

        let mut state = self.state.write().unwrap();
        state.objects.push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[async_trait]
impl FunctionService for FakeCloud {
    async fn create_function(&self, spec: &FunctionSpec) -> Result<RegisteredFunction> {
        {
            let mut counts = self.counts.write().unwrap();
            counts.create_function += 1;
        }

        let mut state = self.state.write().unwrap();
        if state
            .functions
            .iter()
            .any(|f| f.function_name == spec.function_name)
        {
            return Err(CloudError::FunctionConflict {
                name: spec.function_name.clone(),
            });
        }

        state.functions.push(spec.clone());
        Ok(RegisteredFunction {
            name: spec.function_name.clone(),
            arn: Some(format!(
                "arn:aws:lambda:fake:000000000000:function:{}",
                spec.function_name
            )),
        })
    }
}
