//! Serverless function seam and the Lambda implementation

use async_trait::async_trait;
use aws_sdk_lambda::types::{FunctionCode, Runtime};
use tracing::{debug, info};

use crate::error::{CloudError, Result};

/// Everything the provider needs to register a function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    /// Function name (project name plus uniqueness suffix)
    pub function_name: String,

    /// Bucket holding the uploaded bundle
    pub bucket: String,

    /// Key of the uploaded bundle
    pub key: String,

    /// Runtime identifier, passed through verbatim
    pub runtime: String,

    /// Entry point within the bundle
    pub handler: String,

    /// Pre-existing execution role ARN
    pub role: String,

    /// Memory size in MB
    pub memory_size: i32,

    /// Invocation timeout in seconds
    pub timeout: i32,

    /// Layer ARNs
    pub layers: Vec<String>,
}

/// The registered function as reported by the provider
#[derive(Debug, Clone)]
pub struct RegisteredFunction {
    pub name: String,
    pub arn: Option<String>,
}

/// Function registration service
#[async_trait]
pub trait FunctionService: Send + Sync {
    /// Register a function pointing at an uploaded bundle
    ///
    /// The function is published as part of the same call; there is no
    /// separate activation step.
    async fn create_function(&self, spec: &FunctionSpec) -> Result<RegisteredFunction>;
}

/// Lambda-backed function service
pub struct LambdaService {
    client: aws_sdk_lambda::Client,
}

impl LambdaService {
    /// Build a client for a region using the ambient credential chain
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: aws_sdk_lambda::Client::new(&sdk_config),
        }
    }

    /// Wrap an existing client (used with custom endpoints)
    pub fn with_client(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionService for LambdaService {
    async fn create_function(&self, spec: &FunctionSpec) -> Result<RegisteredFunction> {
        debug!(
            function = %spec.function_name,
            bucket = %spec.bucket,
            key = %spec.key,
            runtime = %spec.runtime,
            "registering function"
        );

        let code = FunctionCode::builder()
            .s3_bucket(&spec.bucket)
            .s3_key(&spec.key)
            .build();

        let mut request = self
            .client
            .create_function()
            .function_name(&spec.function_name)
            .runtime(Runtime::from(spec.runtime.as_str()))
            .handler(&spec.handler)
            .role(&spec.role)
            .code(code)
            .memory_size(spec.memory_size)
            .timeout(spec.timeout)
            .publish(true);

        if !spec.layers.is_empty() {
            request = request.set_layers(Some(spec.layers.clone()));
        }

        let output = request.send().await.map_err(|err| {
            let service_err = err.into_service_error();
            if service_err.is_resource_conflict_exception() {
                CloudError::FunctionConflict {
                    name: spec.function_name.clone(),
                }
            } else {
                CloudError::Provider {
                    message: service_err.to_string(),
                }
            }
        })?;

        let registered = RegisteredFunction {
            name: output
                .function_name()
                .unwrap_or(&spec.function_name)
                .to_string(),
            arn: output.function_arn().map(str::to_string),
        };

        info!(function = %registered.name, "function registered and published");
        Ok(registered)
    }
}
