//! Project configuration and loading
//!
//! The configuration lives in `mlpub.yaml` at the project root. It names the
//! model artifact, an optional pre-processing script, and the target platform
//! together with that platform's parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Name of the configuration file at the project root
pub const CONFIG_FILE_NAME: &str = "mlpub.yaml";

/// Reserved working directory for staging and archives
///
/// Excluded from packaging so repeated runs never archive their own output.
pub const WORK_DIR_NAME: &str = ".mlpub";

/// The mlpub project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Project name, used to derive bucket and function names
    pub name: String,

    /// Path to the model artifact, relative to the project root
    pub model_path: String,

    /// Optional pre-processing script; absent means the default no-op
    /// pre-processor shipped with the runtime template
    #[serde(default)]
    pub pre_processor: Option<String>,

    /// Target platform and its parameters
    #[serde(flatten)]
    pub platform: PlatformConfig,
}

/// Platform selection with per-platform parameters
///
/// Exactly one variant is populated, matching the `platform` tag. An unknown
/// tag is a parse error, never a silent default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", content = "platform_extras", rename_all = "kebab-case")]
pub enum PlatformConfig {
    /// Zip bundle uploaded to S3 and registered as a Lambda function
    AwsLambda(LambdaExtras),

    /// Docker image pushed to a container registry
    AwsContainer(ContainerExtras),
}

impl PlatformConfig {
    /// Region of the active platform
    pub fn region(&self) -> &str {
        match self {
            PlatformConfig::AwsLambda(extras) => &extras.region,
            PlatformConfig::AwsContainer(extras) => &extras.region,
        }
    }

    /// The platform tag as it appears in the config file
    pub fn label(&self) -> &'static str {
        match self {
            PlatformConfig::AwsLambda(_) => "aws-lambda",
            PlatformConfig::AwsContainer(_) => "aws-container",
        }
    }
}

/// Parameters for the Lambda deployment path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaExtras {
    /// Target region
    pub region: String,

    /// Artifact bucket; absent means one is provisioned on the first run
    /// and written back into the configuration
    #[serde(default)]
    pub bucket: Option<String>,

    /// Function runtime identifier
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Entry point within the bundle
    #[serde(default = "default_handler")]
    pub handler: String,

    /// Memory size in MB
    #[serde(default = "default_memory_size")]
    pub memory_size: i32,

    /// Invocation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: i32,

    /// Execution role ARN; must pre-exist, mlpub never creates roles
    #[serde(default)]
    pub role: String,

    /// Layer ARNs attached to the function
    #[serde(default)]
    pub layers: Vec<String>,
}

impl LambdaExtras {
    /// Fresh default parameters for a region
    ///
    /// Returns a new value on every call so callers never alias a shared
    /// default across runs.
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            bucket: None,
            runtime: default_runtime(),
            handler: default_handler(),
            memory_size: default_memory_size(),
            timeout: default_timeout(),
            role: String::new(),
            layers: Vec::new(),
        }
    }
}

fn default_runtime() -> String {
    "python3.11".to_string()
}

fn default_handler() -> String {
    "main.handler".to_string()
}

fn default_memory_size() -> i32 {
    128
}

fn default_timeout() -> i32 {
    30
}

/// Parameters for the container deployment path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerExtras {
    /// Target region
    pub region: String,

    /// Registry URI; absent means the account's default registry for the
    /// project name
    #[serde(default)]
    pub registry: Option<String>,
}

impl DeployConfig {
    /// Load and validate the configuration for a project root
    pub fn load<P: AsRef<Path>>(project_root: P) -> Result<Self> {
        let path = project_root.as_ref().join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Self::load_from(&path)
    }

    /// Load and validate a configuration file at a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Persist the configuration back to a project root
    pub fn save<P: AsRef<Path>>(&self, project_root: P) -> Result<()> {
        self.save_to(&project_root.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Persist the configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate structural requirements
    ///
    /// Role presence is deliberately not checked here: registration is where
    /// an empty role becomes fatal, after packaging and provisioning.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField {
                field: "name".to_string(),
            });
        }
        if self.model_path.trim().is_empty() {
            return Err(CoreError::MissingField {
                field: "model_path".to_string(),
            });
        }
        match &self.platform {
            PlatformConfig::AwsLambda(extras) => {
                if extras.region.trim().is_empty() {
                    return Err(CoreError::MissingField {
                        field: "platform_extras.region".to_string(),
                    });
                }
                if extras.runtime.trim().is_empty() {
                    return Err(CoreError::MissingField {
                        field: "platform_extras.runtime".to_string(),
                    });
                }
            }
            PlatformConfig::AwsContainer(extras) => {
                if extras.region.trim().is_empty() {
                    return Err(CoreError::MissingField {
                        field: "platform_extras.region".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Configured bucket for the Lambda path, if any
    pub fn bucket(&self) -> Option<&str> {
        match &self.platform {
            PlatformConfig::AwsLambda(extras) => {
                extras.bucket.as_deref().filter(|b| !b.is_empty())
            }
            PlatformConfig::AwsContainer(_) => None,
        }
    }

    /// Record a provisioned bucket on the Lambda variant
    pub fn set_bucket(&mut self, bucket: impl Into<String>) {
        if let PlatformConfig::AwsLambda(extras) = &mut self.platform {
            extras.bucket = Some(bucket.into());
        }
    }
}
