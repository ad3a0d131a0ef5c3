//! One deployment run

use std::path::PathBuf;

use mlpub_cloud::{FunctionService, FunctionSpec, ObjectStorage};
use mlpub_core::{bucket_name, function_name, DeployConfig, LambdaExtras, PlatformConfig};
use mlpub_package::{build_archive, StagingArtifact};
use tracing::{info, warn};

use crate::error::Result;
use crate::state::DeployState;

/// Result of a finished run
#[derive(Debug, Clone)]
pub enum DeployOutcome {
    /// A serverless function is live
    Function {
        name: String,
        arn: Option<String>,
        bucket: String,
        key: String,
    },

    /// A container image was pushed
    Image { image: String },
}

/// A single deployment run over a validated configuration
///
/// Owns the configuration record for the duration of the run and persists
/// any mutation (an auto-provisioned bucket name) back to `mlpub.yaml` before
/// the next step starts, so a retried run never creates a second bucket.
///
/// There is no rollback: resources created by earlier steps stay in place
/// when a later step fails.
pub struct Deployment<S, F> {
    project_root: PathBuf,
    config: DeployConfig,
    storage: S,
    functions: F,
    state: DeployState,
}

impl<S: ObjectStorage, F: FunctionService> Deployment<S, F> {
    /// Start a run in the `Validated` entry state
    pub fn new(
        project_root: impl Into<PathBuf>,
        config: DeployConfig,
        storage: S,
        functions: F,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            storage,
            functions,
            state: DeployState::Validated,
        }
    }

    /// Current run state
    pub fn state(&self) -> DeployState {
        self.state
    }

    /// The configuration record, including any write-back
    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Execute the run to a terminal state
    pub async fn run(&mut self) -> Result<DeployOutcome> {
        let result = self.execute().await;
        if result.is_err() {
            self.state = DeployState::Failed;
        }
        result
    }

    async fn execute(&mut self) -> Result<DeployOutcome> {
        self.config.validate()?;

        match self.config.platform.clone() {
            PlatformConfig::AwsLambda(extras) => self.deploy_function(extras).await,
            PlatformConfig::AwsContainer(extras) => {
                let image = mlpub_cloud::build_and_push(
                    &self.project_root,
                    &self.config.name,
                    extras.registry.as_deref(),
                )
                .await?;
                self.state = DeployState::Done;
                Ok(DeployOutcome::Image { image })
            }
        }
    }

    async fn deploy_function(&mut self, extras: LambdaExtras) -> Result<DeployOutcome> {
        let artifact = build_archive(&self.project_root, &self.config).await?;
        self.state = DeployState::Packaged;

        let result = self.provision_upload_register(&artifact, &extras).await;

        // Local staging never outlives the run, whether it succeeded or not
        if let Err(err) = artifact.cleanup() {
            warn!(error = %err, "failed to remove staging files");
        }

        result
    }

    async fn provision_upload_register(
        &mut self,
        artifact: &StagingArtifact,
        extras: &LambdaExtras,
    ) -> Result<DeployOutcome> {
        // Provision: a configured bucket makes this a pure no-op
        let bucket = match self.config.bucket() {
            Some(existing) => existing.to_string(),
            None => {
                let derived = bucket_name(&self.config.name);
                self.storage.create_bucket(&derived, &extras.region).await?;
                self.config.set_bucket(&derived);
                self.config.save(&self.project_root)?;
                info!(bucket = %derived, "bucket provisioned and written back");
                derived
            }
        };
        self.state = DeployState::Provisioned;

        // Upload under the archive's own generated name
        let key = artifact.archive_file_name();
        self.storage
            .put_object(&bucket, &key, &artifact.archive_path)
            .await?;
        self.state = DeployState::Uploaded;

        // Register; roles must pre-exist, they are never created here
        if extras.role.trim().is_empty() {
            return Err(mlpub_cloud::CloudError::MissingRole.into());
        }

        let spec = FunctionSpec {
            function_name: function_name(&self.config.name),
            bucket: bucket.clone(),
            key: key.clone(),
            runtime: extras.runtime.clone(),
            handler: extras.handler.clone(),
            role: extras.role.clone(),
            memory_size: extras.memory_size,
            timeout: extras.timeout,
            layers: extras.layers.clone(),
        };
        let registered = self.functions.create_function(&spec).await?;
        self.state = DeployState::Registered;

        info!(function = %registered.name, state = %DeployState::Done, "deployment finished");
        self.state = DeployState::Done;
        Ok(DeployOutcome::Function {
            name: registered.name,
            arn: registered.arn,
            bucket,
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlpub_cloud::{CloudError, FakeCloud};
    use mlpub_core::WORK_DIR_NAME;
    use std::path::Path;
    use tempfile::TempDir;

    fn lambda_config(role: &str, bucket: Option<&str>) -> DeployConfig {
        let mut extras = LambdaExtras::for_region("eu-central-1");
        extras.role = role.to_string();
        extras.bucket = bucket.map(str::to_string);
        DeployConfig {
            name: "demo".to_string(),
            model_path: "model.bin".to_string(),
            pre_processor: None,
            platform: PlatformConfig::AwsLambda(extras),
        }
    }

    fn write_project(root: &Path, config: &DeployConfig) {
        std::fs::create_dir_all(root).unwrap();
        std::fs::write(root.join("model.bin"), [42u8; 8]).unwrap();
        std::fs::write(root.join("requirements.txt"), "").unwrap();
        config.save(root).unwrap();
    }

    fn staging_leftovers(root: &Path) -> usize {
        let work_dir = root.join(WORK_DIR_NAME);
        if !work_dir.exists() {
            return 0;
        }
        std::fs::read_dir(&work_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                name.starts_with("staging-") || name.ends_with(".zip")
            })
            .count()
    }

    #[tokio::test]
    async fn test_end_to_end_run_reaches_done() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config("arn:aws:iam::000000000000:role/demo", None);
        write_project(&root, &config);

        let fake = FakeCloud::new();
        let mut deployment =
            Deployment::new(&root, config, fake.clone(), fake.clone());
        let outcome = deployment.run().await.unwrap();

        assert_eq!(deployment.state(), DeployState::Done);
        match outcome {
            DeployOutcome::Function { name, bucket, key, .. } => {
                assert!(name.starts_with("demo-function-"));
                assert_eq!(bucket, "demo-mlpub-bucket");
                assert!(key.starts_with("demo-") && key.ends_with(".zip"));
            }
            DeployOutcome::Image { .. } => panic!("expected function outcome"),
        }

        assert_eq!(fake.buckets(), vec!["demo-mlpub-bucket"]);
        assert_eq!(fake.counts().create_bucket, 1);
        assert_eq!(fake.counts().put_object, 1);
        assert_eq!(fake.counts().create_function, 1);

        // Staging and archive are gone after the upload
        assert_eq!(staging_leftovers(&root), 0);
    }

    #[tokio::test]
    async fn test_preconfigured_bucket_skips_provisioning() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config(
            "arn:aws:iam::000000000000:role/demo",
            Some("demo-mlpub-bucket"),
        );
        write_project(&root, &config);

        let fake = FakeCloud::new().with_owned_bucket("demo-mlpub-bucket");
        let mut deployment =
            Deployment::new(&root, config, fake.clone(), fake.clone());
        deployment.run().await.unwrap();

        // Pure no-op: zero creation calls
        assert_eq!(fake.counts().create_bucket, 0);
        assert_eq!(fake.counts().put_object, 1);
    }

    #[tokio::test]
    async fn test_bucket_write_back_is_persisted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config("arn:aws:iam::000000000000:role/demo", None);
        write_project(&root, &config);

        let fake = FakeCloud::new();
        let mut deployment =
            Deployment::new(&root, config, fake.clone(), fake.clone());
        deployment.run().await.unwrap();

        let persisted = DeployConfig::load(&root).unwrap();
        assert_eq!(persisted.bucket(), Some("demo-mlpub-bucket"));

        // The persisted bucket is the one upload and registration used
        let (upload_bucket, _) = fake.objects().into_iter().next().unwrap();
        assert_eq!(upload_bucket, "demo-mlpub-bucket");
        assert_eq!(fake.functions()[0].bucket, "demo-mlpub-bucket");
    }

    #[tokio::test]
    async fn test_uploaded_key_matches_registered_key() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config("arn:aws:iam::000000000000:role/demo", None);
        write_project(&root, &config);

        let fake = FakeCloud::new();
        let mut deployment =
            Deployment::new(&root, config, fake.clone(), fake.clone());
        deployment.run().await.unwrap();

        let (_, uploaded_key) = fake.objects().into_iter().next().unwrap();
        assert_eq!(fake.functions()[0].key, uploaded_key);
    }

    #[tokio::test]
    async fn test_empty_role_fails_at_registration_without_rollback() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config("", None);
        write_project(&root, &config);

        let fake = FakeCloud::new();
        let mut deployment =
            Deployment::new(&root, config, fake.clone(), fake.clone());
        let result = deployment.run().await;

        assert!(matches!(
            result,
            Err(crate::DeployError::Cloud(CloudError::MissingRole))
        ));
        assert_eq!(deployment.state(), DeployState::Failed);

        // Earlier steps are not rolled back
        assert_eq!(fake.buckets(), vec!["demo-mlpub-bucket"]);
        assert_eq!(fake.objects().len(), 1);
        assert!(fake.functions().is_empty());

        // The write-back survives the failed run, so a retry reuses the bucket
        let persisted = DeployConfig::load(&root).unwrap();
        assert_eq!(persisted.bucket(), Some("demo-mlpub-bucket"));
    }

    #[tokio::test]
    async fn test_provisioning_conflict_aborts_and_cleans_staging() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config("arn:aws:iam::000000000000:role/demo", None);
        write_project(&root, &config);

        let fake = FakeCloud::new().with_foreign_bucket("demo-mlpub-bucket");
        let mut deployment =
            Deployment::new(&root, config, fake.clone(), fake.clone());
        let result = deployment.run().await;

        assert!(matches!(
            result,
            Err(crate::DeployError::Cloud(CloudError::BucketConflict { .. }))
        ));
        assert_eq!(deployment.state(), DeployState::Failed);
        assert_eq!(fake.counts().put_object, 0);
        assert_eq!(staging_leftovers(&root), 0);
    }

    #[tokio::test]
    async fn test_missing_manifest_fails_before_any_remote_call() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config("arn:aws:iam::000000000000:role/demo", None);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("model.bin"), [0u8; 4]).unwrap();
        config.save(&root).unwrap();

        let fake = FakeCloud::new();
        let mut deployment =
            Deployment::new(&root, config, fake.clone(), fake.clone());
        let result = deployment.run().await;

        assert!(result.is_err());
        assert_eq!(fake.counts().create_bucket, 0);
        assert_eq!(fake.counts().put_object, 0);
        assert_eq!(fake.counts().create_function, 0);
    }

    #[tokio::test]
    async fn test_retry_after_failure_does_not_create_second_bucket() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        let config = lambda_config("", None);
        write_project(&root, &config);

        let fake = FakeCloud::new();
        let mut first = Deployment::new(&root, config, fake.clone(), fake.clone());
        assert!(first.run().await.is_err());
        assert_eq!(fake.counts().create_bucket, 1);

        // A re-run starts from Validated with the persisted configuration
        let mut retry_config = DeployConfig::load(&root).unwrap();
        if let PlatformConfig::AwsLambda(extras) = &mut retry_config.platform {
            extras.role = "arn:aws:iam::000000000000:role/demo".to_string();
        }
        let mut second = Deployment::new(&root, retry_config, fake.clone(), fake.clone());
        second.run().await.unwrap();

        // Still exactly one creation call: the bucket name was written back
        assert_eq!(fake.counts().create_bucket, 1);
        assert_eq!(fake.buckets().len(), 1);
    }
}
