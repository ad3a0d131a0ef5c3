//! Object storage seam and the S3 implementation

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use tracing::{debug, info};

use crate::error::{CloudError, Result};

/// Durable storage for deployment artifacts
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create a bucket, treating "already owned by you" as success
    ///
    /// Creation is not preceded by a listing check; the provider's own
    /// idempotent-create response is the source of truth.
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<()>;

    /// Stream a local file into the bucket under the given key
    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<()>;
}

/// S3-backed storage
pub struct S3Storage {
    client: aws_sdk_s3::Client,
}

impl S3Storage {
    /// Build a client for a region using the ambient credential chain
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
        }
    }

    /// Wrap an existing client (used with custom endpoints)
    pub fn with_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<()> {
        debug!(bucket = %bucket, region = %region, "creating bucket");

        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if region != "us-east-1" {
            let constraint = BucketLocationConstraint::from(region);
            let config = CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build();
            request = request.create_bucket_configuration(config);
        }

        match request.send().await {
            Ok(_) => {
                info!(bucket = %bucket, "bucket created");
                Ok(())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_bucket_already_owned_by_you() {
                    // Idempotent re-create of our own bucket
                    info!(bucket = %bucket, "bucket already exists, reusing");
                    Ok(())
                } else if service_err.is_bucket_already_exists() {
                    Err(CloudError::BucketConflict {
                        bucket: bucket.to_string(),
                    })
                } else {
                    Err(CloudError::Provider {
                        message: service_err.to_string(),
                    })
                }
            }
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        debug!(bucket = %bucket, key = %key, file = %path.display(), "uploading archive");

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| CloudError::UploadFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| CloudError::UploadFailed {
                key: key.to_string(),
                message: e.into_service_error().to_string(),
            })?;

        info!(bucket = %bucket, key = %key, "archive uploaded");
        Ok(())
    }
}
