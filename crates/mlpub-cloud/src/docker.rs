//! Container deployment path: Docker build, tag, and registry push
//!
//! The image is built from the project root's Dockerfile, tagged with the
//! project name, and pushed to the configured registry. The build is bounded
//! by a fixed timeout; push and tag rely on Docker's own timeouts.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{CloudError, Result};

/// Upper bound on the image build before the run is abandoned
pub const BUILD_TIMEOUT_SECS: u64 = 600;

/// Build the project's image and push it to the registry
///
/// Returns the pushed image reference. Without a configured registry the
/// image is built and left local under the project tag.
pub async fn build_and_push(
    project_root: &Path,
    name: &str,
    registry: Option<&str>,
) -> Result<String> {
    if which::which("docker").is_err() {
        return Err(CloudError::DockerNotFound);
    }

    let tag = name.to_lowercase();
    debug!(tag = %tag, root = %project_root.display(), "building image");

    let build = tokio::time::timeout(
        Duration::from_secs(BUILD_TIMEOUT_SECS),
        tokio::process::Command::new("docker")
            .arg("build")
            .arg("-t")
            .arg(&tag)
            .arg(project_root)
            .output(),
    )
    .await
    .map_err(|_| CloudError::BuildTimeout {
        seconds: BUILD_TIMEOUT_SECS,
    })??;

    if !build.status.success() {
        return Err(CloudError::DockerBuildFailed {
            stderr: String::from_utf8_lossy(&build.stderr).trim().to_string(),
        });
    }

    let Some(registry) = registry else {
        info!(image = %tag, "image built, no registry configured");
        return Ok(tag);
    };

    let image = format!("{}/{}", registry.trim_end_matches('/'), tag);

    let retag = tokio::process::Command::new("docker")
        .arg("tag")
        .arg(&tag)
        .arg(&image)
        .output()
        .await?;
    if !retag.status.success() {
        return Err(CloudError::DockerPushFailed {
            stderr: String::from_utf8_lossy(&retag.stderr).trim().to_string(),
        });
    }

    debug!(image = %image, "pushing image");
    let push = tokio::process::Command::new("docker")
        .arg("push")
        .arg(&image)
        .output()
        .await?;
    if !push.status.success() {
        return Err(CloudError::DockerPushFailed {
            stderr: String::from_utf8_lossy(&push.stderr).trim().to_string(),
        });
    }

    info!(image = %image, "image pushed");
    Ok(image)
}
