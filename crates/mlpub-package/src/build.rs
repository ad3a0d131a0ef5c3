//! The packaging pipeline

use std::path::Path;

use mlpub_core::{archive_name, random_token, DeployConfig, WORK_DIR_NAME};
use tracing::{debug, info};

use crate::error::{PackageError, Result};
use crate::installer::{find_installer, manifest_has_entries, vendor_dependencies};
use crate::staging::{copy_project_tree, StagingArtifact};

/// Conventional dependency manifest at the project root
pub const MANIFEST_FILE_NAME: &str = "requirements.txt";

/// Build the deployable zip bundle for a project
///
/// Copies the project tree (minus the `.mlpub` working directory) into a
/// fresh staging directory, vendors declared dependencies alongside it, and
/// writes the archive into `.mlpub/`. Any failure aborts before a remote call
/// is ever made; nothing here mutates the original project tree.
pub async fn build_archive(
    project_root: &Path,
    config: &DeployConfig,
) -> Result<StagingArtifact> {
    if !project_root.exists() {
        return Err(PackageError::ProjectRootNotFound {
            path: project_root.display().to_string(),
        });
    }

    let model_path = project_root.join(&config.model_path);
    if !model_path.exists() {
        return Err(PackageError::ModelNotFound {
            path: model_path.display().to_string(),
        });
    }

    let manifest = project_root.join(MANIFEST_FILE_NAME);
    if !manifest.exists() {
        return Err(PackageError::ManifestNotFound {
            path: manifest.display().to_string(),
        });
    }

    let work_dir = project_root.join(WORK_DIR_NAME);
    let staging_dir = work_dir.join(format!("staging-{}", random_token(8)));
    debug!(staging = %staging_dir.display(), "copying project tree");
    copy_project_tree(project_root, &staging_dir, WORK_DIR_NAME)?;

    if manifest_has_entries(&manifest)? {
        let installer = find_installer()?;
        vendor_dependencies(&installer, &manifest, &staging_dir).await?;
    } else {
        debug!("dependency manifest declares nothing, skipping install");
    }

    let archive_path = work_dir.join(archive_name(&config.name));
    crate::archive::write_zip_archive(&staging_dir, &archive_path)?;

    let digest = crate::archive::archive_digest(&archive_path)?;
    info!(archive = %archive_path.display(), digest = %digest, "bundle created");
    Ok(StagingArtifact {
        staging_dir,
        archive_path,
    })
}
