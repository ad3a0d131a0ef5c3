//! External dependency installer discovery and invocation
//!
//! Dependencies are installed with `--target` pointing at the staging
//! directory so they sit next to the copied source, matching the runtime's
//! import resolution.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PackageError, Result};

/// Known installer executables, first match on PATH wins
const INSTALLER_CANDIDATES: [&str; 2] = ["pip3", "pip"];

/// Locate the dependency installer on the execution path
pub fn find_installer() -> Result<PathBuf> {
    for candidate in INSTALLER_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            debug!(installer = %path.display(), "resolved dependency installer");
            return Ok(path);
        }
    }

    Err(PackageError::InstallerNotFound {
        candidates: INSTALLER_CANDIDATES.join(", "),
    })
}

/// Whether the manifest declares any dependency at all
///
/// A manifest with only blank lines and comments skips the installer
/// invocation; vendoring nothing is a no-op, not an error.
pub fn manifest_has_entries(manifest: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(manifest)?;
    Ok(content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#')))
}

/// Install declared dependencies into the staging directory
pub async fn vendor_dependencies(
    installer: &Path,
    manifest: &Path,
    target: &Path,
) -> Result<()> {
    debug!(
        installer = %installer.display(),
        manifest = %manifest.display(),
        target = %target.display(),
        "vendoring dependencies"
    );

    let output = tokio::process::Command::new(installer)
        .arg("install")
        .arg("-r")
        .arg(manifest)
        .arg("--target")
        .arg(target)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(PackageError::InstallFailed {
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    info!(target = %target.display(), "dependencies vendored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_with_entries() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("requirements.txt");
        std::fs::write(&manifest, "numpy==1.26.0\nscikit-learn\n").unwrap();
        assert!(manifest_has_entries(&manifest).unwrap());
    }

    #[test]
    fn test_empty_manifest_has_no_entries() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("requirements.txt");
        std::fs::write(&manifest, "").unwrap();
        assert!(!manifest_has_entries(&manifest).unwrap());
    }

    #[test]
    fn test_comment_only_manifest_has_no_entries() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("requirements.txt");
        std::fs::write(&manifest, "# pinned later\n\n   # nothing yet\n").unwrap();
        assert!(!manifest_has_entries(&manifest).unwrap());
    }

    #[tokio::test]
    async fn test_vendor_reports_installer_failure() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("requirements.txt");
        std::fs::write(&manifest, "something\n").unwrap();

        // `false` exits non-zero without touching the filesystem
        let installer = PathBuf::from("/bin/false");
        if !installer.exists() {
            return;
        }

        let result = vendor_dependencies(&installer, &manifest, temp.path()).await;
        assert!(matches!(result, Err(PackageError::InstallFailed { .. })));
    }
}
