//! Staging directory ownership and project-tree copying

use std::path::{Path, PathBuf};

use crate::error::Result;

/// One packaging run's on-disk state
///
/// Owns the staging directory and the produced archive for the duration of a
/// single deployment. Never outlives the run: the orchestrator calls
/// [`StagingArtifact::cleanup`] once the upload step finishes, whether it
/// succeeded or failed.
#[derive(Debug)]
pub struct StagingArtifact {
    /// Directory holding the copied project plus vendored dependencies
    pub staging_dir: PathBuf,

    /// The produced zip archive
    pub archive_path: PathBuf,
}

impl StagingArtifact {
    /// File name of the archive, used as the upload key
    pub fn archive_file_name(&self) -> String {
        self.archive_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Remove the staging directory and the archive
    pub fn cleanup(&self) -> Result<()> {
        if self.staging_dir.exists() {
            std::fs::remove_dir_all(&self.staging_dir)?;
        }
        if self.archive_path.exists() {
            std::fs::remove_file(&self.archive_path)?;
        }
        Ok(())
    }
}

/// Copy a project tree recursively, skipping the reserved working directory
pub fn copy_project_tree(src: &Path, dest: &Path, exclude: &str) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy() == exclude {
            continue;
        }

        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if src_path.is_dir() {
            copy_project_tree(&src_path, &dest_path, exclude)?;
        } else {
            std::fs::copy(&src_path, &dest_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_excludes_reserved_dir() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("project");
        std::fs::create_dir_all(src.join(".mlpub")).unwrap();
        std::fs::create_dir_all(src.join("lib")).unwrap();
        std::fs::write(src.join("main.py"), "print('hi')\n").unwrap();
        std::fs::write(src.join("lib/util.py"), "pass\n").unwrap();
        std::fs::write(src.join(".mlpub/old.zip"), "stale").unwrap();

        let dest = temp.path().join("staging");
        copy_project_tree(&src, &dest, ".mlpub").unwrap();

        assert!(dest.join("main.py").exists());
        assert!(dest.join("lib/util.py").exists());
        assert!(!dest.join(".mlpub").exists());
    }

    #[test]
    fn test_cleanup_removes_everything() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("a.py"), "").unwrap();
        let archive = temp.path().join("demo.zip");
        std::fs::write(&archive, "zip bytes").unwrap();

        let artifact = StagingArtifact {
            staging_dir: staging.clone(),
            archive_path: archive.clone(),
        };
        artifact.cleanup().unwrap();

        assert!(!staging.exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let artifact = StagingArtifact {
            staging_dir: temp.path().join("gone"),
            archive_path: temp.path().join("gone.zip"),
        };
        artifact.cleanup().unwrap();
        artifact.cleanup().unwrap();
    }

    #[test]
    fn test_archive_file_name() {
        let artifact = StagingArtifact {
            staging_dir: PathBuf::from("/tmp/staging"),
            archive_path: PathBuf::from("/tmp/demo-abc123.zip"),
        };
        assert_eq!(artifact.archive_file_name(), "demo-abc123.zip");
    }
}
