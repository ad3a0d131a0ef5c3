//! Zip bundle construction
//!
//! Every regular file under the staging root is recorded under its path
//! relative to that root; directories are not recorded. Entries are added in
//! sorted order with a fixed timestamp so the same tree always produces the
//! same archive.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use crate::error::Result;

/// Write a zip archive of the staging tree
pub fn write_zip_archive(staging_root: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest)?;
    let mut zip = ZipWriter::new(file);

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    for entry in walkdir::WalkDir::new(staging_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let rel_path = path
            .strip_prefix(staging_root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        debug!(entry = %rel_path, "adding to archive");
        zip.start_file(rel_path, options)?;
        let mut src = File::open(path)?;
        io::copy(&mut src, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

/// Hex-encoded SHA-256 digest of an archive file
pub fn archive_digest(archive: &Path) -> Result<String> {
    let mut file = File::open(archive)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn archive_entries(archive: &Path) -> BTreeSet<String> {
        let file = File::open(archive).unwrap();
        let zip = zip::ZipArchive::new(file).unwrap();
        zip.file_names().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_archive_contains_exactly_the_staged_files() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(staging.join("lib")).unwrap();
        std::fs::write(staging.join("a.py"), "a = 1\n").unwrap();
        std::fs::write(staging.join("b.py"), "b = 2\n").unwrap();
        std::fs::write(staging.join("model.bin"), [0u8, 1, 2, 3]).unwrap();
        std::fs::write(staging.join("lib/util.py"), "pass\n").unwrap();

        let archive = temp.path().join("out.zip");
        write_zip_archive(&staging, &archive).unwrap();

        let entries = archive_entries(&archive);
        let expected: BTreeSet<String> = ["a.py", "b.py", "model.bin", "lib/util.py"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_archive_has_no_directory_entries() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(staging.join("nested/deep")).unwrap();
        std::fs::write(staging.join("nested/deep/f.py"), "").unwrap();

        let archive = temp.path().join("out.zip");
        write_zip_archive(&staging, &archive).unwrap();

        let entries = archive_entries(&archive);
        assert_eq!(entries.len(), 1);
        assert!(entries.contains("nested/deep/f.py"));
    }

    #[test]
    fn test_same_tree_same_archive() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("a.py"), "a = 1\n").unwrap();
        std::fs::write(staging.join("b.py"), "b = 2\n").unwrap();

        let first = temp.path().join("first.zip");
        let second = temp.path().join("second.zip");
        write_zip_archive(&staging, &first).unwrap();
        write_zip_archive(&staging, &second).unwrap();

        assert_eq!(
            archive_digest(&first).unwrap(),
            archive_digest(&second).unwrap()
        );
    }

    #[test]
    fn test_archive_digest_is_hex() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("a.py"), "a = 1\n").unwrap();

        let archive = temp.path().join("out.zip");
        write_zip_archive(&staging, &archive).unwrap();

        let digest = archive_digest(&archive).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
