//! Derivation of cloud resource names from the project name
//!
//! Bucket names must be stable across runs so re-deployments update the same
//! resources; archive and function names carry a random token so runs never
//! clobber each other.

use rand::Rng;

/// Characters allowed in generated tokens, safe for S3 keys and Lambda names
const TOKEN_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the token appended to function names
const FUNCTION_TOKEN_LEN: usize = 8;

/// Length of the token embedded in archive names
const ARCHIVE_TOKEN_LEN: usize = 12;

/// Deterministic bucket name for a project
///
/// The same project name always yields the same bucket name, lower-cased.
#[must_use]
pub fn bucket_name(project: &str) -> String {
    format!("{}-mlpub-bucket", project.to_lowercase())
}

/// Function name for a project with a fresh uniqueness suffix
#[must_use]
pub fn function_name(project: &str) -> String {
    format!(
        "{}-function-{}",
        project.to_lowercase(),
        random_token(FUNCTION_TOKEN_LEN)
    )
}

/// Archive file name with a fresh collision-resistant token
#[must_use]
pub fn archive_name(project: &str) -> String {
    format!(
        "{}-{}.zip",
        project.to_lowercase(),
        random_token(ARCHIVE_TOKEN_LEN)
    )
}

/// Random lowercase alphanumeric token
///
/// Collision resistance within the naming window is all that matters here;
/// the token is not a secret.
#[must_use]
pub fn random_token(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_CHARS.len());
            TOKEN_CHARS[idx] as char
        })
        .collect()
}
