//! Content-addressed digests for files and JSON values.
//!
//! Every fallible operation propagates I/O errors rather than swallowing
//! them; the hasher never silently returns a placeholder digest for an
//! unreadable file.

use std::path::Path;

use md5::Digest as _;
use sha2::Digest as _;

pub mod error;

pub use error::HashError;

/// The digest algorithm to use. `Sha256` is the default; `Md5` is permitted
/// for workspaces that need a faster, non-cryptographic digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Md5,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Sha256
    }
}

/// A single non-content delimiter byte used to keep [`hash_files`] distinct
/// from concatenating the raw bytes of its inputs.
const COMBINE_DELIMITER: u8 = 0x1e; // ASCII record separator

/// Normalizes CRLF and lone-CR line endings to LF.
fn normalize_line_endings(content: &str) -> String {
    if !content.contains('\r') {
        return content.to_string();
    }

    content.replace("\r\n", "\n").replace('\r', "\n")
}

fn digest_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = sha2::Sha256::new();
            hasher.update(bytes);
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Md5 => {
            let mut hasher = md5::Md5::new();
            hasher.update(bytes);
            hex::encode(hasher.finalize())
        }
    }
}

/// Hashes the contents of `path`, normalizing line endings to LF by default.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm, normalize: bool) -> Result<String, HashError> {
    let raw = std::fs::read_to_string(path);

    let digest = match raw {
        Ok(text) => {
            let text = if normalize { normalize_line_endings(&text) } else { text };
            digest_bytes(algorithm, text.as_bytes())
        }
        Err(_) => {
            // Not valid UTF-8 (e.g. a binary asset caught by a loose extension list);
            // hash the raw bytes verbatim since line-ending normalization has no meaning.
            let bytes = std::fs::read(path).map_err(|error| HashError::Read(path.to_path_buf(), error))?;
            digest_bytes(algorithm, &bytes)
        }
    };

    Ok(digest)
}

/// Hashes in-memory content (text or bytes).
pub fn hash_content(content: impl AsRef<[u8]>, algorithm: HashAlgorithm) -> String {
    digest_bytes(algorithm, content.as_ref())
}

/// Hashes a JSON value with deterministic key ordering.
///
/// `serde_json::Map` (without the `preserve_order` feature) is backed by a
/// `BTreeMap`, so object keys already serialize in sorted order; this
/// function exists to make that invariant explicit and stable across
/// `serde_json` configuration changes elsewhere in the workspace.
pub fn hash_json(value: &serde_json::Value, algorithm: HashAlgorithm) -> String {
    let canonical = canonicalize(value);
    let serialized = serde_json::to_vec(&canonical).expect("canonicalized JSON values always serialize");

    digest_bytes(algorithm, &serialized)
}

fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut sorted = serde_json::Map::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(items) => serde_json::Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Hashes each path then hashes the concatenation of their digests,
/// delimited by a single non-content byte, to produce a stable combined
/// digest over a set of files.
pub fn hash_files(paths: &[impl AsRef<Path>], algorithm: HashAlgorithm, normalize: bool) -> Result<String, HashError> {
    if paths.is_empty() {
        return Err(HashError::Empty);
    }

    let mut combined = Vec::new();
    for path in paths {
        let digest = hash_file(path.as_ref(), algorithm, normalize)?;
        combined.extend_from_slice(digest.as_bytes());
        combined.push(COMBINE_DELIMITER);
    }

    Ok(digest_bytes(algorithm, &combined))
}
