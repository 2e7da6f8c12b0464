use std::fmt;
use std::path::PathBuf;

/// Any load failure degrades gracefully to a fresh run; only `save`
/// propagating a write failure is ever reported without being recovered
/// locally.
#[derive(Debug)]
pub enum CacheError {
    NotFound { path: PathBuf },
    Corrupted { path: PathBuf, reason: String },
    VersionMismatch { found: u32, expected: u32 },
    Expired { age_ms: u64, max_age_ms: u64 },
    WriteFailed { path: PathBuf, reason: String },
    ReadFailed { path: PathBuf, reason: String },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "no cache file at '{}'", path.display()),
            Self::Corrupted { path, reason } => write!(f, "cache file '{}' is corrupted: {reason}", path.display()),
            Self::VersionMismatch { found, expected } => {
                write!(f, "cache schema version {found} does not match expected version {expected}")
            }
            Self::Expired { age_ms, max_age_ms } => {
                write!(f, "cache is {age_ms}ms old, exceeding the maximum age of {max_age_ms}ms")
            }
            Self::WriteFailed { path, reason } => write!(f, "failed to write cache file '{}': {reason}", path.display()),
            Self::ReadFailed { path, reason } => write!(f, "failed to read cache file '{}': {reason}", path.display()),
        }
    }
}

impl std::error::Error for CacheError {}
