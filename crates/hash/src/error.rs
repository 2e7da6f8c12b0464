use std::path::PathBuf;

/// Errors that can occur while computing a digest.
///
/// I/O errors are never swallowed: every fallible hashing operation returns
/// a `Result` so callers can decide how to react to an unreadable file.
#[derive(Debug)]
pub enum HashError {
    Read(PathBuf, std::io::Error),
    Empty,
}

impl std::fmt::Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(path, error) => write!(f, "failed to read '{}' for hashing: {error}", path.display()),
            Self::Empty => write!(f, "cannot combine a digest over zero inputs"),
        }
    }
}

impl std::error::Error for HashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(_, error) => Some(error),
            Self::Empty => None,
        }
    }
}
