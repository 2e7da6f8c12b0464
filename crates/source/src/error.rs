use std::path::PathBuf;

/// A non-fatal error encountered while scanning a single package directory.
///
/// Scan errors are collected rather than propagated: a malformed manifest in
/// one package must not prevent the rest of the workspace from being
/// analyzed.
#[derive(Debug, Clone)]
pub enum ScanError {
    InvalidPath { path: PathBuf, reason: String },
    NoPackageJson { package_path: PathBuf },
    InvalidPackageJson { package_path: PathBuf, reason: String },
    ReadError { path: PathBuf, reason: String },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath { path, reason } => write!(f, "invalid path '{}': {reason}", path.display()),
            Self::NoPackageJson { package_path } => {
                write!(f, "no package.json found under '{}'", package_path.display())
            }
            Self::InvalidPackageJson { package_path, reason } => {
                write!(f, "invalid package.json in '{}': {reason}", package_path.display())
            }
            Self::ReadError { path, reason } => write!(f, "failed to read '{}': {reason}", path.display()),
        }
    }
}

impl std::error::Error for ScanError {}
