use std::path::Path;
use std::path::PathBuf;

use crate::manifest::PackageManifest;

/// A single package discovered under the workspace root.
///
/// Invariant: every entry in `source_files` lives under `package_path`.
#[derive(Debug, Clone)]
pub struct WorkspacePackage {
    pub name: String,
    pub version: String,
    pub package_path: PathBuf,
    pub package_json_path: PathBuf,
    pub src_path: PathBuf,
    pub package_json: PackageManifest,
    pub source_files: Vec<PathBuf>,
    pub has_tsconfig: bool,
    pub has_eslint_config: bool,
}

impl WorkspacePackage {
    /// Returns `true` if `path` falls under this package's source tree.
    pub fn owns(&self, path: &Path) -> bool {
        path.starts_with(&self.package_path)
    }
}
