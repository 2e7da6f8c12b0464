use std::path::Path;
use std::path::PathBuf;

/// The outcome of [`crate::cache::validate`]. A changed config file forces
/// `is_valid = false` regardless of how many source files also changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub invalidation_reason: Option<String>,
    pub changed_config_files: Vec<PathBuf>,
    pub changed_files: Vec<PathBuf>,
    pub new_files: Vec<PathBuf>,
    pub deleted_files: Vec<PathBuf>,
    pub invalidated_packages: Vec<String>,
}

/// Names every package whose `package_path` is an ancestor of at least one
/// of `paths`, deduplicated and sorted.
pub(crate) fn invalidated_packages(paths: &[PathBuf], packages: &[(String, PathBuf)]) -> Vec<String> {
    let mut names: Vec<String> = packages
        .iter()
        .filter(|(_, package_path)| paths.iter().any(|path| path_under(path, package_path)))
        .map(|(name, _)| name.clone())
        .collect();

    names.sort();
    names.dedup();
    names
}

fn path_under(path: &Path, package_path: &Path) -> bool {
    path.starts_with(package_path)
}
