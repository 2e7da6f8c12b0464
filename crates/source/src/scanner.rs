use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::manifest::PackageManifest;
use crate::package::WorkspacePackage;

/// The result of a single [`Scanner::scan`] run.
#[derive(Debug)]
pub struct ScanResult {
    pub packages: Vec<WorkspacePackage>,
    pub workspace_path: PathBuf,
    pub errors: Vec<ScanError>,
    pub duration_ms: u128,
}

/// Discovers workspace packages under a root directory.
///
/// Per-package errors are accumulated in [`ScanResult::errors`] rather than
/// aborting the scan; only an unreadable workspace root is fatal.
pub struct Scanner;

impl Scanner {
    pub fn scan(config: &ScanConfig) -> ScanResult {
        let started = Instant::now();
        let mut errors = Vec::new();

        let package_dirs = resolve_package_directories(config, &mut errors);

        let outcomes: Vec<Result<WorkspacePackage, ScanError>> =
            package_dirs.into_par_iter().map(|dir| scan_package(&dir, config)).collect();

        let mut packages = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(package) => {
                    if !config.exclude_packages.iter().any(|excluded| excluded == &package.name) {
                        packages.push(package);
                    }
                }
                Err(error) => {
                    tracing::debug!("package scan error: {error}");
                    errors.push(error);
                }
            }
        }

        packages.sort_by(|a, b| a.package_path.cmp(&b.package_path));

        ScanResult { packages, workspace_path: config.root_dir.clone(), errors, duration_ms: started.elapsed().as_millis() }
    }
}

/// Expands each include pattern (e.g. `packages/*`) against the workspace
/// root into the set of directories that should be checked for a manifest.
fn resolve_package_directories(config: &ScanConfig, errors: &mut Vec<ScanError>) -> Vec<PathBuf> {
    let mut directories = Vec::new();

    for pattern in &config.include_patterns {
        let full_pattern = config.root_dir.join(pattern);
        let pattern_str = full_pattern.to_string_lossy().into_owned();

        match glob::glob(&pattern_str) {
            Ok(paths) => {
                for entry in paths {
                    match entry {
                        Ok(path) if path.is_dir() => directories.push(path),
                        Ok(_) => {}
                        Err(glob_error) => errors.push(ScanError::InvalidPath {
                            path: full_pattern.clone(),
                            reason: glob_error.to_string(),
                        }),
                    }
                }
            }
            Err(pattern_error) => {
                errors.push(ScanError::InvalidPath { path: full_pattern, reason: pattern_error.to_string() });
            }
        }
    }

    directories.sort();
    directories.dedup();
    directories
}

fn scan_package(package_path: &Path, config: &ScanConfig) -> Result<WorkspacePackage, ScanError> {
    let package_json_path = package_path.join("package.json");
    if !package_json_path.is_file() {
        return Err(ScanError::NoPackageJson { package_path: package_path.to_path_buf() });
    }

    let text = std::fs::read_to_string(&package_json_path)
        .map_err(|error| ScanError::ReadError { path: package_json_path.clone(), reason: error.to_string() })?;

    let manifest = PackageManifest::parse(&text)
        .map_err(|reason| ScanError::InvalidPackageJson { package_path: package_path.to_path_buf(), reason })?;

    let src_path = {
        let candidate = package_path.join("src");
        if candidate.is_dir() { candidate } else { package_path.to_path_buf() }
    };

    let source_files = collect_source_files(&src_path, config);

    let has_tsconfig = package_path.join("tsconfig.json").is_file();
    let has_eslint_config = ["eslintrc", "eslintrc.json", "eslintrc.js", "eslintrc.cjs", "eslint.config.js", "eslint.config.mjs"]
        .iter()
        .any(|name| package_path.join(format!(".{name}")).is_file() || package_path.join(name).is_file());

    Ok(WorkspacePackage {
        name: manifest.name.clone(),
        version: manifest.version.clone(),
        package_path: package_path.to_path_buf(),
        package_json_path,
        src_path,
        package_json: manifest,
        source_files,
        has_tsconfig,
        has_eslint_config,
    })
}

fn collect_source_files(src_path: &Path, config: &ScanConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(src_path)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, config))
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };

        if !config.source_extensions.iter().any(|allowed| allowed == extension) {
            continue;
        }

        let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default();
        if stem.contains(".test.") || stem.contains(".spec.") || stem.ends_with(".test") || stem.ends_with(".spec") {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    files
}

fn is_excluded_dir(entry: &walkdir::DirEntry, config: &ScanConfig) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    entry.file_name().to_str().is_some_and(|name| config.exclude_dirs.iter().any(|excluded| excluded == name))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_package(root: &Path, name: &str, extra_files: &[(&str, &str)]) {
        let package_dir = root.join("packages").join(name);
        std::fs::create_dir_all(package_dir.join("src")).unwrap();
        std::fs::write(
            package_dir.join("package.json"),
            format!(r#"{{"name": "{name}", "version": "1.0.0"}}"#),
        )
        .unwrap();

        for (relative, contents) in extra_files {
            let path = package_dir.join("src").join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, contents).unwrap();
        }
    }

    #[test]
    fn discovers_packages_and_source_files() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "alpha", &[("index.ts", "export const a = 1;"), ("index.test.ts", "it();")]);

        let result = Scanner::scan(&ScanConfig::new(dir.path()));

        assert_eq!(result.packages.len(), 1);
        let package = &result.packages[0];
        assert_eq!(package.name, "alpha");
        assert_eq!(package.source_files.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn records_error_for_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("packages").join("broken")).unwrap();

        let result = Scanner::scan(&ScanConfig::new(dir.path()));

        assert_eq!(result.packages.len(), 0);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0], ScanError::NoPackageJson { .. }));
    }

    #[test]
    fn excludes_configured_directories() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "beta", &[("index.ts", "export const b = 1;"), ("node_modules/vendor.ts", "x")]);

        let result = Scanner::scan(&ScanConfig::new(dir.path()));

        assert_eq!(result.packages[0].source_files.len(), 1);
    }

    #[test]
    fn honors_exclude_packages_list() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "gamma", &[("index.ts", "export const g = 1;")]);

        let mut config = ScanConfig::new(dir.path());
        config.exclude_packages.push("gamma".to_string());

        let result = Scanner::scan(&config);

        assert_eq!(result.packages.len(), 0);
    }
}
