use std::path::PathBuf;

/// Inputs to a [`crate::scanner::Scanner`] run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root_dir: PathBuf,
    pub include_patterns: Vec<String>,
    pub exclude_packages: Vec<String>,
    pub source_extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            include_patterns: vec!["packages/*".to_string()],
            exclude_packages: Vec::new(),
            source_extensions: default_source_extensions(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl ScanConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self { root_dir: root_dir.into(), ..Self::default() }
    }
}

fn default_source_extensions() -> Vec<String> {
    ["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"].into_iter().map(str::to_string).collect()
}

fn default_exclude_dirs() -> Vec<String> {
    ["node_modules", "dist", "lib", "build", "__tests__", "__mocks__", "test", "tests"]
        .into_iter()
        .map(str::to_string)
        .collect()
}
