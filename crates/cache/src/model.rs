use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use monorepo_reporting::Issue;
use time::OffsetDateTime;

/// Bumped whenever the on-disk shape changes; a mismatch is always
/// `CacheError::VersionMismatch`, never a best-effort upgrade.
pub const SCHEMA_VERSION: u32 = 1;

/// The version tag recorded alongside a cache entry so an analyzer upgrade
/// invalidates every previously cached result.
pub const ANALYZER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `maxCacheAge`: seven days.
pub const DEFAULT_MAX_CACHE_AGE_MS: u64 = 7 * 24 * 60 * 60 * 1000;

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// A single file's recorded content digest and metadata at the time it was
/// last analyzed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CachedFileState {
    pub path: PathBuf,
    pub content_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub modified_at: OffsetDateTime,
    pub size: u64,
}

/// The cached result of analyzing a single file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CachedFileAnalysis {
    pub file_state: CachedFileState,
    pub issues: Vec<Issue>,
    pub analyzers_run: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub analyzed_at: OffsetDateTime,
}

/// The cached result of a package-level check (e.g. manifest/tsconfig
/// consistency rules that read the whole package rather than one file).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CachedPackageAnalysis {
    pub package_name: String,
    pub package_path: PathBuf,
    pub package_json_hash: String,
    pub issues: Vec<Issue>,
    pub analyzers_run: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub analyzed_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CacheMetadata {
    pub schema_version: u32,
    pub workspace_path: PathBuf,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub config_hash: String,
    pub analyzer_version: String,
}

/// The full on-disk cache document.
///
/// `files` and `packages` are keyed by string rather than `PathBuf`/package
/// name directly so the document round-trips through `serde_json` as a
/// plain JSON object, matching the `<workspacePath>/<cacheDir>/analysis-cache.json`
/// root-key layout.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisCache {
    pub metadata: CacheMetadata,
    pub files: BTreeMap<String, CachedFileAnalysis>,
    pub packages: BTreeMap<String, CachedPackageAnalysis>,
    #[serde(rename = "workspaceIssues")]
    pub workspace_issues: Vec<Issue>,
    #[serde(rename = "configFiles")]
    pub config_files: Vec<CachedFileState>,
}

impl AnalysisCache {
    /// A freshly initialized cache for a first run or one that failed
    /// `quickValidate` (e.g. a config change).
    pub fn empty(workspace_path: PathBuf, config_hash: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            metadata: CacheMetadata {
                schema_version: SCHEMA_VERSION,
                workspace_path,
                created_at: now,
                updated_at: now,
                config_hash,
                analyzer_version: ANALYZER_VERSION.to_string(),
            },
            files: BTreeMap::new(),
            packages: BTreeMap::new(),
            workspace_issues: Vec::new(),
            config_files: Vec::new(),
        }
    }

    pub fn file_analysis(&self, path: &Path) -> Option<&CachedFileAnalysis> {
        self.files.get(&path_key(path))
    }

    pub fn update_file(&mut self, file_state: CachedFileState, issues: Vec<Issue>, analyzers_run: Vec<String>) {
        let key = path_key(&file_state.path);
        let analysis =
            CachedFileAnalysis { file_state, issues, analyzers_run, analyzed_at: OffsetDateTime::now_utc() };
        self.files.insert(key, analysis);
        self.metadata.updated_at = OffsetDateTime::now_utc();
    }

    pub fn update_package(
        &mut self,
        package_name: String,
        package_path: PathBuf,
        package_json_hash: String,
        issues: Vec<Issue>,
        analyzers_run: Vec<String>,
    ) {
        let analysis = CachedPackageAnalysis {
            package_name: package_name.clone(),
            package_path,
            package_json_hash,
            issues,
            analyzers_run,
            analyzed_at: OffsetDateTime::now_utc(),
        };
        self.packages.insert(package_name, analysis);
        self.metadata.updated_at = OffsetDateTime::now_utc();
    }

    /// Drops an entry whose file no longer exists in the current scan.
    pub fn remove_file(&mut self, path: &Path) {
        self.files.remove(&path_key(path));
    }

    pub fn record_config_file(&mut self, state: CachedFileState) {
        self.config_files.retain(|existing| existing.path != state.path);
        self.config_files.push(state);
    }

    /// Every issue recorded in the cache, across files, packages, and
    /// workspace-level checks. Used by the Orchestrator to re-emit issues
    /// for files it skipped re-analyzing.
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.files
            .values()
            .flat_map(|analysis| analysis.issues.iter())
            .chain(self.packages.values().flat_map(|analysis| analysis.issues.iter()))
            .chain(self.workspace_issues.iter())
    }
}
