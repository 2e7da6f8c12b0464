use std::path::PathBuf;

use monorepo_analysis::AnalyzerOptions;
use monorepo_hash::HashAlgorithm;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::Severity;

use crate::error::OrchestratorError;

/// The resolved configuration a run consumes. Discovering or parsing a
/// configuration *file* into this shape is an external collaborator; this
/// crate only ever receives an already-built value.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrchestratorConfiguration {
    pub workspace_path: PathBuf,
    #[serde(rename = "packagePatterns")]
    pub package_patterns: Vec<String>,
    pub exclude_packages: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    #[serde(rename = "minSeverity")]
    pub min_severity: Severity,
    pub categories: Vec<IssueCategory>,
    pub cache: bool,
    #[serde(rename = "cacheDir")]
    pub cache_dir: String,
    #[serde(rename = "maxCacheAge")]
    pub max_cache_age_ms: u64,
    #[serde(rename = "hashAlgorithm")]
    pub hash_algorithm: HashAlgorithm,
    pub concurrency: usize,
    pub workspace_prefixes: Vec<String>,
    pub analyzer_options: AnalyzerOptions,
}

impl Default for OrchestratorConfiguration {
    fn default() -> Self {
        Self {
            workspace_path: PathBuf::from("."),
            package_patterns: vec!["packages/*".to_string()],
            exclude_packages: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            min_severity: Severity::Info,
            categories: Vec::new(),
            cache: true,
            cache_dir: ".monorepo-analyzer-cache".to_string(),
            max_cache_age_ms: monorepo_cache::DEFAULT_MAX_CACHE_AGE_MS,
            hash_algorithm: HashAlgorithm::Sha256,
            concurrency: 4,
            workspace_prefixes: Vec::new(),
            analyzer_options: AnalyzerOptions::default(),
        }
    }
}

impl OrchestratorConfiguration {
    pub fn new(workspace_path: impl Into<PathBuf>) -> Self {
        Self { workspace_path: workspace_path.into(), ..Self::default() }
    }

    /// The canonicalised subset of the configuration that feeds
    /// `configHash`: everything that would change what files get analyzed
    /// or how they're judged, but not operational knobs like `concurrency`
    /// or `cache`.
    pub fn hashed_subset(&self) -> serde_json::Value {
        serde_json::json!({
            "packagePatterns": self.package_patterns,
            "excludePackages": self.exclude_packages,
            "include": self.include,
            "exclude": self.exclude,
            "minSeverity": self.min_severity,
            "categories": self.categories,
            "workspacePrefixes": self.workspace_prefixes,
            "analyzerOptions": serde_json::to_value(&self.analyzer_options).unwrap_or(serde_json::Value::Null),
        })
    }

    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.concurrency == 0 {
            return Err(OrchestratorError::InvalidConfig { reason: "concurrency must be at least 1".to_string() });
        }
        if self.package_patterns.is_empty() {
            return Err(OrchestratorError::InvalidConfig { reason: "packagePatterns must not be empty".to_string() });
        }
        if self.cache_dir.trim().is_empty() {
            return Err(OrchestratorError::InvalidConfig { reason: "cacheDir must not be empty".to_string() });
        }
        Ok(())
    }
}
