use std::collections::BTreeMap;

/// A single architectural layer: files matching any of `patterns` belong to
/// `name` and may only depend on the layers listed in `allowed_dependencies`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub name: String,
    pub patterns: Vec<String>,
    #[serde(rename = "allowedImports", default)]
    pub allowed_dependencies: Vec<String>,
}

/// The architecture rule family's shared configuration: layer membership
/// plus the knobs each of the six sub-rules (layer-boundary, barrel-export,
/// public-API, side-effect-free, path-alias, package-boundary) reads from.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ArchitectureConfig {
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(rename = "allowBarrelExports", default)]
    pub allow_barrel_exports: bool,
    #[serde(rename = "enforcePublicApi", default)]
    pub enforce_public_api: bool,
    /// Glob patterns identifying modules that must not be imported for their
    /// side effects alone (read by the side-effect-free-modules rule).
    #[serde(rename = "sideEffectFreePatterns", default)]
    pub side_effect_free_patterns: Vec<String>,
    /// Configured path-alias prefix to the relative directory it resolves
    /// to, e.g. `"@app/" -> "src/"` (read by the path-alias-consistency rule).
    #[serde(rename = "pathAliases", default)]
    pub path_aliases: BTreeMap<String, String>,
}

/// Per-analyzer override from the configuration surface's `analyzers`
/// mapping: `{enabled?, severity?, options?}`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AnalyzerOverride {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub severity: Option<monorepo_reporting::Severity>,
    #[serde(default)]
    pub options: serde_json::Value,
}

/// The merged, resolved configuration every analyzer rule reads from. This
/// is the subset of `OrchestratorConfiguration` that rule bodies need;
/// config-file discovery that produces it lives outside this crate.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    pub workspace_prefixes: Vec<String>,
    pub max_cycle_length: usize,
    pub normalize_cycles: bool,
    pub min_statements: usize,
    pub similarity_threshold: f64,
    pub cross_package_analysis: bool,
    pub cross_config_consistency_threshold: usize,
    pub dependency_allow_list: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub large_packages: Vec<String>,
    pub check_dev_dependencies: bool,
    pub architecture: ArchitectureConfig,
    pub overrides: BTreeMap<String, AnalyzerOverride>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            workspace_prefixes: Vec::new(),
            max_cycle_length: 10,
            normalize_cycles: false,
            min_statements: 5,
            similarity_threshold: 0.85,
            cross_package_analysis: true,
            cross_config_consistency_threshold: 4,
            dependency_allow_list: vec![
                "typescript".to_string(),
                "@types/node".to_string(),
                "eslint".to_string(),
                "prettier".to_string(),
            ],
            ignore_patterns: Vec::new(),
            large_packages: vec!["moment".to_string(), "lodash".to_string(), "rxjs".to_string()],
            check_dev_dependencies: false,
            architecture: ArchitectureConfig::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl AnalyzerOptions {
    pub fn override_for(&self, analyzer_id: &str) -> Option<&AnalyzerOverride> {
        self.overrides.get(analyzer_id)
    }

    pub fn is_enabled(&self, analyzer_id: &str, default_enabled: bool) -> bool {
        self.override_for(analyzer_id).and_then(|o| o.enabled).unwrap_or(default_enabled)
    }

    pub fn severity_for(&self, analyzer_id: &str, default_severity: monorepo_reporting::Severity) -> monorepo_reporting::Severity {
        self.override_for(analyzer_id).and_then(|o| o.severity).unwrap_or(default_severity)
    }
}
