use std::collections::BTreeMap;

use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::options::AnalyzerOptions;

/// Maps analyzer id to implementation and supports enumerating the set
/// enabled after per-analyzer overrides are applied.
pub struct Registry {
    analyzers: BTreeMap<&'static str, Box<dyn Analyzer>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self { analyzers: BTreeMap::new() }
    }

    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        let id = analyzer.metadata().id;
        self.analyzers.insert(id, analyzer);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Analyzer> {
        self.analyzers.get(id).map(|boxed| boxed.as_ref())
    }

    pub fn metadata(&self) -> Vec<AnalyzerMetadata> {
        self.analyzers.values().map(|analyzer| analyzer.metadata()).collect()
    }

    /// The analyzers that should run this pass, after applying
    /// per-analyzer `enabled` overrides from `options`. Every built-in
    /// analyzer is enabled by default.
    pub fn enabled(&self, options: &AnalyzerOptions) -> Vec<&dyn Analyzer> {
        self.analyzers
            .values()
            .map(|boxed| boxed.as_ref())
            .filter(|analyzer| options.is_enabled(analyzer.metadata().id, true))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

/// Builds a [`Registry`] containing every built-in analyzer.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(Box::new(crate::rules::package_manifest::PackageManifestAnalyzer));
    registry.register(Box::new(crate::rules::tsconfig::TsConfigAnalyzer));
    registry.register(Box::new(crate::rules::cross_config_consistency::CrossConfigConsistencyAnalyzer));
    registry.register(Box::new(crate::rules::version_alignment::VersionAlignmentAnalyzer));
    registry.register(Box::new(crate::rules::exports_field::ExportsFieldAnalyzer));
    registry.register(Box::new(crate::rules::unused_dependency::UnusedDependencyAnalyzer));
    registry.register(Box::new(crate::rules::circular_import::CircularImportAnalyzer));
    registry.register(Box::new(crate::rules::duplicate_dependency::DuplicateDependencyAnalyzer));
    registry.register(Box::new(crate::rules::architecture::ArchitectureAnalyzer));
    registry.register(Box::new(crate::rules::barrel_export::BarrelExportAnalyzer));
    registry.register(Box::new(crate::rules::public_api::PublicApiAnalyzer));
    registry.register(Box::new(crate::rules::side_effect_free::SideEffectFreeAnalyzer));
    registry.register(Box::new(crate::rules::path_alias::PathAliasAnalyzer));
    registry.register(Box::new(crate::rules::package_boundary::PackageBoundaryAnalyzer));
    registry.register(Box::new(crate::rules::tree_shaking_blocker::TreeShakingBlockerAnalyzer));
    registry.register(Box::new(crate::rules::duplicate_code::DuplicateCodeAnalyzer));
    registry.register(Box::new(crate::rules::large_dependency::LargeDependencyAnalyzer));
    registry
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_registry_contains_every_built_in_rule() {
        let registry = default_registry();
        assert_eq!(registry.len(), 17);
    }

    #[test]
    fn enabled_respects_explicit_disable_override() {
        let registry = default_registry();
        let mut options = AnalyzerOptions::default();
        options.overrides.insert(
            "unused-dependency".to_string(),
            crate::options::AnalyzerOverride { enabled: Some(false), severity: None, options: serde_json::Value::Null },
        );

        let enabled = registry.enabled(&options);
        assert!(!enabled.iter().any(|analyzer| analyzer.metadata().id == "unused-dependency"));
    }
}
