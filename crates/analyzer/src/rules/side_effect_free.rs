//! Side-effect-free module enforcement, one of the architecture family's six
//! sub-rules: a workspace can name glob patterns for modules that declare
//! themselves side-effect free (pure data/logic, no top-level mutation); an
//! `import './module';` with no bindings pulled from it contradicts that and
//! is flagged.

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;
use monorepo_syntax::ImportType;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct SideEffectFreeAnalyzer;

const ID: &str = "architecture/side-effect-free";

impl Analyzer for SideEffectFreeAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Side-effect-free modules",
            description: "Flags a side-effect-only import of a module configured as side-effect free.",
            categories: &[IssueCategory::Architecture],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let patterns = &context.options.architecture.side_effect_free_patterns;
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let matcher = compile_patterns(patterns);
        let severity = context.options.severity_for(ID, self.metadata().default_severity);

        let mut issues = Vec::new();

        for edge in &context.graph.edges {
            if edge.import_type != ImportType::SideEffect {
                continue;
            }
            if !matcher.is_match(&edge.to) {
                continue;
            }

            let Some(source_node) = context.graph.node(&edge.from) else { continue };
            let location = source_node
                .file_path
                .clone()
                .map(IssueLocation::file)
                .unwrap_or_else(|| IssueLocation::file(&context.workspace_path));

            issues.push(
                Issue::new(
                    ID,
                    "Side-effect import of a pure module",
                    format!("{:?} is imported for its side effects, but it's configured as side-effect free", edge.to),
                    severity,
                    IssueCategory::Architecture,
                    location,
                )
                .with_metadata("target", edge.to.clone()),
            );
        }

        Ok(issues)
    }
}

fn compile_patterns(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(error) => tracing::warn!("invalid side-effect-free glob pattern {pattern:?}: {error}"),
        }
    }
    builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().expect("empty globset builds"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use monorepo_syntax::ExtractedImport;
    use monorepo_syntax::ImportExtractionResult;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::ArchitectureConfig;

    fn side_effect_import(file: &str, specifier: &str) -> ImportExtractionResult {
        ImportExtractionResult {
            file_path: PathBuf::from(file),
            imports: vec![ExtractedImport {
                module_specifier: specifier.to_string(),
                import_type: ImportType::SideEffect,
                is_relative: true,
                is_workspace_package: false,
                named_imports: Vec::new(),
                default_import: None,
                namespace_import: None,
                line: 1,
                column: 1,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn flags_side_effect_import_of_configured_pure_module() {
        let results = vec![side_effect_import("/workspace/packages/a/src/index.ts", "./constants")];
        let (graph, _) = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true);

        let mut options = crate::options::AnalyzerOptions::default();
        options.architecture = ArchitectureConfig {
            side_effect_free_patterns: vec!["packages/a/src/constants.ts".to_string()],
            ..ArchitectureConfig::default()
        };
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &[], &graph, &results, "hash".to_string(), &options, &|_| {});

        let issues = SideEffectFreeAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn no_patterns_configured_produces_no_issues() {
        let results = vec![side_effect_import("/workspace/packages/a/src/index.ts", "./constants")];
        let (graph, _) = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true);
        let options = crate::options::AnalyzerOptions::default();
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &[], &graph, &results, "hash".to_string(), &options, &|_| {});

        assert!(SideEffectFreeAnalyzer.analyze(&context).unwrap().is_empty());
    }

    #[test]
    fn named_import_of_configured_module_is_not_flagged() {
        let results = vec![ImportExtractionResult {
            file_path: PathBuf::from("/workspace/packages/a/src/index.ts"),
            imports: vec![ExtractedImport {
                module_specifier: "./constants".to_string(),
                import_type: ImportType::Static,
                is_relative: true,
                is_workspace_package: false,
                named_imports: vec!["MAX".to_string()],
                default_import: None,
                namespace_import: None,
                line: 1,
                column: 1,
            }],
            ..Default::default()
        }];
        let (graph, _) = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true);

        let mut options = crate::options::AnalyzerOptions::default();
        options.architecture = ArchitectureConfig {
            side_effect_free_patterns: vec!["packages/a/src/constants.ts".to_string()],
            ..ArchitectureConfig::default()
        };
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &[], &graph, &results, "hash".to_string(), &options, &|_| {});

        assert!(SideEffectFreeAnalyzer.analyze(&context).unwrap().is_empty());
    }
}
