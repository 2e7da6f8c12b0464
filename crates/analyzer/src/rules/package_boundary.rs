//! Package-boundary enforcement, one of the architecture family's six
//! sub-rules: flags a relative import whose resolved target file belongs to
//! a different workspace package than the importing file. This is a raw
//! package-membership check, independent of whatever layers are configured
//! for the layer-boundary rule elsewhere in this family — a workspace with
//! no layers configured at all still gets this check.

use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct PackageBoundaryAnalyzer;

const ID: &str = "architecture/package-boundary";

impl Analyzer for PackageBoundaryAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Package boundary",
            description: "Flags a relative import that reaches into a file owned by a different workspace package.",
            categories: &[IssueCategory::Architecture],
            default_severity: Severity::Error,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let exempt = &context.options.ignore_patterns;

        let mut issues = Vec::new();

        for edge in &context.graph.edges {
            let Some(source_node) = context.graph.node(&edge.from) else { continue };
            let Some(target_node) = context.graph.node(&edge.to) else { continue };
            let (Some(source_file), Some(target_file)) = (&source_node.file_path, &target_node.file_path) else { continue };

            let Some(source_package) = context.package_for(source_file) else { continue };
            let Some(target_package) = context.package_for(target_file) else { continue };

            if source_package.name == target_package.name {
                continue;
            }
            if exempt.iter().any(|name| name == &source_package.name || name == &target_package.name) {
                continue;
            }

            issues.push(
                Issue::new(
                    ID,
                    "Package boundary crossed by relative import",
                    format!(
                        "{:?} reaches into {:?} via a relative import, crossing from package {:?} into package {:?}",
                        source_file, target_file, source_package.name, target_package.name
                    ),
                    severity,
                    IssueCategory::Architecture,
                    IssueLocation::file(source_file),
                )
                .with_related_locations(vec![IssueLocation::file(target_file)])
                .with_metadata("sourcePackage", source_package.name.clone())
                .with_metadata("targetPackage", target_package.name.clone())
                .with_suggestion(format!("Depend on {:?} as a declared package dependency instead", target_package.name)),
            );
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use monorepo_source::PackageManifest;
    use monorepo_source::WorkspacePackage;
    use monorepo_syntax::ExtractedImport;
    use monorepo_syntax::ImportExtractionResult;
    use monorepo_syntax::ImportType;
    use pretty_assertions::assert_eq;

    use super::*;

    fn package(name: &str, source_files: Vec<PathBuf>) -> WorkspacePackage {
        let manifest = PackageManifest::parse(&format!(r#"{{"name":"{name}","version":"1.0.0"}}"#)).unwrap();
        WorkspacePackage {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            package_path: PathBuf::from(format!("/workspace/packages/{name}")),
            package_json_path: PathBuf::from(format!("/workspace/packages/{name}/package.json")),
            src_path: PathBuf::from(format!("/workspace/packages/{name}/src")),
            package_json: manifest,
            source_files,
            has_tsconfig: false,
            has_eslint_config: false,
        }
    }

    fn import_result(file: &str, specifier: &str) -> ImportExtractionResult {
        ImportExtractionResult {
            file_path: PathBuf::from(file),
            imports: vec![ExtractedImport {
                module_specifier: specifier.to_string(),
                import_type: ImportType::Static,
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
    fn flags_relative_import_crossing_into_another_package() {
        let results = vec![import_result("/workspace/packages/a/src/index.ts", "../../b/src/util")];
        let (graph, _) = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true);

        let packages = vec![
            package("a", vec![PathBuf::from("/workspace/packages/a/src/index.ts")]),
            package("b", vec![PathBuf::from("/workspace/packages/b/src/util.ts")]),
        ];
        let options = crate::options::AnalyzerOptions::default();
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &packages, &graph, &results, "hash".to_string(), &options, &|_| {});

        let issues = PackageBoundaryAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].metadata.get("targetPackage").and_then(|v| v.as_str()), Some("b"));
    }

    #[test]
    fn relative_import_within_same_package_is_not_flagged() {
        let results = vec![import_result("/workspace/packages/a/src/index.ts", "./util")];
        let (graph, _) = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true);

        let packages = vec![package(
            "a",
            vec![PathBuf::from("/workspace/packages/a/src/index.ts"), PathBuf::from("/workspace/packages/a/src/util.ts")],
        )];
        let options = crate::options::AnalyzerOptions::default();
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &packages, &graph, &results, "hash".to_string(), &options, &|_| {});

        assert!(PackageBoundaryAnalyzer.analyze(&context).unwrap().is_empty());
    }
}
