use std::collections::HashSet;

use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;
use regex::Regex;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct UnusedDependencyAnalyzer;

const ID: &str = "unused-dependency";

impl Analyzer for UnusedDependencyAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Unused dependency",
            description: "Flags a declared dependency that no source file in its package imports.",
            categories: &[IssueCategory::Dependency],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let ignore_patterns: Vec<Regex> =
            context.options.ignore_patterns.iter().filter_map(|pattern| Regex::new(pattern).ok()).collect();

        let mut issues = Vec::new();

        for package in context.packages {
            let (used_external, used_workspace): (HashSet<&str>, HashSet<&str>) = context
                .import_results
                .iter()
                .filter(|result| package.owns(&result.file_path))
                .fold((HashSet::new(), HashSet::new()), |(mut external, mut workspace), result| {
                    external.extend(result.external_dependencies.iter().map(String::as_str));
                    workspace.extend(result.workspace_dependencies.iter().map(String::as_str));
                    (external, workspace)
                });

            let dependency_names = package.package_json.all_dependency_names(context.options.check_dev_dependencies);

            for name in dependency_names {
                if context.options.dependency_allow_list.iter().any(|allowed| allowed == name) {
                    continue;
                }
                if ignore_patterns.iter().any(|pattern| pattern.is_match(name)) {
                    continue;
                }

                let is_used = if package.package_json.is_workspace_protocol_dependency(name) {
                    used_workspace.iter().any(|specifier| specifier.starts_with(name))
                } else {
                    used_external.contains(name)
                };

                if !is_used {
                    issues.push(
                        Issue::new(
                            ID,
                            "Unused dependency",
                            format!("package {:?} declares {name:?} but no source file imports it", package.name),
                            severity,
                            IssueCategory::Dependency,
                            IssueLocation::file(&package.package_json_path),
                        )
                        .with_suggestion(format!("Remove {name:?} from dependencies"))
                        .with_metadata("dependency", name),
                    );
                }
            }
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use monorepo_source::PackageManifest;
    use monorepo_source::WorkspacePackage;
    use monorepo_syntax::ImportExtractionResult;
    use pretty_assertions::assert_eq;

    use super::*;

    fn package(name: &str, deps: &[(&str, &str)]) -> WorkspacePackage {
        let deps_json: String =
            deps.iter().map(|(k, v)| format!("\"{k}\":\"{v}\"")).collect::<Vec<_>>().join(",");
        let manifest =
            PackageManifest::parse(&format!(r#"{{"name":"{name}","version":"1.0.0","dependencies":{{{deps_json}}}}}"#))
                .unwrap();

        WorkspacePackage {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            package_path: PathBuf::from(format!("/workspace/packages/{name}")),
            package_json_path: PathBuf::from(format!("/workspace/packages/{name}/package.json")),
            src_path: PathBuf::from(format!("/workspace/packages/{name}/src")),
            package_json: manifest,
            source_files: vec![PathBuf::from(format!("/workspace/packages/{name}/src/index.ts"))],
            has_tsconfig: false,
            has_eslint_config: false,
        }
    }

    #[test]
    fn flags_dependency_with_no_importing_file() {
        let packages = vec![package("a", &[("ramda", "^0"), ("lodash", "^4")])];
        let import_results = vec![ImportExtractionResult {
            file_path: PathBuf::from("/workspace/packages/a/src/index.ts"),
            external_dependencies: vec!["lodash".to_string()],
            ..Default::default()
        }];

        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &[], |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context = AnalysisContext::new(
            PathBuf::from("/workspace"),
            &packages,
            &graph,
            &import_results,
            "hash".to_string(),
            &options,
            &|_| {},
        );

        let issues = UnusedDependencyAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].metadata.get("dependency").and_then(|v| v.as_str()), Some("ramda"));
    }

    #[test]
    fn allow_listed_dependency_is_never_flagged() {
        let packages = vec![package("a", &[("typescript", "^5")])];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &[], |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &packages, &graph, &[], "hash".to_string(), &options, &|_| {});

        assert!(UnusedDependencyAnalyzer.analyze(&context).unwrap().is_empty());
    }
}
