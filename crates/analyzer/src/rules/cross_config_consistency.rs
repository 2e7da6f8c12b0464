use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct CrossConfigConsistencyAnalyzer;

const ID: &str = "cross-config-consistency";

impl Analyzer for CrossConfigConsistencyAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Cross-config consistency",
            description: "Flags a module-format minority among packages once the workspace is large enough for it to be drift rather than noise.",
            categories: &[IssueCategory::Configuration],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let threshold = context.options.cross_config_consistency_threshold;

        if context.packages.len() < threshold {
            return Ok(Vec::new());
        }

        let esm_count = context
            .packages
            .iter()
            .filter(|package| package.package_json.module_type.as_deref() == Some("module"))
            .count();
        let commonjs_count = context.packages.len() - esm_count;

        let (minority_is_esm, minority_count) =
            if esm_count <= commonjs_count { (true, esm_count) } else { (false, commonjs_count) };

        if minority_count == 0 {
            return Ok(Vec::new());
        }

        let majority_format = if minority_is_esm { "CommonJS" } else { "ESM" };
        let minority_format = if minority_is_esm { "ESM" } else { "CommonJS" };

        let issues = context
            .packages
            .iter()
            .filter(|package| {
                let is_esm = package.package_json.module_type.as_deref() == Some("module");
                is_esm == minority_is_esm
            })
            .map(|package| {
                Issue::new(
                    ID,
                    "Module-format drift",
                    format!(
                        "package {:?} uses {minority_format} while {} of {} packages in the workspace use {majority_format}",
                        package.name,
                        context.packages.len() - minority_count,
                        context.packages.len()
                    ),
                    severity,
                    IssueCategory::Configuration,
                    IssueLocation::file(&package.package_json_path),
                )
            })
            .collect();

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use monorepo_source::PackageManifest;
    use monorepo_source::WorkspacePackage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn package(name: &str, module_type: Option<&str>) -> WorkspacePackage {
        let type_field = module_type.map(|t| format!(r#","type":"{t}""#)).unwrap_or_default();
        let manifest = PackageManifest::parse(&format!(r#"{{"name":"{name}","version":"1.0.0"{type_field}}}"#)).unwrap();
        WorkspacePackage {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            package_path: PathBuf::from(format!("/workspace/packages/{name}")),
            package_json_path: PathBuf::from(format!("/workspace/packages/{name}/package.json")),
            src_path: PathBuf::from(format!("/workspace/packages/{name}/src")),
            package_json: manifest,
            source_files: Vec::new(),
            has_tsconfig: false,
            has_eslint_config: false,
        }
    }

    fn context_for<'a>(
        packages: &'a [WorkspacePackage],
        graph: &'a monorepo_graph::DependencyGraph,
        options: &'a crate::options::AnalyzerOptions,
    ) -> AnalysisContext<'a> {
        AnalysisContext::new(PathBuf::from("/workspace"), packages, graph, &[], "hash".to_string(), options, &|_| {})
    }

    #[test]
    fn flags_minority_module_format_once_threshold_is_met() {
        let packages = vec![
            package("a", Some("module")),
            package("b", Some("module")),
            package("c", Some("module")),
            package("d", None),
        ];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &[], |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context = context_for(&packages, &graph, &options);

        let issues = CrossConfigConsistencyAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn does_not_flag_below_threshold() {
        let packages = vec![package("a", Some("module")), package("b", None)];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &[], |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context = context_for(&packages, &graph, &options);

        assert!(CrossConfigConsistencyAnalyzer.analyze(&context).unwrap().is_empty());
    }
}
