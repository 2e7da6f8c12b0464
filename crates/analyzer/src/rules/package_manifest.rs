use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct PackageManifestAnalyzer;

const ID: &str = "package-manifest";

impl Analyzer for PackageManifestAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Package manifest",
            description: "Flags packages missing required manifest fields expected by the rest of the toolchain.",
            categories: &[IssueCategory::Configuration],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let exempt = &context.options.ignore_patterns;

        let mut issues = Vec::new();

        for package in context.packages {
            if exempt.iter().any(|name| name == &package.name) {
                continue;
            }

            if package.package_json.name.trim().is_empty() {
                issues.push(
                    Issue::new(
                        ID,
                        "Missing required field `name`",
                        format!("manifest at {:?} has no non-empty \"name\" field", package.package_json_path),
                        severity,
                        IssueCategory::Configuration,
                        IssueLocation::file(&package.package_json_path),
                    )
                    .with_suggestion("Add a \"name\" field to the manifest"),
                );
            }

            if package.package_json.version.trim().is_empty() {
                issues.push(
                    Issue::new(
                        ID,
                        "Missing required field `version`",
                        format!("manifest at {:?} has no non-empty \"version\" field", package.package_json_path),
                        severity,
                        IssueCategory::Configuration,
                        IssueLocation::file(&package.package_json_path),
                    )
                    .with_suggestion("Add a \"version\" field to the manifest"),
                );
            }

            if package.has_tsconfig && package.package_json.types.is_none() && package.package_json.exports.is_none() {
                issues.push(Issue::new(
                    ID,
                    "Missing `types`/`exports` field",
                    format!(
                        "package {:?} has a tsconfig but declares neither `types` nor `exports` in its manifest",
                        package.name
                    ),
                    severity,
                    IssueCategory::Configuration,
                    IssueLocation::file(&package.package_json_path),
                ));
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
    use pretty_assertions::assert_eq;

    use super::*;

    fn package(name: &str, has_tsconfig: bool, types: Option<&str>) -> WorkspacePackage {
        let manifest = PackageManifest::parse(&format!(r#"{{"name": "{name}", "version": "1.0.0"}}"#)).unwrap();
        WorkspacePackage {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            package_path: PathBuf::from(format!("/workspace/packages/{name}")),
            package_json_path: PathBuf::from(format!("/workspace/packages/{name}/package.json")),
            src_path: PathBuf::from(format!("/workspace/packages/{name}/src")),
            package_json: PackageManifest { types: types.map(String::from), ..manifest },
            source_files: Vec::new(),
            has_tsconfig,
            has_eslint_config: false,
        }
    }

    #[test]
    fn flags_package_with_tsconfig_but_no_types_or_exports() {
        let packages = vec![package("a", true, None)];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &[], |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context = AnalysisContext::new(
            PathBuf::from("/workspace"),
            &packages,
            &graph,
            &[],
            "hash".to_string(),
            &options,
            &|_| {},
        );

        let issues = PackageManifestAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn does_not_flag_package_with_types_declared() {
        let packages = vec![package("a", true, Some("./dist/index.d.ts"))];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &[], |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context = AnalysisContext::new(
            PathBuf::from("/workspace"),
            &packages,
            &graph,
            &[],
            "hash".to_string(),
            &options,
            &|_| {},
        );

        assert!(PackageManifestAnalyzer.analyze(&context).unwrap().is_empty());
    }

    #[test]
    fn flags_manifest_missing_name_and_version() {
        let manifest = PackageManifest::parse("{}").unwrap();
        let packages = vec![WorkspacePackage {
            name: String::new(),
            version: String::new(),
            package_path: PathBuf::from("/workspace/packages/a"),
            package_json_path: PathBuf::from("/workspace/packages/a/package.json"),
            src_path: PathBuf::from("/workspace/packages/a/src"),
            package_json: manifest,
            source_files: Vec::new(),
            has_tsconfig: false,
            has_eslint_config: false,
        }];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &[], |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context = AnalysisContext::new(
            PathBuf::from("/workspace"),
            &packages,
            &graph,
            &[],
            "hash".to_string(),
            &options,
            &|_| {},
        );

        let issues = PackageManifestAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|issue| issue.title == "Missing required field `name`"));
        assert!(issues.iter().any(|issue| issue.title == "Missing required field `version`"));
    }
}
