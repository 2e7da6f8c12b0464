use std::collections::BTreeMap;

use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct VersionAlignmentAnalyzer;

const ID: &str = "version-alignment";

impl Analyzer for VersionAlignmentAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Version alignment",
            description: "Flags a dependency declared at differing version specifiers across packages.",
            categories: &[IssueCategory::Dependency],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);

        // dependency name -> version specifier -> packages declaring it that way.
        let mut by_dependency: BTreeMap<&str, BTreeMap<&str, Vec<&str>>> = BTreeMap::new();

        for package in context.packages {
            for (name, version) in &package.package_json.dependencies {
                by_dependency.entry(name.as_str()).or_default().entry(version.as_str()).or_default().push(&package.name);
            }
        }

        let issues = by_dependency
            .into_iter()
            .filter(|(_, versions)| versions.len() > 1)
            .map(|(name, versions)| {
                let mut summary: Vec<String> =
                    versions.iter().map(|(version, packages)| format!("{version} ({})", packages.join(", "))).collect();
                summary.sort();

                Issue::new(
                    ID,
                    "Misaligned dependency version",
                    format!("{name:?} is declared at {} different versions across the workspace: {}", versions.len(), summary.join("; ")),
                    severity,
                    IssueCategory::Dependency,
                    IssueLocation::file(&context.workspace_path),
                )
                .with_metadata("dependency", name)
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

    fn package(name: &str, deps: &[(&str, &str)]) -> WorkspacePackage {
        let deps_json: String = deps.iter().map(|(k, v)| format!("\"{k}\":\"{v}\"")).collect::<Vec<_>>().join(",");
        let manifest =
            PackageManifest::parse(&format!(r#"{{"name":"{name}","version":"1.0.0","dependencies":{{{deps_json}}}}}"#)).unwrap();

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

    #[test]
    fn flags_dependency_declared_at_differing_versions() {
        let packages = vec![package("a", &[("react", "^17")]), package("b", &[("react", "^18")])];
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

        let issues = VersionAlignmentAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].metadata.get("dependency").and_then(|v| v.as_str()), Some("react"));
    }

    #[test]
    fn matching_versions_are_not_flagged() {
        let packages = vec![package("a", &[("react", "^18")]), package("b", &[("react", "^18")])];
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

        assert!(VersionAlignmentAnalyzer.analyze(&context).unwrap().is_empty());
    }
}
