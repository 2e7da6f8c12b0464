use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct DuplicateDependencyAnalyzer;

const ID: &str = "duplicate-dependency";

impl Analyzer for DuplicateDependencyAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Duplicate/peer dependency",
            description: "Flags a dependency declared in more than one manifest section, and a peer dependency with no matching declaration anywhere in the package's own tree.",
            categories: &[IssueCategory::Dependency],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let mut issues = Vec::new();

        for package in context.packages {
            let manifest = &package.package_json;

            for name in manifest.dependencies.keys() {
                if manifest.dev_dependencies.contains_key(name) {
                    issues.push(
                        Issue::new(
                            ID,
                            "Dependency declared twice",
                            format!(
                                "package {:?} declares {name:?} in both `dependencies` and `devDependencies`",
                                package.name
                            ),
                            severity,
                            IssueCategory::Dependency,
                            IssueLocation::file(&package.package_json_path),
                        )
                        .with_suggestion(format!("Remove {name:?} from whichever section is not the intended runtime requirement"))
                        .with_metadata("dependency", name.as_str()),
                    );
                }
            }

            for name in manifest.peer_dependencies.keys() {
                if !manifest.dependencies.contains_key(name) && !manifest.dev_dependencies.contains_key(name) {
                    issues.push(
                        Issue::new(
                            ID,
                            "Unsatisfied peer dependency",
                            format!(
                                "package {:?} declares a peer dependency on {name:?} that it does not also list under `dependencies` or `devDependencies`",
                                package.name
                            ),
                            severity,
                            IssueCategory::Dependency,
                            IssueLocation::file(&package.package_json_path),
                        )
                        .with_metadata("dependency", name.as_str()),
                    );
                }
            }
        }

        Ok(issues)
    }
}
