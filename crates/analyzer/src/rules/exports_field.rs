use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct ExportsFieldAnalyzer;

const ID: &str = "exports-field";

impl Analyzer for ExportsFieldAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Exports field",
            description: "Flags `exports` targets that have no corresponding source file among the package's declared sources.",
            categories: &[IssueCategory::Configuration],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let mut issues = Vec::new();

        for package in context.packages {
            let Some(exports) = &package.package_json.exports else { continue };

            let mut targets = Vec::new();
            collect_string_targets(exports, &mut targets);

            for target in targets {
                if !target.starts_with('.') {
                    continue;
                }

                if !has_matching_source(package, &target) {
                    issues.push(
                        Issue::new(
                            ID,
                            "Dangling exports target",
                            format!("package {:?} declares exports target {target:?} with no matching source file", package.name),
                            severity,
                            IssueCategory::Configuration,
                            IssueLocation::file(&package.package_json_path),
                        )
                        .with_metadata("target", target),
                    );
                }
            }
        }

        Ok(issues)
    }
}

fn collect_string_targets(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Object(map) => {
            for v in map.values() {
                collect_string_targets(v, out);
            }
        }
        serde_json::Value::Array(items) => {
            for v in items {
                collect_string_targets(v, out);
            }
        }
        _ => {}
    }
}

fn has_matching_source(package: &monorepo_source::WorkspacePackage, target: &str) -> bool {
    let stem = std::path::Path::new(target).file_stem().and_then(|s| s.to_str()).unwrap_or_default();

    package.source_files.iter().any(|file| file.file_stem().and_then(|s| s.to_str()) == Some(stem))
}
