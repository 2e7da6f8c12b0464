//! Public-API enforcement, one of the architecture family's six sub-rules:
//! flags an import that reaches across a package boundary into a file other
//! than that package's entry point. A package's public surface is whatever
//! its top-level `index.*` re-exports; importing a sibling package's
//! internal module directly bypasses that surface.

use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;
use monorepo_source::WorkspacePackage;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct PublicApiAnalyzer;

const ID: &str = "architecture/public-api";

impl Analyzer for PublicApiAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Public API",
            description: "Flags a cross-package import that reaches a file other than the target package's entry point.",
            categories: &[IssueCategory::Architecture],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        if !context.options.architecture.enforce_public_api {
            return Ok(Vec::new());
        }

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
            if exempt.iter().any(|name| name == &target_package.name) {
                continue;
            }
            if is_public_entry_point(target_package, target_file) {
                continue;
            }

            issues.push(
                Issue::new(
                    ID,
                    "Bypassed public API",
                    format!(
                        "{:?} imports {:?} directly instead of going through package {:?}'s entry point",
                        source_file, target_file, target_package.name
                    ),
                    severity,
                    IssueCategory::Architecture,
                    IssueLocation::file(source_file),
                )
                .with_related_locations(vec![IssueLocation::file(target_file)])
                .with_metadata("targetPackage", target_package.name.clone()),
            );
        }

        Ok(issues)
    }
}

/// `true` when `file` is the top-level entry point package consumers are
/// meant to import: an `index.*` file directly under the package's source
/// root.
fn is_public_entry_point(package: &WorkspacePackage, file: &std::path::Path) -> bool {
    let is_index = file.file_stem().and_then(|stem| stem.to_str()).is_some_and(|stem| stem == "index");
    is_index && file.parent() == Some(package.src_path.as_path())
}
