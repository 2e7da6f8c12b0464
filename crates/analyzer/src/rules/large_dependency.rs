//! Two related structural checks that don't need their own analyzer ids:
//! dead code (a source file unreachable from any of its package's declared
//! entry points) and large dependencies (a declared dependency known to ship
//! a large bundle, looked up in a small built-in size table).

use std::collections::HashSet;

use monorepo_graph::relative_id;
use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct LargeDependencyAnalyzer;

const ID: &str = "large-dependency";

/// Approximate minified+gzipped size, in kilobytes, of packages commonly
/// pulled in whole when only a fraction of their API is used. Not exhaustive;
/// a workspace's own `largePackages` configuration extends this list for the
/// purposes of the tree-shaking-blocker rule, but the size figure here is
/// only meaningful for the names below.
const KNOWN_PACKAGE_SIZES_KB: &[(&str, u32)] = &[
    ("moment", 290),
    ("lodash", 71),
    ("rxjs", 148),
    ("jquery", 89),
    ("aws-sdk", 1200),
];

impl Analyzer for LargeDependencyAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Dead code / large dependency",
            description: "Flags a source file unreachable from its package's declared entry points, and a declared dependency known to ship a large bundle.",
            categories: &[IssueCategory::Performance],
            default_severity: Severity::Info,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let mut issues = Vec::new();

        for package in context.packages {
            let entry_ids = entry_point_ids(package, &context.workspace_path);
            if entry_ids.is_empty() {
                continue;
            }

            let mut reachable: HashSet<String> = entry_ids.iter().cloned().collect();
            for entry_id in &entry_ids {
                reachable.extend(context.graph.transitive_dependencies(entry_id));
            }

            for file in &package.source_files {
                let id = relative_id(&context.workspace_path, file);
                if !reachable.contains(&id) {
                    issues.push(
                        Issue::new(
                            ID,
                            "Unreachable source file",
                            format!(
                                "{id:?} is not reachable from any of package {:?}'s declared entry points ({})",
                                package.name,
                                entry_ids.join(", ")
                            ),
                            severity,
                            IssueCategory::Performance,
                            IssueLocation::file(file),
                        )
                        .with_metadata("package", package.name.clone()),
                    );
                }
            }

            for name in package.package_json.all_dependency_names(context.options.check_dev_dependencies) {
                if let Some((_, size_kb)) = KNOWN_PACKAGE_SIZES_KB.iter().find(|(pkg, _)| *pkg == name) {
                    issues.push(
                        Issue::new(
                            ID,
                            "Large dependency",
                            format!(
                                "package {:?} depends on {name:?}, which ships roughly {size_kb} KB minified+gzipped when imported whole",
                                package.name
                            ),
                            severity,
                            IssueCategory::Performance,
                            IssueLocation::file(&package.package_json_path),
                        )
                        .with_suggestion(format!("Prefer a tree-shakeable subset import or a lighter alternative to {name:?}"))
                        .with_metadata("dependency", name)
                        .with_metadata("estimatedSizeKb", *size_kb),
                    );
                }
            }
        }

        Ok(issues)
    }
}

fn entry_point_ids(package: &monorepo_source::WorkspacePackage, workspace_path: &std::path::Path) -> Vec<String> {
    let mut ids = Vec::new();

    for declared in [&package.package_json.main, &package.package_json.types].into_iter().flatten() {
        let resolved = package.package_path.join(declared);
        if package.source_files.contains(&resolved) {
            ids.push(relative_id(workspace_path, &resolved));
        }
    }

    if ids.is_empty() {
        for candidate in ["index.ts", "index.tsx", "index.js"] {
            let resolved = package.src_path.join(candidate);
            if package.source_files.contains(&resolved) {
                ids.push(relative_id(workspace_path, &resolved));
                break;
            }
        }
    }

    ids
}
