use monorepo_graph::find_cycles;
use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct CircularImportAnalyzer;

const ID: &str = "circular-import";

impl Analyzer for CircularImportAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Circular import",
            description: "Flags every dependency cycle up to the configured length cap.",
            categories: &[IssueCategory::CircularImport],
            default_severity: Severity::Error,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let default_severity = self.metadata().default_severity;
        // Direct cycles (mutual A<->B imports) are usually a sharper signal
        // than longer transitive cycles; each gets its own severity knob.
        let direct_severity = context.options.severity_for("circular-import:direct", default_severity);
        let transitive_severity = context.options.severity_for("circular-import:transitive", Severity::Warning);

        let cycles = find_cycles(context.graph, context.options.max_cycle_length, context.options.normalize_cycles);

        let issues = cycles
            .into_iter()
            .map(|cycle| {
                let severity = if cycle.length() <= 2 { direct_severity } else { transitive_severity };

                let related_locations: Vec<IssueLocation> = cycle
                    .nodes
                    .iter()
                    .filter_map(|id| context.graph.node(id))
                    .filter_map(|node| node.file_path.clone())
                    .map(IssueLocation::file)
                    .collect();

                let primary =
                    related_locations.first().cloned().unwrap_or_else(|| IssueLocation::file(context.workspace_path.clone()));

                Issue::new(
                    ID,
                    "Circular import",
                    format!("circular import chain: {}", cycle.nodes.join(" -> ")),
                    severity,
                    IssueCategory::CircularImport,
                    primary,
                )
                .with_related_locations(related_locations)
                .with_metadata("cycle_length", cycle.length() as u64)
            })
            .collect();

        Ok(issues)
    }
}
