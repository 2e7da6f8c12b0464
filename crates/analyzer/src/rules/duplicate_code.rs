use monorepo_fingerprint::Fingerprint;
use monorepo_fingerprint::find_exact_duplicates;
use monorepo_fingerprint::find_near_duplicates;
use monorepo_fingerprint::fingerprint_file;
use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;
use monorepo_syntax::lexer::tokenize;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct DuplicateCodeAnalyzer;

const ID: &str = "duplicate-code";

impl Analyzer for DuplicateCodeAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Duplicate code",
            description: "Flags functions/methods/arrow-functions that are structurally identical or near-identical across the workspace.",
            categories: &[IssueCategory::Performance],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let cross_package = context.options.cross_package_analysis;

        let mut fingerprints: Vec<Fingerprint> = Vec::new();

        for package in context.packages {
            for file in &package.source_files {
                let Ok(content) = std::fs::read_to_string(file) else {
                    tracing::debug!("could not read {}", file.display());
                    continue;
                };
                let tokens = tokenize(&content);
                fingerprints.extend(fingerprint_file(file, &package.name, &tokens));
            }
        }

        let mut issues = Vec::new();

        for group in find_exact_duplicates(&fingerprints, cross_package) {
            let locations: Vec<IssueLocation> =
                group.occurrences.iter().map(|fp| IssueLocation::at(&fp.file_path, fp.start_line, 1)).collect();
            let primary = locations.first().cloned().expect("duplicate group has at least two occurrences");

            issues.push(
                Issue::new(
                    ID,
                    "Exact duplicate function",
                    format!(
                        "{} occurrences of the same function body were found across the workspace",
                        group.occurrences.len()
                    ),
                    severity,
                    IssueCategory::Performance,
                    primary,
                )
                .with_related_locations(locations)
                .with_metadata("duplicateHash", format!("{:016x}", group.hash))
                .with_metadata("isExactMatch", true)
                .with_metadata("similarity", 1.0),
            );
        }

        for pair in find_near_duplicates(&fingerprints, context.options.similarity_threshold, cross_package) {
            let first_location = IssueLocation::at(&pair.first.file_path, pair.first.start_line, 1);
            let second_location = IssueLocation::at(&pair.second.file_path, pair.second.start_line, 1);

            issues.push(
                Issue::new(
                    ID,
                    "Near-duplicate function",
                    format!("functions are {:.0}% structurally similar", pair.similarity * 100.0),
                    severity,
                    IssueCategory::Performance,
                    first_location,
                )
                .with_related_locations(vec![second_location])
                .with_metadata("isExactMatch", false)
                .with_metadata("similarity", pair.similarity),
            );
        }

        Ok(issues)
    }
}
