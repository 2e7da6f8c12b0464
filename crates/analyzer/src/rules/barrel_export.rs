//! Barrel-export restriction, one of the architecture family's six
//! sub-rules: flags `export * from '...'` re-export-all statements in a
//! file whose name signals it's a package or directory entry point
//! (`index.ts`, `index.tsx`, ...). A barrel pulls every sibling module into
//! one import, which defeats tree-shaking and erodes whatever layer
//! boundaries the rest of this rule family enforces.

use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;
use monorepo_syntax::lexer::Keyword;
use monorepo_syntax::lexer::TokenKind;
use monorepo_syntax::lexer::tokenize;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct BarrelExportAnalyzer;

const ID: &str = "architecture/barrel-export";

impl Analyzer for BarrelExportAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Barrel export",
            description: "Flags a re-export-all statement in a package or directory entry point when barrel exports are disallowed.",
            categories: &[IssueCategory::Architecture],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        if context.options.architecture.allow_barrel_exports {
            return Ok(Vec::new());
        }

        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let exempt = &context.options.ignore_patterns;

        let mut issues = Vec::new();

        for package in context.packages {
            if exempt.iter().any(|name| name == &package.name) {
                continue;
            }

            for file in &package.source_files {
                if !is_entry_point(file) {
                    continue;
                }

                let Ok(content) = std::fs::read_to_string(file) else {
                    tracing::debug!("could not read {}", file.display());
                    continue;
                };
                let tokens = tokenize(&content);

                for window in tokens.windows(2) {
                    let [export, star] = window else { continue };
                    if matches!(export.kind, TokenKind::Keyword(Keyword::Export)) && matches!(star.kind, TokenKind::Punct('*')) {
                        issues.push(
                            Issue::new(
                                ID,
                                "Barrel re-export",
                                format!("{:?} re-exports everything from another module with `export *`", file),
                                severity,
                                IssueCategory::Architecture,
                                IssueLocation::at(file, export.line, export.column),
                            )
                            .with_suggestion("Re-export only the specific named bindings the entry point intends to expose"),
                        );
                    }
                }
            }
        }

        Ok(issues)
    }
}

fn is_entry_point(file: &std::path::Path) -> bool {
    file.file_stem().and_then(|stem| stem.to_str()).is_some_and(|stem| stem == "index")
}
