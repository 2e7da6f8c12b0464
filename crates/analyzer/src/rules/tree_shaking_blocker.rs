//! Flags import/export shapes that defeat a bundler's tree-shaking pass:
//! namespace imports, literal and non-literal `require` calls, CommonJS
//! export assignments, type-only-looking named imports that were not
//! declared `import type`, and static imports of configured large packages
//! that would be better off dynamically imported.

use regex::Regex;
use std::sync::LazyLock;

use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;
use monorepo_syntax::ImportType;
use monorepo_syntax::lexer::Keyword;
use monorepo_syntax::lexer::TokenKind;
use monorepo_syntax::lexer::tokenize;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct TreeShakingBlockerAnalyzer;

const ID: &str = "tree-shaking-blocker";

/// Matches a binding name that looks like a type (`IFoo`) or is commonly
/// used for one (`FooProps`, `FooConfig`, ...), suggesting an `import type`
/// was intended but not declared.
static TYPE_LIKE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(I[A-Z]\w*|Abstract\w*|\w*(Type|Types|Props|Options|Config|Configuration|State|Context|Params|Parameters|Interface|Enum|Kind|Metadata|Schema|Definition))$").unwrap()
});

impl Analyzer for TreeShakingBlockerAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Tree-shaking blocker",
            description: "Flags import/export shapes that prevent a bundler from eliminating unused code.",
            categories: &[IssueCategory::Performance],
            default_severity: Severity::Info,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let mut issues = Vec::new();

        for result in context.import_results {
            for import in &result.imports {
                if let Some(namespace) = &import.namespace_import {
                    if !import.is_relative {
                        issues.push(
                            namespace_issue(severity, &result.file_path, import.line, import.column, &import.module_specifier, namespace),
                        );
                    }
                }

                if import.import_type == ImportType::Require {
                    issues.push(require_issue(severity, &result.file_path, import.line, import.column, &import.module_specifier));
                }

                if import.import_type == ImportType::Dynamic && context.options.large_packages.iter().any(|pkg| pkg == &import.module_specifier) {
                    // already dynamic; this is the desired shape, not a finding.
                }

                if import.import_type == ImportType::Static
                    && context.options.large_packages.iter().any(|pkg| base_matches(pkg, &import.module_specifier))
                {
                    issues.push(large_package_issue(severity, &result.file_path, import.line, import.column, &import.module_specifier));
                }

                for name in import.named_imports.iter().chain(import.default_import.iter()) {
                    if import.import_type == ImportType::Static && TYPE_LIKE_NAME.is_match(name) {
                        issues.push(type_only_candidate_issue(severity, &result.file_path, import.line, import.column, name));
                    }
                }
            }
        }

        for path in &context.source_files {
            let Ok(content) = std::fs::read_to_string(path) else {
                tracing::debug!("could not read {}", path.display());
                continue;
            };
            let tokens = tokenize(&content);
            issues.extend(scan_commonjs_exports_and_dynamic_requires(&tokens, path, severity));
        }

        Ok(issues)
    }
}

fn base_matches(large_package: &str, specifier: &str) -> bool {
    specifier == large_package || specifier.starts_with(&format!("{large_package}/"))
}

fn namespace_issue(severity: Severity, file: &std::path::Path, line: u32, column: u32, specifier: &str, binding: &str) -> Issue {
    Issue::new(
        ID,
        "Namespace import",
        format!("`import * as {binding} from {specifier:?}` pulls in the entire module; bundlers cannot tree-shake a namespace binding"),
        severity,
        IssueCategory::Performance,
        IssueLocation::at(file, line, column),
    )
    .with_suggestion("Import only the named bindings actually used")
    .with_metadata("specifier", specifier)
}

fn require_issue(severity: Severity, file: &std::path::Path, line: u32, column: u32, specifier: &str) -> Issue {
    Issue::new(
        ID,
        "CommonJS require",
        format!("`require({specifier:?})` cannot be statically analyzed by most bundlers' tree-shaking pass"),
        severity,
        IssueCategory::Performance,
        IssueLocation::at(file, line, column),
    )
    .with_suggestion("Prefer a static `import` or, for code-splitting, a dynamic `import()`")
    .with_metadata("specifier", specifier)
}

fn large_package_issue(severity: Severity, file: &std::path::Path, line: u32, column: u32, specifier: &str) -> Issue {
    Issue::new(
        ID,
        "Static import of a large package",
        format!("{specifier:?} is configured as a large package and is statically imported here"),
        severity,
        IssueCategory::Performance,
        IssueLocation::at(file, line, column),
    )
    .with_suggestion(format!("Consider a dynamic `import({specifier:?})` to defer loading"))
    .with_metadata("specifier", specifier)
}

fn type_only_candidate_issue(severity: Severity, file: &std::path::Path, line: u32, column: u32, name: &str) -> Issue {
    Issue::new(
        ID,
        "Likely type-only import not declared as such",
        format!("{name:?} looks like a type but is imported as a value binding; a value import keeps the module from being elided"),
        severity,
        IssueCategory::Performance,
        IssueLocation::at(file, line, column),
    )
    .with_suggestion(format!("Import {name:?} with `import type` if it is only used as a type"))
    .with_metadata("binding", name)
}

fn scan_commonjs_exports_and_dynamic_requires(
    tokens: &[monorepo_syntax::Token],
    file: &std::path::Path,
    severity: Severity,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for i in 0..tokens.len() {
        let token = &tokens[i];

        if let TokenKind::Ident(name) = &token.kind {
            if name == "module" && matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Punct('.'))) {
                if let Some(TokenKind::Ident(member)) = tokens.get(i + 2).map(|t| &t.kind) {
                    if member == "exports" {
                        issues.push(commonjs_export_issue(severity, file, token.line, token.column, "module.exports"));
                    }
                }
            }

            if name == "exports" && matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Punct('.'))) {
                if let Some(TokenKind::Ident(member)) = tokens.get(i + 2).map(|t| &t.kind) {
                    issues.push(commonjs_export_issue(severity, file, token.line, token.column, &format!("exports.{member}")));
                }
            }

            if name == "require" && matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Punct('('))) {
                let is_literal_argument = matches!(tokens.get(i + 2).map(|t| &t.kind), Some(TokenKind::String(_)));
                if !is_literal_argument {
                    issues.push(nonliteral_require_issue(severity, file, token.line, token.column));
                }
            }
        }

        if let TokenKind::Keyword(Keyword::Export) = token.kind {
            // handled by the import extractor / static-export path; nothing extra here.
        }
    }

    issues
}

fn commonjs_export_issue(severity: Severity, file: &std::path::Path, line: u32, column: u32, form: &str) -> Issue {
    Issue::new(
        ID,
        "CommonJS export assignment",
        format!("`{form}` is a dynamic export assignment that static analysis and tree-shaking cannot fully see through"),
        severity,
        IssueCategory::Performance,
        IssueLocation::at(file, line, column),
    )
    .with_suggestion("Prefer ESM `export` declarations")
    .with_metadata("form", form)
}

fn nonliteral_require_issue(severity: Severity, file: &std::path::Path, line: u32, column: u32) -> Issue {
    Issue::new(
        ID,
        "Dynamic require with non-literal argument",
        "a `require(...)` call whose argument is not a string literal cannot be resolved statically",
        severity,
        IssueCategory::Performance,
        IssueLocation::at(file, line, column),
    )
}
