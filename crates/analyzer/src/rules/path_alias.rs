//! Path-alias consistency, one of the architecture family's six sub-rules:
//! a workspace can configure alias prefixes (`"@app/" -> "src/"`) that
//! resolve to a directory within the importing package; a deep relative
//! traversal (`../../...`) that lands inside that same directory should
//! have used the alias instead. Shallow relative imports (`./sibling`,
//! `../sibling`) are left alone — the rule only targets the traversals an
//! alias exists specifically to replace.

use std::path::Path;
use std::path::PathBuf;

use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct PathAliasAnalyzer;

const ID: &str = "architecture/path-alias";

/// A traversal of at least this many `../` segments is considered "deep"
/// enough to be worth replacing with a configured alias.
const MIN_DEEP_TRAVERSAL_DEPTH: usize = 2;

impl Analyzer for PathAliasAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Path-alias consistency",
            description: "Flags a deep relative import traversal that lands inside a directory a configured path alias already points to.",
            categories: &[IssueCategory::Architecture],
            default_severity: Severity::Info,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let aliases = &context.options.architecture.path_aliases;
        if aliases.is_empty() {
            return Ok(Vec::new());
        }

        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let mut issues = Vec::new();

        for result in context.import_results {
            let Some(package) = context.package_for(&result.file_path) else { continue };

            for import in &result.imports {
                if !import.is_relative || leading_parent_segments(&import.module_specifier) < MIN_DEEP_TRAVERSAL_DEPTH {
                    continue;
                }

                let target = resolve_relative(&result.file_path, &import.module_specifier);
                let Ok(relative_to_package) = target.strip_prefix(&package.package_path) else { continue };

                let Some((alias, _)) =
                    aliases.iter().find(|(_, target_dir)| relative_to_package.starts_with(target_dir.as_str()))
                else {
                    continue;
                };

                issues.push(
                    Issue::new(
                        ID,
                        "Deep relative import could use a path alias",
                        format!(
                            "{:?} imports {:?} with a deep relative traversal; {alias:?} already points into that directory",
                            result.file_path, import.module_specifier
                        ),
                        severity,
                        IssueCategory::Architecture,
                        IssueLocation::at(&result.file_path, import.line, import.column),
                    )
                    .with_metadata("alias", alias.clone())
                    .with_suggestion(format!("Import via {alias:?} instead of {:?}", import.module_specifier)),
                );
            }
        }

        Ok(issues)
    }
}

/// Counts the leading `..` path components in a relative specifier.
fn leading_parent_segments(specifier: &str) -> usize {
    specifier.split('/').take_while(|segment| *segment == "..").count()
}

/// Resolves a relative specifier against the importing file's directory,
/// lexically normalizing `.`/`..` without touching the filesystem.
fn resolve_relative(source_file: &Path, specifier: &str) -> PathBuf {
    let base_dir = source_file.parent().unwrap_or(source_file);
    let joined = base_dir.join(specifier);
    let with_extension = if joined.extension().is_some() { joined } else { joined.with_extension("ts") };

    let mut normalized = PathBuf::new();
    for component in with_extension.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use monorepo_source::PackageManifest;
    use monorepo_source::WorkspacePackage;
    use monorepo_syntax::ExtractedImport;
    use monorepo_syntax::ImportExtractionResult;
    use monorepo_syntax::ImportType;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::ArchitectureConfig;

    fn package() -> WorkspacePackage {
        let manifest = PackageManifest::parse(r#"{"name":"a","version":"1.0.0"}"#).unwrap();
        WorkspacePackage {
            name: "a".to_string(),
            version: "1.0.0".to_string(),
            package_path: PathBuf::from("/workspace/packages/a"),
            package_json_path: PathBuf::from("/workspace/packages/a/package.json"),
            src_path: PathBuf::from("/workspace/packages/a/src"),
            package_json: manifest,
            source_files: Vec::new(),
            has_tsconfig: false,
            has_eslint_config: false,
        }
    }

    fn import_result(file: &str, specifier: &str) -> ImportExtractionResult {
        ImportExtractionResult {
            file_path: PathBuf::from(file),
            imports: vec![ExtractedImport {
                module_specifier: specifier.to_string(),
                import_type: ImportType::Static,
                is_relative: true,
                is_workspace_package: false,
                named_imports: Vec::new(),
                default_import: None,
                namespace_import: None,
                line: 3,
                column: 1,
            }],
            ..Default::default()
        }
    }

    fn options_with_alias() -> crate::options::AnalyzerOptions {
        let mut options = crate::options::AnalyzerOptions::default();
        let mut path_aliases = BTreeMap::new();
        path_aliases.insert("@app/".to_string(), "src/".to_string());
        options.architecture = ArchitectureConfig { path_aliases, ..ArchitectureConfig::default() };
        options
    }

    #[test]
    fn flags_deep_relative_traversal_into_aliased_directory() {
        let packages = vec![package()];
        let results = vec![import_result("/workspace/packages/a/src/features/widget/view.ts", "../../utils/format")];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true).0;
        let options = options_with_alias();
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &packages, &graph, &results, "hash".to_string(), &options, &|_| {});

        let issues = PathAliasAnalyzer.analyze(&context).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].metadata.get("alias").and_then(|v| v.as_str()), Some("@app/"));
    }

    #[test]
    fn shallow_relative_import_is_not_flagged() {
        let packages = vec![package()];
        let results = vec![import_result("/workspace/packages/a/src/features/widget/view.ts", "./helpers")];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true).0;
        let options = options_with_alias();
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &packages, &graph, &results, "hash".to_string(), &options, &|_| {});

        assert!(PathAliasAnalyzer.analyze(&context).unwrap().is_empty());
    }

    #[test]
    fn no_aliases_configured_produces_no_issues() {
        let packages = vec![package()];
        let results = vec![import_result("/workspace/packages/a/src/features/widget/view.ts", "../../utils/format")];
        let graph = monorepo_graph::build_graph(&PathBuf::from("/workspace"), &results, |_| None, true).0;
        let options = crate::options::AnalyzerOptions::default();
        let context =
            AnalysisContext::new(PathBuf::from("/workspace"), &packages, &graph, &results, "hash".to_string(), &options, &|_| {});

        assert!(PathAliasAnalyzer.analyze(&context).unwrap().is_empty());
    }
}
