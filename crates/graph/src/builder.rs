use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use monorepo_syntax::ImportExtractionResult;
use monorepo_syntax::ImportType;

use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::node::DependencyEdge;
use crate::node::DependencyNode;
use crate::node::ImportDetail;

/// Maps a file system path to its workspace-relative, forward-slash id.
pub fn relative_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

/// Builds the dependency graph from per-file extraction results.
///
/// Construction is two passes: first every node and outgoing edge is
/// created, then `imported_by` is populated by reverse-indexing the edge
/// list. Per-edge resolution failures are logged and skipped rather than
/// failing the whole build, returned alongside the graph for callers that
/// want to surface them.
pub fn build_graph(
    root_path: &Path,
    results: &[ImportExtractionResult],
    package_name_for: impl Fn(&Path) -> Option<String>,
    include_type_imports: bool,
) -> (DependencyGraph, Vec<GraphError>) {
    let mut nodes: BTreeMap<String, DependencyNode> = BTreeMap::new();
    let mut edges: Vec<DependencyEdge> = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        let source_id = relative_id(root_path, &result.file_path);
        let package_name = package_name_for(&result.file_path);

        nodes.entry(source_id.clone()).or_insert_with(|| DependencyNode {
            id: source_id.clone(),
            name: file_stem(&result.file_path),
            file_path: Some(result.file_path.clone()),
            package_name: package_name.clone(),
            imports: Vec::new(),
            imported_by: Vec::new(),
            import_details: Vec::new(),
        });

        for import in &result.imports {
            if import.import_type == ImportType::TypeOnly && !include_type_imports {
                continue;
            }

            let target_id = if import.is_relative {
                match resolve_relative_target(root_path, &result.file_path, &import.module_specifier) {
                    Ok(path) => relative_id(root_path, &path),
                    Err(error) => {
                        tracing::warn!("{error}");
                        errors.push(error);
                        continue;
                    }
                }
            } else {
                import.module_specifier.clone()
            };

            nodes.entry(target_id.clone()).or_insert_with(|| DependencyNode {
                id: target_id.clone(),
                name: target_id.clone(),
                file_path: None,
                package_name: None,
                imports: Vec::new(),
                imported_by: Vec::new(),
                import_details: Vec::new(),
            });

            let source_node = nodes.get_mut(&source_id).expect("source node was just inserted");
            source_node.imports.push(target_id.clone());
            source_node.import_details.push(ImportDetail {
                target_id: target_id.clone(),
                import_type: import.import_type,
                is_type_only: import.import_type == ImportType::TypeOnly,
                line: import.line,
                column: import.column,
            });

            edges.push(DependencyEdge {
                from: source_id.clone(),
                to: target_id,
                import_type: import.import_type,
                is_type_only: import.import_type == ImportType::TypeOnly,
            });
        }
    }

    for edge in &edges {
        if let Some(target) = nodes.get_mut(&edge.to) {
            target.imported_by.push(edge.from.clone());
        }
    }

    (DependencyGraph { nodes, edges, root_path: root_path.to_path_buf() }, errors)
}

fn file_stem(path: &Path) -> String {
    path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("").to_string()
}

/// Resolves a relative import specifier against the importing file's
/// directory, appending `.ts` when the specifier carries no extension. The
/// result is lexically normalized (`.`/`..` resolved) without touching the
/// filesystem, since the target may not exist under this exact name (e.g.
/// it may resolve to `.tsx` or an `index.ts` in practice) — the analyzer
/// layer treats the graph as a best-effort approximation.
fn resolve_relative_target(root: &Path, source_file: &Path, specifier: &str) -> Result<PathBuf, GraphError> {
    if specifier.is_empty() {
        return Err(GraphError::InvalidSpecifier {
            source_id: relative_id(root, source_file),
            specifier: specifier.to_string(),
        });
    }

    let base_dir = source_file.parent().unwrap_or(root);
    let joined = base_dir.join(specifier);

    let has_extension = joined.extension().is_some();
    let with_extension = if has_extension { joined } else { joined.with_extension("ts") };

    Ok(normalize_lexically(&with_extension))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
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
    use pretty_assertions::assert_eq;

    use super::*;
    use monorepo_syntax::ExtractedImport;

    fn result(file: &str, imports: Vec<ExtractedImport>) -> ImportExtractionResult {
        ImportExtractionResult { file_path: PathBuf::from(file), imports, ..Default::default() }
    }

    fn static_import(specifier: &str, is_relative: bool) -> ExtractedImport {
        ExtractedImport {
            module_specifier: specifier.to_string(),
            import_type: ImportType::Static,
            is_relative,
            is_workspace_package: false,
            named_imports: Vec::new(),
            default_import: None,
            namespace_import: None,
            line: 1,
            column: 1,
        }
    }

    #[test]
    fn builds_nodes_and_edges_for_relative_imports() {
        let root = PathBuf::from("/workspace");
        let results = vec![
            result("/workspace/packages/a/src/index.ts", vec![static_import("./util", true)]),
            result("/workspace/packages/a/src/util.ts", vec![]),
        ];

        let (graph, errors) = build_graph(&root, &results, |_| None, true);

        assert!(errors.is_empty());
        assert_eq!(graph.nodes.len(), 2);
        let index_node = &graph.nodes["packages/a/src/index.ts"];
        assert_eq!(index_node.imports, vec!["packages/a/src/util.ts"]);
        let util_node = &graph.nodes["packages/a/src/util.ts"];
        assert_eq!(util_node.imported_by, vec!["packages/a/src/index.ts"]);
    }

    #[test]
    fn creates_external_leaf_node_for_non_relative_import() {
        let root = PathBuf::from("/workspace");
        let results = vec![result("/workspace/packages/a/src/index.ts", vec![static_import("lodash", false)])];

        let (graph, _) = build_graph(&root, &results, |_| None, true);

        let external = &graph.nodes["lodash"];
        assert!(external.is_external());
        assert_eq!(external.imported_by, vec!["packages/a/src/index.ts"]);
    }

    #[test]
    fn excludes_type_only_edges_when_disabled() {
        let root = PathBuf::from("/workspace");
        let mut type_import = static_import("./types", true);
        type_import.import_type = ImportType::TypeOnly;
        let results = vec![result("/workspace/packages/a/src/index.ts", vec![type_import])];

        let (graph, _) = build_graph(&root, &results, |_| None, false);

        assert_eq!(graph.edges.len(), 0);
    }
}
