use std::path::PathBuf;

use monorepo_syntax::ImportType;

/// A single node in the dependency graph: either a workspace source file or
/// an external module specifier. External nodes are leaves — they carry no
/// `import_details` and their `imports` list is always empty.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DependencyNode {
    pub id: String,
    pub name: String,
    pub file_path: Option<PathBuf>,
    pub package_name: Option<String>,
    pub imports: Vec<String>,
    pub imported_by: Vec<String>,
    pub import_details: Vec<ImportDetail>,
}

impl DependencyNode {
    pub fn is_external(&self) -> bool {
        self.file_path.is_none()
    }
}

/// The per-edge detail recorded alongside a node's outgoing import, carrying
/// enough of the original [`monorepo_syntax::ExtractedImport`] to drive the
/// circular-import and tree-shaking analyzers without re-parsing the file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImportDetail {
    pub target_id: String,
    pub import_type: ImportType,
    pub is_type_only: bool,
    pub line: u32,
    pub column: u32,
}

/// A directed edge from one node to another.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub import_type: ImportType,
    pub is_type_only: bool,
}
