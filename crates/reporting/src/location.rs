use std::path::Path;
use std::path::PathBuf;

/// A 1-indexed location within a source file. Only `file_path` is required;
/// line/column information may be unavailable for file-level issues.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueLocation {
    pub file_path: PathBuf,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
}

impl IssueLocation {
    pub fn file(file_path: impl AsRef<Path>) -> Self {
        Self { file_path: file_path.as_ref().to_path_buf(), line: None, column: None, end_line: None, end_column: None }
    }

    pub fn at(file_path: impl AsRef<Path>, line: u32, column: u32) -> Self {
        Self { file_path: file_path.as_ref().to_path_buf(), line: Some(line), column: Some(column), end_line: None, end_column: None }
    }
}
