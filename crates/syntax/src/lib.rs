//! Narrow lexer and import-extraction interface for JavaScript/TypeScript.
//!
//! This crate deliberately does not implement a full ECMAScript parser.
//! Analyzers depend only on the two operations [`extract_imports_from_file`]
//! and [`declaration::scan_declarations`] exposes, so an alternative parser
//! could be substituted behind the same interface without touching any
//! downstream analyzer.

pub mod declaration;
pub mod error;
pub mod import;
pub mod lexer;

pub use declaration::Declaration;
pub use declaration::DeclarationKind;
pub use declaration::StructuralToken;
pub use error::ExtractionError;
pub use import::ExtractedImport;
pub use import::ImportExtractionResult;
pub use import::ImportType;
pub use lexer::Token;
pub use lexer::tokenize;

/// Reads and extracts imports from a single file in one step.
pub fn extract_imports_from_file(
    path: &std::path::Path,
    workspace_prefixes: &[String],
) -> Result<ImportExtractionResult, ExtractionError> {
    let content = std::fs::read_to_string(path)
        .map_err(|error| ExtractionError::Read { path: path.to_path_buf(), reason: error.to_string() })?;

    if content.trim().is_empty() {
        return Err(ExtractionError::Empty { path: path.to_path_buf() });
    }

    let tokens = lexer::tokenize(&content);
    Ok(import::extract_imports(&tokens, path, workspace_prefixes))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extract_imports_from_file_reads_and_tokenizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.ts");
        std::fs::write(&path, "import { z } from 'zod';\n").unwrap();

        let result = extract_imports_from_file(&path, &[]).unwrap();

        assert_eq!(result.external_dependencies, vec!["zod"]);
    }

    #[test]
    fn extract_imports_from_file_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.ts");
        std::fs::write(&path, "").unwrap();

        let result = extract_imports_from_file(&path, &[]);

        assert!(matches!(result, Err(ExtractionError::Empty { .. })));
    }
}
