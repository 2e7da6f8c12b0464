//! Import extraction: turns a token stream into [`ExtractedImport`] records.

use crate::lexer::Keyword;
use crate::lexer::Token;
use crate::lexer::TokenKind;

/// The form an import took in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportType {
    Static,
    Dynamic,
    Require,
    TypeOnly,
    SideEffect,
}

/// A single import or require found in a source file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtractedImport {
    pub module_specifier: String,
    #[serde(rename = "type")]
    pub import_type: ImportType,
    pub is_relative: bool,
    pub is_workspace_package: bool,
    pub named_imports: Vec<String>,
    pub default_import: Option<String>,
    pub namespace_import: Option<String>,
    pub line: u32,
    pub column: u32,
}

/// The aggregate extraction result for a single file.
#[derive(Debug, Clone, Default)]
pub struct ImportExtractionResult {
    pub file_path: std::path::PathBuf,
    pub imports: Vec<ExtractedImport>,
    pub external_dependencies: Vec<String>,
    pub workspace_dependencies: Vec<String>,
    pub relative_imports: Vec<String>,
}

/// Extracts every import/require form from `tokens`.
///
/// `workspace_prefixes` classifies a specifier as a workspace package (e.g.
/// `@myorg/`); anything else non-relative is external.
pub fn extract_imports(tokens: &[Token], file_path: &std::path::Path, workspace_prefixes: &[String]) -> ImportExtractionResult {
    let mut imports = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if let Some((import, consumed)) = try_static_or_type_import(&tokens[i..]) {
            imports.push(classify(import, workspace_prefixes));
            i += consumed;
            continue;
        }

        if let Some((import, consumed)) = try_dynamic_import(&tokens[i..]) {
            imports.push(classify(import, workspace_prefixes));
            i += consumed;
            continue;
        }

        if let Some((import, consumed)) = try_require(&tokens[i..]) {
            imports.push(classify(import, workspace_prefixes));
            i += consumed;
            continue;
        }

        i += 1;
    }

    build_result(file_path, imports)
}

/// An import before classification derives `is_relative`/`is_workspace_package`.
struct RawImport {
    module_specifier: String,
    import_type: ImportType,
    named_imports: Vec<String>,
    default_import: Option<String>,
    namespace_import: Option<String>,
    line: u32,
    column: u32,
}

fn classify(raw: RawImport, workspace_prefixes: &[String]) -> ExtractedImport {
    let is_relative = raw.module_specifier.starts_with('.');
    let is_workspace_package =
        !is_relative && workspace_prefixes.iter().any(|prefix| raw.module_specifier.starts_with(prefix.as_str()));

    ExtractedImport {
        module_specifier: raw.module_specifier,
        import_type: raw.import_type,
        is_relative,
        is_workspace_package,
        named_imports: raw.named_imports,
        default_import: raw.default_import,
        namespace_import: raw.namespace_import,
        line: raw.line,
        column: raw.column,
    }
}

/// Matches `import ... from '<spec>'` and `import '<spec>'` (side-effect),
/// including `import type ...` forms.
fn try_static_or_type_import(tokens: &[Token]) -> Option<(RawImport, usize)> {
    let Token { kind: TokenKind::Keyword(Keyword::Import), line, column } = tokens.first()? else {
        return None;
    };
    let (line, column) = (*line, *column);

    let mut idx = 1;
    let mut is_type_only = false;

    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Keyword(Keyword::Type))) {
        // `import type` is only type-only when not immediately followed by `from`
        // or `,` (which would make `type` the default import binding's name).
        if !matches!(
            tokens.get(idx + 1).map(|t| &t.kind),
            Some(TokenKind::Keyword(Keyword::From)) | Some(TokenKind::Punct(','))
        ) {
            is_type_only = true;
            idx += 1;
        }
    }

    // Dynamic `import(...)` is handled separately; bail if this is a call.
    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct('('))) {
        return None;
    }

    // Side-effect only: `import 'module';`
    if let Some(Token { kind: TokenKind::String(spec), .. }) = tokens.get(idx) {
        return Some((
            RawImport {
                module_specifier: spec.clone(),
                import_type: if is_type_only { ImportType::TypeOnly } else { ImportType::SideEffect },
                named_imports: Vec::new(),
                default_import: None,
                namespace_import: None,
                line,
                column,
            },
            idx + 1,
        ));
    }

    let mut default_import = None;
    let mut namespace_import = None;
    let mut named_imports = Vec::new();

    // default import: `import Foo from`
    if let Some(Token { kind: TokenKind::Ident(name), .. }) = tokens.get(idx) {
        default_import = Some(name.clone());
        idx += 1;
        if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct(','))) {
            idx += 1;
        }
    }

    // namespace import: `* as Foo`
    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct('*'))) {
        idx += 1;
        if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Ident(n)) if n == "as") {
            idx += 1;
            if let Some(Token { kind: TokenKind::Ident(name), .. }) = tokens.get(idx) {
                namespace_import = Some(name.clone());
                idx += 1;
            }
        }
    } else if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct('{'))) {
        idx += 1;
        while let Some(token) = tokens.get(idx) {
            match &token.kind {
                TokenKind::Punct('}') => {
                    idx += 1;
                    break;
                }
                TokenKind::Ident(name) => {
                    named_imports.push(name.clone());
                    idx += 1;
                }
                TokenKind::Keyword(Keyword::Type | Keyword::Default) => {
                    idx += 1;
                }
                TokenKind::Punct(',') => idx += 1,
                _ => idx += 1,
            }
        }
    }

    if !matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Keyword(Keyword::From))) {
        return None;
    }
    idx += 1;

    let Some(Token { kind: TokenKind::String(spec), .. }) = tokens.get(idx) else {
        return None;
    };
    idx += 1;

    Some((
        RawImport {
            module_specifier: spec.clone(),
            import_type: if is_type_only { ImportType::TypeOnly } else { ImportType::Static },
            named_imports,
            default_import,
            namespace_import,
            line,
            column,
        },
        idx,
    ))
}

/// Matches `import(<spec>)`.
fn try_dynamic_import(tokens: &[Token]) -> Option<(RawImport, usize)> {
    let Token { kind: TokenKind::Keyword(Keyword::Import), line, column } = tokens.first()? else {
        return None;
    };
    let (line, column) = (*line, *column);

    if !matches!(tokens.get(1).map(|t| &t.kind), Some(TokenKind::Punct('('))) {
        return None;
    }

    let Some(Token { kind: TokenKind::String(spec), .. }) = tokens.get(2) else {
        return None;
    };

    let mut idx = 3;
    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct(')'))) {
        idx += 1;
    }

    Some((
        RawImport {
            module_specifier: spec.clone(),
            import_type: ImportType::Dynamic,
            named_imports: Vec::new(),
            default_import: None,
            namespace_import: None,
            line,
            column,
        },
        idx,
    ))
}

/// Matches `require('<spec>')` with a literal specifier. A `require` call
/// with a non-literal argument is intentionally NOT matched here (the
/// tree-shaking-blocker rule flags that case separately by scanning for a
/// bare `require` identifier followed by a non-string argument).
fn try_require(tokens: &[Token]) -> Option<(RawImport, usize)> {
    let Token { kind: TokenKind::Ident(name), line, column } = tokens.first()? else {
        return None;
    };
    if name != "require" {
        return None;
    }
    let (line, column) = (*line, *column);

    if !matches!(tokens.get(1).map(|t| &t.kind), Some(TokenKind::Punct('('))) {
        return None;
    }

    let Some(Token { kind: TokenKind::String(spec), .. }) = tokens.get(2) else {
        return None;
    };

    let mut idx = 3;
    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct(')'))) {
        idx += 1;
    }

    Some((
        RawImport {
            module_specifier: spec.clone(),
            import_type: ImportType::Require,
            named_imports: Vec::new(),
            default_import: None,
            namespace_import: None,
            line,
            column,
        },
        idx,
    ))
}

fn base_package_name(specifier: &str) -> &str {
    if let Some(rest) = specifier.strip_prefix('@') {
        match rest.find('/') {
            Some(slash) => &specifier[..slash + 1 + rest[slash + 1..].find('/').unwrap_or(rest[slash + 1..].len())],
            None => specifier,
        }
    } else {
        specifier.split('/').next().unwrap_or(specifier)
    }
}

fn build_result(file_path: &std::path::Path, imports: Vec<ExtractedImport>) -> ImportExtractionResult {
    let mut external_dependencies = Vec::new();
    let mut workspace_dependencies = Vec::new();
    let mut relative_imports = Vec::new();

    for import in &imports {
        if import.is_relative {
            relative_imports.push(import.module_specifier.clone());
        } else if import.import_type == ImportType::SideEffect {
            // "Used" per the unused-dependency contract excludes side-effect
            // imports, so they never register as an external/workspace usage.
            continue;
        } else if import.is_workspace_package {
            workspace_dependencies.push(import.module_specifier.clone());
        } else {
            external_dependencies.push(base_package_name(&import.module_specifier).to_string());
        }
    }

    external_dependencies.sort();
    external_dependencies.dedup();
    workspace_dependencies.sort();
    workspace_dependencies.dedup();

    ImportExtractionResult {
        file_path: file_path.to_path_buf(),
        imports,
        external_dependencies,
        workspace_dependencies,
        relative_imports,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lexer::tokenize;

    fn extract(source: &str) -> ImportExtractionResult {
        let tokens = tokenize(source);
        extract_imports(&tokens, Path::new("file.ts"), &["@myorg/".to_string()])
    }

    #[test]
    fn extracts_named_static_import() {
        let result = extract("import { debounce } from 'lodash';");

        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].import_type, ImportType::Static);
        assert_eq!(result.imports[0].named_imports, vec!["debounce"]);
        assert_eq!(result.external_dependencies, vec!["lodash"]);
    }

    #[test]
    fn extracts_default_and_namespace_imports() {
        let result = extract("import Foo from './foo';\nimport * as Bar from 'bar';");

        assert_eq!(result.imports[0].default_import, Some("Foo".to_string()));
        assert!(result.imports[0].is_relative);
        assert_eq!(result.imports[1].namespace_import, Some("Bar".to_string()));
    }

    #[test]
    fn extracts_side_effect_import() {
        let result = extract("import './polyfill';");

        assert_eq!(result.imports[0].import_type, ImportType::SideEffect);
        assert_eq!(result.relative_imports, vec!["./polyfill"]);
    }

    #[test]
    fn extracts_type_only_import() {
        let result = extract("import type { Foo } from './types';");

        assert_eq!(result.imports[0].import_type, ImportType::TypeOnly);
    }

    #[test]
    fn extracts_dynamic_import() {
        let result = extract("const mod = await import('heavy-lib');");

        assert_eq!(result.imports[0].import_type, ImportType::Dynamic);
        assert_eq!(result.external_dependencies, vec!["heavy-lib"]);
    }

    #[test]
    fn extracts_require() {
        let result = extract("const x = require('ramda');");

        assert_eq!(result.imports[0].import_type, ImportType::Require);
        assert_eq!(result.external_dependencies, vec!["ramda"]);
    }

    #[test]
    fn classifies_workspace_package_by_prefix() {
        let result = extract("import { widget } from '@myorg/ui';");

        assert!(result.imports[0].is_workspace_package);
        assert_eq!(result.workspace_dependencies, vec!["@myorg/ui"]);
    }

    #[test]
    fn scoped_external_package_base_name_keeps_scope() {
        let result = extract("import x from '@babel/core/lib/foo';");

        assert_eq!(result.external_dependencies, vec!["@babel/core"]);
    }
}
