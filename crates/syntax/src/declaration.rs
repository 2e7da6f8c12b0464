//! Top-level declaration enumeration and structural-token extraction.
//!
//! This is the second half of the narrow extraction interface: given a
//! token stream, find every top-level function/class/method/arrow-function
//! declaration and, for those with a block body, produce a structural token
//! sequence that strips identifier text and literal values. The duplicate-
//! code fingerprint rule consumes that sequence directly; it never sees the
//! original source.

use crate::lexer::Keyword;
use crate::lexer::Token;
use crate::lexer::TokenKind;

/// The kind of top-level construct a [`Declaration`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Function,
    Method,
    ArrowFunction,
    Class,
}

/// A single top-level (or class-member) declaration found in a file.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: Option<String>,
    /// Token range of the body block, if the declaration has one.
    pub body_block: Option<(usize, usize)>,
    pub start_line: u32,
    pub end_line: u32,
}

/// Scans `tokens` for top-level declarations. Class bodies are descended
/// into one level to pick up methods; nested function expressions inside a
/// method body are not separately enumerated (they are part of that
/// method's structural token sequence).
pub fn scan_declarations(tokens: &[Token]) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if let Some((declaration, consumed)) = try_function(tokens, i) {
            declarations.push(declaration);
            i += consumed.max(1);
            continue;
        }

        if let Some((class_declaration, class_end, members)) = try_class(tokens, i) {
            declarations.push(class_declaration);
            declarations.extend(members);
            i = class_end.max(i + 1);
            continue;
        }

        if let Some((declaration, consumed)) = try_arrow_function(tokens, i) {
            declarations.push(declaration);
            i += consumed.max(1);
            continue;
        }

        i += 1;
    }

    declarations
}

fn try_function(tokens: &[Token], start: usize) -> Option<(Declaration, usize)> {
    let mut idx = start;
    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Keyword(Keyword::Async))) {
        idx += 1;
    }
    if !matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Keyword(Keyword::Function))) {
        return None;
    }
    idx += 1;

    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct('*'))) {
        idx += 1;
    }

    let name = if let Some(Token { kind: TokenKind::Ident(n), .. }) = tokens.get(idx) {
        idx += 1;
        Some(n.clone())
    } else {
        None
    };

    let params_end = skip_balanced(tokens, idx, '(', ')')?;
    idx = params_end;

    let body_range = find_block(tokens, idx)?;
    let start_line = tokens[start].line;
    let end_line = tokens.get(body_range.1.saturating_sub(1)).map(|t| t.line).unwrap_or(start_line);

    Some((
        Declaration { kind: DeclarationKind::Function, name, body_block: Some(body_range), start_line, end_line },
        body_range.1 - start,
    ))
}

fn try_arrow_function(tokens: &[Token], start: usize) -> Option<(Declaration, usize)> {
    // `const name = (...) => { ... }` or `const name = async (...) => { ... }`
    if !matches!(tokens.get(start).map(|t| &t.kind), Some(TokenKind::Keyword(Keyword::Const | Keyword::Let))) {
        return None;
    }
    let mut idx = start + 1;

    let name = if let Some(Token { kind: TokenKind::Ident(n), .. }) = tokens.get(idx) {
        idx += 1;
        Some(n.clone())
    } else {
        return None;
    };

    if !matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct('='))) {
        return None;
    }
    idx += 1;

    if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Keyword(Keyword::Async))) {
        idx += 1;
    }

    if !matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct('('))) {
        return None;
    }
    let params_end = skip_balanced(tokens, idx, '(', ')')?;

    if !matches!(tokens.get(params_end).map(|t| &t.kind), Some(TokenKind::Arrow)) {
        return None;
    }
    idx = params_end + 1;

    let body_range = find_block(tokens, idx)?;
    let start_line = tokens[start].line;
    let end_line = tokens.get(body_range.1.saturating_sub(1)).map(|t| t.line).unwrap_or(start_line);

    Some((
        Declaration {
            kind: DeclarationKind::ArrowFunction,
            name,
            body_block: Some(body_range),
            start_line,
            end_line,
        },
        body_range.1 - start,
    ))
}

/// Returns the class declaration plus a flattened list of its method
/// declarations, and the index just past the class's closing brace.
fn try_class(tokens: &[Token], start: usize) -> Option<(Declaration, usize, Vec<Declaration>)> {
    if !matches!(tokens.get(start).map(|t| &t.kind), Some(TokenKind::Keyword(Keyword::Class))) {
        return None;
    }
    let mut idx = start + 1;

    let name = if let Some(Token { kind: TokenKind::Ident(n), .. }) = tokens.get(idx) {
        idx += 1;
        Some(n.clone())
    } else {
        None
    };

    // skip `extends Foo` and `implements Bar, Baz` up to the opening brace.
    while tokens.get(idx).is_some_and(|t| !matches!(t.kind, TokenKind::Punct('{'))) {
        idx += 1;
    }
    let class_body = find_block(tokens, idx)?;
    let start_line = tokens[start].line;
    let end_line = tokens.get(class_body.1.saturating_sub(1)).map(|t| t.line).unwrap_or(start_line);

    let members = scan_class_members(tokens, class_body.0, class_body.1);

    Some((
        Declaration { kind: DeclarationKind::Class, name, body_block: Some(class_body), start_line, end_line },
        class_body.1,
        members,
    ))
}

fn scan_class_members(tokens: &[Token], start: usize, end: usize) -> Vec<Declaration> {
    let mut members = Vec::new();
    let mut idx = start;

    while idx < end {
        // skip modifiers: static, async, get, set, visibility is not modeled
        // by the lexer's keyword set so unrecognized identifiers pass through.
        let member_start = idx;
        while matches!(
            tokens.get(idx).map(|t| &t.kind),
            Some(TokenKind::Keyword(Keyword::Static | Keyword::Async | Keyword::Get | Keyword::Set))
        ) {
            idx += 1;
        }

        if matches!(tokens.get(idx).map(|t| &t.kind), Some(TokenKind::Punct('*'))) {
            idx += 1;
        }

        let name = match tokens.get(idx).map(|t| &t.kind) {
            Some(TokenKind::Ident(n)) => Some(n.clone()),
            Some(TokenKind::Keyword(_)) => None,
            _ => {
                idx += 1;
                continue;
            }
        };

        let Some(after_name) = idx.checked_add(1) else { break };

        if matches!(tokens.get(after_name).map(|t| &t.kind), Some(TokenKind::Punct('('))) {
            if let Some(params_end) = skip_balanced(tokens, after_name, '(', ')') {
                if let Some(body_range) = find_block(tokens, params_end) {
                    let start_line = tokens[member_start].line;
                    let end_line = tokens.get(body_range.1.saturating_sub(1)).map(|t| t.line).unwrap_or(start_line);
                    members.push(Declaration {
                        kind: DeclarationKind::Method,
                        name,
                        body_block: Some(body_range),
                        start_line,
                        end_line,
                    });
                    idx = body_range.1;
                    continue;
                }
            }
        }

        idx += 1;
    }

    members
}

/// Finds the `{ ... }` block starting at or after `from`, returning the
/// token index range `(open_index, index_past_close)`.
fn find_block(tokens: &[Token], from: usize) -> Option<(usize, usize)> {
    let mut idx = from;
    while idx < tokens.len() && !matches!(tokens[idx].kind, TokenKind::Punct('{')) {
        idx += 1;
    }
    let end = skip_balanced(tokens, idx, '{', '}')?;
    Some((idx, end))
}

/// Returns the index just past the matching closer for the opener at
/// `open_index`, honoring nesting.
fn skip_balanced(tokens: &[Token], open_index: usize, opener: char, closer: char) -> Option<usize> {
    if !matches!(tokens.get(open_index).map(|t| &t.kind), Some(TokenKind::Punct(c)) if *c == opener) {
        return None;
    }

    let mut depth = 0usize;
    let mut idx = open_index;
    while idx < tokens.len() {
        match &tokens[idx].kind {
            TokenKind::Punct(c) if *c == opener => depth += 1,
            TokenKind::Punct(c) if *c == closer => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
        idx += 1;
    }
    None
}

/// One element of a structural token sequence: identifier text and literal
/// values are erased so that two functions differing only in variable names
/// or string contents hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructuralToken {
    Ident,
    Keyword(Keyword),
    StringLiteral,
    TemplateLiteral,
    NumberLiteral,
    Punct(char),
    Arrow,
    Spread,
    OptionalChain,
}

/// Produces the structural token sequence for the body block range returned
/// in [`Declaration::body_block`]. Counts the number of statement-separating
/// `;` and block-opening `{` at the top nesting level as a cheap proxy for
/// statement count, used by the fingerprint rule's size threshold.
pub fn structural_tokens(tokens: &[Token], body_block: (usize, usize)) -> Vec<StructuralToken> {
    tokens[body_block.0..body_block.1]
        .iter()
        .map(|token| match &token.kind {
            TokenKind::Ident(_) => StructuralToken::Ident,
            TokenKind::Keyword(keyword) => StructuralToken::Keyword(*keyword),
            TokenKind::String(_) => StructuralToken::StringLiteral,
            TokenKind::Template(_) => StructuralToken::TemplateLiteral,
            TokenKind::Number(_) => StructuralToken::NumberLiteral,
            TokenKind::Punct(c) => StructuralToken::Punct(*c),
            TokenKind::Arrow => StructuralToken::Arrow,
            TokenKind::Spread => StructuralToken::Spread,
            TokenKind::OptionalChain => StructuralToken::OptionalChain,
        })
        .collect()
}

/// Counts top-level statements in a body block by tracking `;` and block
/// boundaries at nesting depth 1 (the body block's own `{`/`}` is depth 0).
pub fn statement_count(tokens: &[Token], body_block: (usize, usize)) -> usize {
    let mut depth = 0i32;
    let mut count = 0usize;
    let mut pending_statement = false;

    for token in &tokens[body_block.0..body_block.1] {
        match &token.kind {
            TokenKind::Punct('{') => {
                depth += 1;
            }
            TokenKind::Punct('}') => {
                depth -= 1;
                if depth == 1 && pending_statement {
                    count += 1;
                    pending_statement = false;
                }
            }
            TokenKind::Punct(';') if depth == 1 => {
                count += 1;
                pending_statement = false;
            }
            _ if depth == 1 => pending_statement = true,
            _ => {}
        }
    }

    count
}
