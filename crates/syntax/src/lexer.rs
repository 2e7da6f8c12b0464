//! A narrow lexer for JavaScript/TypeScript source text.
//!
//! This is not a full ECMAScript tokenizer: it recognizes exactly the
//! constructs the import extractor and duplicate-code fingerprint need
//! (identifiers, string/template literals, punctuation, and a handful of
//! keywords) and is deliberately silent about the rest. Comments and regex
//! literals are consumed but never emitted, so downstream consumers never
//! have to special-case them.

/// A single lexical token with its 1-indexed source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Keyword(Keyword),
    String(String),
    /// A template literal; interpolated expressions are not tokenized separately.
    Template(String),
    Number(String),
    Punct(char),
    /// Two-character punctuators we care about: `=>`, `...`, `?.`.
    Arrow,
    Spread,
    OptionalChain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Import,
    Export,
    From,
    Type,
    Require,
    Function,
    Class,
    Const,
    Let,
    Var,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Throw,
    Try,
    Catch,
    Finally,
    Await,
    Async,
    New,
    Default,
    Static,
    Get,
    Set,
    Extends,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("import", Keyword::Import),
    ("export", Keyword::Export),
    ("from", Keyword::From),
    ("type", Keyword::Type),
    ("require", Keyword::Require),
    ("function", Keyword::Function),
    ("class", Keyword::Class),
    ("const", Keyword::Const),
    ("let", Keyword::Let),
    ("var", Keyword::Var),
    ("return", Keyword::Return),
    ("if", Keyword::If),
    ("else", Keyword::Else),
    ("for", Keyword::For),
    ("while", Keyword::While),
    ("do", Keyword::Do),
    ("switch", Keyword::Switch),
    ("case", Keyword::Case),
    ("throw", Keyword::Throw),
    ("try", Keyword::Try),
    ("catch", Keyword::Catch),
    ("finally", Keyword::Finally),
    ("await", Keyword::Await),
    ("async", Keyword::Async),
    ("new", Keyword::New),
    ("default", Keyword::Default),
    ("static", Keyword::Static),
    ("get", Keyword::Get),
    ("set", Keyword::Set),
    ("extends", Keyword::Extends),
];

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

/// Tokenizes `source`. Unterminated literals at EOF are closed implicitly;
/// the lexer never fails, since a best-effort token stream over malformed
/// source is still useful for import extraction (the file is skipped with a
/// warning one layer up if extraction yields nothing useful).
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer { chars: source.chars().collect(), pos: 0, line: 1, column: 1 };
    lexer.run()
}

impl Lexer {
    fn run(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            let (line, column) = (self.line, self.column);

            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            if ch == '/' && self.peek_at(1) == Some('/') {
                self.skip_line_comment();
                continue;
            }

            if ch == '/' && self.peek_at(1) == Some('*') {
                self.skip_block_comment();
                continue;
            }

            if ch == '/' && self.regex_allowed(&tokens) {
                self.skip_regex_literal();
                continue;
            }

            if ch == '"' || ch == '\'' {
                let value = self.read_quoted_string(ch);
                tokens.push(Token { kind: TokenKind::String(value), line, column });
                continue;
            }

            if ch == '`' {
                let value = self.read_template_literal();
                tokens.push(Token { kind: TokenKind::Template(value), line, column });
                continue;
            }

            if ch.is_ascii_digit() {
                let value = self.read_number();
                tokens.push(Token { kind: TokenKind::Number(value), line, column });
                continue;
            }

            if is_ident_start(ch) {
                let value = self.read_identifier();
                let kind = KEYWORDS
                    .iter()
                    .find(|(text, _)| *text == value)
                    .map(|(_, keyword)| TokenKind::Keyword(*keyword))
                    .unwrap_or(TokenKind::Ident(value));
                tokens.push(Token { kind, line, column });
                continue;
            }

            if ch == '=' && self.peek_at(1) == Some('>') {
                self.advance();
                self.advance();
                tokens.push(Token { kind: TokenKind::Arrow, line, column });
                continue;
            }

            if ch == '.' && self.peek_at(1) == Some('.') && self.peek_at(2) == Some('.') {
                self.advance();
                self.advance();
                self.advance();
                tokens.push(Token { kind: TokenKind::Spread, line, column });
                continue;
            }

            if ch == '?' && self.peek_at(1) == Some('.') {
                self.advance();
                self.advance();
                tokens.push(Token { kind: TokenKind::OptionalChain, line, column });
                continue;
            }

            self.advance();
            tokens.push(Token { kind: TokenKind::Punct(ch), line, column });
        }

        tokens
    }

    /// Heuristic for whether a `/` starts a regex literal rather than being
    /// division or the start of a comment (already handled above). A regex
    /// can only begin where an expression is expected, i.e. not directly
    /// after an identifier, number, string, or closing bracket.
    fn regex_allowed(&self, tokens: &[Token]) -> bool {
        match tokens.last().map(|t| &t.kind) {
            None => true,
            Some(TokenKind::Ident(_) | TokenKind::Number(_) | TokenKind::String(_) | TokenKind::Template(_)) => false,
            Some(TokenKind::Punct(')') | TokenKind::Punct(']')) => false,
            _ => true,
        }
    }

    fn skip_regex_literal(&mut self) {
        self.advance(); // opening '/'
        let mut in_class = false;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '[' => {
                    in_class = true;
                    self.advance();
                }
                ']' => {
                    in_class = false;
                    self.advance();
                }
                '/' if !in_class => {
                    self.advance();
                    break;
                }
                '\n' => break,
                _ => self.advance(),
            }
        }
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(c) = self.peek() {
            if c == '*' && self.peek_at(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn read_quoted_string(&mut self, quote: char) -> String {
        self.advance();
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                value.push(c);
                self.advance();
                if let Some(escaped) = self.peek() {
                    value.push(escaped);
                    self.advance();
                }
                continue;
            }
            if c == quote {
                self.advance();
                break;
            }
            if c == '\n' {
                break;
            }
            value.push(c);
            self.advance();
        }
        value
    }

    fn read_template_literal(&mut self) -> String {
        self.advance();
        let mut value = String::new();
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            if c == '\\' {
                value.push(c);
                self.advance();
                if let Some(escaped) = self.peek() {
                    value.push(escaped);
                    self.advance();
                }
                continue;
            }
            if c == '`' && depth == 0 {
                self.advance();
                break;
            }
            if c == '$' && self.peek_at(1) == Some('{') {
                depth += 1;
                value.push(c);
                self.advance();
                value.push('{');
                self.advance();
                continue;
            }
            if c == '}' && depth > 0 {
                depth -= 1;
            }
            value.push(c);
            self.advance();
        }
        value
    }

    fn read_number(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_') {
            self.advance();
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tokenizes_a_static_import() {
        let tokens = tokenize("import { debounce } from 'lodash';");

        assert!(matches!(tokens[0].kind, TokenKind::Keyword(Keyword::Import)));
        assert!(tokens.iter().any(|t| matches!(&t.kind, TokenKind::String(s) if s == "lodash")));
    }

    #[test]
    fn skips_comments() {
        let tokens = tokenize("// import 'not-real';\nimport x from 'real';");

        let strings: Vec<_> = tokens
            .iter()
            .filter_map(|t| if let TokenKind::String(s) = &t.kind { Some(s.as_str()) } else { None })
            .collect();

        assert_eq!(strings, vec!["real"]);
    }

    #[test]
    fn tracks_line_numbers() {
        let tokens = tokenize("const a = 1;\nconst b = 2;");

        let second_const =
            tokens.iter().filter(|t| matches!(t.kind, TokenKind::Keyword(Keyword::Const))).nth(1).unwrap();

        assert_eq!(second_const.line, 2);
    }

    #[test]
    fn distinguishes_division_from_regex() {
        let tokens = tokenize("const r = a / b; const s = /abc/g;");

        // division should not consume the rest of the line as a regex.
        let idents: Vec<_> =
            tokens.iter().filter_map(|t| if let TokenKind::Ident(s) = &t.kind { Some(s.as_str()) } else { None }).collect();

        assert!(idents.contains(&"b"));
        assert!(idents.contains(&"s"));
    }
}
