//! Structural fingerprinting for duplicate-code detection.
//!
//! A [`Fingerprint`] is derived from a declaration's structural token
//! sequence (see `monorepo_syntax::declaration`), which already has
//! identifier text and literal values erased. Two declarations with the same
//! fingerprint hash are exact structural duplicates regardless of variable
//! naming; declarations that don't share a hash can still be flagged as
//! near-duplicates by Jaccard similarity over their token sets.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use monorepo_syntax::Declaration;
use monorepo_syntax::DeclarationKind;
use monorepo_syntax::StructuralToken;
use monorepo_syntax::Token;
use monorepo_syntax::declaration::scan_declarations;
use monorepo_syntax::declaration::statement_count;
use monorepo_syntax::declaration::structural_tokens;

/// Declarations with fewer statements than this are too small to be a
/// meaningful duplicate-code signal and are excluded from fingerprinting.
pub const MIN_STATEMENTS: usize = 5;

/// A fingerprinted function, method, or arrow function.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub file_path: PathBuf,
    pub package_name: String,
    pub declaration_kind: DeclarationKind,
    pub declaration_name: Option<String>,
    pub start_line: u32,
    pub end_line: u32,
    pub statement_count: usize,
    pub hash: u64,
    tokens: Vec<StructuralToken>,
}

/// A set of declarations that are exact structural duplicates of each other.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub hash: u64,
    pub occurrences: Vec<Fingerprint>,
}

/// A pair of declarations that are similar but not identical.
#[derive(Debug, Clone)]
pub struct NearDuplicatePair {
    pub first: Fingerprint,
    pub second: Fingerprint,
    pub similarity: f64,
}

/// Fingerprints every sufficiently large function/method/arrow-function
/// declaration in a single file's token stream.
pub fn fingerprint_file(file_path: &Path, package_name: &str, tokens: &[Token]) -> Vec<Fingerprint> {
    scan_declarations(tokens)
        .into_iter()
        .filter(|declaration| matches!(declaration.kind, DeclarationKind::Method | DeclarationKind::Function | DeclarationKind::ArrowFunction))
        .filter_map(|declaration| fingerprint_declaration(file_path, package_name, tokens, &declaration))
        .collect()
}

fn fingerprint_declaration(
    file_path: &Path,
    package_name: &str,
    tokens: &[Token],
    declaration: &Declaration,
) -> Option<Fingerprint> {
    let body_block = declaration.body_block?;
    let count = statement_count(tokens, body_block);
    if count < MIN_STATEMENTS {
        return None;
    }

    let structural = structural_tokens(tokens, body_block);
    let hash = hash_tokens(&structural);

    Some(Fingerprint {
        file_path: file_path.to_path_buf(),
        package_name: package_name.to_string(),
        declaration_kind: declaration.kind,
        declaration_name: declaration.name.clone(),
        start_line: declaration.start_line,
        end_line: declaration.end_line,
        statement_count: count,
        hash,
        tokens: structural,
    })
}

/// FNV-1a over the `Hash` impl of each structural token, producing a 64-bit
/// digest. A narrower hash was an option here but the larger width keeps
/// accidental collisions negligible without pulling in a crate for it.
pub fn hash_tokens(tokens: &[StructuralToken]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for token in tokens {
        let discriminant = structural_token_discriminant(token);
        for byte in discriminant.to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// A stable numeric identity for a structural token, used only for hashing.
fn structural_token_discriminant(token: &StructuralToken) -> u32 {
    match token {
        StructuralToken::Ident => 0,
        StructuralToken::Keyword(keyword) => 0x1_0000 | (*keyword as u32),
        StructuralToken::StringLiteral => 1,
        StructuralToken::TemplateLiteral => 2,
        StructuralToken::NumberLiteral => 3,
        StructuralToken::Punct(c) => 0x2_0000 | (*c as u32),
        StructuralToken::Arrow => 4,
        StructuralToken::Spread => 5,
        StructuralToken::OptionalChain => 6,
    }
}

/// Groups fingerprints sharing an identical hash into [`DuplicateGroup`]s of
/// two or more occurrences. When `cross_package_analysis` is `false`, a
/// group is only reported if all its occurrences share a package.
pub fn find_exact_duplicates(fingerprints: &[Fingerprint], cross_package_analysis: bool) -> Vec<DuplicateGroup> {
    let mut by_hash: std::collections::BTreeMap<u64, Vec<Fingerprint>> = std::collections::BTreeMap::new();

    for fingerprint in fingerprints {
        by_hash.entry(fingerprint.hash).or_default().push(fingerprint.clone());
    }

    by_hash
        .into_iter()
        .filter(|(_, occurrences)| occurrences.len() >= 2)
        .filter(|(_, occurrences)| {
            cross_package_analysis || occurrences.windows(2).all(|pair| pair[0].package_name == pair[1].package_name)
        })
        .map(|(hash, occurrences)| DuplicateGroup { hash, occurrences })
        .collect()
}

/// Declarations that share a proximity window are excluded from
/// near-duplicate pairing: a function and a sibling overload 10 lines below
/// it in the same file is not interesting duplication.
const SAME_FILE_PROXIMITY_LINES: u32 = 20;

/// Finds near-duplicate pairs among fingerprints whose hash occurs exactly
/// once (fingerprints already grouped as exact duplicates are excluded).
/// Similarity is Jaccard over the set of distinct structural tokens each
/// declaration contains.
pub fn find_near_duplicates(
    fingerprints: &[Fingerprint],
    similarity_threshold: f64,
    cross_package_analysis: bool,
) -> Vec<NearDuplicatePair> {
    let mut hash_counts: std::collections::HashMap<u64, usize> = std::collections::HashMap::new();
    for fingerprint in fingerprints {
        *hash_counts.entry(fingerprint.hash).or_default() += 1;
    }

    let candidates: Vec<&Fingerprint> =
        fingerprints.iter().filter(|fingerprint| hash_counts.get(&fingerprint.hash).copied().unwrap_or(0) == 1).collect();

    let mut pairs = Vec::new();

    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let first = candidates[i];
            let second = candidates[j];

            if !cross_package_analysis && first.package_name != second.package_name {
                continue;
            }

            if first.file_path == second.file_path && lines_within_proximity(first, second) {
                continue;
            }

            let similarity = jaccard_similarity(&first.tokens, &second.tokens);
            if similarity >= similarity_threshold {
                pairs.push(NearDuplicatePair { first: first.clone(), second: second.clone(), similarity });
            }
        }
    }

    pairs
}

fn lines_within_proximity(first: &Fingerprint, second: &Fingerprint) -> bool {
    let gap = if first.start_line >= second.end_line {
        first.start_line - second.end_line
    } else if second.start_line >= first.end_line {
        second.start_line - first.end_line
    } else {
        0
    };
    gap <= SAME_FILE_PROXIMITY_LINES
}

/// Jaccard similarity between two structural token sequences, treated as
/// sets of distinct tokens (not multisets): `|A ∩ B| / |A ∪ B|`.
fn jaccard_similarity(a: &[StructuralToken], b: &[StructuralToken]) -> f64 {
    let set_a: HashSet<&StructuralToken> = a.iter().collect();
    let set_b: HashSet<&StructuralToken> = b.iter().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use monorepo_syntax::tokenize;

    fn fingerprint_source(source: &str, file: &str, package: &str) -> Vec<Fingerprint> {
        let tokens = tokenize(source);
        fingerprint_file(std::path::Path::new(file), package, &tokens)
    }

    #[test]
    fn skips_small_functions() {
        let fingerprints = fingerprint_source("function tiny() { return 1; }", "a.ts", "pkg-a");
        assert!(fingerprints.is_empty());
    }

    #[test]
    fn fingerprints_functions_at_or_above_threshold() {
        let source = "function f() { const a = 1; const b = 2; const c = 3; const d = 4; const e = 5; }";
        let fingerprints = fingerprint_source(source, "a.ts", "pkg-a");
        assert_eq!(fingerprints.len(), 1);
        assert_eq!(fingerprints[0].statement_count, 5);
    }

    const BODY: &str = "{ const x = 1; const y = 2; const z = 3; const w = 4; return x + y + z + w; }";

    #[test]
    fn identical_bodies_hash_identically_across_files() {
        let source_a = format!("function alpha() {BODY}");
        let source_b = format!("function beta() {BODY}");

        let fp_a = &fingerprint_source(&source_a, "a.ts", "pkg-a")[0];
        let fp_b = &fingerprint_source(&source_b, "b.ts", "pkg-b")[0];

        assert_eq!(fp_a.hash, fp_b.hash);
    }

    #[test]
    fn find_exact_duplicates_groups_matching_hashes() {
        let source_a = format!("function alpha() {BODY}");
        let source_b = format!("function beta() {BODY}");

        let mut fingerprints = fingerprint_source(&source_a, "a.ts", "pkg-a");
        fingerprints.extend(fingerprint_source(&source_b, "b.ts", "pkg-b"));

        let groups = find_exact_duplicates(&fingerprints, true);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].occurrences.len(), 2);
    }

    #[test]
    fn find_exact_duplicates_respects_cross_package_flag() {
        let source_a = format!("function alpha() {BODY}");
        let source_b = format!("function beta() {BODY}");

        let mut fingerprints = fingerprint_source(&source_a, "a.ts", "pkg-a");
        fingerprints.extend(fingerprint_source(&source_b, "b.ts", "pkg-b"));

        let groups = find_exact_duplicates(&fingerprints, false);
        assert!(groups.is_empty());
    }

    #[test]
    fn find_near_duplicates_flags_similar_but_not_identical_bodies() {
        let source_a =
            "function alpha() { const a = 1; const b = 2; const c = 3; const d = 4; return a + b + c + d; }";
        let source_b =
            "function beta() { const a = 1; const b = 2; const c = 3; const d = 4; return a * b * c * d; }";

        let mut fingerprints = fingerprint_source(source_a, "a.ts", "pkg-a");
        fingerprints.extend(fingerprint_source(source_b, "b.ts", "pkg-b"));

        let pairs = find_near_duplicates(&fingerprints, 0.8, true);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].similarity >= 0.8);
    }

    #[test]
    fn find_near_duplicates_excludes_nearby_same_file_pairs() {
        let source = format!(
            "function alpha() {BODY}\nfunction beta() {{ const a = 1; const b = 2; const c = 3; const d = 4; return a - b - c - d; }}"
        );

        let fingerprints = fingerprint_source(&source, "a.ts", "pkg-a");
        let pairs = find_near_duplicates(&fingerprints, 0.5, true);

        assert!(pairs.is_empty());
    }
}
