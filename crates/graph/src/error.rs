use std::fmt;

/// Errors raised while resolving an import's target into a graph edge.
///
/// These are per-edge, not per-run: [`crate::build_graph`] accumulates them
/// and still returns a graph built from every edge that resolved cleanly,
/// mirroring how the scanner accumulates per-package errors.
#[derive(Debug)]
pub enum GraphError {
    InvalidSpecifier { source_id: String, specifier: String },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpecifier { source_id, specifier } => {
                write!(f, "{source_id}: could not resolve import specifier {specifier:?}")
            }
        }
    }
}

impl std::error::Error for GraphError {}
