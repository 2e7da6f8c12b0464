use std::fmt;

/// An analyzer's failure is isolated to that analyzer: the orchestrator
/// turns it into an issue and continues with the rest of the registry.
#[derive(Debug)]
pub struct AnalyzerError {
    pub analyzer_id: String,
    pub reason: String,
}

impl AnalyzerError {
    pub fn new(analyzer_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { analyzer_id: analyzer_id.into(), reason: reason.into() }
    }
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "analyzer {:?} failed: {}", self.analyzer_id, self.reason)
    }
}

impl std::error::Error for AnalyzerError {}
