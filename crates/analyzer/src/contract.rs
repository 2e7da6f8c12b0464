use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::error::AnalyzerError;

/// Static metadata describing an analyzer, independent of any single run.
#[derive(Debug, Clone)]
pub struct AnalyzerMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub categories: &'static [IssueCategory],
    pub default_severity: Severity,
}

/// The uniform interface every built-in and user-supplied rule implements.
pub trait Analyzer: Send + Sync {
    fn metadata(&self) -> AnalyzerMetadata;

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError>;
}
