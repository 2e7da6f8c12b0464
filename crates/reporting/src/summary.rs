use std::collections::BTreeMap;

use crate::category::IssueCategory;
use crate::issue::Issue;
use crate::severity::Severity;

/// Aggregate counts over a completed analysis run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    pub total_issues: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<IssueCategory, usize>,
    pub packages_analyzed: usize,
    pub files_analyzed: usize,
    pub duration_ms: u128,
    pub cache_used: bool,
    pub files_from_cache: usize,
}

pub fn summarize(
    issues: &[Issue],
    packages_analyzed: usize,
    files_analyzed: usize,
    duration_ms: u128,
    cache_used: bool,
    files_from_cache: usize,
) -> Summary {
    let mut by_severity = BTreeMap::new();
    let mut by_category = BTreeMap::new();

    for issue in issues {
        *by_severity.entry(issue.severity).or_insert(0) += 1;
        *by_category.entry(issue.category).or_insert(0) += 1;
    }

    Summary {
        total_issues: issues.len(),
        by_severity,
        by_category,
        packages_analyzed,
        files_analyzed,
        duration_ms,
        cache_used,
        files_from_cache,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::location::IssueLocation;

    #[test]
    fn counts_issues_by_severity_and_category() {
        let issues = vec![
            Issue::new("a", "t", "d", Severity::Warning, IssueCategory::Dependency, IssueLocation::file("a.ts")),
            Issue::new("b", "t", "d", Severity::Warning, IssueCategory::Dependency, IssueLocation::file("b.ts")),
            Issue::new("c", "t", "d", Severity::Error, IssueCategory::Architecture, IssueLocation::file("c.ts")),
        ];

        let summary = summarize(&issues, 2, 3, 120, false, 0);

        assert_eq!(summary.total_issues, 3);
        assert_eq!(summary.by_severity[&Severity::Warning], 2);
        assert_eq!(summary.by_category[&IssueCategory::Architecture], 1);
        assert_eq!(summary.packages_analyzed, 2);
    }
}
