use crate::category::IssueCategory;
use crate::issue::Issue;
use crate::severity::Severity;

/// Filters `issues` to those at or above `min_severity` and, when
/// `categories` is non-empty, whose category is in that set.
pub fn filter_issues<'a>(issues: &'a [Issue], min_severity: Severity, categories: &[IssueCategory]) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| issue.severity >= min_severity)
        .filter(|issue| categories.is_empty() || categories.contains(&issue.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::location::IssueLocation;

    fn issue(severity: Severity, category: IssueCategory) -> Issue {
        Issue::new("rule", "title", "description", severity, category, IssueLocation::file("a.ts"))
    }

    #[test]
    fn filters_by_minimum_severity() {
        let issues = vec![issue(Severity::Info, IssueCategory::Dependency), issue(Severity::Error, IssueCategory::Dependency)];

        let filtered = filter_issues(&issues, Severity::Warning, &[]);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].severity, Severity::Error);
    }

    #[test]
    fn filters_by_category_when_non_empty() {
        let issues =
            vec![issue(Severity::Warning, IssueCategory::Dependency), issue(Severity::Warning, IssueCategory::Architecture)];

        let filtered = filter_issues(&issues, Severity::Info, &[IssueCategory::Architecture]);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, IssueCategory::Architecture);
    }

    #[test]
    fn empty_category_set_means_no_category_filtering() {
        let issues =
            vec![issue(Severity::Warning, IssueCategory::Dependency), issue(Severity::Warning, IssueCategory::Architecture)];

        assert_eq!(filter_issues(&issues, Severity::Info, &[]).len(), 2);
    }
}
