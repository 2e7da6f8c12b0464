use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::issue::Issue;
use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    File,
    Category,
    Severity,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueGroup<'a> {
    pub key: String,
    pub issues: Vec<&'a Issue>,
}

/// Groups `issues` per `by`. Severity groups are emitted highest-severity
/// first; category groups alphabetically; file groups (and `None`, which
/// groups everything under a single key) in decreasing issue count.
pub fn group_issues<'a>(issues: &'a [Issue], by: GroupBy) -> Vec<IssueGroup<'a>> {
    match by {
        GroupBy::None => {
            if issues.is_empty() {
                Vec::new()
            } else {
                vec![IssueGroup { key: "all".to_string(), issues: issues.iter().collect() }]
            }
        }
        GroupBy::Severity => {
            let mut by_severity: BTreeMap<Severity, Vec<&Issue>> = BTreeMap::new();
            for issue in issues {
                by_severity.entry(issue.severity).or_default().push(issue);
            }
            by_severity
                .into_iter()
                .rev()
                .map(|(severity, issues)| IssueGroup { key: format!("{severity:?}").to_lowercase(), issues })
                .collect()
        }
        GroupBy::Category => {
            let mut by_category: BTreeMap<&'static str, Vec<&Issue>> = BTreeMap::new();
            for issue in issues {
                by_category.entry(issue.category.as_str()).or_default().push(issue);
            }
            by_category.into_iter().map(|(category, issues)| IssueGroup { key: category.to_string(), issues }).collect()
        }
        GroupBy::File => {
            let mut by_file: HashMap<String, Vec<&Issue>> = HashMap::new();
            for issue in issues {
                let key = issue.location.file_path.to_string_lossy().into_owned();
                by_file.entry(key).or_default().push(issue);
            }
            let mut groups: Vec<IssueGroup> =
                by_file.into_iter().map(|(key, issues)| IssueGroup { key, issues }).collect();
            groups.sort_by(|a, b| b.issues.len().cmp(&a.issues.len()).then_with(|| a.key.cmp(&b.key)));
            groups
        }
    }
}
