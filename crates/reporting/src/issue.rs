use std::collections::BTreeMap;

use crate::category::IssueCategory;
use crate::location::IssueLocation;
use crate::severity::Severity;

/// A single finding emitted by an analyzer. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: IssueCategory,
    pub location: IssueLocation,
    pub related_locations: Vec<IssueLocation>,
    pub suggestion: Option<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Issue {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>, severity: Severity, category: IssueCategory, location: IssueLocation) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            severity,
            category,
            location,
            related_locations: Vec::new(),
            suggestion: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_related_locations(mut self, related: Vec<IssueLocation>) -> Self {
        self.related_locations = related;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
