//! The issue model common to every analyzer: severity, category, location,
//! filtering, grouping, and run summaries.

pub mod category;
pub mod filter;
pub mod group;
pub mod issue;
pub mod location;
pub mod severity;
pub mod summary;

pub use category::IssueCategory;
pub use filter::filter_issues;
pub use group::GroupBy;
pub use group::IssueGroup;
pub use group::group_issues;
pub use issue::Issue;
pub use location::IssueLocation;
pub use severity::Severity;
pub use summary::Summary;
pub use summary::summarize;
