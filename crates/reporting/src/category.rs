/// The rule family an [`crate::Issue`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    Configuration,
    Dependency,
    Architecture,
    Performance,
    CircularImport,
    UnusedExport,
    TypeSafety,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 7] = [
        IssueCategory::Configuration,
        IssueCategory::Dependency,
        IssueCategory::Architecture,
        IssueCategory::Performance,
        IssueCategory::CircularImport,
        IssueCategory::UnusedExport,
        IssueCategory::TypeSafety,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Dependency => "dependency",
            Self::Architecture => "architecture",
            Self::Performance => "performance",
            Self::CircularImport => "circular-import",
            Self::UnusedExport => "unused-export",
            Self::TypeSafety => "type-safety",
        }
    }
}
