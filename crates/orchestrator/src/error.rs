use std::fmt;

/// Fatal run-level failures. Everything else (a scan error in one package,
/// a single analyzer crash, a corrupted cache) is recovered locally and
/// never reaches this type.
#[derive(Debug)]
pub enum OrchestratorError {
    ScanFailed { reason: String },
    NoPackages { workspace_path: std::path::PathBuf },
    AnalysisFailed { reason: String },
    InvalidConfig { reason: String },
    Cancelled,
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScanFailed { reason } => write!(f, "workspace scan failed: {reason}"),
            Self::NoPackages { workspace_path } => {
                write!(f, "no packages discovered under '{}'", workspace_path.display())
            }
            Self::AnalysisFailed { reason } => write!(f, "analysis failed: {reason}"),
            Self::InvalidConfig { reason } => write!(f, "invalid configuration: {reason}"),
            Self::Cancelled => write!(f, "run was cancelled"),
        }
    }
}

impl std::error::Error for OrchestratorError {}
