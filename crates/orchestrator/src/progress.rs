/// The four phases a run moves through, strictly in sequence: a later phase
/// never emits before an earlier one has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Scanning,
    Parsing,
    Analyzing,
    Reporting,
}

/// A single progress notification. `current` names the item in progress
/// (a package name, a file path, an analyzer id); `total` is omitted when
/// the phase's total item count isn't known up front.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub current: Option<String>,
    pub processed: usize,
    pub total: Option<usize>,
}

impl ProgressEvent {
    pub fn new(phase: Phase, current: Option<String>, processed: usize, total: Option<usize>) -> Self {
        Self { phase, current, processed, total }
    }
}

/// The callback every run reports through, driven synchronously from the
/// same call site that drives the pipeline.
pub type ProgressCallback<'a> = dyn Fn(ProgressEvent) + Sync + 'a;
