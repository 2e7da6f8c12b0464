//! Drives a full analysis run over a workspace: scan, cache validation,
//! parallel analyzer dispatch, filtering, and cache persistence.
//!
//! [`run`] is the single entry point. Everything else in this crate exists
//! to support it: [`OrchestratorConfiguration`] is the resolved input,
//! [`ParallelPipeline`] bounds analyzer fan-out, [`CancellationToken`] lets a
//! caller interrupt a run cooperatively, and [`ProgressEvent`]s report which
//! of the four [`Phase`]s a run is in.

pub mod cancellation;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod run;

pub use cancellation::CancellationToken;
pub use config::OrchestratorConfiguration;
pub use error::OrchestratorError;
pub use pipeline::ParallelPipeline;
pub use progress::Phase;
pub use progress::ProgressCallback;
pub use progress::ProgressEvent;
pub use run::AnalysisRunResult;
pub use run::run;
