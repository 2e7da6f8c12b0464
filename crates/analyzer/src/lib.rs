//! The analyzer contract, registry, and built-in rule suite.
//!
//! Everything an individual rule needs to run lives on [`AnalysisContext`];
//! rules never reach past it into the scanner or graph builder directly.

pub mod context;
pub mod contract;
pub mod error;
pub mod options;
pub mod registry;
pub mod rules;

pub use context::AnalysisContext;
pub use contract::Analyzer;
pub use contract::AnalyzerMetadata;
pub use error::AnalyzerError;
pub use options::AnalyzerOptions;
pub use options::AnalyzerOverride;
pub use options::ArchitectureConfig;
pub use options::Layer;
pub use registry::Registry;
pub use registry::default_registry;
