//! A static analysis engine for polyglot source-code monorepos.
//!
//! This crate is a thin facade over [`monorepo_orchestrator`], mirroring how
//! the teacher's root package wraps its own orchestrator crate. It exists so
//! downstream users depend on a single, stably-named crate rather than
//! reaching into the workspace's internal crate split.
//!
//! ```no_run
//! use monorepo_analyzer::CancellationToken;
//! use monorepo_analyzer::OrchestratorConfiguration;
//!
//! let config = OrchestratorConfiguration::new("/path/to/workspace");
//! let cancellation = CancellationToken::new();
//!
//! let result = monorepo_analyzer::analyze(&config, &|_event| {}, &cancellation);
//! ```

pub use monorepo_analysis::AnalysisContext;
pub use monorepo_analysis::Analyzer;
pub use monorepo_analysis::AnalyzerError;
pub use monorepo_analysis::AnalyzerMetadata;
pub use monorepo_analysis::AnalyzerOptions;
pub use monorepo_analysis::AnalyzerOverride;
pub use monorepo_analysis::ArchitectureConfig;
pub use monorepo_analysis::Layer;
pub use monorepo_analysis::Registry;
pub use monorepo_analysis::default_registry;
pub use monorepo_cache::AnalysisCache;
pub use monorepo_cache::CacheError;
pub use monorepo_graph::DependencyGraph;
pub use monorepo_graph::GraphStatistics;
pub use monorepo_graph::compute_statistics;
pub use monorepo_orchestrator::AnalysisRunResult;
pub use monorepo_orchestrator::CancellationToken;
pub use monorepo_orchestrator::OrchestratorConfiguration;
pub use monorepo_orchestrator::OrchestratorError;
pub use monorepo_orchestrator::ParallelPipeline;
pub use monorepo_orchestrator::Phase;
pub use monorepo_orchestrator::ProgressCallback;
pub use monorepo_orchestrator::ProgressEvent;
pub use monorepo_reporting::Issue;
pub use monorepo_reporting::IssueCategory;
pub use monorepo_reporting::IssueLocation;
pub use monorepo_reporting::Severity;
pub use monorepo_reporting::Summary;

/// Runs a full analysis over `config.workspace_path`. A convenience
/// re-export of [`monorepo_orchestrator::run`] under the facade's own name.
pub fn analyze(
    config: &OrchestratorConfiguration,
    progress: &ProgressCallback<'_>,
    cancellation: &CancellationToken,
) -> Result<AnalysisRunResult, OrchestratorError> {
    monorepo_orchestrator::run(config, progress, cancellation)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("monorepo_analyzer=debug").try_init();
    }

    fn write_package(root: &std::path::Path, name: &str, files: &[(&str, &str)]) {
        let package_dir = root.join("packages").join(name);
        std::fs::create_dir_all(package_dir.join("src")).unwrap();
        std::fs::write(package_dir.join("package.json"), format!(r#"{{"name": "{name}", "version": "1.0.0"}}"#)).unwrap();

        for (relative, contents) in files {
            let path = package_dir.join("src").join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, contents).unwrap();
        }
    }

    #[test]
    fn analyzes_a_minimal_workspace_end_to_end() {
        init_tracing();

        let dir = tempdir().unwrap();
        write_package(dir.path(), "alpha", &[("index.ts", "import { noop } from './util';\nexport const run = noop;")]);
        write_package(dir.path(), "util", &[("index.ts", "export const noop = () => {};")]);

        let mut config = OrchestratorConfiguration::new(dir.path());
        config.cache = false;

        let mut events = Vec::new();
        let progress = |event: ProgressEvent| events.push(event);

        let result = analyze(&config, &progress, &CancellationToken::new()).unwrap();

        assert_eq!(result.summary.packages_analyzed, 2);
        assert!(!events.is_empty());
    }

    #[test]
    fn second_run_reuses_the_cache_when_nothing_changed() {
        init_tracing();

        let dir = tempdir().unwrap();
        write_package(dir.path(), "alpha", &[("index.ts", "export const a = 1;")]);

        let mut config = OrchestratorConfiguration::new(dir.path());
        config.cache_dir = ".cache".to_string();

        let first = analyze(&config, &|_| {}, &CancellationToken::new()).unwrap();
        assert!(!first.summary.cache_used);

        let second = analyze(&config, &|_| {}, &CancellationToken::new()).unwrap();
        assert!(second.summary.cache_used);
        assert_eq!(second.summary.files_analyzed, 0);
    }

    #[test]
    fn rejects_a_workspace_with_no_packages() {
        let dir = tempdir().unwrap();
        let config = OrchestratorConfiguration::new(dir.path());

        let result = analyze(&config, &|_| {}, &CancellationToken::new());

        assert!(matches!(result, Err(OrchestratorError::NoPackages { .. })));
    }
}
