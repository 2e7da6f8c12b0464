use std::path::Path;
use std::path::PathBuf;

use monorepo_graph::DependencyGraph;
use monorepo_source::WorkspacePackage;
use monorepo_syntax::ImportExtractionResult;

use crate::options::AnalyzerOptions;

/// The read-only view every analyzer runs against. Nothing here is mutated
/// during a run; analyzers that need scratch state own it locally.
pub struct AnalysisContext<'a> {
    pub workspace_path: PathBuf,
    pub packages: &'a [WorkspacePackage],
    pub source_files: Vec<&'a Path>,
    pub graph: &'a DependencyGraph,
    pub import_results: &'a [ImportExtractionResult],
    pub config_hash: String,
    pub options: &'a AnalyzerOptions,
    report_progress: &'a (dyn Fn(&str) + Sync),
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        workspace_path: PathBuf,
        packages: &'a [WorkspacePackage],
        graph: &'a DependencyGraph,
        import_results: &'a [ImportExtractionResult],
        config_hash: String,
        options: &'a AnalyzerOptions,
        report_progress: &'a (dyn Fn(&str) + Sync),
    ) -> Self {
        let source_files = packages.iter().flat_map(|package| package.source_files.iter().map(PathBuf::as_path)).collect();

        Self { workspace_path, packages, source_files, graph, import_results, config_hash, options, report_progress }
    }

    pub fn report_progress(&self, message: &str) {
        (self.report_progress)(message);
    }

    pub fn import_result_for(&self, file_path: &Path) -> Option<&'a ImportExtractionResult> {
        self.import_results.iter().find(|result| result.file_path == file_path)
    }

    pub fn package_for(&self, file_path: &Path) -> Option<&'a WorkspacePackage> {
        self.packages.iter().find(|package| package.owns(file_path))
    }
}
