use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use monorepo_analysis::AnalysisContext;
use monorepo_analysis::default_registry;
use monorepo_cache::AnalysisCache;
use monorepo_cache::CachedFileState;
use monorepo_cache::ValidationResult;
use monorepo_graph::GraphStatistics;
use monorepo_graph::build_graph;
use monorepo_graph::compute_statistics;
use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;
use monorepo_reporting::Summary;
use monorepo_reporting::filter_issues;
use monorepo_reporting::summarize;
use monorepo_source::ScanConfig;
use monorepo_source::Scanner;
use monorepo_source::WorkspacePackage;
use monorepo_syntax::extract_imports_from_file;
use time::OffsetDateTime;

use crate::cancellation::CancellationToken;
use crate::config::OrchestratorConfiguration;
use crate::error::OrchestratorError;
use crate::pipeline::ParallelPipeline;
use crate::progress::Phase;
use crate::progress::ProgressCallback;
use crate::progress::ProgressEvent;

/// The number of entries kept in `graph_statistics.top_most_imported` and
/// `top_most_importing`.
const GRAPH_STATISTICS_TOP_N: usize = 10;

/// The result of a completed run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisRunResult {
    pub issues: Vec<Issue>,
    pub summary: Summary,
    pub graph_statistics: GraphStatistics,
    pub workspace_path: PathBuf,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}

struct CacheState {
    cache: AnalysisCache,
    validation: ValidationResult,
}

/// Runs a full analysis over `config.workspace_path`, following the
/// scan → cache-validate → analyze → filter → persist sequence. Fatal only
/// for an empty scan, an invalid configuration, or an analysis-layer
/// failure outside any single analyzer (per-analyzer failures are
/// recovered as `ANALYZER_ERROR` issues and never reach this signature).
pub fn run(
    config: &OrchestratorConfiguration,
    progress: &ProgressCallback<'_>,
    cancellation: &CancellationToken,
) -> Result<AnalysisRunResult, OrchestratorError> {
    config.validate()?;
    let started_at = OffsetDateTime::now_utc();

    let config_hash = monorepo_hash::hash_json(&config.hashed_subset(), config.hash_algorithm);

    let scan_config = ScanConfig {
        root_dir: config.workspace_path.clone(),
        include_patterns: config.package_patterns.clone(),
        exclude_packages: config.exclude_packages.clone(),
        ..ScanConfig::default()
    };

    let scan_result = Scanner::scan(&scan_config);
    for error in &scan_result.errors {
        tracing::debug!("scan error: {error}");
    }
    if scan_result.packages.is_empty() {
        return Err(OrchestratorError::NoPackages { workspace_path: config.workspace_path.clone() });
    }

    let packages = scan_result.packages;
    progress(ProgressEvent::new(Phase::Scanning, None, packages.len(), Some(packages.len())));

    if cancellation.is_cancelled() {
        return Err(OrchestratorError::Cancelled);
    }

    let source_files: Vec<PathBuf> = packages.iter().flat_map(|package| package.source_files.iter().cloned()).collect();

    let mut import_results = Vec::with_capacity(source_files.len());
    for (index, file) in source_files.iter().enumerate() {
        match extract_imports_from_file(file, &config.workspace_prefixes) {
            Ok(result) => import_results.push(result),
            Err(error) => tracing::debug!("{error}"),
        }
        progress(ProgressEvent::new(
            Phase::Parsing,
            Some(file.display().to_string()),
            index + 1,
            Some(source_files.len()),
        ));

        if cancellation.is_cancelled() {
            return Err(OrchestratorError::Cancelled);
        }
    }

    let (graph, graph_errors) =
        build_graph(&config.workspace_path, &import_results, |path| package_name_for(&packages, path), true);
    for error in &graph_errors {
        tracing::debug!("{error}");
    }

    let config_file_paths = config_file_paths(&packages);
    let cache_state = resolve_cache(config, &packages, &source_files, &config_file_paths, &config_hash);

    let unchanged_cache_hit = cache_state.as_ref().is_some_and(|state| {
        state.validation.is_valid
            && state.validation.changed_files.is_empty()
            && state.validation.new_files.is_empty()
            && state.validation.deleted_files.is_empty()
    });

    if cancellation.is_cancelled() {
        return Err(OrchestratorError::Cancelled);
    }

    let (raw_issues, files_analyzed, files_from_cache, final_cache_state) = if unchanged_cache_hit {
        let state = cache_state.expect("unchanged_cache_hit implies Some");
        let files_from_cache = state.cache.files.len();
        let issues: Vec<Issue> = state.cache.all_issues().cloned().collect();
        (issues, 0, files_from_cache, Some(state))
    } else {
        let context_progress = |message: &str| {
            progress(ProgressEvent::new(Phase::Analyzing, Some(message.to_string()), 0, None));
        };

        let context = AnalysisContext::new(
            config.workspace_path.clone(),
            &packages,
            &graph,
            &import_results,
            config_hash.clone(),
            &config.analyzer_options,
            &context_progress,
        );

        let registry = default_registry();
        let enabled = registry.enabled(&config.analyzer_options);
        let total_analyzers = enabled.len();

        let pipeline = ParallelPipeline::new(config.concurrency)
            .map_err(|error| OrchestratorError::AnalysisFailed { reason: error.to_string() })?;

        let outcomes: Vec<Vec<Issue>> = pipeline.map(enabled, |analyzer| match analyzer.analyze(&context) {
            Ok(issues) => issues,
            Err(error) => {
                tracing::warn!("{error}");
                vec![
                    Issue::new(
                        "orchestrator",
                        "Analyzer error",
                        error.to_string(),
                        Severity::Error,
                        IssueCategory::Configuration,
                        IssueLocation::file(&config.workspace_path),
                    )
                    .with_metadata("analyzerId", error.analyzer_id.clone()),
                ]
            }
        });

        progress(ProgressEvent::new(Phase::Analyzing, None, total_analyzers, Some(total_analyzers)));

        let computed_issues: Vec<Issue> = outcomes.into_iter().flatten().collect();

        // Every analyzer still runs over the full workspace context above —
        // cross-file rules (cycles, unused deps, duplicates) need the whole
        // graph to stay correct. What's incremental is what we keep: a fresh
        // per-file issue only survives for a file in `cachedFiles`/
        // `filesToAnalyze`'s "to analyze" half; an unchanged file's issues are
        // replaced with what the cache already recorded for it.
        match cache_state {
            Some(state) => {
                let delta: BTreeSet<PathBuf> =
                    state.validation.changed_files.iter().chain(state.validation.new_files.iter()).cloned().collect();
                let deleted: BTreeSet<PathBuf> = state.validation.deleted_files.iter().cloned().collect();
                let known: BTreeSet<PathBuf> = source_files.iter().cloned().collect();

                let mut merged = Vec::new();
                for issue in &computed_issues {
                    let file = &issue.location.file_path;
                    if !known.contains(file) || delta.contains(file) {
                        merged.push(issue.clone());
                    }
                }

                let mut files_from_cache = 0usize;
                for file in &source_files {
                    if delta.contains(file) || deleted.contains(file) {
                        continue;
                    }
                    if let Some(analysis) = state.cache.file_analysis(file) {
                        merged.extend(analysis.issues.iter().cloned());
                        files_from_cache += 1;
                    }
                }

                let files_analyzed = delta.len();
                (merged, files_analyzed, files_from_cache, Some(state))
            }
            None => (computed_issues, source_files.len(), 0, None),
        }
    };

    progress(ProgressEvent::new(Phase::Reporting, None, raw_issues.len(), Some(raw_issues.len())));

    if cancellation.is_cancelled() {
        return Err(OrchestratorError::Cancelled);
    }

    if config.cache {
        if let Some(CacheState { mut cache, validation }) = final_cache_state {
            if !unchanged_cache_hit {
                let delta_files: Vec<PathBuf> =
                    validation.changed_files.iter().chain(validation.new_files.iter()).cloned().collect();
                persist_cache(&mut cache, config, &source_files, &delta_files, &validation.deleted_files, &raw_issues);
            }

            if let Err(error) = monorepo_cache::save(&cache, &config.workspace_path, &config.cache_dir, false) {
                tracing::warn!("failed to save analysis cache: {error}");
            }
        }
    }

    let filtered_issues: Vec<Issue> =
        filter_issues(&raw_issues, config.min_severity, &config.categories).into_iter().cloned().collect();

    let graph_statistics = compute_statistics(&graph, GRAPH_STATISTICS_TOP_N, &config.workspace_prefixes);

    let completed_at = OffsetDateTime::now_utc();
    let duration_ms = (completed_at - started_at).whole_milliseconds().max(0) as u128;
    let summary =
        summarize(&filtered_issues, packages.len(), files_analyzed, duration_ms, unchanged_cache_hit, files_from_cache);

    Ok(AnalysisRunResult {
        issues: filtered_issues,
        summary,
        graph_statistics,
        workspace_path: config.workspace_path.clone(),
        started_at,
        completed_at,
    })
}

fn package_name_for(packages: &[WorkspacePackage], path: &Path) -> Option<String> {
    packages.iter().find(|package| package.owns(path)).map(|package| package.name.clone())
}

fn config_file_paths(packages: &[WorkspacePackage]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for package in packages {
        paths.push(package.package_json_path.clone());
        if package.has_tsconfig {
            paths.push(package.package_path.join("tsconfig.json"));
        }
    }
    paths.sort();
    paths
}

fn resolve_cache(
    config: &OrchestratorConfiguration,
    packages: &[WorkspacePackage],
    source_files: &[PathBuf],
    config_file_paths: &[PathBuf],
    config_hash: &str,
) -> Option<CacheState> {
    if !config.cache {
        return None;
    }

    let loaded = monorepo_cache::load(&config.workspace_path, &config.cache_dir, config.max_cache_age_ms);

    let cache = match loaded {
        Ok(existing)
            if monorepo_cache::quick_validate(&existing, &config.workspace_path, config_hash, config.max_cache_age_ms) =>
        {
            existing
        }
        Ok(_) => {
            tracing::debug!("cache failed quick validation, starting fresh");
            return Some(fresh_cache_state(config, source_files, config_file_paths, config_hash));
        }
        Err(error) => {
            tracing::debug!("no usable cache: {error}");
            return Some(fresh_cache_state(config, source_files, config_file_paths, config_hash));
        }
    };

    let package_paths: Vec<(String, PathBuf)> =
        packages.iter().map(|package| (package.name.clone(), package.package_path.clone())).collect();
    let validation = monorepo_cache::validate(&cache, source_files, &package_paths, config.hash_algorithm);

    if !validation.is_valid {
        tracing::info!("cache invalidated: {}", validation.invalidation_reason.clone().unwrap_or_default());
        return Some(fresh_cache_state(config, source_files, config_file_paths, config_hash));
    }

    Some(CacheState { cache, validation })
}

fn fresh_cache_state(
    config: &OrchestratorConfiguration,
    source_files: &[PathBuf],
    config_file_paths: &[PathBuf],
    config_hash: &str,
) -> CacheState {
    let mut cache = AnalysisCache::empty(config.workspace_path.clone(), config_hash.to_string());

    for path in config_file_paths {
        if let Ok(hash) = monorepo_hash::hash_file(path, config.hash_algorithm, true) {
            let size = std::fs::metadata(path).map(|metadata| metadata.len()).unwrap_or(0);
            cache.record_config_file(CachedFileState {
                path: path.clone(),
                content_hash: hash,
                modified_at: OffsetDateTime::now_utc(),
                size,
            });
        }
    }

    let validation = ValidationResult {
        is_valid: true,
        invalidation_reason: None,
        changed_config_files: Vec::new(),
        changed_files: Vec::new(),
        new_files: source_files.to_vec(),
        deleted_files: Vec::new(),
        invalidated_packages: Vec::new(),
    };

    CacheState { cache, validation }
}

/// Groups the run's issues by the file that owns them and records a fresh
/// `CachedFileState` only for `delta_files` (the `changed_files`/`new_files`
/// that were actually re-analyzed this run) and drops entries for
/// `deleted_files`. A source file outside both sets keeps whatever cache
/// entry it already had — it was not re-analyzed, so there is nothing new to
/// persist for it. Anything without a per-file home (cross-file rules like
/// circular-import or version-alignment) is collected as `workspaceIssues`,
/// which is always rebuilt fresh since those rules see the whole workspace
/// every run regardless of which files changed.
fn persist_cache(
    cache: &mut AnalysisCache,
    config: &OrchestratorConfiguration,
    source_files: &[PathBuf],
    delta_files: &[PathBuf],
    deleted_files: &[PathBuf],
    issues: &[Issue],
) {
    let mut by_file: BTreeMap<PathBuf, Vec<Issue>> = BTreeMap::new();
    let mut workspace_issues = Vec::new();
    let known: BTreeSet<&PathBuf> = source_files.iter().collect();

    for issue in issues {
        if known.contains(&issue.location.file_path) {
            by_file.entry(issue.location.file_path.clone()).or_default().push(issue.clone());
        } else {
            workspace_issues.push(issue.clone());
        }
    }

    for file in deleted_files {
        cache.remove_file(file);
    }

    for file in delta_files {
        cache.remove_file(file);
        if let Ok(hash) = monorepo_hash::hash_file(file, config.hash_algorithm, true) {
            let size = std::fs::metadata(file).map(|metadata| metadata.len()).unwrap_or(0);
            let state = CachedFileState { path: file.clone(), content_hash: hash, modified_at: OffsetDateTime::now_utc(), size };
            let file_issues = by_file.remove(file).unwrap_or_default();
            cache.update_file(state, file_issues, Vec::new());
        }
    }

    cache.workspace_issues = workspace_issues;
}
