use std::io::Read as _;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use monorepo_hash::HashAlgorithm;
use time::OffsetDateTime;

use crate::change_detector::ChangeDetector;
use crate::error::CacheError;
use crate::model::ANALYZER_VERSION;
use crate::model::AnalysisCache;
use crate::model::SCHEMA_VERSION;
use crate::validation::ValidationResult;
use crate::validation::invalidated_packages;

pub const CACHE_FILE_NAME: &str = "analysis-cache.json";
pub const CACHE_FILE_NAME_GZ: &str = "analysis-cache.json.gz";

pub fn cache_path(workspace_path: &Path, cache_dir: &str, gzip: bool) -> PathBuf {
    workspace_path.join(cache_dir).join(if gzip { CACHE_FILE_NAME_GZ } else { CACHE_FILE_NAME })
}

/// Reads and, if present as `.gz`, decompresses the cache file, failing on
/// a schema mismatch or an age past `max_age_ms`. Prefers the gzipped file
/// over the plain one when both exist.
pub fn load(workspace_path: &Path, cache_dir: &str, max_age_ms: u64) -> Result<AnalysisCache, CacheError> {
    let gz_path = cache_path(workspace_path, cache_dir, true);
    let plain_path = cache_path(workspace_path, cache_dir, false);

    let (path, bytes) = if gz_path.is_file() {
        let raw = std::fs::read(&gz_path)
            .map_err(|error| CacheError::ReadFailed { path: gz_path.clone(), reason: error.to_string() })?;
        let mut decompressed = Vec::new();
        GzDecoder::new(&raw[..])
            .read_to_end(&mut decompressed)
            .map_err(|error| CacheError::Corrupted { path: gz_path.clone(), reason: error.to_string() })?;
        (gz_path, decompressed)
    } else if plain_path.is_file() {
        let raw = std::fs::read(&plain_path)
            .map_err(|error| CacheError::ReadFailed { path: plain_path.clone(), reason: error.to_string() })?;
        (plain_path, raw)
    } else {
        return Err(CacheError::NotFound { path: plain_path });
    };

    let cache: AnalysisCache = serde_json::from_slice(&bytes)
        .map_err(|error| CacheError::Corrupted { path: path.clone(), reason: error.to_string() })?;

    if cache.metadata.schema_version != SCHEMA_VERSION {
        return Err(CacheError::VersionMismatch { found: cache.metadata.schema_version, expected: SCHEMA_VERSION });
    }

    let age_ms = age_ms(cache.metadata.updated_at);
    if age_ms > max_age_ms {
        return Err(CacheError::Expired { age_ms, max_age_ms });
    }

    Ok(cache)
}

fn age_ms(since: OffsetDateTime) -> u64 {
    (OffsetDateTime::now_utc() - since).whole_milliseconds().max(0) as u64
}

/// No-I/O checks: schema version, workspace path, analyzer version, config
/// hash, and age must all match. `validate` is only ever run once this
/// holds.
pub fn quick_validate(cache: &AnalysisCache, workspace_path: &Path, config_hash: &str, max_age_ms: u64) -> bool {
    cache.metadata.schema_version == SCHEMA_VERSION
        && cache.metadata.workspace_path == workspace_path
        && cache.metadata.analyzer_version == ANALYZER_VERSION
        && cache.metadata.config_hash == config_hash
        && age_ms(cache.metadata.updated_at) <= max_age_ms
}

/// Full validation: a changed config file forces total invalidation before
/// any source file is even considered. Otherwise, partitions `current_files`
/// against the cache's recorded file states and maps changed paths back to
/// the packages they fall under.
pub fn validate(
    cache: &AnalysisCache,
    current_files: &[PathBuf],
    packages: &[(String, PathBuf)],
    algorithm: HashAlgorithm,
) -> ValidationResult {
    let config_detector = ChangeDetector::from_recorded(
        cache.config_files.iter().map(|state| (state.path.clone(), state.content_hash.clone())).collect(),
    );
    let config_paths: Vec<PathBuf> = cache.config_files.iter().map(|state| state.path.clone()).collect();
    let config_changes = config_detector.validate(&config_paths, algorithm);

    if !config_changes.is_empty() {
        let mut changed_config_files = config_changes.changed;
        changed_config_files.extend(config_changes.new);
        changed_config_files.extend(config_changes.deleted);
        changed_config_files.sort();

        return ValidationResult {
            is_valid: false,
            invalidation_reason: Some("Configuration files changed".to_string()),
            changed_config_files,
            changed_files: Vec::new(),
            new_files: Vec::new(),
            deleted_files: Vec::new(),
            invalidated_packages: Vec::new(),
        };
    }

    let file_detector = ChangeDetector::from_recorded(
        cache.files.values().map(|analysis| (analysis.file_state.path.clone(), analysis.file_state.content_hash.clone())).collect(),
    );
    let file_changes = file_detector.validate(current_files, algorithm);

    let mut all_changed_paths = file_changes.changed.clone();
    all_changed_paths.extend(file_changes.new.iter().cloned());
    all_changed_paths.extend(file_changes.deleted.iter().cloned());

    ValidationResult {
        is_valid: true,
        invalidation_reason: None,
        changed_config_files: Vec::new(),
        changed_files: file_changes.changed,
        new_files: file_changes.new,
        deleted_files: file_changes.deleted,
        invalidated_packages: invalidated_packages(&all_changed_paths, packages),
    }
}

/// Write-through with optional gzip. Pretty-printed when uncompressed to
/// aid diffing; the counterpart file for the unused format is removed so a
/// stale copy under the other extension never shadows this save.
pub fn save(cache: &AnalysisCache, workspace_path: &Path, cache_dir: &str, gzip: bool) -> Result<(), CacheError> {
    let path = cache_path(workspace_path, cache_dir, gzip);
    let other_path = cache_path(workspace_path, cache_dir, !gzip);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|error| CacheError::WriteFailed { path: path.clone(), reason: error.to_string() })?;
    }

    if gzip {
        let json = serde_json::to_vec(cache)
            .map_err(|error| CacheError::WriteFailed { path: path.clone(), reason: error.to_string() })?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&json)
            .map_err(|error| CacheError::WriteFailed { path: path.clone(), reason: error.to_string() })?;
        let compressed =
            encoder.finish().map_err(|error| CacheError::WriteFailed { path: path.clone(), reason: error.to_string() })?;
        std::fs::write(&path, compressed)
            .map_err(|error| CacheError::WriteFailed { path: path.clone(), reason: error.to_string() })?;
    } else {
        let json = serde_json::to_vec_pretty(cache)
            .map_err(|error| CacheError::WriteFailed { path: path.clone(), reason: error.to_string() })?;
        std::fs::write(&path, json)
            .map_err(|error| CacheError::WriteFailed { path: path.clone(), reason: error.to_string() })?;
    }

    let _ = std::fs::remove_file(&other_path);

    tracing::debug!("wrote analysis cache to '{}'", path.display());

    Ok(())
}

/// Removes the entire cache directory. Not finding one is not an error.
pub fn clear(workspace_path: &Path, cache_dir: &str) -> Result<(), CacheError> {
    let dir = workspace_path.join(cache_dir);
    match std::fs::remove_dir_all(&dir) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(CacheError::WriteFailed { path: dir, reason: error.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn save_and_load_round_trip_uncompressed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnalysisCache::empty(dir.path().to_path_buf(), "config-hash".to_string());

        save(&cache, dir.path(), ".cache", false).unwrap();
        let loaded = load(dir.path(), ".cache", DEFAULT_MAX_AGE_FOR_TESTS).unwrap();

        assert_eq!(loaded.metadata.config_hash, cache.metadata.config_hash);
        assert_eq!(loaded.metadata.workspace_path, cache.metadata.workspace_path);
    }

    #[test]
    fn save_and_load_round_trip_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnalysisCache::empty(dir.path().to_path_buf(), "config-hash".to_string());

        save(&cache, dir.path(), ".cache", true).unwrap();
        let loaded = load(dir.path(), ".cache", DEFAULT_MAX_AGE_FOR_TESTS).unwrap();

        assert_eq!(loaded.metadata.config_hash, cache.metadata.config_hash);
    }

    #[test]
    fn load_reports_not_found_for_missing_cache() {
        let dir = tempfile::tempdir().unwrap();

        let result = load(dir.path(), ".cache", DEFAULT_MAX_AGE_FOR_TESTS);

        assert!(matches!(result, Err(CacheError::NotFound { .. })));
    }

    #[test]
    fn load_reports_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AnalysisCache::empty(dir.path().to_path_buf(), "hash".to_string());
        cache.metadata.schema_version = SCHEMA_VERSION + 1;

        save(&cache, dir.path(), ".cache", false).unwrap();
        let result = load(dir.path(), ".cache", DEFAULT_MAX_AGE_FOR_TESTS);

        assert!(matches!(result, Err(CacheError::VersionMismatch { .. })));
    }

    #[test]
    fn quick_validate_rejects_mismatched_config_hash() {
        let cache = AnalysisCache::empty(PathBuf::from("/workspace"), "hash-a".to_string());

        assert!(!quick_validate(&cache, Path::new("/workspace"), "hash-b", DEFAULT_MAX_AGE_FOR_TESTS));
        assert!(quick_validate(&cache, Path::new("/workspace"), "hash-a", DEFAULT_MAX_AGE_FOR_TESTS));
    }

    #[test]
    fn validate_invalidates_totally_on_config_change() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("package.json");
        std::fs::write(&config_path, "{}").unwrap();

        let mut cache = AnalysisCache::empty(dir.path().to_path_buf(), "hash".to_string());
        cache.record_config_file(crate::model::CachedFileState {
            path: config_path.clone(),
            content_hash: "stale".to_string(),
            modified_at: OffsetDateTime::now_utc(),
            size: 2,
        });

        let result = validate(&cache, &[], &[], HashAlgorithm::Sha256);

        assert!(!result.is_valid);
        assert_eq!(result.invalidation_reason.as_deref(), Some("Configuration files changed"));
        assert_eq!(result.changed_config_files, vec![config_path]);
    }

    #[test]
    fn validate_reports_changed_new_and_deleted_files_and_maps_to_packages() {
        let dir = tempfile::tempdir().unwrap();
        let package_dir = dir.path().join("packages/a");
        std::fs::create_dir_all(&package_dir).unwrap();
        let unchanged = package_dir.join("unchanged.ts");
        let changed = package_dir.join("changed.ts");
        let new_file = package_dir.join("new.ts");
        std::fs::write(&unchanged, "a").unwrap();
        std::fs::write(&changed, "b").unwrap();
        std::fs::write(&new_file, "c").unwrap();

        let mut cache = AnalysisCache::empty(dir.path().to_path_buf(), "hash".to_string());
        cache.update_file(
            crate::model::CachedFileState {
                path: unchanged.clone(),
                content_hash: monorepo_hash::hash_file(&unchanged, HashAlgorithm::Sha256, true).unwrap(),
                modified_at: OffsetDateTime::now_utc(),
                size: 1,
            },
            Vec::new(),
            Vec::new(),
        );
        cache.update_file(
            crate::model::CachedFileState {
                path: changed.clone(),
                content_hash: "stale".to_string(),
                modified_at: OffsetDateTime::now_utc(),
                size: 1,
            },
            Vec::new(),
            Vec::new(),
        );

        let packages = vec![("a".to_string(), package_dir.clone())];
        let result = validate(&cache, &[unchanged, changed.clone(), new_file.clone()], &packages, HashAlgorithm::Sha256);

        assert!(result.is_valid);
        assert_eq!(result.changed_files, vec![changed]);
        assert_eq!(result.new_files, vec![new_file]);
        assert_eq!(result.invalidated_packages, vec!["a".to_string()]);
    }

    #[test]
    fn clear_removes_cache_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnalysisCache::empty(dir.path().to_path_buf(), "hash".to_string());
        save(&cache, dir.path(), ".cache", false).unwrap();

        clear(dir.path(), ".cache").unwrap();

        assert!(load(dir.path(), ".cache", DEFAULT_MAX_AGE_FOR_TESTS).is_err());
    }

    const DEFAULT_MAX_AGE_FOR_TESTS: u64 = crate::model::DEFAULT_MAX_CACHE_AGE_MS;
}
