use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use monorepo_hash::HashAlgorithm;
use monorepo_hash::HashError;
use monorepo_hash::hash_file;

/// The outcome of comparing a set of currently-present paths against a set
/// of previously recorded hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub changed: Vec<PathBuf>,
    pub new: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.new.is_empty() && self.deleted.is_empty()
    }
}

/// Ground truth for "has this path's content changed since it was last
/// recorded". The Cache delegates every hash comparison here rather than
/// comparing digests inline.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    recorded: BTreeMap<PathBuf, String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_recorded(recorded: BTreeMap<PathBuf, String>) -> Self {
        Self { recorded }
    }

    pub fn record(&mut self, path: PathBuf, hash: String) {
        self.recorded.insert(path, hash);
    }

    pub fn recorded_hash(&self, path: &Path) -> Option<&str> {
        self.recorded.get(path).map(String::as_str)
    }

    pub fn clear(&mut self, path: &Path) {
        self.recorded.remove(path);
    }

    pub fn clear_all(&mut self) {
        self.recorded.clear();
    }

    /// `true` if `path`'s current on-disk content hash differs from what was
    /// recorded (or nothing was recorded for it at all).
    pub fn has_changed(&self, path: &Path, algorithm: HashAlgorithm) -> Result<bool, HashError> {
        let current = hash_file(path, algorithm, true)?;
        Ok(self.recorded.get(path).is_none_or(|recorded| recorded != &current))
    }

    /// Partitions `current_paths` into changed/new relative to what was
    /// recorded, plus every recorded path absent from `current_paths`
    /// (deleted). Unreadable current paths are logged and skipped rather
    /// than treated as deletions, since a transient read failure should not
    /// evict a cache entry.
    pub fn validate(&self, current_paths: &[PathBuf], algorithm: HashAlgorithm) -> ChangeSet {
        let mut change_set = ChangeSet::default();
        let current: std::collections::BTreeSet<&PathBuf> = current_paths.iter().collect();

        for path in current_paths {
            match hash_file(path, algorithm, true) {
                Ok(current_hash) => match self.recorded.get(path) {
                    Some(recorded_hash) if recorded_hash == &current_hash => {}
                    Some(_) => change_set.changed.push(path.clone()),
                    None => change_set.new.push(path.clone()),
                },
                Err(error) => {
                    tracing::warn!("skipping change detection for '{}': {error}", path.display());
                }
            }
        }

        for recorded_path in self.recorded.keys() {
            if !current.contains(recorded_path) {
                change_set.deleted.push(recorded_path.clone());
            }
        }

        change_set
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn has_changed_is_true_for_unrecorded_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.ts");
        std::fs::write(&file, "export const a = 1;").unwrap();

        let detector = ChangeDetector::new();

        assert!(detector.has_changed(&file, HashAlgorithm::Sha256).unwrap());
    }

    #[test]
    fn has_changed_is_false_once_recorded_hash_matches() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.ts");
        std::fs::write(&file, "export const a = 1;").unwrap();

        let mut detector = ChangeDetector::new();
        let hash = monorepo_hash::hash_file(&file, HashAlgorithm::Sha256, true).unwrap();
        detector.record(file.clone(), hash);

        assert!(!detector.has_changed(&file, HashAlgorithm::Sha256).unwrap());
    }

    #[test]
    fn validate_partitions_changed_new_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let unchanged = dir.path().join("unchanged.ts");
        let changed = dir.path().join("changed.ts");
        let new_file = dir.path().join("new.ts");
        let deleted = dir.path().join("deleted.ts");

        std::fs::write(&unchanged, "export const a = 1;").unwrap();
        std::fs::write(&changed, "export const b = 1;").unwrap();
        std::fs::write(&new_file, "export const c = 1;").unwrap();

        let mut detector = ChangeDetector::new();
        detector.record(unchanged.clone(), monorepo_hash::hash_file(&unchanged, HashAlgorithm::Sha256, true).unwrap());
        detector.record(changed.clone(), "stale-hash".to_string());
        detector.record(deleted.clone(), "stale-hash".to_string());

        let change_set = detector.validate(&[unchanged, changed.clone(), new_file.clone()], HashAlgorithm::Sha256);

        assert_eq!(change_set.changed, vec![changed]);
        assert_eq!(change_set.new, vec![new_file]);
        assert_eq!(change_set.deleted, vec![deleted]);
    }
}
