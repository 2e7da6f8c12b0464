//! Incremental analysis cache.
//!
//! [`model::AnalysisCache`] is the on-disk document; [`cache`] holds the
//! free functions (`load`/`quick_validate`/`validate`/`save`/`clear`) that
//! read and write it; [`change_detector`] is the hash-comparison primitive
//! both the cache and, eventually, a file watcher would share.

pub mod cache;
pub mod change_detector;
pub mod error;
pub mod model;
pub mod validation;

pub use cache::CACHE_FILE_NAME;
pub use cache::CACHE_FILE_NAME_GZ;
pub use cache::cache_path;
pub use cache::clear;
pub use cache::load;
pub use cache::quick_validate;
pub use cache::save;
pub use cache::validate;
pub use change_detector::ChangeDetector;
pub use change_detector::ChangeSet;
pub use error::CacheError;
pub use model::ANALYZER_VERSION;
pub use model::AnalysisCache;
pub use model::CacheMetadata;
pub use model::CachedFileAnalysis;
pub use model::CachedFileState;
pub use model::CachedPackageAnalysis;
pub use model::DEFAULT_MAX_CACHE_AGE_MS;
pub use model::SCHEMA_VERSION;
pub use validation::ValidationResult;
