//! Explicit memoization of [`load`] per file path.
//!
//! Loading is the only costly step in the pipeline, so a long-lived caller
//! keeps one [`DatasetCache`] and re-runs the cheap filters and reports
//! against the cached table. Entries live until they are invalidated; there
//! is no time-based expiry and no file watching.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fleet_core::error::LoadError;
use fleet_core::table::Table;

use crate::loader::load;

// ── DatasetCache ──────────────────────────────────────────────────────────────

/// Loaded tables keyed by canonical file path.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use fleet_data::cache::DatasetCache;
///
/// let mut cache = DatasetCache::new();
/// let rows = cache.get_or_load(Path::new("fleet.csv"))?.len();
/// println!("{rows} rows");
/// # Ok::<(), fleet_data::core::LoadError>(())
/// ```
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Table>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `path`, loading it on first use.
    ///
    /// A failed load leaves the cache untouched, so the next call retries.
    pub fn get_or_load(&mut self, path: &Path) -> Result<&Table, LoadError> {
        match self.entries.entry(cache_key(path)) {
            Entry::Occupied(entry) => {
                tracing::debug!(path = %path.display(), "returning cached dataset");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let table = load(path)?;
                tracing::debug!(
                    path = %path.display(),
                    rows = table.len(),
                    "dataset cached"
                );
                Ok(entry.insert(table))
            }
        }
    }

    /// Whether `path` currently has a cached table.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&cache_key(path))
    }

    /// Drop the entry for `path`. Returns `true` if one was present.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let removed = self.entries.remove(&cache_key(path)).is_some();
        if removed {
            tracing::debug!(path = %path.display(), "dataset invalidated");
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        tracing::debug!("dataset cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Two spellings of the same file share an entry.
///
/// A file that no longer exists (or not yet) is keyed by its canonical
/// directory plus its file name, so a deleted file still maps to the entry
/// it was loaded under. Only when the directory cannot be resolved either is
/// the path used as given.
fn cache_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = "\
vehicle_id,location,timestamp,speed_mph,rpm,fuel_consumption_mpg,engine_temp_f,distance_miles
V1,NYC,2024-01-01 10:00:00,60,2000,25,180,10
V2,LA,2024-01-01 11:00:00,50,1800,30,175,5
";

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("fleet.csv");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_first_call_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let mut cache = DatasetCache::new();

        assert!(cache.is_empty());
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&path));
    }

    #[test]
    fn test_second_call_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let mut cache = DatasetCache::new();
        cache.get_or_load(&path).unwrap();

        // A changed file is not re-read until invalidated.
        fs::write(&path, SAMPLE.lines().take(2).collect::<Vec<_>>().join("\n")).unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 2);

        assert!(cache.invalidate(&path));
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_equivalent_paths_share_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let dotted = dir.path().join(".").join("fleet.csv");
        let mut cache = DatasetCache::new();

        cache.get_or_load(&path).unwrap();
        cache.get_or_load(&dotted).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let mut cache = DatasetCache::new();

        let err = cache.get_or_load(&path).unwrap_err();
        assert!(matches!(err, LoadError::FileRead { .. }));
        assert!(cache.is_empty());

        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_invalidate_after_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let dotted = dir.path().join(".").join("fleet.csv");
        let mut cache = DatasetCache::new();
        cache.get_or_load(&dotted).unwrap();

        fs::remove_file(&path).unwrap();
        assert!(cache.contains(&dotted));
        assert!(cache.invalidate(&dotted));
        assert!(cache.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_invalidate_through_symlink_after_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir(&data_dir).unwrap();
        let path = write_sample(&data_dir);
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&data_dir, &link).unwrap();
        let linked = link.join("fleet.csv");

        let mut cache = DatasetCache::new();
        cache.get_or_load(&linked).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(cache.invalidate(&linked));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalidate_unknown_path() {
        let mut cache = DatasetCache::new();
        assert!(!cache.invalidate(Path::new("/nonexistent/fleet.csv")));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let mut cache = DatasetCache::new();
        cache.get_or_load(&path).unwrap();

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains(&path));
    }
}
