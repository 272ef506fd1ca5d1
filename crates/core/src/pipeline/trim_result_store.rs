use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::time_range::TimeRange;

#[derive(Error, Debug)]
pub enum TrimResultStoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid result file: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Video filename to the ranges kept in its trimmed version, persisted as
/// pretty-printed JSON (`{"talk.mp4": [[1.0, 3.0], ...]}`).
pub struct TrimResultStore {
    path: PathBuf,
    results: BTreeMap<String, Vec<TimeRange>>,
}

impl TrimResultStore {
    /// Loads existing results so repeated runs accumulate. A missing file
    /// starts empty.
    pub fn open(path: &Path) -> Result<Self, TrimResultStoreError> {
        let results = match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => {
                serde_json::from_str(&text).map_err(|source| TrimResultStoreError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(TrimResultStoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if !results.is_empty() {
            log::info!(
                "Loaded {} previous results from {}",
                results.len(),
                path.display()
            );
        }
        Ok(Self {
            path: path.to_path_buf(),
            results,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn results(&self) -> &BTreeMap<String, Vec<TimeRange>> {
        &self.results
    }

    /// Replaces any earlier entry for the same video.
    pub fn record(&mut self, video_name: impl Into<String>, ranges: Vec<TimeRange>) {
        self.results.insert(video_name.into(), ranges);
    }

    /// Writes the whole map to a sibling temp file, then renames it over the
    /// result file so a crash never leaves it half-written.
    pub fn flush(&self) -> Result<(), TrimResultStoreError> {
        let json = serde_json::to_string_pretty(&self.results)?;
        let tmp = temp_path(&self.path);
        let write_err = |source: std::io::Error| TrimResultStoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&tmp, json + "\n").map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        log::debug!("Saved {} results to {}", self.results.len(), self.path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "results.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: f64, end: f64) -> TimeRange {
        TimeRange::new(start, end).unwrap()
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TrimResultStore::open(&dir.path().join("results.json")).unwrap();
        assert!(store.results().is_empty());
    }

    #[test]
    fn test_flush_writes_pretty_json_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let mut store = TrimResultStore::open(&path).unwrap();
        store.record("talk.mp4", vec![range(1.0, 3.5), range(10.0, 12.0)]);
        store.flush().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!({"talk.mp4": [[1.0, 3.5], [10.0, 12.0]]}));
        assert!(text.contains("\n  \"talk.mp4\""));
        assert!(!dir.path().join("results.json.tmp").exists());
    }

    #[test]
    fn test_reopen_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut first = TrimResultStore::open(&path).unwrap();
        first.record("a.mp4", vec![range(0.0, 2.0)]);
        first.flush().unwrap();

        let mut second = TrimResultStore::open(&path).unwrap();
        second.record("b.mp4", vec![range(5.0, 9.0)]);
        second.flush().unwrap();

        let reloaded = TrimResultStore::open(&path).unwrap();
        assert_eq!(reloaded.results().len(), 2);
        assert_eq!(reloaded.results()["a.mp4"], vec![range(0.0, 2.0)]);
        assert_eq!(reloaded.results()["b.mp4"], vec![range(5.0, 9.0)]);
    }

    #[test]
    fn test_record_replaces_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TrimResultStore::open(&dir.path().join("r.json")).unwrap();
        store.record("a.mp4", vec![range(0.0, 2.0)]);
        store.record("a.mp4", vec![range(4.0, 6.0)]);
        assert_eq!(store.results()["a.mp4"], vec![range(4.0, 6.0)]);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            TrimResultStore::open(&path),
            Err(TrimResultStoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_inverted_range_in_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, r#"{"a.mp4": [[5.0, 1.0]]}"#).unwrap();
        assert!(matches!(
            TrimResultStore::open(&path),
            Err(TrimResultStoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_unwritable_location_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("out");
        std::fs::create_dir(&sub).unwrap();
        let store = TrimResultStore::open(&sub.join("results.json")).unwrap();
        // the parent directory turns into a plain file before the flush
        std::fs::remove_dir(&sub).unwrap();
        std::fs::write(&sub, "x").unwrap();
        assert!(matches!(
            store.flush(),
            Err(TrimResultStoreError::Write { .. })
        ));
    }
}
