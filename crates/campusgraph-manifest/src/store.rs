//! Manifest storage: trait plus a directory-backed implementation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{RunId, RunManifest};

/// Errors from manifest storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Manifest not found: {0}")]
    NotFound(RunId),

    #[error("Integrity check failed for manifest {0}: stored hash does not match content")]
    IntegrityViolation(RunId),

    #[error("Manifest has no content hash (not finalized)")]
    NotFinalized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Filters for listing manifests.
#[derive(Debug, Default)]
pub struct ManifestQuery {
    pub tool: Option<String>,
    /// Only runs started at or after this time.
    pub from: Option<DateTime<Utc>>,
    /// Only runs started at or before this time.
    pub to: Option<DateTime<Utc>>,
}

impl ManifestQuery {
    fn matches(&self, manifest: &RunManifest) -> bool {
        self.tool.as_ref().map_or(true, |t| &manifest.tool == t)
            && self.from.map_or(true, |from| manifest.started_at >= from)
            && self.to.map_or(true, |to| manifest.started_at <= to)
    }
}

pub trait ManifestStore {
    /// Store a finalized manifest and return where it went.
    fn save(&self, manifest: &RunManifest) -> Result<PathBuf, StoreError>;

    /// Load a manifest by ID, verifying its content hash.
    fn get(&self, id: RunId) -> Result<RunManifest, StoreError>;

    /// Manifests matching the query, newest first.
    fn list(&self, query: &ManifestQuery) -> Result<Vec<RunManifest>, StoreError>;
}

/// Stores manifests as pretty JSON under a date-partitioned tree:
/// ```text
/// {root}/2025/04/17/{run_id}.json
/// ```
pub struct FileManifestStore {
    root: PathBuf,
}

impl FileManifestStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, manifest: &RunManifest) -> PathBuf {
        self.root
            .join(manifest.started_at.format("%Y/%m/%d").to_string())
            .join(format!("{}.json", manifest.id))
    }

    fn locate(&self, id: RunId) -> Result<PathBuf, StoreError> {
        let filename = format!("{id}.json");
        json_files(&self.root)?
            .into_iter()
            .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(filename.as_str()))
            .ok_or(StoreError::NotFound(id))
    }
}

impl ManifestStore for FileManifestStore {
    fn save(&self, manifest: &RunManifest) -> Result<PathBuf, StoreError> {
        if manifest.content_hash.is_none() {
            return Err(StoreError::NotFinalized);
        }

        let path = self.path_for(manifest);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(manifest)?)?;

        tracing::debug!(run_id = %manifest.id, path = %path.display(), "Manifest saved");
        Ok(path)
    }

    fn get(&self, id: RunId) -> Result<RunManifest, StoreError> {
        let path = self.locate(id)?;
        let manifest: RunManifest = serde_json::from_str(&fs::read_to_string(&path)?)?;

        if !manifest.verify_integrity() {
            return Err(StoreError::IntegrityViolation(id));
        }
        Ok(manifest)
    }

    fn list(&self, query: &ManifestQuery) -> Result<Vec<RunManifest>, StoreError> {
        let mut results = Vec::new();
        for path in json_files(&self.root)? {
            let manifest: RunManifest = serde_json::from_str(&fs::read_to_string(&path)?)?;
            if query.matches(&manifest) {
                results.push(manifest);
            }
        }
        results.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(results)
    }
}

/// Every `.json` file below `dir`, depth first.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        if !current.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
                found.push(path);
            }
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ManifestSession;

    fn finished(tool: &str) -> RunManifest {
        let mut session = ManifestSession::new(tool, "Convert test tables");
        session.set_config(serde_json::json!({"strict": false}));
        session.record_input("Students", "Students.csv", b"Student id\ns1\n", 1);
        session.add_note("summary", "1 row", serde_json::json!({"rows": 1}));
        session.finalize()
    }

    #[test]
    fn save_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        let manifest = finished("campusgraph-convert");

        let path = store.save(&manifest).unwrap();
        assert!(path.starts_with(dir.path()));

        let loaded = store.get(manifest.id).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn tampering_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        let manifest = finished("campusgraph-convert");
        let path = store.save(&manifest).unwrap();

        let mut tampered = manifest.clone();
        tampered.inputs[0].rows = 999;
        fs::write(&path, serde_json::to_string_pretty(&tampered).unwrap()).unwrap();

        assert!(matches!(
            store.get(manifest.id),
            Err(StoreError::IntegrityViolation(_))
        ));
    }

    #[test]
    fn unfinalized_manifest_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        let mut manifest = finished("campusgraph-convert");
        manifest.content_hash = None;
        assert!(matches!(store.save(&manifest), Err(StoreError::NotFinalized)));
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        assert!(matches!(store.get(RunId::new()), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn list_filters_by_tool() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileManifestStore::new(dir.path()).unwrap();
        store.save(&finished("convert")).unwrap();
        store.save(&finished("other")).unwrap();
        store.save(&finished("convert")).unwrap();

        let query = ManifestQuery {
            tool: Some("convert".to_string()),
            ..Default::default()
        };
        let results = store.list(&query).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|m| m.tool == "convert"));
        assert!(results[0].started_at >= results[1].started_at);
    }
}
