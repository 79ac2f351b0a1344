//! Builder for recording a manifest while a run progresses:
//!
//! ```no_run
//! # use campusgraph_manifest::session::ManifestSession;
//! let mut session = ManifestSession::new("campusgraph-convert", "Convert ./data");
//! session.set_config(serde_json::json!({"format": "turtle"}));
//! session.record_input("Students", "data/Students.csv", b"Student id\n", 0);
//! session.add_note("summary", "0 issues", serde_json::json!({}));
//! let manifest = session.finalize();
//! assert!(manifest.content_hash.is_some());
//! ```

use chrono::Utc;

use crate::hash::digest_bytes;
use crate::{InputDigest, Note, OutputDigest, RunId, RunManifest};

/// Records a run incrementally; `finalize` seals it.
pub struct ManifestSession {
    manifest: RunManifest,
}

impl ManifestSession {
    pub fn new(tool: &str, description: &str) -> Self {
        Self {
            manifest: RunManifest {
                id: RunId::new(),
                tool: tool.to_string(),
                description: description.to_string(),
                config: serde_json::Value::Null,
                inputs: Vec::new(),
                outputs: Vec::new(),
                notes: Vec::new(),
                started_at: Utc::now(),
                completed_at: None,
                content_hash: None,
            },
        }
    }

    pub fn set_config(&mut self, config: serde_json::Value) {
        self.manifest.config = config;
    }

    /// Digest and record an input table.
    pub fn record_input(&mut self, table: &str, origin: &str, bytes: &[u8], rows: usize) {
        self.manifest.inputs.push(InputDigest {
            table: table.to_string(),
            origin: origin.to_string(),
            rows,
            bytes: bytes.len() as u64,
            blake3: digest_bytes(bytes),
        });
    }

    /// Digest and record a written artifact.
    pub fn record_output(&mut self, path: &str, format: &str, bytes: &[u8], triples: usize) {
        self.manifest.outputs.push(OutputDigest {
            path: path.to_string(),
            format: format.to_string(),
            triples,
            bytes: bytes.len() as u64,
            blake3: digest_bytes(bytes),
        });
    }

    pub fn add_note(&mut self, kind: &str, message: &str, details: serde_json::Value) {
        self.manifest.notes.push(Note {
            kind: kind.to_string(),
            message: message.to_string(),
            details,
            recorded_at: Utc::now(),
        });
    }

    /// Run ID, available before finalization.
    pub fn id(&self) -> RunId {
        self.manifest.id
    }

    /// Stamp the completion time and compute the content hash.
    pub fn finalize(mut self) -> RunManifest {
        self.manifest.completed_at = Some(Utc::now());
        let hash = self.manifest.compute_hash();
        self.manifest.content_hash = Some(hash);
        self.manifest
    }
}
