//! campusgraph-manifest: tamper-evident records of conversion runs.
//!
//! A manifest records what a run read, what it wrote and what it noticed
//! along the way: BLAKE3 digests of every input table and output file,
//! the effective configuration, and data-quality notes. The finished
//! manifest is content-hashed so later edits are detectable.

pub mod hash;
pub mod session;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Core Types ───────────────────────────────────────────────────

/// Unique identifier for a conversion run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(RunId)
    }
}

/// A digest of one input table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputDigest {
    /// Logical table name.
    pub table: String,
    /// Where the bytes came from (a file path for directory sources).
    pub origin: String,
    /// Data rows parsed.
    pub rows: usize,
    pub bytes: u64,
    /// BLAKE3 hex digest of the raw bytes.
    pub blake3: String,
}

/// A digest of one written artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputDigest {
    pub path: String,
    pub format: String,
    pub triples: usize,
    pub bytes: u64,
    pub blake3: String,
}

/// Something worth remembering about the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// Category (e.g. "issue", "summary").
    pub kind: String,
    pub message: String,
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

/// The complete record of a conversion run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub id: RunId,
    /// The tool that produced the run.
    pub tool: String,
    pub description: String,
    /// Effective configuration.
    pub config: serde_json::Value,
    pub inputs: Vec<InputDigest>,
    pub outputs: Vec<OutputDigest>,
    pub notes: Vec<Note>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// BLAKE3 content hash (hex), set on finalization.
    pub content_hash: Option<String>,
}

impl RunManifest {
    /// Compute the BLAKE3 hash over every field except `content_hash`.
    pub fn compute_hash(&self) -> String {
        hash::compute_manifest_hash(self)
    }

    /// Whether the stored content hash matches the content.
    pub fn verify_integrity(&self) -> bool {
        match &self.content_hash {
            Some(stored) => stored == &self.compute_hash(),
            None => false,
        }
    }
}
