//! BLAKE3 hashing for manifests and the files they describe.

use serde::Serialize;

use crate::RunManifest;

/// Hashable view of a manifest (excludes content_hash).
#[derive(Serialize)]
struct HashableManifest<'a> {
    id: &'a crate::RunId,
    tool: &'a str,
    description: &'a str,
    config: &'a serde_json::Value,
    inputs: &'a [crate::InputDigest],
    outputs: &'a [crate::OutputDigest],
    notes: &'a [crate::Note],
    started_at: &'a chrono::DateTime<chrono::Utc>,
    completed_at: &'a Option<chrono::DateTime<chrono::Utc>>,
}

/// Hash a manifest's content as canonical JSON.
pub fn compute_manifest_hash(manifest: &RunManifest) -> String {
    let hashable = HashableManifest {
        id: &manifest.id,
        tool: &manifest.tool,
        description: &manifest.description,
        config: &manifest.config,
        inputs: &manifest.inputs,
        outputs: &manifest.outputs,
        notes: &manifest.notes,
        started_at: &manifest.started_at,
        completed_at: &manifest.completed_at,
    };

    // Only plain data is serialized here; serde_json cannot fail on it.
    let json = serde_json::to_vec(&hashable).unwrap_or_default();
    blake3::hash(&json).to_hex().to_string()
}

/// Hex BLAKE3 digest of raw bytes.
pub fn digest_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let a = digest_bytes(b"Instance_id,Course code\n");
        let b = digest_bytes(b"Instance_id,Course code\n");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, digest_bytes(b""));
    }
}
