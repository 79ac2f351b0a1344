//! Run manifest helpers for conversion runs.

use campusgraph_manifest::session::ManifestSession;
use campusgraph_manifest::store::{FileManifestStore, ManifestStore};
use campusgraph_manifest::RunManifest;

use crate::config::ConvertConfig;
use crate::pipeline::ConversionReport;
use crate::tables::TableData;

pub const TOOL: &str = "campusgraph-convert";

/// Create a manifest session for a conversion run.
pub fn start_session(config: &ConvertConfig, source: &str) -> ManifestSession {
    let mut session = ManifestSession::new(TOOL, &format!("Convert tables from {source}"));
    session.set_config(serde_json::to_value(config).unwrap_or_default());
    session
}

/// Record the digest of every table that was read.
pub fn record_inputs(session: &mut ManifestSession, inputs: &[TableData], report: &ConversionReport) {
    for data in inputs {
        let rows = report
            .tables
            .iter()
            .find(|t| t.table == data.table)
            .map_or(0, |t| t.rows);
        session.record_input(&data.table.to_string(), &data.origin, &data.bytes, rows);
    }
}

/// Record the run summary and every issue found.
pub fn record_report(session: &mut ManifestSession, report: &ConversionReport) {
    let mapped: usize = report.tables.iter().map(|t| t.mapped).sum();
    session.add_note(
        "summary",
        &format!(
            "Mapped {mapped} rows into {} triples with {} issues",
            report.graph.triples,
            report.issues.len()
        ),
        serde_json::json!({
            "tables": report.tables,
            "graph": report.graph,
            "issue_counts": report.issue_counts,
            "divisions_linked": report.divisions_linked,
            "schema_triples": report.schema_triples,
        }),
    );

    if !report.issues.is_empty() {
        session.add_note(
            "issues",
            &format!("{} data-quality issues", report.issues.len()),
            serde_json::to_value(&report.issues).unwrap_or_default(),
        );
    }
}

/// Record a failed run.
pub fn record_failure(session: &mut ManifestSession, error: &str) {
    session.add_note(
        "failure",
        &format!("Conversion failed: {error}"),
        serde_json::json!({ "error": error }),
    );
}

/// Finalize the session and store the manifest. Storage failures are
/// logged, not fatal: the graph has already been written. Returns the
/// manifest only when it was stored.
pub fn finalize_and_store(session: ManifestSession, manifest_dir: &str) -> Option<RunManifest> {
    let manifest = session.finalize();

    let store = match FileManifestStore::new(manifest_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to initialize manifest store");
            return None;
        }
    };
    match store.save(&manifest) {
        Ok(path) => {
            tracing::info!(
                run_id = %manifest.id,
                path = %path.display(),
                "Run manifest recorded"
            );
            Some(manifest)
        }
        Err(e) => {
            tracing::warn!(run_id = %manifest.id, error = %e, "Failed to store run manifest");
            None
        }
    }
}
