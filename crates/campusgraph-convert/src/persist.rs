//! Graph persistence: serialize and write the output file.

use std::fs;
use std::path::{Path, PathBuf};

use campusgraph_graph::{Graph, OutputFormat};

use crate::error::Result;

/// Serialize the graph into memory.
pub fn render(graph: &Graph, format: OutputFormat, preamble: Option<&str>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    format.write(graph, &mut buf, preamble)?;
    Ok(buf)
}

/// Write `bytes` to `path` through a temporary file in the same
/// directory, so readers never see a half-written graph.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());
    let tmp = dir.join(format!(".{file_name}.tmp"));

    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusgraph_core::Namespace;

    #[test]
    fn test_write_atomic_creates_dirs_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("graph.ttl");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_render_empty_graph_has_prefixes() {
        let graph = Graph::new(Namespace::default());
        let out = render(&graph, OutputFormat::Turtle, None).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("@prefix :"));
    }
}
