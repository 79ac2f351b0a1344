//! Configuration for the campusgraph converter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use campusgraph_core::config::DEFAULT_BASE_IRI;
use campusgraph_graph::OutputFormat;

use crate::error::Result;
use crate::tables::TableName;

/// Prefix of the environment variables that override the config file.
pub const ENV_PREFIX: &str = "CAMPUSGRAPH";

/// Top-level convert configuration.
///
/// Loaded from `campusgraph.toml` `[convert]` section, overridden by
/// `CAMPUSGRAPH_CONVERT__` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Directory the input tables are read from (default: ".").
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Per-table file overrides, relative to `data_dir` unless absolute.
    #[serde(default)]
    pub tables: BTreeMap<TableName, String>,

    /// Namespace every node and vocabulary term is minted in.
    #[serde(default = "default_base_iri")]
    pub base_iri: String,

    /// Ontology document copied ahead of the data in Turtle output.
    #[serde(default)]
    pub ontology_path: Option<String>,

    /// Also emit the vocabulary's own OWL/RDFS declarations.
    #[serde(default)]
    pub emit_schema: bool,

    /// Where the serialized graph is written (default: "combined_data.ttl").
    #[serde(default = "default_output_path")]
    pub output_path: String,

    #[serde(default)]
    pub format: OutputFormat,

    /// Abort on the first blocking data-quality issue.
    #[serde(default)]
    pub strict: bool,

    /// Directory for run manifests. No manifest is kept when unset.
    #[serde(default)]
    pub manifest_dir: Option<String>,
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_base_iri() -> String {
    DEFAULT_BASE_IRI.to_string()
}

fn default_output_path() -> String {
    "combined_data.ttl".to_string()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tables: BTreeMap::new(),
            base_iri: default_base_iri(),
            ontology_path: None,
            emit_schema: false,
            output_path: default_output_path(),
            format: OutputFormat::default(),
            strict: false,
            manifest_dir: None,
        }
    }
}

/// Load the `[convert]` section from `{file_prefix}.toml` (optional) and
/// the process environment. Missing sections fall back to defaults.
pub fn load(file_prefix: &str) -> Result<ConvertConfig> {
    load_with_env(file_prefix, None)
}

/// Like [`load`], reading environment overrides from `env` when given
/// instead of the process environment.
pub fn load_with_env(
    file_prefix: &str,
    env: Option<::config::Map<String, String>>,
) -> Result<ConvertConfig> {
    let cfg = ::config::Config::builder()
        .add_source(::config::File::with_name(file_prefix).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    match cfg.get::<ConvertConfig>("convert") {
        Ok(config) => Ok(config),
        Err(::config::ConfigError::NotFound(_)) => Ok(ConvertConfig::default()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Option<::config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn write_config(dir: &tempfile::TempDir, toml: &str) -> String {
        fs::write(dir.path().join("campusgraph.toml"), toml).unwrap();
        dir.path().join("campusgraph").display().to_string()
    }

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.data_dir, ".");
        assert_eq!(config.output_path, "combined_data.ttl");
        assert_eq!(config.format, OutputFormat::Turtle);
        assert_eq!(config.base_iri, DEFAULT_BASE_IRI);
        assert!(!config.strict);
        assert!(config.manifest_dir.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ConvertConfig = serde_json::from_value(serde_json::json!({
            "data_dir": "data",
            "format": "ntriples",
            "tables": { "course_instances": "instances_2021.csv" },
        }))
        .unwrap();

        assert_eq!(config.data_dir, "data");
        assert_eq!(config.format, OutputFormat::NTriples);
        assert_eq!(
            config.tables.get(&TableName::CourseInstances).map(String::as_str),
            Some("instances_2021.csv")
        );
        assert_eq!(config.output_path, "combined_data.ttl");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("campusgraph").display().to_string();

        let config = load_with_env(&prefix, env(&[])).unwrap();
        assert_eq!(config.data_dir, ".");
        assert_eq!(config.format, OutputFormat::Turtle);
    }

    #[test]
    fn test_load_convert_section_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(
            &dir,
            "[convert]\n\
             data_dir = \"tables\"\n\
             format = \"rdfxml\"\n\
             strict = true\n\
             manifest_dir = \"runs\"\n\
             \n\
             [convert.tables]\n\
             students = \"Students_2021.csv\"\n",
        );

        let config = load_with_env(&prefix, env(&[])).unwrap();
        assert_eq!(config.data_dir, "tables");
        assert_eq!(config.format, OutputFormat::RdfXml);
        assert!(config.strict);
        assert_eq!(config.manifest_dir.as_deref(), Some("runs"));
        assert_eq!(
            config.tables.get(&TableName::Students).map(String::as_str),
            Some("Students_2021.csv")
        );
        assert_eq!(config.output_path, "combined_data.ttl");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(
            &dir,
            "[convert]\ndata_dir = \"tables\"\noutput_path = \"graph.ttl\"\n",
        );

        let config = load_with_env(
            &prefix,
            env(&[
                ("CAMPUSGRAPH_CONVERT__DATA_DIR", "from_env"),
                ("CAMPUSGRAPH_CONVERT__EMIT_SCHEMA", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(config.data_dir, "from_env");
        assert!(config.emit_schema);
        assert_eq!(config.output_path, "graph.ttl");
    }

    #[test]
    fn test_environment_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("campusgraph").display().to_string();

        let config =
            load_with_env(&prefix, env(&[("CAMPUSGRAPH_CONVERT__DATA_DIR", "from_env")])).unwrap();
        assert_eq!(config.data_dir, "from_env");
    }

    #[test]
    fn test_bad_value_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(&dir, "[convert]\nformat = \"jsonld\"\n");

        assert!(matches!(
            load_with_env(&prefix, env(&[])),
            Err(crate::error::ConvertError::Config(_))
        ));
    }
}
