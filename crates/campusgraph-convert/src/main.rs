//! CLI entry point for the campusgraph converter.

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use campusgraph_core::Namespace;
use campusgraph_graph::{Graph, OutputFormat};
use campusgraph_manifest::store::{FileManifestStore, ManifestQuery, ManifestStore};
use campusgraph_manifest::RunId;

use campusgraph_convert::config::{self, ConvertConfig};
use campusgraph_convert::manifest::TOOL;
use campusgraph_convert::pipeline::convert_to_file;
use campusgraph_convert::tables::CsvDirectory;

#[derive(Parser)]
#[command(name = "campusgraph")]
#[command(about = "Convert university course, staff and student tables into an RDF graph")]
struct Cli {
    /// Config file prefix (default: campusgraph).
    #[arg(short, long, default_value = "campusgraph", global = true)]
    config: String,

    /// Log as JSON lines instead of human-readable text.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the input tables and write the graph.
    Convert(ConvertArgs),

    /// Print the vocabulary as OWL/RDFS.
    Schema {
        /// Output format: turtle, ntriples, rdfxml.
        #[arg(short, long, default_value = "turtle")]
        format: String,

        /// Base IRI (otherwise read from config).
        #[arg(long)]
        base_iri: Option<String>,
    },

    /// Check the content hash of a stored run manifest.
    VerifyManifest {
        /// Manifest directory.
        #[arg(long)]
        dir: PathBuf,

        /// Run ID to verify.
        #[arg(long)]
        id: String,
    },

    /// List stored run manifests, newest first.
    Manifests {
        /// Manifest directory.
        #[arg(long)]
        dir: PathBuf,

        /// Only runs recorded by this tool.
        #[arg(long)]
        tool: Option<String>,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Directory holding the input CSV files.
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Output file path.
    #[arg(short, long)]
    output: Option<String>,

    /// Output format: turtle, ntriples, rdfxml.
    #[arg(short, long)]
    format: Option<String>,

    /// Base IRI for minted nodes.
    #[arg(long)]
    base_iri: Option<String>,

    /// Ontology document to include ahead of the data (Turtle only).
    #[arg(long)]
    ontology: Option<String>,

    /// Also emit the vocabulary's OWL/RDFS declarations.
    #[arg(long)]
    emit_schema: bool,

    /// Abort on the first blocking data-quality issue.
    #[arg(long)]
    strict: bool,

    /// Record a run manifest in this directory.
    #[arg(long)]
    manifest_dir: Option<String>,
}

impl ConvertArgs {
    /// Flags take precedence over file and environment settings.
    fn apply(self, config: &mut ConvertConfig) -> anyhow::Result<()> {
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(format) = self.format {
            config.format = OutputFormat::from_str(&format)?;
        }
        if let Some(base_iri) = self.base_iri {
            config.base_iri = base_iri;
        }
        if let Some(ontology) = self.ontology {
            config.ontology_path = Some(ontology);
        }
        if let Some(dir) = self.manifest_dir {
            config.manifest_dir = Some(dir);
        }
        config.emit_schema |= self.emit_schema;
        config.strict |= self.strict;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        fmt().with_env_filter(filter).with_writer(io::stderr).init();
    }

    match cli.command {
        Command::Convert(args) => {
            let mut config = config::load(&cli.config)?;
            args.apply(&mut config)?;
            run_convert(&config)
        }
        Command::Schema { format, base_iri } => {
            let config = config::load(&cli.config)?;
            let ns = Namespace::new(base_iri.unwrap_or(config.base_iri))?;
            let mut graph = Graph::new(ns);
            graph.add_schema();

            let stdout = io::stdout();
            let mut out = stdout.lock();
            OutputFormat::from_str(&format)?.write(&graph, &mut out, None)?;
            out.flush()?;
            Ok(())
        }
        Command::VerifyManifest { dir, id } => {
            let store = FileManifestStore::new(dir)?;
            let id = RunId::from_str(&id)?;
            let manifest = store.get(id)?;
            println!(
                "Manifest {} verified ({} inputs, {} outputs)",
                manifest.id,
                manifest.inputs.len(),
                manifest.outputs.len()
            );
            Ok(())
        }
        Command::Manifests { dir, tool } => {
            let store = FileManifestStore::new(dir)?;
            let query = ManifestQuery {
                tool,
                ..Default::default()
            };
            for manifest in store.list(&query)? {
                let triples: usize = manifest.outputs.iter().map(|o| o.triples).sum();
                println!(
                    "{}  {}  {}  {} triples",
                    manifest.id,
                    manifest.started_at.to_rfc3339(),
                    manifest.tool,
                    triples
                );
            }
            Ok(())
        }
    }
}

fn run_convert(config: &ConvertConfig) -> anyhow::Result<()> {
    let source = CsvDirectory::new(&config.data_dir).with_overrides(config.tables.clone());
    let outcome = convert_to_file(&source, config)?;

    for (kind, count) in &outcome.report.issue_counts {
        tracing::info!(kind = %kind, count, "Issues by kind");
    }
    if let Some(run_id) = outcome.run_id {
        tracing::info!(%run_id, tool = TOOL, "Run manifest written");
    }

    println!("{} has been created!", outcome.output.display());
    Ok(())
}
