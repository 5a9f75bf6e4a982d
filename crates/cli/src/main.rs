//! relgraph CLI - load relation files into MongoDB or Neo4j

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use relgraph::commands::{
    load_config, render_summary, run_document_import, run_graph_import, run_list_nodes, verify,
};
use relgraph_core::{DocumentWritePolicy, NodeWritePolicy};
use relgraph_importer::ImportOptions;
use relgraph_storage::{create_document_repository, create_graph_repository};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "relgraph")]
#[command(about = "Import pipe-delimited relation files into a document or graph store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a relation file into MongoDB
    ImportMongo {
        /// Relation file (`subject|relation|object` per line)
        input: PathBuf,
        /// Target collection (defaults to `import.collection`)
        #[arg(long)]
        collection: Option<String>,
        /// Write policy (defaults to `import.document_policy`)
        #[arg(long, value_enum)]
        policy: Option<DocumentPolicyArg>,
    },
    /// Import a relation file into Neo4j
    ImportNeo4j {
        input: PathBuf,
        /// Write policy (defaults to `import.node_policy`)
        #[arg(long, value_enum)]
        policy: Option<NodePolicyArg>,
    },
    /// Check that both backends are reachable
    Verify,
    /// Print graph nodes as JSON lines
    Nodes {
        /// Node label: User, Group or Event
        label: String,
        /// Only nodes with this id
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentPolicyArg {
    Append,
    Merge,
}

impl From<DocumentPolicyArg> for DocumentWritePolicy {
    fn from(arg: DocumentPolicyArg) -> Self {
        match arg {
            DocumentPolicyArg::Append => DocumentWritePolicy::Append,
            DocumentPolicyArg::Merge => DocumentWritePolicy::Merge,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NodePolicyArg {
    Create,
    Merge,
}

impl From<NodePolicyArg> for NodeWritePolicy {
    fn from(arg: NodePolicyArg) -> Self {
        match arg {
            NodePolicyArg::Create => NodeWritePolicy::Create,
            NodePolicyArg::Merge => NodeWritePolicy::Merge,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::ImportMongo {
            input,
            collection,
            policy,
        } => import_mongo(config_path, &input, collection, policy).await,
        Commands::ImportNeo4j { input, policy } => import_neo4j(config_path, &input, policy).await,
        Commands::Verify => verify_backends(config_path).await,
        Commands::Nodes { label, id } => print_nodes(config_path, &label, id.as_deref()).await,
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "relgraph={level},relgraph_core={level},relgraph_storage={level},relgraph_importer={level}"
        ))
        .init();

    Ok(())
}

async fn import_mongo(
    config_path: Option<&Path>,
    input: &Path,
    collection: Option<String>,
    policy: Option<DocumentPolicyArg>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(collection) = collection {
        config.import.collection = collection;
    }
    if let Some(policy) = policy {
        config.import.document_policy = policy.into();
    }
    config.validate()?;

    let repo = create_document_repository(&config.storage)
        .await
        .context("Failed to connect to MongoDB")?;
    let summary =
        run_document_import(repo.as_ref(), input, &ImportOptions::from(&config.import)).await?;

    println!("{}", render_summary(&summary));
    Ok(())
}

async fn import_neo4j(
    config_path: Option<&Path>,
    input: &Path,
    policy: Option<NodePolicyArg>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(policy) = policy {
        config.import.node_policy = policy.into();
    }

    let repo = create_graph_repository(&config.storage, config.import.node_policy)
        .await
        .context("Failed to connect to Neo4j")?;
    let summary =
        run_graph_import(repo.as_ref(), input, &ImportOptions::from(&config.import)).await?;

    println!("{}", render_summary(&summary));
    Ok(())
}

async fn verify_backends(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let report = verify(&config.storage).await;

    println!(
        "MongoDB: {}\nNeo4j:   {}",
        if report.document_store { "ok" } else { "unreachable" },
        if report.graph_store { "ok" } else { "unreachable" }
    );
    if !report.all_ok() {
        bail!("One or more backends are unreachable");
    }
    Ok(())
}

async fn print_nodes(config_path: Option<&Path>, label: &str, id: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let repo = create_graph_repository(&config.storage, config.import.node_policy)
        .await
        .context("Failed to connect to Neo4j")?;

    let nodes = run_list_nodes(repo.as_ref(), label, id).await?;

    for node in &nodes {
        println!("{}", serde_json::to_string(&node.properties)?);
    }
    info!("{} node(s) with label '{}'", nodes.len(), label);
    Ok(())
}
