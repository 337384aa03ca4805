//! Dashboard Ingest - GFF3 ingestion tool

use anyhow::{Context, Result};
use clap::Parser;
use dashboard_common::logging::{init_logging, LogConfig};
use dashboard_common::store::{RedisStore, Store, StoreConfig};
use dashboard_ingest::config::{parse_feature_types, IngestConfig};
use dashboard_ingest::organism::{ingest_genome, OrganismMetadata, KEY_PREFIX};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dashboard-ingest")]
#[command(author, version, about = "Genome dashboard ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Ingest a GFF3 file for an organism
    Gff3 {
        /// GFF3 file to read
        #[arg(short, long)]
        file: PathBuf,

        /// NCBI taxonomy id of the organism
        #[arg(short, long)]
        taxon_id: String,

        #[arg(long)]
        scientific_name: Option<String>,

        #[arg(long)]
        common_name: Option<String>,

        #[arg(long)]
        rank: Option<String>,

        /// Bucket the file was downloaded from, recorded in the metadata
        #[arg(long)]
        bucket: Option<String>,

        /// Comma-separated feature types (overrides INGEST_FEATURE_TYPES)
        #[arg(long)]
        types: Option<String>,
    },

    /// Delete every stored key with the given prefix
    Clear {
        #[arg(short, long, default_value = KEY_PREFIX)]
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment variables take precedence over the flag
    let log_config = LogConfig::for_binary("dashboard-ingest")
        .verbose(cli.verbose)
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    let store_config = StoreConfig::from_env()?;
    let store = RedisStore::connect(&store_config)
        .await
        .context("Failed to connect to redis")?;

    let outcome = run(cli.command, store.clone()).await;
    store.close().await?;
    outcome
}

async fn run(command: Command, store: RedisStore) -> Result<()> {
    match command {
        Command::Gff3 {
            file,
            taxon_id,
            scientific_name,
            common_name,
            rank,
            bucket,
            types,
        } => {
            let mut config = IngestConfig::from_env()?;
            if let Some(types) = types {
                config = config.with_feature_types(parse_feature_types(&types));
                config.validate()?;
            }

            let mut metadata = OrganismMetadata::new(taxon_id, file.display().to_string());
            metadata.scientific_name = scientific_name;
            metadata.common_name = common_name;
            metadata.rank = rank;
            metadata.bucket = bucket;

            info!(
                taxon_id = %metadata.taxon_id,
                file = %file.display(),
                "Ingesting gff3 file"
            );
            let reader = tokio::fs::File::open(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;

            let store: Arc<dyn Store> = Arc::new(store);
            ingest_genome(reader, store, &metadata, &config).await?;
            info!(key = %metadata.key(), "Ingestion complete");
        },
        Command::Clear { prefix } => {
            let removed = store.clear_all(&prefix).await?;
            info!(prefix = %prefix, removed, "Cleared stored genomes");
        },
    }

    Ok(())
}
