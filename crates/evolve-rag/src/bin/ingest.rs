//! Ingestion job: load a text corpus into a Qdrant collection
//!
//! Run with: cargo run -p evolve-rag --bin evolve-ingest -- --file corpus.txt

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use evolve_rag::{
    config::RagConfig,
    ingestion::{IngestJob, TextChunker},
    providers::{OnnxEmbedder, QdrantStore},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "evolve-ingest")]
#[command(about = "Chunk, embed and upsert a text file into Qdrant", long_about = None)]
#[command(version)]
struct Args {
    /// UTF-8 text file to ingest
    #[arg(long, short = 'f', value_name = "PATH")]
    file: PathBuf,

    /// Target collection (defaults to the configured data collection)
    #[arg(long, short = 'c', value_name = "NAME")]
    collection: Option<String>,

    /// Target chunk size in characters
    #[arg(long, value_name = "CHARS")]
    chunk_size: Option<usize>,

    /// Characters carried over between chunks
    #[arg(long, value_name = "CHARS")]
    chunk_overlap: Option<usize>,

    /// Chunks embedded and upserted per request
    #[arg(long, value_name = "COUNT")]
    batch_size: Option<usize>,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evolve_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(size) = args.chunk_size {
        config.chunking.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        config.chunking.chunk_overlap = overlap;
    }
    if let Some(batch) = args.batch_size {
        config.embeddings.batch_size = batch;
    }
    config.chunking.validate()?;

    let collection = args
        .collection
        .unwrap_or_else(|| config.qdrant.data_collection.clone());

    let embedder = Arc::new(OnnxEmbedder::new(&config.embeddings).await?);
    let store = Arc::new(QdrantStore::new(&config.qdrant)?);
    let job = IngestJob::new(
        embedder,
        store,
        TextChunker::from_config(&config.chunking),
        config.embeddings.batch_size,
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}")?
            .progress_chars("=> "),
    );
    pb.set_message(args.file.display().to_string());

    let result = job
        .run_with_progress(&args.file, &collection, |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })
        .await;

    let report = match result {
        Ok(report) => {
            pb.finish_and_clear();
            report
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    println!(
        "Ingested {} chunks ({} points) from {} into '{}'",
        report.chunks,
        report.points,
        report.source.display(),
        report.collection
    );

    Ok(())
}
