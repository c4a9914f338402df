use clap::Parser;
use forkful::{EngineOptions, HashingEmbedder, RecipeEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recipe retrieval with ingredient-match scoring
#[derive(Parser, Debug)]
#[command(name = "forkful")]
#[command(about = "Search a recipe corpus and score it against your pantry", long_about = None)]
struct Args {
    /// Path to the data directory for index artifacts
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Path to the JSON corpus source
    #[arg(short, long, default_value = "./recipes.json")]
    corpus: PathBuf,

    /// Directory holding the ingredient tables
    #[arg(short, long, default_value = "./tables")]
    tables_dir: PathBuf,

    /// Embedding dimension for the built-in hashing embedder
    #[arg(long, default_value_t = 256)]
    embedding_dim: usize,

    /// Search query
    #[arg(short, long)]
    query: String,

    /// Comma-separated list of ingredients on hand
    #[arg(short, long, default_value = "")]
    ingredients: String,

    /// Maximum number of results
    #[arg(short, long, default_value_t = 5)]
    limit: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting forkful v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("Corpus source: {:?}", args.corpus);

    let options = EngineOptions::new(args.data_dir, args.corpus, args.tables_dir);
    let embedder = Arc::new(HashingEmbedder::new(args.embedding_dim));
    let engine = RecipeEngine::initialize(options, embedder).await?;
    info!("Engine ready with {} recipes", engine.count());

    let ingredients: Vec<String> = args
        .ingredients
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let results = engine.search(&args.query, args.limit, &ingredients).await?;
    info!("{} results for {:?}", results.len(), args.query);

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
