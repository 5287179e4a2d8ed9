mod config;
mod report;
mod store;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chess_analysis::board::fens_from_moves;
use chess_analysis::{
    AnalysisConfig, EngineSession, EvaluationCache, EvaluationOutcome, GameAnalyzer,
    PositionEvaluator,
};
use chess_openings::OpeningBook;
use clap::{Parser, Subcommand};
use config::ReviewConfig;
use store::JsonFileStore;
use tracing::info;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Parser)]
#[command(name = "game-review")]
#[command(about = "Chess game review with a UCI engine")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "review.toml")]
    config: PathBuf,
    /// JSON file keeping evaluations between runs
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review every move of a game
    Analyze {
        /// Starting position
        #[arg(long, default_value = START_FEN)]
        fen: String,
        /// Space-separated UCI moves
        #[arg(long, conflicts_with = "moves_file")]
        moves: Option<String>,
        /// File with space-separated UCI moves
        #[arg(long)]
        moves_file: Option<PathBuf>,
        /// Search depth per position
        #[arg(short, long)]
        depth: Option<u32>,
        /// Candidate lines per position
        #[arg(long)]
        multi_pv: Option<u32>,
        /// Print the review as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate one position, printing lines as the search deepens
    Position {
        #[arg(long)]
        fen: String,
        #[arg(short, long)]
        depth: Option<u32>,
        #[arg(long)]
        multi_pv: Option<u32>,
        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ReviewConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(store) = cli.store {
        config.store = Some(store);
    }

    let store = config
        .store
        .as_ref()
        .map(JsonFileStore::open)
        .transpose()
        .context("opening evaluation store")?
        .map(Arc::new);
    let mut cache = EvaluationCache::new();
    if let Some(store) = &store {
        cache = cache.with_store(store.clone());
    }
    let book = OpeningBook::builtin();

    let mut session = EngineSession::spawn(
        &config.engine.path,
        &config.engine.args,
        config.session_options(),
    )
    .with_context(|| format!("starting engine {}", config.engine.path))?;

    let result = run(cli.command, &config, &mut session, &cache, &book).await;
    session.shutdown().await;

    if let Some(store) = &store {
        store.flush().context("saving evaluation store")?;
        info!(entries = store.len(), "evaluation store saved");
    }
    result
}

async fn run(
    command: Commands,
    config: &ReviewConfig,
    session: &mut EngineSession,
    cache: &EvaluationCache,
    book: &OpeningBook,
) -> Result<()> {
    session
        .initialize()
        .await
        .context("engine did not complete the UCI handshake")?;
    if let Some(level) = config.engine.skill_level {
        session.configure_strength(level).await?;
    }

    match command {
        Commands::Analyze {
            fen,
            moves,
            moves_file,
            depth,
            multi_pv,
            json,
        } => {
            let moves = match (moves, moves_file) {
                (Some(moves), _) => moves,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => bail!("pass the game with --moves or --moves-file"),
            };
            let moves: Vec<String> = moves.split_whitespace().map(str::to_string).collect();
            let fens = fens_from_moves(&fen, &moves)?;
            let analysis = AnalysisConfig {
                depth: depth.unwrap_or(config.depth),
                multi_pv: multi_pv.unwrap_or(config.multi_pv),
            };

            let review = GameAnalyzer::new(session, cache, book)
                .evaluate_game(&fens, &moves, &analysis, |p| info!("progress {p:.0}%"))
                .await?;

            let mut out = std::io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &review)?;
                writeln!(out)?;
            } else {
                report::write_review(&mut out, &fens, &moves, &review)?;
            }
        }
        Commands::Position {
            fen,
            depth,
            multi_pv,
            timeout_ms,
        } => {
            let budget = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.timeout());
            let outcome = PositionEvaluator::new(session, cache, book)
                .evaluate_with_retry(
                    &fen,
                    depth.unwrap_or(config.depth),
                    multi_pv.unwrap_or(config.multi_pv),
                    |partial| {
                        if let Some(line) = partial.top_line() {
                            println!(
                                "depth {:>2} {:>7}  {}",
                                line.depth,
                                line.score.label(),
                                line.pv.join(" ")
                            );
                        }
                    },
                    budget,
                )
                .await?;

            match outcome {
                EvaluationOutcome::Resolved(evaluation) => {
                    println!();
                    report::write_position(&mut std::io::stdout().lock(), &evaluation)?;
                }
                EvaluationOutcome::Unresolved => {
                    println!("No evaluation within {} ms", budget.as_millis());
                }
            }
        }
    }
    Ok(())
}
