use clap::Parser;
use linkx_data::{Oracle, SourceTable};
use linkx_experiment::{Experiment, ExperimentConfig, RowDistribution};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Batch runner for active record-linkage experiments
#[derive(Parser, Debug)]
#[command(name = "linkx")]
#[command(about = "Active record-linkage with bandit term selection", long_about = None)]
struct Args {
    /// Directory containing source.csv, target.csv and ground_truth.csv
    #[arg(short, long)]
    dataset_dir: PathBuf,

    /// Dataset label for logs and output files (defaults to the directory name)
    #[arg(long)]
    dataset_name: Option<String>,

    /// Interaction rounds per repetition
    #[arg(short, long)]
    iterations: usize,

    /// Terms to send per query
    #[arg(short, long)]
    keys: usize,

    /// Exploration strength of the bandit
    #[arg(long, default_value_t = 0.2)]
    alpha: f64,

    /// Ridge regularization of the bandit
    #[arg(long, default_value_t = 1.0)]
    lambda: f64,

    /// Candidates retrieved per query
    #[arg(long, default_value_t = 20)]
    top_k: usize,

    /// Row sampling distribution: uniform, zipf, or zipf:<exponent>
    #[arg(long, default_value = "uniform")]
    distribution: String,

    /// Independent repetitions to average over
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Comma-separated per-run seeds, e.g. 11,12,13
    #[arg(long)]
    seeds: Option<String>,

    /// Directory for per-run result JSON (skipped when absent)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
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

    info!("Starting linkx v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset directory: {:?}", args.dataset_dir);

    let dataset_name = args.dataset_name.clone().unwrap_or_else(|| {
        args.dataset_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string())
    });

    let distribution: RowDistribution = args
        .distribution
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let seeds = match &args.seeds {
        Some(raw) => raw
            .split(',')
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow::anyhow!("invalid seed: {s:?}"))
            })
            .collect::<anyhow::Result<Vec<u64>>>()?,
        None => Vec::new(),
    };

    let source = SourceTable::load_csv(args.dataset_dir.join("source.csv"))?;
    let target = SourceTable::load_csv(args.dataset_dir.join("target.csv"))?;
    let oracle = Oracle::load_csv(args.dataset_dir.join("ground_truth.csv"))?;
    info!(
        source_rows = source.len(),
        target_rows = target.len(),
        truth_pairs = oracle.len(),
        "dataset loaded"
    );

    let config = ExperimentConfig {
        dataset_name,
        interactions: args.iterations,
        query_length: args.keys,
        top_k: args.top_k,
        alpha: args.alpha,
        lambda: args.lambda,
        distribution,
        runs: args.runs,
        seeds,
        output_dir: args.output_dir,
    };

    let experiment = Experiment::new(config, source, target, oracle)?;
    let summaries = experiment.run_all()?;

    let mean_recall =
        summaries.iter().map(|s| s.recall_at_k).sum::<f64>() / summaries.len() as f64;
    let mean_reward =
        summaries.iter().map(|s| s.cumulative_reward).sum::<f64>() / summaries.len() as f64;

    for summary in &summaries {
        if let Some(dir) = &experiment.config().output_dir {
            let path = summary.write_json(dir)?;
            info!(run = summary.run, path = %path.display(), "results written");
        }
    }

    info!(
        runs = summaries.len(),
        mean_recall, mean_reward, "all repetitions finished"
    );
    info!("Complete.");
    Ok(())
}
