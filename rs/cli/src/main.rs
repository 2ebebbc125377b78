use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use config::ranking::RankingConfig;
use log::{info, warn};
use novelty::algorithm::{AlgorithmRegistry, Ranker};
use novelty::result::{RankingResult, SelectionsCsvWriter};
use utils::input::csv::CsvMatrixReader;
use utils::input::{Dataset, Input};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Args {
    /// YAML ranking config. Defaults are used when omitted.
    #[arg(long)]
    config_path: Option<String>,

    /// Items to rank, one `id,f1,...,fd` row per item
    #[arg(long, required = true)]
    score_path: String,

    /// Reference items used to seed the model. The score pool seeds it when omitted.
    #[arg(long)]
    fit_path: Option<String>,

    /// Whether the input files start with a header row
    #[arg(long, default_value_t = false)]
    has_header: bool,

    /// Overrides `top_n` from the config
    #[arg(long)]
    top_n: Option<usize>,

    /// Overrides `output.output_dir` from the config
    #[arg(long)]
    output_dir: Option<String>,
}

fn load_config(args: &Args) -> Result<RankingConfig> {
    let mut config = match &args.config_path {
        Some(path) => RankingConfig::from_yaml_file(path)?,
        None => RankingConfig::default(),
    };
    if args.top_n.is_some() {
        config.top_n = args.top_n;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output.output_dir = output_dir.clone();
    }
    Ok(config)
}

fn load_dataset(path: &str, has_header: bool) -> Result<Dataset> {
    let mut input = CsvMatrixReader::from_path(path, has_header)?;
    input.read_all()
}

/// Runs every configured algorithm on the same data. A failing algorithm is
/// logged and skipped so that the others still produce results.
fn run(
    config: &RankingConfig,
    registry: &AlgorithmRegistry,
    fit: Option<&Dataset>,
    score: &Dataset,
) -> Vec<(RankingResult, Option<PathBuf>)> {
    let writer = SelectionsCsvWriter::new(&config.output.output_dir);
    let mut outputs = Vec::with_capacity(registry.len());

    for algorithm in registry.iter() {
        let result = match algorithm.rank(
            fit.map(|f| f.features.view()),
            score.features.view(),
            &score.ids,
            config.top_n,
        ) {
            Ok(result) => result,
            Err(e) => {
                warn!("Ranking algorithm {} failed: {}", algorithm.name(), e);
                continue;
            }
        };

        let path = if config.output.save_scores_csv {
            match writer.write(&result) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Failed to save selections of {}: {:#}", algorithm.name(), e);
                    None
                }
            }
        } else {
            None
        };
        outputs.push((result, path));
    }
    outputs
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let registry = AlgorithmRegistry::from_config(&config);

    let score = load_dataset(&args.score_path, args.has_header)?;
    let fit = match &args.fit_path {
        Some(path) => Some(load_dataset(path, args.has_header)?),
        None => None,
    };
    info!(
        "Loaded {} items to rank ({} reference items), dimension {}",
        score.num_rows(),
        fit.as_ref().map_or(0, |f| f.num_rows()),
        score.dimension()
    );

    let outputs = run(&config, &registry, fit.as_ref(), &score);
    if outputs.is_empty() {
        return Err(anyhow!("Every ranking algorithm failed"));
    }
    for (result, path) in &outputs {
        match path {
            Some(path) => info!(
                "{}: selected {} items, saved to {}",
                result.algorithm,
                result.len(),
                path.display()
            ),
            None => info!("{}: selected {} items", result.algorithm, result.len()),
        }
    }
    Ok(())
}
