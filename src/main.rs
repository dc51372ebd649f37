use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shakmaty::Square;
use psqt_trainer::config::PsqtConfig;
use psqt_trainer::export::QuantizedPsqt;
use psqt_trainer::features::{active_features, parse_position, tempo, FEATURE_TEMPO, NUM_SQUARES};
use psqt_trainer::model::utils::DEVICE;
use psqt_trainer::model::{Psqt, ValueNetwork};
use psqt_trainer::training::{fit, Dataset};
use psqt_trainer::utils::SEMANTIC_PIECE_ORDER;

pub const MODEL_FILE: &str = "psqt.safetensors";

#[derive(Parser)]
#[command(version, about = "Train a piece-square table and export it as engine constants")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the model to labelled positions
    Train {
        /// Sample files or directories of `*.csv` files
        #[arg(long, required = true, num_args = 1..)]
        data: Vec<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = MODEL_FILE)]
        checkpoint: PathBuf,
        /// Continue from the weights in `--checkpoint` instead of a fresh model
        #[arg(long)]
        resume: bool,
    },
    /// Quantize a checkpoint into Rust constants
    Export {
        #[arg(long, default_value = MODEL_FILE)]
        checkpoint: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate one position with a checkpoint
    Predict {
        #[arg(long, default_value = MODEL_FILE)]
        checkpoint: PathBuf,
        #[arg(long)]
        fen: String,
    },
    /// List the active features of a position
    Features {
        #[arg(long)]
        fen: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<PsqtConfig> {
    match path {
        Some(path) => PsqtConfig::load(path).with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PsqtConfig::default()),
    }
}

fn load_model(path: &Path) -> Result<Psqt> {
    let mut model = Psqt::new(*DEVICE, false);
    model
        .load(path)
        .with_context(|| format!("Failed to load checkpoint {}", path.display()))?;
    Ok(model)
}

fn train(data: &[PathBuf], config: Option<&Path>, checkpoint: &Path, resume: bool) -> Result<()> {
    let config = load_config(config)?.training;
    let dataset = Dataset::load_all(data).context("Failed to load training data")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (mut train, validation) = dataset.split(config.validation_fraction, &mut rng);

    let model = if resume {
        info!("Resuming from {}", checkpoint.display());
        load_model(checkpoint)?
    } else {
        Psqt::new(*DEVICE, config.initialize_with_piece_values)
    };

    fit(&model, &mut train, &validation, &config, Some(checkpoint)).context("Training failed")?;
    info!("Saved model to {}", checkpoint.display());
    Ok(())
}

fn export(checkpoint: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let config = load_config(config)?.export;
    let model = load_model(checkpoint)?;
    let parameters = model.parameters()?;
    let quantized = QuantizedPsqt::from_parameters(&parameters, &config)?;

    match output {
        Some(path) => {
            quantized
                .write_rust_source(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote constants to {}", path.display());
        }
        None => print!("{}", quantized),
    }
    Ok(())
}

fn predict(checkpoint: &Path, fen: &str) -> Result<()> {
    let model = load_model(checkpoint)?;
    let value = model.predict_fen(fen)?;
    println!("{:.6}", value);
    Ok(())
}

fn features(fen: &str) -> Result<()> {
    for index in active_features(fen)? {
        let piece = SEMANTIC_PIECE_ORDER[index / NUM_SQUARES];
        let square = Square::new((index % NUM_SQUARES) as u32);
        println!("{:>4} {} {}", index, piece.to_char(), square);
    }
    let (_, turn) = parse_position(fen)?;
    println!("{:>4} tempo {:+}", FEATURE_TEMPO, tempo(turn));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Train { data, config, checkpoint, resume } => train(&data, config.as_deref(), &checkpoint, resume),
        Command::Export { checkpoint, config, output } => export(&checkpoint, config.as_deref(), output.as_deref()),
        Command::Predict { checkpoint, fen } => predict(&checkpoint, &fen),
        Command::Features { fen } => features(&fen),
    }
}
