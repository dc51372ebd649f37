//! Epoch loop: shuffling, per-batch optimizer steps, validation and checkpoints.

use std::path::Path;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tch::nn::{self, OptimizerConfig};
use crate::config::{LossKind, TrainConfig};
use crate::error::{PsqtError, Result};
use crate::model::{Psqt, ValueNetwork};
use crate::training::{compute_loss, train_batch, Dataset, LossMetrics};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub train_loss: f64,
    /// `None` when there are no validation samples
    pub val_loss: Option<f64>,
}

/// Mean over all samples of a set of per-batch means.
fn mean_loss(metrics: &[LossMetrics]) -> f64 {
    let num_samples: usize = metrics.iter().map(|m| m.num_samples).sum();
    if num_samples == 0 {
        return 0.;
    }
    metrics.iter().map(|m| m.loss * m.num_samples as f64).sum::<f64>() / num_samples as f64
}

/// Mean loss of the model over a whole dataset, or `None` if it is empty.
pub fn evaluate(model: &dyn ValueNetwork, dataset: &Dataset, batch_size: usize, loss: LossKind) -> Result<Option<f64>> {
    if dataset.is_empty() {
        return Ok(None);
    }
    let metrics = dataset
        .batches(batch_size)
        .map(|batch| compute_loss(model, batch, loss))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(mean_loss(&metrics)))
}

fn epoch_progress_bar(num_batches: usize, epoch: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.green} {prefix} [Elapsed {elapsed_precise}] (ETA {eta}) [{bar:.cyan/blue}] {human_pos}/{human_len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");

    ProgressBar::new(num_batches as u64)
        .with_style(style)
        .with_prefix(format!("Epoch {}", epoch))
}

/// Trains `model` with Adam for `config.epochs` epochs and returns the per-epoch losses.
///
/// The training set is reshuffled every epoch from `config.seed`. When `checkpoint` is
/// given, the var store is saved there every `config.checkpoint_every` epochs and after
/// the last one.
pub fn fit(
    model: &Psqt,
    train: &mut Dataset,
    validation: &Dataset,
    config: &TrainConfig,
    checkpoint: Option<&Path>,
) -> Result<Vec<EpochMetrics>> {
    if train.is_empty() {
        return Err(PsqtError::EmptyDataset);
    }
    if validation.is_empty() {
        warn!("No validation samples, only the training loss will be reported");
    }
    info!(
        "Training on {} samples ({} validation), batch size {}, {} epochs",
        train.len(),
        validation.len(),
        config.batch_size,
        config.epochs
    );

    let mut optimizer = nn::Adam::default().build(&model.vs, config.learning_rate)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        train.shuffle(&mut rng);

        let num_batches = train.len().div_ceil(config.batch_size);
        let pb = epoch_progress_bar(num_batches, epoch);
        let mut batch_metrics = Vec::with_capacity(num_batches);
        for batch in train.batches(config.batch_size) {
            let metrics = train_batch(model, &mut optimizer, batch, config.loss)?;
            pb.set_message(format!("loss {:.6}", metrics.loss));
            pb.inc(1);
            batch_metrics.push(metrics);
        }
        pb.finish_and_clear();

        let train_loss = mean_loss(&batch_metrics);
        let val_loss = evaluate(model, validation, config.batch_size, config.loss)?;
        match val_loss {
            Some(val_loss) => info!("Epoch {} - Loss {:.6} - Val Loss: {:.6}", epoch, train_loss, val_loss),
            None => info!("Epoch {} - Loss {:.6}", epoch, train_loss),
        }
        history.push(EpochMetrics { epoch, train_loss, val_loss });

        if let Some(path) = checkpoint {
            let is_last = epoch + 1 == config.epochs;
            let is_due = config.checkpoint_every > 0 && (epoch + 1) % config.checkpoint_every == 0;
            if is_last || is_due {
                model.save(path)?;
                debug!("Saved checkpoint to {}", path.display());
            }
        }
    }

    Ok(history)
}
