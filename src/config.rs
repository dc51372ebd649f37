//! Training and export settings, read from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid configuration:
//!
//! ```toml
//! [training]
//! batch_size = 4096
//! epochs = 20
//! loss = "bce"
//!
//! [export]
//! scale = 131072.0
//! divisor = 512
//! rounding = "half-to-even"
//! ```

use std::fs;
use std::path::Path;
use serde::Deserialize;
use crate::error::{PsqtError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossKind {
    /// Mean squared error between prediction and target
    Mse,
    /// Binary cross entropy, targets read as win probabilities
    Bce,
}

/// Tie-breaking rule when quantizing `scale * weight` to an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    #[default]
    HalfAwayFromZero,
    HalfToEven,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    pub batch_size: usize,
    pub epochs: usize,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Share of the samples held out for validation
    pub validation_fraction: f64,
    /// Seed for the train/validation split and per-epoch shuffling
    pub seed: u64,
    pub loss: LossKind,
    pub initialize_with_piece_values: bool,
    /// Save a checkpoint every this many epochs (0 saves only at the end)
    pub checkpoint_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            batch_size: 1024,
            epochs: 10,
            learning_rate: 1e-3,
            validation_fraction: 0.1,
            seed: 42,
            loss: LossKind::Mse,
            initialize_with_piece_values: true,
            checkpoint_every: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Fixed-point multiplier applied to every weight
    pub scale: f64,
    /// Divisor the engine applies to the summed table values
    pub divisor: i32,
    pub rounding: Rounding,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            scale: (1 << 17) as f64,
            divisor: 1 << 9,
            rounding: Rounding::HalfAwayFromZero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PsqtConfig {
    pub training: TrainConfig,
    pub export: ExportConfig,
}

impl PsqtConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    pub fn validate(&self) -> Result<()> {
        let training = &self.training;
        if training.batch_size == 0 {
            return Err(PsqtError::InvalidConfig("training.batch_size must be positive".to_string()));
        }
        if training.epochs == 0 {
            return Err(PsqtError::InvalidConfig("training.epochs must be positive".to_string()));
        }
        if !(training.learning_rate > 0.) {
            return Err(PsqtError::InvalidConfig(format!("training.learning_rate must be positive, got {}", training.learning_rate)));
        }
        if !(0. ..1.).contains(&training.validation_fraction) {
            return Err(PsqtError::InvalidConfig(format!(
                "training.validation_fraction must be in [0, 1), got {}",
                training.validation_fraction
            )));
        }

        let export = &self.export;
        if !(export.scale > 0.) || !export.scale.is_finite() {
            return Err(PsqtError::InvalidConfig(format!("export.scale must be positive, got {}", export.scale)));
        }
        if export.divisor == 0 {
            return Err(PsqtError::InvalidConfig("export.divisor must not be 0".to_string()));
        }
        Ok(())
    }
}

impl std::str::FromStr for PsqtConfig {
    type Err = PsqtError;

    fn from_str(s: &str) -> Result<Self> {
        let config: PsqtConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
