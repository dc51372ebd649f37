use crate::error::{PsqtError, Result};
use crate::features::{encode, NUM_FEATURES};

/// Read-only snapshot of the learned weights: one per feature plus the bias.
#[derive(Debug, Clone, PartialEq)]
pub struct PsqtParameters {
    pub weights: Vec<f32>,
    pub bias: f32,
}

pub fn sigmoid(x: f32) -> f32 {
    1. / (1. + (-x).exp())
}

impl PsqtParameters {
    pub fn new(weights: Vec<f32>, bias: f32) -> Result<Self> {
        if weights.len() != NUM_FEATURES {
            return Err(PsqtError::ShapeMismatch { expected: NUM_FEATURES, actual: weights.len() });
        }
        Ok(PsqtParameters { weights, bias })
    }

    pub fn zeros() -> Self {
        PsqtParameters { weights: vec![0.; NUM_FEATURES], bias: 0. }
    }

    /// `dot(weights, features) + bias`, before the sigmoid.
    pub fn linear(&self, features: &[f32]) -> Result<f32> {
        if features.len() != self.weights.len() {
            return Err(PsqtError::ShapeMismatch { expected: self.weights.len(), actual: features.len() });
        }
        let dot: f32 = self.weights.iter().zip(features).map(|(w, x)| w * x).sum();
        Ok(dot + self.bias)
    }

    /// The model's output for an encoded position, in (0, 1).
    pub fn predict(&self, features: &[f32]) -> Result<f32> {
        Ok(sigmoid(self.linear(features)?))
    }

    pub fn predict_fen(&self, fen: &str) -> Result<f32> {
        self.predict(&encode(fen)?)
    }
}
