use std::path::Path;
use tch::{nn, nn::Module, Device, Kind, Tensor};
use crate::error::{PsqtError, Result};
use crate::features::{feature_index, NUM_FEATURES, NUM_SQUARES};
use crate::model::utils::{fen_to_tensor, tensor_to_vec};
use crate::model::{PsqtParameters, ValueNetwork};
use crate::utils::{material_value, ColoredPiece};

/// Piece-square table: a single dense layer from the feature vector to one output, then a sigmoid.
#[derive(Debug)]
pub struct Psqt {
    pub vs: nn::VarStore,
    pub linear: nn::Linear,
}

/// Per-slot material offsets used to warm start the weights. The tempo slot stays 0.
pub fn piece_value_offsets() -> Vec<f32> {
    let mut offsets = vec![0.; NUM_FEATURES];
    for piece in ColoredPiece::iter_semantic() {
        let value = material_value(piece);
        for square in 0..NUM_SQUARES {
            offsets[feature_index(piece, square)] = value;
        }
    }
    offsets
}

impl Psqt {
    pub fn new(device: Device, initialize_with_piece_values: bool) -> Psqt {
        let vs = nn::VarStore::new(device);
        let linear = nn::linear(vs.root() / "psqt", NUM_FEATURES as i64, 1, Default::default());

        let mut psqt = Psqt { vs, linear };
        if initialize_with_piece_values {
            psqt.initialize_piece_values();
        }
        psqt
    }

    /// Adds each piece's material value to its 64 weights, on top of the framework's random init.
    pub fn initialize_piece_values(&mut self) {
        let offsets = Tensor::from_slice(&piece_value_offsets())
            .view([1, NUM_FEATURES as i64])
            .to_kind(Kind::Float)
            .to_device(self.vs.device());

        tch::no_grad(|| {
            let seeded = &self.linear.ws + &offsets;
            self.linear.ws.copy_(&seeded);
        });
    }

    pub fn predict_fen(&self, fen: &str) -> Result<f64> {
        let xs = fen_to_tensor(fen)?.to_device(self.vs.device());
        let value = tch::no_grad(|| ValueNetwork::forward(self, &xs));
        Ok(value.double_value(&[0, 0]))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.vs.save(path)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.vs.load(path)?;
        Ok(())
    }
}

impl ValueNetwork for Psqt {
    fn forward(&self, xs: &Tensor) -> Tensor {
        assert_eq!(xs.size().len(), 2);
        assert_eq!(xs.size()[1], NUM_FEATURES as i64);

        self.linear.forward(xs).sigmoid()
    }

    fn parameters(&self) -> Result<PsqtParameters> {
        let weights = tensor_to_vec(&self.linear.ws)?;
        let bias = match &self.linear.bs {
            Some(bs) => tensor_to_vec(bs)?,
            None => vec![0.],
        };
        let bias = *bias.first().ok_or(PsqtError::ShapeMismatch { expected: 1, actual: 0 })?;
        PsqtParameters::new(weights, bias)
    }
}

#[cfg(test)]
mod tests {
    use tch::nn::OptimizerConfig;
    use super::*;
    use crate::features::{encode, FEATURE_TEMPO};
    use crate::model::utils::{fens_to_tensor, DEVICE};

    const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_forward_shape_and_range() {
        let model = Psqt::new(*DEVICE, true);
        let xs = fens_to_tensor(&[INITIAL_FEN, "4k3/8/8/8/8/8/8/4K3 b - - 0 1"]).unwrap();

        let ys = model.forward(&xs);
        assert_eq!(ys.size(), [2, 1]);
        for value in tensor_to_vec(&ys).unwrap() {
            assert!(value > 0. && value < 1.);
        }
    }

    #[test]
    fn test_parameters_snapshot_shape() {
        let model = Psqt::new(*DEVICE, false);
        let params = model.parameters().unwrap();
        assert_eq!(params.weights.len(), NUM_FEATURES);
    }

    #[test]
    fn test_piece_value_initialization() {
        let mut model = Psqt::new(*DEVICE, false);
        let plain = model.parameters().unwrap();
        model.initialize_piece_values();
        let seeded = model.parameters().unwrap();

        for piece in ColoredPiece::iter_semantic() {
            for square in 0..NUM_SQUARES {
                let index = feature_index(piece, square);
                let delta = seeded.weights[index] - plain.weights[index];
                assert!((delta - material_value(piece)).abs() < 1e-5, "{:?} on {}", piece, square);
            }
        }
        assert_eq!(seeded.weights[FEATURE_TEMPO], plain.weights[FEATURE_TEMPO]);
        assert_eq!(seeded.bias, plain.bias);
    }

    #[test]
    fn test_initialization_does_not_track_gradients() {
        let model = Psqt::new(*DEVICE, true);
        assert!(model.linear.ws.requires_grad());
        assert!(!model.linear.ws.grad().defined());
    }

    #[test]
    fn test_forward_matches_snapshot_predict() {
        let model = Psqt::new(*DEVICE, true);
        let params = model.parameters().unwrap();

        for fen in [INITIAL_FEN, "r1bqkb1r/p2ppppp/1pn2n2/2p5/P7/2P2P1P/1P1PP1P1/RNBQKBNR b KQkq - 0 5"] {
            let framework = model.predict_fen(fen).unwrap();
            let snapshot = params.predict(&encode(fen).unwrap()).unwrap() as f64;
            assert!((framework - snapshot).abs() < 1e-5, "{} vs {}", framework, snapshot);
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psqt.safetensors");

        let model = Psqt::new(*DEVICE, true);
        model.save(&path).unwrap();

        let mut restored = Psqt::new(*DEVICE, false);
        restored.load(&path).unwrap();

        assert_eq!(model.parameters().unwrap(), restored.parameters().unwrap());
    }

    #[test]
    fn test_optimizer_step_changes_weights() {
        let model = Psqt::new(*DEVICE, false);
        let mut optimizer = nn::Adam::default().build(&model.vs, 1e-2).unwrap();
        let before = model.parameters().unwrap();

        let xs = fens_to_tensor(&[INITIAL_FEN]).unwrap();
        let target = Tensor::ones([1, 1], (Kind::Float, *DEVICE));
        let loss = model.forward(&xs).mse_loss(&target, tch::Reduction::Mean);
        optimizer.backward_step(&loss);

        assert_ne!(before, model.parameters().unwrap());
    }
}
