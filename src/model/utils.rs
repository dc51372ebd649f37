use lazy_static::lazy_static;
use tch::{Device, Kind, Tensor};
use crate::error::{PsqtError, Result};
use crate::features::{encode, encode_batch, NUM_FEATURES};

lazy_static! {
    pub static ref DEVICE: Device = Device::cuda_if_available();
}

/// Wraps a row-major feature matrix as a `[rows, NUM_FEATURES]` float tensor on [`DEVICE`].
pub fn matrix_to_tensor(matrix: &[f32]) -> Result<Tensor> {
    if matrix.len() % NUM_FEATURES != 0 {
        return Err(PsqtError::ShapeMismatch {
            expected: (matrix.len() / NUM_FEATURES + 1) * NUM_FEATURES,
            actual: matrix.len(),
        });
    }
    let rows = (matrix.len() / NUM_FEATURES) as i64;
    Ok(Tensor::from_slice(matrix)
        .view([rows, NUM_FEATURES as i64])
        .to_kind(Kind::Float)
        .to_device(*DEVICE))
}

/// Single position as a `[1, NUM_FEATURES]` tensor.
pub fn fen_to_tensor(fen: &str) -> Result<Tensor> {
    matrix_to_tensor(&encode(fen)?)
}

/// Batch of positions as a `[fens.len(), NUM_FEATURES]` tensor.
pub fn fens_to_tensor<S: AsRef<str> + Sync>(fens: &[S]) -> Result<Tensor> {
    matrix_to_tensor(&encode_batch(fens)?)
}

/// Copies a tensor of any shape into a flat `Vec<f32>` on the host.
pub fn tensor_to_vec(tensor: &Tensor) -> Result<Vec<f32>> {
    let flat = tensor.detach().to_device(Device::Cpu).to_kind(Kind::Float).view([-1]);
    Ok(Vec::<f32>::try_from(&flat)?)
}
