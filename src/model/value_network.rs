use tch::Tensor;
use crate::error::Result;
use crate::model::PsqtParameters;

/// What the training loop and the exporter need from a model: a forward pass
/// over a `[batch, NUM_FEATURES]` float tensor yielding `[batch, 1]` values in (0, 1),
/// and a read-only snapshot of the learned parameters.
pub trait ValueNetwork {
    fn forward(&self, xs: &Tensor) -> Tensor;

    fn parameters(&self) -> Result<PsqtParameters>;
}
