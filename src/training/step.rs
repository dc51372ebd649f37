use tch::{nn, Kind, Reduction, Tensor};
use crate::config::LossKind;
use crate::error::{PsqtError, Result};
use crate::model::utils::{fens_to_tensor, DEVICE};
use crate::model::ValueNetwork;
use crate::training::Sample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossMetrics {
    /// Mean loss over the batch
    pub loss: f64,
    pub num_samples: usize,
}

/// Encodes a batch into `[n, NUM_FEATURES]` inputs and `[n, 1]` targets.
pub fn create_batch_tensors(batch: &[Sample]) -> Result<(Tensor, Tensor)> {
    let fens: Vec<&str> = batch.iter().map(|sample| sample.fen.as_str()).collect();
    let targets: Vec<f32> = batch.iter().map(|sample| sample.target).collect();

    let inputs = fens_to_tensor(&fens)?;
    let targets = Tensor::from_slice(&targets)
        .view([batch.len() as i64, 1])
        .to_kind(Kind::Float)
        .to_device(*DEVICE);

    Ok((inputs, targets))
}

pub fn loss_tensor(predicted: &Tensor, expected: &Tensor, loss: LossKind) -> Tensor {
    match loss {
        LossKind::Mse => predicted.mse_loss(expected, Reduction::Mean),
        LossKind::Bce => predicted.binary_cross_entropy::<Tensor>(expected, None, Reduction::Mean),
    }
}

/// Runs one batch through the model and, if an optimizer is given, takes one step.
pub fn run_model(
    model: &dyn ValueNetwork,
    optimizer: Option<&mut nn::Optimizer>,
    batch: &[Sample],
    loss: LossKind,
) -> Result<LossMetrics> {
    if batch.is_empty() {
        return Err(PsqtError::EmptyDataset);
    }

    let (inputs, expected) = create_batch_tensors(batch)?;

    let value = match optimizer {
        Some(opt) => {
            let predicted = model.forward(&inputs);
            assert_eq!(predicted.size(), expected.size());

            let value = loss_tensor(&predicted, &expected, loss);
            opt.backward_step(&value);
            value
        }
        None => tch::no_grad(|| loss_tensor(&model.forward(&inputs), &expected, loss)),
    };

    assert_eq!(value.size(), [] as [i64; 0]);

    Ok(LossMetrics {
        loss: value.double_value(&[]),
        num_samples: batch.len(),
    })
}

/// Loss of the model on a batch, without updating it
pub fn compute_loss(model: &dyn ValueNetwork, batch: &[Sample], loss: LossKind) -> Result<LossMetrics> {
    run_model(model, None, batch, loss)
}

/// Update the model parameters given a batch of training data
pub fn train_batch(
    model: &dyn ValueNetwork,
    optimizer: &mut nn::Optimizer,
    batch: &[Sample],
    loss: LossKind,
) -> Result<LossMetrics> {
    run_model(model, Some(optimizer), batch, loss)
}
