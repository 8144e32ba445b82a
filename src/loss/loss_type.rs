use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;
use crate::loss::{bce::BceLoss, mse::HalfMseLoss};

/// Selects which loss the network reports.
///
/// - `HalfMse`            : `(1/2m) Σ (Y - h)²`; regression networks (identity output).
/// - `BinaryCrossEntropy` : mean BCE; classification networks (sigmoid output).
///
/// Both pair with their output activation so that the output-layer delta is
/// simply `h - Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    HalfMse,
    BinaryCrossEntropy,
}

impl LossType {
    pub fn for_regression(regression: bool) -> LossType {
        if regression { LossType::HalfMse } else { LossType::BinaryCrossEntropy }
    }

    /// Mean loss over the rows of `predicted`.
    pub fn loss(&self, predicted: &Matrix, expected: &Matrix) -> f64 {
        match self {
            LossType::HalfMse => HalfMseLoss::loss(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::loss(predicted, expected),
        }
    }
}
