use crate::math::matrix::Matrix;

pub struct BceLoss;

/// Predictions are clamped to [EPS, 1 - EPS] so saturated sigmoids never hit log(0).
pub const EPS: f64 = 1e-12;

impl BceLoss {
    /// Scalar BCE: -(1/m) · Σ [y·log(p) + (1-y)·log(1-p)], m = row count.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let m = predicted.rows as f64;
        predicted.data.iter().flatten().zip(expected.data.iter().flatten())
            .map(|(&p, &y)| {
                let p = p.clamp(EPS, 1.0 - EPS);
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum::<f64>() / m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bce_of_half_is_ln_two() {
        let p = Matrix::from_data(vec![vec![0.5], vec![0.5]]);
        let y = Matrix::from_data(vec![vec![1.0], vec![0.0]]);
        assert!((BceLoss::loss(&p, &y) - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn saturated_predictions_stay_finite() {
        let p = Matrix::from_data(vec![vec![0.0], vec![1.0]]);
        let y = Matrix::from_data(vec![vec![1.0], vec![0.0]]);
        let loss = BceLoss::loss(&p, &y);
        assert!(loss.is_finite());
        assert!(loss > 20.0);
    }
}
