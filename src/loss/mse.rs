use crate::math::matrix::Matrix;

pub struct HalfMseLoss;

impl HalfMseLoss {
    /// Scalar loss: (1/2m) · Σ (expected - predicted)², m = row count.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let m = predicted.rows as f64;
        (expected - predicted).map(|d| d * d).sum() / (2.0 * m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_mse_divides_by_twice_the_rows() {
        let p = Matrix::from_data(vec![vec![1.0], vec![3.0]]);
        let y = Matrix::from_data(vec![vec![0.0], vec![1.0]]);
        // (1 + 4) / (2 * 2)
        assert!((HalfMseLoss::loss(&p, &y) - 1.25).abs() < 1e-12);
    }
}
