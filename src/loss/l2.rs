//! L2 weight penalty. Bias columns (column 0 of every weight matrix) are not penalised.

use crate::math::matrix::Matrix;

/// (λ / 2m) · Σ w², summed over every non-bias weight.
pub fn penalty(weights: &[Matrix], lambda: f64, m: usize) -> f64 {
    if lambda == 0.0 {
        return 0.0;
    }
    let squares: f64 = weights.iter()
        .map(|w| w.data.iter().map(|row| row[1..].iter().map(|x| x * x).sum::<f64>()).sum::<f64>())
        .sum();
    lambda / (2.0 * m as f64) * squares
}

/// (λ / m) · w with the bias column zeroed, matching the shape of `weights`.
pub fn gradient(weights: &Matrix, lambda: f64, m: usize) -> Matrix {
    let factor = lambda / m as f64;
    let mut res = weights.scale(factor);
    for row in res.data.iter_mut() {
        row[0] = 0.0;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_column_is_excluded() {
        let w = vec![Matrix::from_data(vec![vec![10.0, 1.0, 2.0]])];
        assert!((penalty(&w, 1.0, 1) - 2.5).abs() < 1e-12);
        let g = gradient(&w[0], 2.0, 4);
        assert_eq!(g, Matrix::from_data(vec![vec![0.0, 0.5, 1.0]]));
    }

    #[test]
    fn zero_lambda_is_inert() {
        let w = vec![Matrix::from_data(vec![vec![3.0, 4.0]])];
        assert_eq!(penalty(&w, 0.0, 3), 0.0);
    }
}
