use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    /// Linear output used by regression networks on their final layer.
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative expressed through the already-activated value `a`.
    ///
    /// For the sigmoid this is the logistic shortcut `a · (1 - a)`. Note that a
    /// bias column of ones maps to `0`, which is what backprop relies on.
    pub fn derivative_from_output(&self, a: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => a * (1.0 - a),
            ActivationFunction::Identity => 1.0,
        }
    }

    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Identity => z.clone(),
            _ => z.map(|x| self.function(x)),
        }
    }

    pub fn derivative_matrix(&self, a: &Matrix) -> Matrix {
        a.map(|x| self.derivative_from_output(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_values() {
        let s = ActivationFunction::Sigmoid;
        assert!((s.function(0.0) - 0.5).abs() < 1e-12);
        assert!(s.function(10.0) > 0.9999);
        assert!(s.function(-10.0) < 0.0001);
    }

    #[test]
    fn sigmoid_derivative_matches_finite_difference() {
        let s = ActivationFunction::Sigmoid;
        let h = 1e-6;
        for &x in &[-2.0, -0.3, 0.0, 0.7, 3.0] {
            let numeric = (s.function(x + h) - s.function(x - h)) / (2.0 * h);
            let analytic = s.derivative_from_output(s.function(x));
            assert!((numeric - analytic).abs() < 1e-6);
        }
    }

    #[test]
    fn bias_entries_have_zero_sigmoid_derivative() {
        let d = ActivationFunction::Sigmoid.derivative_matrix(&Matrix::ones(2, 1));
        assert_eq!(d, Matrix::zeros(2, 1));
    }

    #[test]
    fn identity_passes_through() {
        let z = Matrix::from_data(vec![vec![-3.5, 12.0]]);
        assert_eq!(ActivationFunction::Identity.apply(&z), z);
    }
}
