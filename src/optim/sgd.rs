use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies `w -= lr * g` to every layer, or to none of them.
    ///
    /// All updated matrices are computed and checked before any is written, so
    /// a shape error or a non-finite result leaves `weights` untouched.
    pub fn step(&self, weights: &mut [Matrix], gradients: &[Matrix]) -> Result<()> {
        if weights.len() != gradients.len() {
            return Err(NnError::shape(
                "gradient list",
                format!("{} matrices", weights.len()),
                format!("{} matrices", gradients.len()),
            ));
        }
        for (w, g) in weights.iter().zip(gradients) {
            if w.shape() != g.shape() {
                return Err(NnError::shape("gradient", format!("{:?}", w.shape()), format!("{:?}", g.shape())));
            }
        }

        let updated: Vec<Matrix> = weights.iter().zip(gradients)
            .map(|(w, g)| w - &g.scale(self.learning_rate))
            .collect();
        if let Some(bad) = updated.iter().flat_map(|w| w.data.iter().flatten()).find(|x| !x.is_finite()) {
            return Err(NnError::NumericInstability { context: "weight update", value: *bad });
        }

        for (w, new_w) in weights.iter_mut().zip(updated) {
            *w = new_w;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_descends_along_gradient() {
        let mut w = vec![Matrix::from_data(vec![vec![1.0, 2.0]])];
        let g = vec![Matrix::from_data(vec![vec![0.5, -1.0]])];
        Sgd::new(0.1).step(&mut w, &g).unwrap();
        assert!((w[0].get(0, 0) - 0.95).abs() < 1e-12);
        assert!((w[0].get(0, 1) - 2.1).abs() < 1e-12);
    }

    #[test]
    fn failed_step_updates_no_layer() {
        let original = vec![Matrix::ones(1, 2), Matrix::ones(1, 3)];
        let mut w = original.clone();
        let g = vec![Matrix::ones(1, 2), Matrix::from_data(vec![vec![f64::NAN, 0.0, 0.0]])];
        assert!(matches!(Sgd::new(1.0).step(&mut w, &g), Err(NnError::NumericInstability { .. })));
        assert_eq!(w, original);

        let wrong_shape = vec![Matrix::ones(1, 2), Matrix::ones(2, 3)];
        assert!(matches!(Sgd::new(1.0).step(&mut w, &wrong_shape), Err(NnError::ShapeMismatch { .. })));
        assert_eq!(w, original);
    }
}
