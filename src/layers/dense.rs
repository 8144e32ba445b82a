use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// What one dense layer saw and produced during a forward pass.
#[derive(Debug, Clone)]
pub struct LayerTrace {
    /// Incoming activation with the bias column of ones prepended, shape (batch, in + 1).
    pub augmented_input: Matrix,
    /// Activated output, shape (batch, out).
    pub output: Matrix,
}

/// Forward step through one weight matrix of shape (out, in + 1).
pub fn feed_forward(input: &Matrix, weights: &Matrix, activator: ActivationFunction) -> LayerTrace {
    let augmented_input = input.with_bias_column();
    let z = &augmented_input * &weights.transpose();
    let output = activator.apply(&z);
    LayerTrace { augmented_input, output }
}

/// Gradient of a weight matrix given the delta at its output: `δᵀ · a_aug`.
pub fn weight_gradient(delta: &Matrix, augmented_input: &Matrix) -> Matrix {
    &delta.transpose() * augmented_input
}

/// Pushes `delta` (batch, out) back through `weights` to the layer below.
///
/// `augmented_input` is the bias-augmented activation that fed `weights`,
/// produced by `input_activator`. The returned delta has the bias column
/// dropped, shape (batch, in).
pub fn backprop_delta(
    delta: &Matrix,
    weights: &Matrix,
    augmented_input: &Matrix,
    input_activator: ActivationFunction,
) -> Matrix {
    let spread = delta * weights;
    spread
        .hadamard(&input_activator.derivative_matrix(augmented_input))
        .drop_first_column()
}
