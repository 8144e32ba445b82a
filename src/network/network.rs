use rand::Rng;
use tracing::{debug, warn};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::dense::{self, LayerTrace};
use crate::loss::{l2, loss_type::LossType};
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;
use crate::train::{loop_fn::train_loop, train_config::TrainConfig};

/// Dense feed-forward network with the bias folded into each weight matrix.
///
/// Weight matrix `i` has shape `(layer_sizes[i+1], layer_sizes[i] + 1)`; column 0
/// holds the bias. The weights stay an ordered, individually replaceable list so
/// that breeding code can cross over and mutate layers directly.
#[derive(Debug, Clone)]
pub struct Network {
    layer_sizes: Vec<usize>,
    weights: Vec<Matrix>,
    epsilon: f64,
    lambda: f64,
    learning_rate: f64,
    regression: bool,
    last_activations: Vec<Matrix>,
    last_error: f64,
}

impl Network {
    /// Builds a network with weights drawn from the thread-local RNG.
    pub fn new(config: &NetworkConfig) -> Result<Network> {
        Network::with_rng(config, &mut rand::thread_rng())
    }

    /// Builds a network with weights drawn uniformly from `[-epsilon, epsilon]` using `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Result<Network> {
        validate_topology(&config.layer_sizes)?;
        let weights = config.layer_sizes.windows(2)
            .map(|pair| Matrix::random_uniform(pair[1], pair[0] + 1, config.epsilon, rng))
            .collect();
        debug!(layers = ?config.layer_sizes, regression = config.regression, "network initialised");
        Ok(Network::assemble(config, weights))
    }

    /// Builds a network from explicit weight matrices, checked against the topology.
    pub fn with_weights(config: &NetworkConfig, weights: Vec<Matrix>) -> Result<Network> {
        validate_topology(&config.layer_sizes)?;
        let expected = config.layer_sizes.len() - 1;
        if weights.len() != expected {
            return Err(NnError::shape(
                "weight list",
                format!("{expected} matrices"),
                format!("{} matrices", weights.len()),
            ));
        }
        for (i, w) in weights.iter().enumerate() {
            check_weight_shape(&config.layer_sizes, i, w)?;
        }
        Ok(Network::assemble(config, weights))
    }

    fn assemble(config: &NetworkConfig, weights: Vec<Matrix>) -> Network {
        Network {
            layer_sizes: config.layer_sizes.clone(),
            weights,
            epsilon: config.epsilon,
            lambda: config.lambda,
            learning_rate: config.learning_rate,
            regression: config.regression,
            last_activations: Vec::new(),
            last_error: 0.0,
        }
    }

    pub fn config(&self) -> NetworkConfig {
        NetworkConfig {
            layer_sizes: self.layer_sizes.clone(),
            epsilon: self.epsilon,
            lambda: self.lambda,
            learning_rate: self.learning_rate,
            regression: self.regression,
        }
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn is_regression(&self) -> bool {
        self.regression
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn loss_type(&self) -> LossType {
        LossType::for_regression(self.regression)
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> Option<&Matrix> {
        self.weights.get(index)
    }

    /// Swaps in a new weight matrix for layer transition `index`, returning the old one.
    ///
    /// The replacement must have the same shape as the matrix it replaces.
    pub fn replace_weight(&mut self, index: usize, weight: Matrix) -> Result<Matrix> {
        if index >= self.weights.len() {
            return Err(NnError::LayerIndex { index, layers: self.weights.len() });
        }
        check_weight_shape(&self.layer_sizes, index, &weight)?;
        Ok(std::mem::replace(&mut self.weights[index], weight))
    }

    pub(crate) fn weights_mut(&mut self) -> &mut [Matrix] {
        &mut self.weights
    }

    /// Per-layer outputs of the last [`activate`](Network::activate) call.
    pub fn last_activations(&self) -> &[Matrix] {
        &self.last_activations
    }

    /// Loss recorded by the last [`cost`](Network::cost) call.
    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    fn activator_for(&self, layer: usize) -> ActivationFunction {
        if self.regression && layer == self.weights.len() - 1 {
            ActivationFunction::Identity
        } else {
            ActivationFunction::Sigmoid
        }
    }

    /// Forward pass keeping every layer's augmented input and output.
    pub fn forward_trace(&self, inputs: &Matrix) -> Result<Vec<LayerTrace>> {
        self.check_inputs(inputs)?;
        Ok(self.trace_unchecked(inputs))
    }

    fn trace_unchecked(&self, inputs: &Matrix) -> Vec<LayerTrace> {
        let mut traces: Vec<LayerTrace> = Vec::with_capacity(self.weights.len());
        for (i, w) in self.weights.iter().enumerate() {
            let input = traces.last().map_or(inputs, |t| &t.output);
            let trace = dense::feed_forward(input, w, self.activator_for(i));
            traces.push(trace);
        }
        traces
    }

    /// Output of the network for each row of `inputs`. Does not touch any state.
    pub fn predict(&self, inputs: &Matrix) -> Result<Matrix> {
        let mut traces = self.forward_trace(inputs)?;
        Ok(traces.pop().map(|t| t.output).unwrap_or_default())
    }

    /// Like [`predict`](Network::predict), but records the per-layer outputs in
    /// [`last_activations`](Network::last_activations) for visualisation.
    pub fn activate(&mut self, inputs: &Matrix) -> Result<Matrix> {
        let traces = self.forward_trace(inputs)?;
        self.last_activations = traces.into_iter().map(|t| t.output).collect();
        Ok(self.last_activations.last().cloned().unwrap_or_default())
    }

    /// Mean gradient of the loss w.r.t. every weight matrix over the rows of the batch.
    pub fn gradients(&self, inputs: &Matrix, targets: &Matrix) -> Result<Vec<Matrix>> {
        self.check_pair(inputs, targets)?;
        Ok(self.gradients_unchecked(inputs, targets))
    }

    pub(crate) fn gradients_unchecked(&self, inputs: &Matrix, targets: &Matrix) -> Vec<Matrix> {
        let traces = self.trace_unchecked(inputs);
        let last = traces.len() - 1;
        let mut grads = vec![Matrix::default(); traces.len()];

        // Sigmoid + cross-entropy and identity + squared error both reduce to h - y.
        let mut delta = &traces[last].output - targets;
        grads[last] = dense::weight_gradient(&delta, &traces[last].augmented_input);

        for i in (1..=last).rev() {
            delta = dense::backprop_delta(
                &delta,
                &self.weights[i],
                &traces[i].augmented_input,
                self.activator_for(i - 1),
            );
            grads[i - 1] = dense::weight_gradient(&delta, &traces[i - 1].augmented_input);
        }

        let m = inputs.rows;
        let inv_batch = 1.0 / m as f64;
        grads.into_iter()
            .zip(&self.weights)
            .map(|(g, w)| {
                let mean = g.scale(inv_batch);
                if self.lambda == 0.0 { mean } else { &mean + &l2::gradient(w, self.lambda, m) }
            })
            .collect()
    }

    /// Mean loss over the batch: half-MSE for regression, cross-entropy otherwise,
    /// plus the L2 penalty when `lambda` is non-zero.
    pub fn loss(&self, inputs: &Matrix, targets: &Matrix) -> Result<f64> {
        self.check_pair(inputs, targets)?;
        let predicted = self.predict(inputs)?;
        let loss = self.loss_type().loss(&predicted, targets)
            + l2::penalty(&self.weights, self.lambda, inputs.rows);
        if !loss.is_finite() {
            warn!(loss, "loss is not finite");
            return Err(NnError::NumericInstability { context: "loss", value: loss });
        }
        Ok(loss)
    }

    /// Computes the loss and records it in [`last_error`](Network::last_error).
    pub fn cost(&mut self, inputs: &Matrix, targets: &Matrix) -> Result<f64> {
        let loss = self.loss(inputs, targets)?;
        self.last_error = loss;
        Ok(loss)
    }

    /// Runs `iterations` steps of mini-batch gradient descent.
    ///
    /// Batches are `batch_size` consecutive rows starting at
    /// `(batch_size * iteration) mod rows`, wrapping past the last row.
    pub fn run(&mut self, inputs: &Matrix, targets: &Matrix, batch_size: usize, iterations: usize) -> Result<()> {
        train_loop(self, inputs, targets, &TrainConfig::new(batch_size, iterations)).map(|_| ())
    }

    fn check_inputs(&self, inputs: &Matrix) -> Result<()> {
        inputs.check_rectangular("inputs")?;
        if inputs.rows == 0 {
            return Err(NnError::shape("inputs", "at least one row", "0 rows"));
        }
        if inputs.cols != self.input_size() {
            return Err(NnError::shape(
                "inputs",
                format!("{} columns", self.input_size()),
                format!("{} columns", inputs.cols),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_pair(&self, inputs: &Matrix, targets: &Matrix) -> Result<()> {
        self.check_inputs(inputs)?;
        targets.check_rectangular("targets")?;
        if targets.cols != self.output_size() {
            return Err(NnError::shape(
                "targets",
                format!("{} columns", self.output_size()),
                format!("{} columns", targets.cols),
            ));
        }
        if targets.rows != inputs.rows {
            return Err(NnError::shape(
                "targets",
                format!("{} rows", inputs.rows),
                format!("{} rows", targets.rows),
            ));
        }
        Ok(())
    }
}

fn validate_topology(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 || sizes.contains(&0) {
        return Err(NnError::InvalidTopology { sizes: sizes.to_vec() });
    }
    Ok(())
}

fn check_weight_shape(sizes: &[usize], index: usize, weight: &Matrix) -> Result<()> {
    weight.check_rectangular("weight matrix")?;
    let expected = (sizes[index + 1], sizes[index] + 1);
    if weight.shape() != expected {
        return Err(NnError::shape("weight matrix", format!("{expected:?}"), format!("{:?}", weight.shape())));
    }
    Ok(())
}
