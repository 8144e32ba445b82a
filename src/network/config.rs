use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Topology and hyperparameters of a [`Network`](crate::network::Network).
///
/// Like the training settings, this can be saved to / loaded from JSON on its
/// own. Trained weights are never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Units per layer, input first and output last.
    pub layer_sizes: Vec<usize>,
    /// Initial weights are drawn uniformly from `[-epsilon, epsilon]`.
    pub epsilon: f64,
    /// L2 coefficient; `0.0` disables regularization.
    pub lambda: f64,
    /// Gradient-descent step size (alpha).
    pub learning_rate: f64,
    /// Identity output + squared-error loss instead of sigmoid + cross-entropy.
    pub regression: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            layer_sizes: vec![2, 5, 1],
            epsilon: 1.0,
            lambda: 0.0,
            learning_rate: 1.0,
            regression: false,
        }
    }
}

impl NetworkConfig {
    pub fn new(layer_sizes: Vec<usize>) -> Self {
        NetworkConfig { layer_sizes, ..Default::default() }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_regression(mut self, regression: bool) -> Self {
        self.regression = regression;
        self
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkConfig` from a JSON file. Missing fields take their defaults.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: NetworkConfig = serde_json::from_str(r#"{"layer_sizes":[3,4,2],"regression":true}"#).unwrap();
        assert_eq!(cfg.layer_sizes, vec![3, 4, 2]);
        assert!(cfg.regression);
        assert_eq!(cfg.epsilon, 1.0);
        assert_eq!(cfg.lambda, 0.0);
    }

    #[test]
    fn save_then_load_json_file() {
        let path = std::env::temp_dir().join(format!("evo-nn-config-{}.json", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        let cfg = NetworkConfig::new(vec![1, 1]).with_lambda(0.1).with_learning_rate(0.3);
        cfg.save_json(&path).unwrap();
        let loaded = NetworkConfig::load_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = NetworkConfig::load_json("/nonexistent/evo-nn.json").unwrap_err();
        assert!(matches!(err, crate::error::NnError::Io(_)));
    }
}
