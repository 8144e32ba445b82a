use thiserror::Error;

/// Errors surfaced by the network and its training loop.
#[derive(Error, Debug)]
pub enum NnError {
    #[error("Invalid topology {sizes:?}: need at least 2 layers, all with a positive size")]
    InvalidTopology { sizes: Vec<usize> },

    #[error("Shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        found: String,
    },

    #[error("Numeric instability in {context}: value {value}")]
    NumericInstability { context: &'static str, value: f64 },

    #[error("Invalid batch size {batch_size} for a dataset of {rows} rows")]
    InvalidBatch { batch_size: usize, rows: usize },

    #[error("Layer index {index} out of range ({layers} weight matrices)")]
    LayerIndex { index: usize, layers: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NnError {
    pub(crate) fn shape(
        context: &'static str,
        expected: impl std::fmt::Display,
        found: impl std::fmt::Display,
    ) -> NnError {
        NnError::ShapeMismatch {
            context,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result type alias for NnError
pub type Result<T> = std::result::Result<T, NnError>;
