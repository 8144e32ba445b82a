use serde::{Serialize, Deserialize};

/// Progress sample emitted by `train_loop` every `report_every` iterations.
///
/// Receivers (e.g. a visualiser redrawing once per frame) use this to show the
/// current loss and how far training has come.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Total iterations requested for this run.
    pub total_iterations: usize,
    /// Loss over the full dataset after this iteration's update.
    pub loss: f64,
    /// Wall-clock time since the run started, in milliseconds.
    pub elapsed_ms: u64,
}
