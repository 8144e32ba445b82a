use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Serialize, Deserialize};

use crate::train::iteration_stats::IterationStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `batch_size`   : rows per gradient step; equal to the row count for full-batch descent
/// - `iterations`   : number of gradient steps
/// - `report_every` : compute the full-dataset loss every N iterations (and after
///                    the last one); `None` skips loss evaluation entirely
/// - `progress_tx`  : optional channel sender receiving each `IterationStats`.
///                    If the receiver is dropped the loop stops early.
/// - `stop_flag`    : optional atomic flag; when set the loop stops before the
///                    next iteration. An iteration in progress always completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub batch_size: usize,
    pub iterations: usize,
    pub report_every: Option<usize>,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<IterationStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

/// Full-batch descent over a four-row dataset, the XOR demo's setting.
impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(4, 5000)
    }
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no reporting, progress channel or stop flag.
    pub fn new(batch_size: usize, iterations: usize) -> Self {
        TrainConfig {
            batch_size,
            iterations,
            report_every: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_report_every(mut self, every: usize) -> Self {
        self.report_every = Some(every);
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<IterationStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
