use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::batch;
use crate::train::iteration_stats::IterationStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Runs `config.iterations` steps of mini-batch gradient descent on `network`
/// and returns the **last reported** full-dataset loss (`None` when
/// `report_every` is unset or no report was reached).
///
/// # Arguments
/// - `network` : mutable reference to the network; weights are updated in place
/// - `inputs`  : full dataset, one sample per row, `layer_sizes[0]` columns
/// - `targets` : one target row per input row, `layer_sizes[last]` columns
/// - `config`  : batch size, iteration count, optional reporting / stop flag
///
/// # Errors
/// Shape and batch-size problems are reported before any weight changes.
/// A non-finite gradient aborts the run before that iteration's update, so
/// every iteration is applied to all layers or to none.
///
/// # Early termination
/// The loop stops early if the `progress_tx` receiver has been dropped or
/// `config.stop_flag` is set.
pub fn train_loop(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    config: &TrainConfig,
) -> Result<Option<f64>> {
    network.check_pair(inputs, targets)?;
    batch::validate(config.batch_size, inputs.rows)?;

    let optimizer = Sgd::new(network.learning_rate());
    let rows = inputs.rows;
    let t_start = Instant::now();
    let mut last_loss = None;

    debug!(
        batch_size = config.batch_size,
        iterations = config.iterations,
        rows,
        "training started"
    );

    for iteration in 0..config.iterations {
        if stop_requested(config) {
            debug!(iteration, "stop flag set, training halted");
            break;
        }

        let start = batch::start_row(iteration, config.batch_size, rows);
        let batch_inputs = inputs.rows_wrapping(start, config.batch_size);
        let batch_targets = targets.rows_wrapping(start, config.batch_size);

        let grads = network.gradients_unchecked(&batch_inputs, &batch_targets);
        if let Some(bad) = first_non_finite(&grads) {
            warn!(iteration, value = bad, "non-finite gradient, update skipped");
            return Err(NnError::NumericInstability { context: "gradient", value: bad });
        }
        optimizer.step(network.weights_mut(), &grads)?;

        // ── Progress ──────────────────────────────────────────────────────
        let done = iteration + 1;
        let due = match config.report_every {
            Some(every) if every > 0 => done % every == 0 || done == config.iterations,
            _ => false,
        };
        if !due {
            continue;
        }

        let loss = network.cost(inputs, targets)?;
        last_loss = Some(loss);
        trace!(iteration = done, loss, "training progress");

        if let Some(ref tx) = config.progress_tx {
            let stats = IterationStats {
                iteration: done,
                total_iterations: config.iterations,
                loss,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!(iteration = done, "progress receiver dropped, training halted");
                break;
            }
        }
    }

    debug!(elapsed_ms = t_start.elapsed().as_millis() as u64, "training finished");
    Ok(last_loss)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}

fn first_non_finite(grads: &[Matrix]) -> Option<f64> {
    grads.iter()
        .flat_map(|g| g.data.iter().flatten())
        .copied()
        .find(|x| !x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Arc, atomic::AtomicBool};
    use crate::network::config::NetworkConfig;

    fn xor() -> (Matrix, Matrix) {
        (
            Matrix::from_data(vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]]),
            Matrix::from_data(vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]]),
        )
    }

    #[test]
    fn reports_on_schedule_and_after_last_iteration() {
        let (x, y) = xor();
        let mut net = Network::new(&NetworkConfig::default()).unwrap();
        let (tx, rx) = mpsc::channel();
        let cfg = TrainConfig::new(4, 25).with_report_every(10).with_progress(tx);
        let last = train_loop(&mut net, &x, &y, &cfg).unwrap();
        drop(cfg);

        let seen: Vec<IterationStats> = rx.iter().collect();
        let iterations: Vec<usize> = seen.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![10, 20, 25]);
        assert_eq!(last, Some(seen[2].loss));
        assert_eq!(net.last_error(), seen[2].loss);
    }

    #[test]
    fn stop_flag_prevents_any_update() {
        let (x, y) = xor();
        let mut net = Network::new(&NetworkConfig::default()).unwrap();
        let before = net.weights().to_vec();
        let cfg = TrainConfig::new(2, 100).with_stop_flag(Arc::new(AtomicBool::new(true)));
        assert_eq!(train_loop(&mut net, &x, &y, &cfg).unwrap(), None);
        assert_eq!(net.weights(), &before[..]);
    }

    #[test]
    fn dropped_receiver_stops_training() {
        let (x, y) = xor();
        let mut net = Network::new(&NetworkConfig::default()).unwrap();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let cfg = TrainConfig::new(4, 1000).with_report_every(1).with_progress(tx);
        let last = train_loop(&mut net, &x, &y, &cfg).unwrap();
        assert!(last.is_some());
    }

    #[test]
    fn invalid_batch_leaves_weights_untouched() {
        let (x, y) = xor();
        let mut net = Network::new(&NetworkConfig::default()).unwrap();
        let before = net.weights().to_vec();
        let err = train_loop(&mut net, &x, &y, &TrainConfig::new(5, 10)).unwrap_err();
        assert!(matches!(err, NnError::InvalidBatch { batch_size: 5, rows: 4 }));
        assert_eq!(net.weights(), &before[..]);
    }

    #[test]
    fn non_finite_data_aborts_before_update() {
        let mut net = Network::new(&NetworkConfig::new(vec![1, 1]).with_regression(true)).unwrap();
        let before = net.weights().to_vec();
        let x = Matrix::from_data(vec![vec![f64::NAN]]);
        let y = Matrix::from_data(vec![vec![0.0]]);
        let err = train_loop(&mut net, &x, &y, &TrainConfig::new(1, 3)).unwrap_err();
        assert!(matches!(err, NnError::NumericInstability { .. }));
        assert_eq!(net.weights(), &before[..]);
    }
}
