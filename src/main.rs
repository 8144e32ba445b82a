//! Trains the XOR network the organism demos start from and prints its predictions.
//!
//! Usage:
//!   evo-nn [config.json]
//!
//! The optional config file holds `{"network": {...}, "train": {...}}`; any field
//! left out takes its default. Set `RUST_LOG=debug` for training progress.

use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use evo_nn::{train_loop, Matrix, Network, NetworkConfig, Result, TrainConfig};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunFile {
    network: NetworkConfig,
    train: TrainConfig,
}

impl Default for RunFile {
    fn default() -> Self {
        RunFile {
            network: NetworkConfig::default(),
            train: TrainConfig::new(4, 5000).with_report_every(500),
        }
    }
}

fn main() {
    init_logging();
    if let Err(e) = run(std::env::args().nth(1)) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(config_path: Option<String>) -> Result<()> {
    let settings = match config_path {
        Some(path) => {
            let file = std::fs::File::open(&path)?;
            serde_json::from_reader(std::io::BufReader::new(file))?
        }
        None => RunFile::default(),
    };

    let inputs = Matrix::try_from_rows(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ])?;
    let targets = Matrix::try_from_rows(vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]])?;

    let mut network = Network::new(&settings.network)?;
    info!(layers = ?network.layer_sizes(), "training XOR");

    let initial = network.cost(&inputs, &targets)?;
    train_loop(&mut network, &inputs, &targets, &settings.train)?;
    let fin = network.cost(&inputs, &targets)?;
    info!(initial_loss = initial, final_loss = fin, iterations = settings.train.iterations, "done");

    let predictions = network.predict(&inputs)?;
    for (input, output) in inputs.data.iter().zip(predictions.data.iter()) {
        println!("Input: {:?} -> Output: {:.4}", input, output[0]);
    }
    Ok(())
}
