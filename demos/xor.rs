use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

use evo_nn::{Matrix, Network, NetworkConfig};

fn main() -> evo_nn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let inputs = Matrix::from_data(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ]);
    let targets = Matrix::from_data(vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ]);

    let config = NetworkConfig::new(vec![2, 5, 1])
        .with_epsilon(1.0)
        .with_learning_rate(1.0);
    let mut network = Network::with_rng(&config, &mut StdRng::seed_from_u64(42))?;

    // Ten gradient steps per "frame", the way the visualiser drives it.
    let frames = 1000;
    for frame in 0..frames {
        network.run(&inputs, &targets, 4, 10)?;
        if frame % 100 == 0 {
            let loss = network.cost(&inputs, &targets)?;
            println!("Iterations {}: loss = {loss:.6}", frame * 10);
        }
    }

    let outputs = network.activate(&inputs)?;
    for (input, output) in inputs.data.iter().zip(outputs.data.iter()) {
        println!("Input: {:?} -> Output: {:.4}", input, output[0]);
    }
    for (i, hidden) in network.last_activations().iter().enumerate() {
        println!("Layer {} activations:\n{hidden}", i + 1);
    }
    Ok(())
}
