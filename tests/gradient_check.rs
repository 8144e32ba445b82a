// Analytic gradients from backprop against central finite differences of the loss.

use evo_nn::{Matrix, Network, NetworkConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

const STEP: f64 = 1e-4;
const TOLERANCE: f64 = 1e-3;

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize, lo: f64, hi: f64) -> Matrix {
    Matrix::from_data(
        (0..rows)
            .map(|_| (0..cols).map(|_| rng.gen_range(lo..hi)).collect())
            .collect(),
    )
}

fn numeric_gradient(net: &Network, x: &Matrix, y: &Matrix, layer: usize, r: usize, c: usize) -> f64 {
    let mut plus = net.clone();
    let mut w = net.weights()[layer].clone();
    w.data[r][c] += STEP;
    plus.replace_weight(layer, w).unwrap();

    let mut minus = net.clone();
    let mut w = net.weights()[layer].clone();
    w.data[r][c] -= STEP;
    minus.replace_weight(layer, w).unwrap();

    (plus.loss(x, y).unwrap() - minus.loss(x, y).unwrap()) / (2.0 * STEP)
}

fn check(config: NetworkConfig, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let net = Network::with_rng(&config, &mut rng).unwrap();
    let input_size = config.layer_sizes[0];
    let output_size = *config.layer_sizes.last().unwrap();
    let x = random_matrix(&mut rng, 5, input_size, -1.0, 1.0);
    let y = if config.regression {
        random_matrix(&mut rng, 5, output_size, -2.0, 2.0)
    } else {
        random_matrix(&mut rng, 5, output_size, 0.05, 0.95)
    };

    let analytic = net.gradients(&x, &y).unwrap();
    assert_eq!(analytic.len(), net.weights().len());

    for (layer, grad) in analytic.iter().enumerate() {
        assert_eq!(grad.shape(), net.weights()[layer].shape());
        for r in 0..grad.rows {
            for c in 0..grad.cols {
                let a = grad.get(r, c);
                let n = numeric_gradient(&net, &x, &y, layer, r, c);
                let diff = (a - n).abs();
                let rel = diff / (a.abs() + n.abs()).max(1e-12);
                assert!(
                    rel < TOLERANCE || diff < 1e-7,
                    "layer {layer} [{r},{c}]: analytic {a}, numeric {n}"
                );
            }
        }
    }
}

#[test]
fn classification_two_three_one() {
    check(NetworkConfig::new(vec![2, 3, 1]), 11);
}

#[test]
fn regression_two_three_one() {
    check(NetworkConfig::new(vec![2, 3, 1]).with_regression(true), 12);
}

#[test]
fn deeper_network_with_several_outputs() {
    check(NetworkConfig::new(vec![3, 4, 3, 2]), 13);
    check(NetworkConfig::new(vec![3, 4, 3, 2]).with_regression(true), 14);
}

#[test]
fn l2_regularized_gradients_match_penalised_loss() {
    check(NetworkConfig::new(vec![2, 3, 1]).with_lambda(0.3), 15);
    check(NetworkConfig::new(vec![2, 4, 2]).with_lambda(0.1).with_regression(true), 16);
}
