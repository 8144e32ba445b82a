pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::LayerTrace;
pub use network::{Network, NetworkConfig};
pub use loss::loss_type::LossType;
pub use optim::sgd::Sgd;
pub use train::{train_loop, IterationStats, TrainConfig};
