pub mod mse;
pub mod bce;
pub mod l2;
pub mod loss_type;

pub use mse::HalfMseLoss;
pub use bce::BceLoss;
pub use loss_type::LossType;
